// 统一下单数据模型
// 定义下单请求、已签名的线上订单以及同步响应

use serde::{Deserialize, Serialize};

use crate::models::status::ProviderStatus;
use crate::utils::crypto::{FieldValue, SignableRecord};

/// 扫码支付交易类型
pub const TRADE_TYPE_NATIVE: &str = "NATIVE";

/// 调用方提供的订单业务字段
#[derive(Debug, Clone, Default)]
pub struct OrderDetails {
    /// 随机字符串，每个请求唯一
    pub nonce_str: String,
    /// 商品描述
    pub body: String,
    /// 商户订单号
    pub out_trade_no: String,
    /// 标价金额 (分)
    pub total_fee: i64,
    /// 终端IP
    pub spbill_create_ip: String,
    /// 异步通知地址
    pub notify_url: String,
    /// 交易类型
    pub trade_type: String,
    /// 商品ID (扫码支付可选)
    pub product_id: String,
}

/// 已签名的统一下单请求
///
/// 只能由 `OrderService::build_order` 创建，签名后字段不可再修改。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OutboundOrder {
    #[serde(rename = "appid", default, skip_serializing_if = "String::is_empty")]
    app_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    mch_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    nonce_str: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    sign_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    body: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    out_trade_no: String,
    #[serde(default)]
    total_fee: i64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    spbill_create_ip: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    notify_url: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    trade_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    product_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    sign: String,
}

impl OutboundOrder {
    /// 由凭据与业务字段组装未签名的订单
    pub(crate) fn unsigned(
        app_id: &str,
        mch_id: &str,
        sign_type: &str,
        details: OrderDetails,
    ) -> Self {
        Self {
            app_id: app_id.to_string(),
            mch_id: mch_id.to_string(),
            nonce_str: details.nonce_str,
            sign_type: sign_type.to_string(),
            body: details.body,
            out_trade_no: details.out_trade_no,
            total_fee: details.total_fee,
            spbill_create_ip: details.spbill_create_ip,
            notify_url: details.notify_url,
            trade_type: details.trade_type,
            product_id: details.product_id,
            sign: String::new(),
        }
    }

    /// 写入签名，之后订单即为只读
    pub(crate) fn into_signed(mut self, sign: String) -> Self {
        self.sign = sign;
        self
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn mch_id(&self) -> &str {
        &self.mch_id
    }

    pub fn nonce_str(&self) -> &str {
        &self.nonce_str
    }

    pub fn sign_type(&self) -> &str {
        &self.sign_type
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn out_trade_no(&self) -> &str {
        &self.out_trade_no
    }

    pub fn total_fee(&self) -> i64 {
        self.total_fee
    }

    pub fn spbill_create_ip(&self) -> &str {
        &self.spbill_create_ip
    }

    pub fn notify_url(&self) -> &str {
        &self.notify_url
    }

    pub fn trade_type(&self) -> &str {
        &self.trade_type
    }

    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    pub fn sign(&self) -> &str {
        &self.sign
    }
}

impl SignableRecord for OutboundOrder {
    fn fields(&self) -> Vec<(&str, FieldValue<'_>)> {
        vec![
            ("appid", FieldValue::Str(&self.app_id)),
            ("mch_id", FieldValue::Str(&self.mch_id)),
            ("nonce_str", FieldValue::Str(&self.nonce_str)),
            ("sign_type", FieldValue::Str(&self.sign_type)),
            ("body", FieldValue::Str(&self.body)),
            ("out_trade_no", FieldValue::Str(&self.out_trade_no)),
            ("total_fee", FieldValue::Int(self.total_fee)),
            ("spbill_create_ip", FieldValue::Str(&self.spbill_create_ip)),
            ("notify_url", FieldValue::Str(&self.notify_url)),
            ("trade_type", FieldValue::Str(&self.trade_type)),
            ("product_id", FieldValue::Str(&self.product_id)),
            ("sign", FieldValue::Str(&self.sign)),
        ]
    }

    fn signature(&self) -> &str {
        &self.sign
    }
}

/// 统一下单同步响应
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderResponse {
    /// 通信标识 SUCCESS/FAIL
    pub return_code: String,
    /// 返回信息
    pub return_msg: String,
    #[serde(rename = "appid")]
    pub app_id: String,
    pub mch_id: String,
    pub nonce_str: String,
    pub sign: String,
    /// 业务结果 SUCCESS/FAIL
    pub result_code: String,
    pub trade_type: String,
    /// 预支付交易会话标识
    pub prepay_id: String,
    /// 二维码链接 (扫码支付)
    pub code_url: String,
    pub device_info: String,
    pub err_code: String,
    pub err_code_des: String,
}

impl SignableRecord for OrderResponse {
    fn fields(&self) -> Vec<(&str, FieldValue<'_>)> {
        vec![
            ("return_code", FieldValue::Str(&self.return_code)),
            ("return_msg", FieldValue::Str(&self.return_msg)),
            ("appid", FieldValue::Str(&self.app_id)),
            ("mch_id", FieldValue::Str(&self.mch_id)),
            ("nonce_str", FieldValue::Str(&self.nonce_str)),
            ("sign", FieldValue::Str(&self.sign)),
            ("result_code", FieldValue::Str(&self.result_code)),
            ("trade_type", FieldValue::Str(&self.trade_type)),
            ("prepay_id", FieldValue::Str(&self.prepay_id)),
            ("code_url", FieldValue::Str(&self.code_url)),
            ("device_info", FieldValue::Str(&self.device_info)),
            ("err_code", FieldValue::Str(&self.err_code)),
            ("err_code_des", FieldValue::Str(&self.err_code_des)),
        ]
    }

    fn signature(&self) -> &str {
        &self.sign
    }
}

impl ProviderStatus for OrderResponse {
    fn return_code(&self) -> &str {
        &self.return_code
    }

    fn result_code(&self) -> &str {
        &self.result_code
    }
}
