// 支付结果通知数据模型
// 微信支付异步回调报文，包含同步响应的全部字段以及支付结果明细

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::status::ProviderStatus;
use crate::utils::crypto::{FieldValue, SignableRecord};

/// 支付完成时间格式 (yyyyMMddHHmmss)
pub const TIME_END_FORMAT: &str = "%Y%m%d%H%M%S";

/// 支付结果通知
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationPayload {
    pub return_code: String,
    pub return_msg: String,
    #[serde(rename = "appid")]
    pub app_id: String,
    pub mch_id: String,
    pub nonce_str: String,
    pub sign: String,
    pub sign_type: String,
    pub result_code: String,
    pub trade_type: String,
    pub prepay_id: String,
    pub code_url: String,
    pub device_info: String,
    pub err_code: String,
    pub err_code_des: String,
    /// 用户标识
    pub openid: String,
    /// 是否关注公众账号 Y/N
    pub is_subscribe: String,
    /// 付款银行
    pub bank_type: String,
    /// 订单金额 (分)
    pub total_fee: i64,
    /// 应结订单金额 (分)
    pub settlement_total_fee: i64,
    /// 货币种类
    pub fee_type: String,
    /// 现金支付金额 (分)
    pub cash_fee: i64,
    pub cash_fee_type: String,
    /// 微信支付订单号
    pub transaction_id: String,
    /// 商户订单号
    pub out_trade_no: String,
    /// 商家数据包
    pub attach: String,
    /// 支付完成时间
    pub time_end: String,
}

impl NotificationPayload {
    /// 解析支付完成时间，格式不正确时返回 None
    pub fn paid_at(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.time_end, TIME_END_FORMAT).ok()
    }
}

impl SignableRecord for NotificationPayload {
    fn fields(&self) -> Vec<(&str, FieldValue<'_>)> {
        vec![
            ("return_code", FieldValue::Str(&self.return_code)),
            ("return_msg", FieldValue::Str(&self.return_msg)),
            ("appid", FieldValue::Str(&self.app_id)),
            ("mch_id", FieldValue::Str(&self.mch_id)),
            ("nonce_str", FieldValue::Str(&self.nonce_str)),
            ("sign", FieldValue::Str(&self.sign)),
            ("sign_type", FieldValue::Str(&self.sign_type)),
            ("result_code", FieldValue::Str(&self.result_code)),
            ("trade_type", FieldValue::Str(&self.trade_type)),
            ("prepay_id", FieldValue::Str(&self.prepay_id)),
            ("code_url", FieldValue::Str(&self.code_url)),
            ("device_info", FieldValue::Str(&self.device_info)),
            ("err_code", FieldValue::Str(&self.err_code)),
            ("err_code_des", FieldValue::Str(&self.err_code_des)),
            ("openid", FieldValue::Str(&self.openid)),
            ("is_subscribe", FieldValue::Str(&self.is_subscribe)),
            ("bank_type", FieldValue::Str(&self.bank_type)),
            ("total_fee", FieldValue::Int(self.total_fee)),
            ("settlement_total_fee", FieldValue::Int(self.settlement_total_fee)),
            ("fee_type", FieldValue::Str(&self.fee_type)),
            ("cash_fee", FieldValue::Int(self.cash_fee)),
            ("cash_fee_type", FieldValue::Str(&self.cash_fee_type)),
            ("transaction_id", FieldValue::Str(&self.transaction_id)),
            ("out_trade_no", FieldValue::Str(&self.out_trade_no)),
            ("attach", FieldValue::Str(&self.attach)),
            ("time_end", FieldValue::Str(&self.time_end)),
        ]
    }

    fn signature(&self) -> &str {
        &self.sign
    }
}

impl ProviderStatus for NotificationPayload {
    fn return_code(&self) -> &str {
        &self.return_code
    }

    fn result_code(&self) -> &str {
        &self.result_code
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::crypto::canonical_string;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_paid_at() {
        let payload = NotificationPayload {
            time_end: "20141030133525".to_string(),
            ..Default::default()
        };
        let paid_at = payload.paid_at().unwrap();
        assert_eq!(paid_at.year(), 2014);
        assert_eq!(paid_at.month(), 10);
        assert_eq!(paid_at.day(), 30);
        assert_eq!(paid_at.hour(), 13);
        assert_eq!(paid_at.second(), 25);

        let payload = NotificationPayload::default();
        assert!(payload.paid_at().is_none());
    }

    #[test]
    fn test_zero_amounts_are_not_signed() {
        let payload = NotificationPayload {
            return_code: "SUCCESS".to_string(),
            total_fee: 1,
            ..Default::default()
        };
        let s = canonical_string(&payload, "K").unwrap();
        assert_eq!(s, "return_code=SUCCESS&total_fee=1&key=K");
        assert!(!s.contains("cash_fee"));
        assert!(!s.contains("settlement_total_fee"));
    }
}
