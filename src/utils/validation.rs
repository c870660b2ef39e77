// 数据验证工具函数
// 统一下单前的输入校验与金额换算

use std::collections::BTreeMap;
use std::net::IpAddr;

use chrono::Local;
use regex::Regex;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::error::{Result, WxPayError};
use crate::models::OrderDetails;

/// 商品描述最大字节数
pub const MAX_BODY_BYTES: usize = 128;

/// 商户订单号最大长度
pub const MAX_OUT_TRADE_NO_LEN: usize = 32;

/// 随机字符串最大长度
pub const MAX_NONCE_LEN: usize = 32;

/// 验证URL格式
///
/// # Arguments
/// * `url` - URL字符串
///
/// # Returns
/// * URL是否有效
pub fn validate_url(url: &str) -> bool {
    Regex::new(r"^https?://[^\s/$.?#].[^\s]*$")
        .map(|re| re.is_match(url))
        .unwrap_or(false)
}

/// 验证商户订单号格式
///
/// 只允许字母、数字以及 `_ - | *`，最长32位
pub fn validate_out_trade_no(out_trade_no: &str) -> Result<()> {
    if out_trade_no.is_empty() {
        return Err(invalid("out_trade_no cannot be empty"));
    }

    if out_trade_no.len() > MAX_OUT_TRADE_NO_LEN {
        return Err(invalid("out_trade_no too long (max 32 characters)"));
    }

    let valid_chars = out_trade_no
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '|' | '*'));

    if !valid_chars {
        return Err(invalid("out_trade_no contains invalid characters"));
    }

    Ok(())
}

/// 元转分
///
/// # Arguments
/// * `amount` - 以元为单位的金额
///
/// # Returns
/// * 以分为单位的整数金额，小数超过两位或非正数时报错
pub fn yuan_to_fen(amount: Decimal) -> Result<i64> {
    if amount <= Decimal::ZERO {
        return Err(invalid("amount must be positive"));
    }

    let fen = amount * Decimal::ONE_HUNDRED;
    if fen.fract() != Decimal::ZERO {
        return Err(invalid("amount precision too high (max 2 decimal places)"));
    }

    fen.to_i64().ok_or_else(|| invalid("amount too large"))
}

/// 按当前时间生成商户订单号 (D + 年月日时分秒 + _ + 微秒)
pub fn generate_out_trade_no() -> String {
    Local::now().format("D%Y%m%d%H%M%S_%6f").to_string()
}

/// 校验下单业务字段
///
/// # Arguments
/// * `details` - 调用方提供的订单字段
///
/// # Returns
/// * 全部通过返回Ok，否则返回汇总后的 `InvalidInput`
pub fn validate_order_details(details: &OrderDetails) -> Result<()> {
    let mut validator = InputValidator::new();

    validator.validate_required("nonce_str", &details.nonce_str);
    validator.validate_length("nonce_str", &details.nonce_str, 0, MAX_NONCE_LEN);
    validator.validate_no_padding("nonce_str", &details.nonce_str);
    validator.validate_required("body", &details.body);
    validator.validate_length("body", &details.body, 0, MAX_BODY_BYTES);
    validator.validate_no_padding("body", &details.body);
    if let Err(e) = validate_out_trade_no(&details.out_trade_no) {
        validator.add_error("out_trade_no", &e.to_string());
    }
    if details.total_fee <= 0 {
        validator.add_error("total_fee", "Must be a positive amount in fen");
    }
    validator.validate_ip_field("spbill_create_ip", &details.spbill_create_ip);
    validator.validate_url_field("notify_url", &details.notify_url);
    validator.validate_required("trade_type", &details.trade_type);
    validator.validate_no_padding("trade_type", &details.trade_type);
    validator.validate_no_padding("product_id", &details.product_id);

    validator.into_result()
}

fn invalid(message: &str) -> WxPayError {
    WxPayError::InvalidInput(message.to_string())
}

/// 通用输入验证器
pub struct InputValidator {
    errors: BTreeMap<String, Vec<String>>,
}

impl InputValidator {
    /// 创建新的验证器
    pub fn new() -> Self {
        Self {
            errors: BTreeMap::new(),
        }
    }

    /// 添加字段验证错误
    pub fn add_error(&mut self, field: &str, message: &str) {
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(message.to_string());
    }

    /// 验证必填字段
    pub fn validate_required(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.add_error(field, "This field is required");
        }
    }

    /// 验证字符串字节长度
    pub fn validate_length(&mut self, field: &str, value: &str, min: usize, max: usize) {
        let len = value.len();
        if len < min {
            self.add_error(field, &format!("Must be at least {} bytes", min));
        }
        if len > max {
            self.add_error(field, &format!("Must be at most {} bytes", max));
        }
    }

    /// 验证首尾无空白
    ///
    /// 解析XML时文本首尾空白会被去掉，带空白的值签名后无法被对端验签
    pub fn validate_no_padding(&mut self, field: &str, value: &str) {
        if value.trim() != value {
            self.add_error(field, "Must not start or end with whitespace");
        }
    }

    /// 验证URL格式
    pub fn validate_url_field(&mut self, field: &str, url: &str) {
        if !validate_url(url) {
            self.add_error(field, "Invalid URL format");
        }
    }

    /// 验证IP地址格式
    pub fn validate_ip_field(&mut self, field: &str, ip: &str) {
        if ip.parse::<IpAddr>().is_err() {
            self.add_error(field, "Invalid IP address");
        }
    }

    /// 检查是否有验证错误
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// 转换为错误结果
    pub fn into_result(self) -> Result<()> {
        if !self.has_errors() {
            return Ok(());
        }

        let error_msg = self
            .errors
            .iter()
            .map(|(field, messages)| format!("{}: {}", field, messages.join(", ")))
            .collect::<Vec<_>>()
            .join("; ");

        Err(WxPayError::InvalidInput(format!(
            "Validation failed: {}",
            error_msg
        )))
    }
}

impl Default for InputValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TRADE_TYPE_NATIVE;

    fn valid_details() -> OrderDetails {
        OrderDetails {
            nonce_str: "5K8264ILTKCH16CQ2502SI8ZNMTM67VS".to_string(),
            body: "购买商品".to_string(),
            out_trade_no: "D20240101120000_000001".to_string(),
            total_fee: 1,
            spbill_create_ip: "127.0.0.1".to_string(),
            notify_url: "https://www.test.com/wxpay/notify".to_string(),
            trade_type: TRADE_TYPE_NATIVE.to_string(),
            product_id: String::new(),
        }
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("http://www.test.com/wxPayCallback"));
        assert!(validate_url("https://example.com/notify?x=1"));
        assert!(!validate_url("www.abc.com/wxPayCallback"));
        assert!(!validate_url(""));
    }

    #[test]
    fn test_validate_out_trade_no() {
        assert!(validate_out_trade_no("D20240101120000_000001").is_ok());
        assert!(validate_out_trade_no("a-b|c*d").is_ok());
        assert!(validate_out_trade_no("").is_err());
        assert!(validate_out_trade_no(&"1".repeat(33)).is_err());
        assert!(validate_out_trade_no("订单1").is_err());
        assert!(validate_out_trade_no("a.b").is_err());
    }

    #[test]
    fn test_yuan_to_fen() {
        assert_eq!(yuan_to_fen(Decimal::new(1, 2)).unwrap(), 1); // 0.01
        assert_eq!(yuan_to_fen(Decimal::new(1999, 2)).unwrap(), 1999); // 19.99
        assert_eq!(yuan_to_fen(Decimal::new(5, 0)).unwrap(), 500);
        assert!(yuan_to_fen(Decimal::ZERO).is_err());
        assert!(yuan_to_fen(Decimal::new(-1, 0)).is_err());
        assert!(yuan_to_fen(Decimal::new(1, 3)).is_err()); // 0.001
    }

    #[test]
    fn test_generate_out_trade_no() {
        let no = generate_out_trade_no();
        assert!(no.starts_with('D'));
        assert_eq!(no.len(), 22);
        assert!(validate_out_trade_no(&no).is_ok());
    }

    #[test]
    fn test_validate_order_details() {
        assert!(validate_order_details(&valid_details()).is_ok());

        let details = OrderDetails {
            total_fee: 0,
            ..valid_details()
        };
        assert!(validate_order_details(&details).is_err());

        let details = OrderDetails {
            spbill_create_ip: "not-an-ip".to_string(),
            ..valid_details()
        };
        assert!(validate_order_details(&details).is_err());

        let details = OrderDetails {
            body: "商".repeat(50),
            ..valid_details()
        };
        assert!(validate_order_details(&details).is_err());
    }

    #[test]
    fn test_validate_order_details_rejects_padded_text() {
        let details = OrderDetails {
            body: "购买 商品".to_string(),
            ..valid_details()
        };
        assert!(validate_order_details(&details).is_ok());

        for details in [
            OrderDetails {
                body: " 购买 商品 ".to_string(),
                ..valid_details()
            },
            OrderDetails {
                product_id: "12235413214070356458058 ".to_string(),
                ..valid_details()
            },
            OrderDetails {
                trade_type: "NATIVE\n".to_string(),
                ..valid_details()
            },
        ] {
            match validate_order_details(&details) {
                Err(WxPayError::InvalidInput(msg)) => {
                    assert!(msg.contains("Must not start or end with whitespace"));
                }
                other => panic!("unexpected result: {:?}", other),
            }
        }
    }

    #[test]
    fn test_input_validator() {
        let mut validator = InputValidator::new();

        validator.validate_required("body", "");
        validator.validate_url_field("notify_url", "invalid-url");
        validator.validate_length("nonce_str", "short", 10, 32);

        assert!(validator.has_errors());
        match validator.into_result() {
            Err(WxPayError::InvalidInput(msg)) => {
                assert!(msg.starts_with("Validation failed: body:"));
                assert!(msg.contains("; nonce_str: Must be at least 10 bytes"));
                assert!(msg.contains("; notify_url: Invalid URL format"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
