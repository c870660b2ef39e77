// 统一下单服务
// 负责组装并签名下单请求、序列化线上报文以及解析同步响应

use crate::error::{Result, WxPayError};
use crate::models::{AppCredentials, OrderDetails, OrderResponse, OutboundOrder};
use crate::utils::crypto::{sign_with, SignType};
use crate::utils::validation::validate_order_details;
use crate::utils::xml::{from_xml, to_xml};

/// 统一下单服务
#[derive(Debug, Clone)]
pub struct OrderService {
    credentials: AppCredentials,
}

impl OrderService {
    /// 创建新的下单服务实例
    pub fn new(credentials: AppCredentials) -> Self {
        Self { credentials }
    }

    /// 组装并签名统一下单请求
    ///
    /// # Arguments
    /// * `details` - 调用方提供的订单字段，nonce_str 由调用方保证唯一
    ///
    /// # Returns
    /// * 已签名、可直接序列化的订单
    pub fn build_order(&self, details: OrderDetails) -> Result<OutboundOrder> {
        self.credentials.validate()?;
        validate_order_details(&details)?;

        // MD5为默认算法，不上送 sign_type
        let sign_type = match self.credentials.sign_type {
            SignType::Md5 => "",
            other => other.as_str(),
        };

        let order = OutboundOrder::unsigned(
            &self.credentials.app_id,
            &self.credentials.mch_id,
            sign_type,
            details,
        );
        let sign = sign_with(&order, self.credentials.api_key(), self.credentials.sign_type)?;

        log::debug!(
            "Signed unified order {} with {}: {}",
            order.out_trade_no(),
            self.credentials.sign_type,
            sign
        );

        Ok(order.into_signed(sign))
    }

    /// 组装、签名并序列化为线上XML
    pub fn build_order_xml(&self, details: OrderDetails) -> Result<String> {
        let order = self.build_order(details)?;
        to_xml(&order)
    }

    /// 解析统一下单同步响应
    ///
    /// # Arguments
    /// * `body` - HTTP响应体
    ///
    /// # Returns
    /// * 解析后的响应，结构不合法时返回 `MalformedResponse`
    pub fn parse_response(body: &[u8]) -> Result<OrderResponse> {
        from_xml(body).map_err(WxPayError::MalformedResponse)
    }

    /// 当前使用的凭据
    pub fn credentials(&self) -> &AppCredentials {
        &self.credentials
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{validate_status, TRADE_TYPE_NATIVE};
    use crate::utils::crypto::{canonical_string, verify, verify_with, SignableRecord};

    const API_KEY: &str = "192006250b4c09247ec02edce69f6a2d";

    fn service() -> OrderService {
        OrderService::new(AppCredentials::new("wxd930ea5d5a258f4f", "10000100", API_KEY))
    }

    fn details() -> OrderDetails {
        OrderDetails {
            nonce_str: "ibuaiVcKdpRxkhJA".to_string(),
            body: "购买商品".to_string(),
            out_trade_no: "D20240101120000_000001".to_string(),
            total_fee: 1,
            spbill_create_ip: "127.0.0.1".to_string(),
            notify_url: "http://www.test.com/wxPayCallback".to_string(),
            trade_type: TRADE_TYPE_NATIVE.to_string(),
            product_id: String::new(),
        }
    }

    #[test]
    fn test_build_order_signs_record() {
        let order = service().build_order(details()).unwrap();

        assert_eq!(order.app_id(), "wxd930ea5d5a258f4f");
        assert_eq!(order.mch_id(), "10000100");
        assert_eq!(order.sign().len(), 32);
        assert!(order.sign_type().is_empty());
        assert!(verify(&order, API_KEY));
    }

    #[test]
    fn test_build_order_is_deterministic() {
        let a = service().build_order(details()).unwrap();
        let b = service().build_order(details()).unwrap();
        assert_eq!(a.sign(), b.sign());
    }

    #[test]
    fn test_build_order_with_hmac_sha256() {
        let credentials = AppCredentials::new("wxd930ea5d5a258f4f", "10000100", API_KEY)
            .with_sign_type(SignType::HmacSha256);
        let order = OrderService::new(credentials).build_order(details()).unwrap();

        assert_eq!(order.sign_type(), "HMAC-SHA256");
        assert_eq!(order.sign().len(), 64);
        assert!(canonical_string(&order, API_KEY)
            .unwrap()
            .contains("sign_type=HMAC-SHA256&"));
        assert!(verify_with(&order, API_KEY, SignType::HmacSha256));
        assert!(!verify(&order, API_KEY));
    }

    #[test]
    fn test_build_order_rejects_invalid_input() {
        let invalid = OrderDetails {
            nonce_str: String::new(),
            ..details()
        };
        assert!(matches!(
            service().build_order(invalid),
            Err(WxPayError::InvalidInput(_))
        ));

        let no_key = OrderService::new(AppCredentials::new("wx", "100", ""));
        assert!(matches!(
            no_key.build_order(details()),
            Err(WxPayError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_order_xml_never_contains_secret() {
        let xml = service().build_order_xml(details()).unwrap();
        assert!(xml.starts_with("<xml>"));
        assert!(xml.ends_with("</xml>"));
        assert!(!xml.contains(API_KEY));
        assert!(!xml.contains("<sign_type>"));
        assert!(!xml.contains("<product_id>"));
        assert!(xml.contains("<total_fee>1</total_fee>"));
    }

    #[test]
    fn test_order_xml_round_trip() {
        let order = service().build_order(details()).unwrap();
        let xml = to_xml(&order).unwrap();

        let parsed: OutboundOrder = from_xml(xml.as_bytes()).unwrap();
        assert_eq!(parsed, order);
        assert_eq!(parsed.fields(), order.fields());

        // 按响应结构解析，共有字段保持不变
        let response = OrderService::parse_response(xml.as_bytes()).unwrap();
        assert_eq!(response.app_id, order.app_id());
        assert_eq!(response.mch_id, order.mch_id());
        assert_eq!(response.nonce_str, order.nonce_str());
        assert_eq!(response.trade_type, order.trade_type());
        assert_eq!(response.sign, order.sign());
    }

    #[test]
    fn test_order_xml_round_trip_keeps_inner_whitespace() {
        let spaced = OrderDetails {
            body: "购买 商品 & 服务".to_string(),
            product_id: "12235413214070356458058".to_string(),
            ..details()
        };
        let order = service().build_order(spaced.clone()).unwrap();
        let xml = service().build_order_xml(spaced).unwrap();

        let parsed: OutboundOrder = from_xml(xml.as_bytes()).unwrap();
        assert_eq!(parsed.fields(), order.fields());
        assert!(verify(&parsed, API_KEY));
    }

    #[test]
    fn test_padded_body_is_never_signed() {
        let padded = OrderDetails {
            body: " 购买 商品 ".to_string(),
            ..details()
        };
        assert!(matches!(
            service().build_order(padded.clone()),
            Err(WxPayError::InvalidInput(_))
        ));
        assert!(matches!(
            service().build_order_xml(padded),
            Err(WxPayError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_parse_response() {
        let body = br#"<xml>
            <return_code><![CDATA[SUCCESS]]></return_code>
            <return_msg><![CDATA[OK]]></return_msg>
            <appid><![CDATA[wx2421b1c4370ec43b]]></appid>
            <mch_id><![CDATA[10000100]]></mch_id>
            <nonce_str><![CDATA[IITRi8Iabbblz1Jc]]></nonce_str>
            <sign><![CDATA[7921E432F65EB8ED0CE9755F0E86D72F]]></sign>
            <result_code><![CDATA[SUCCESS]]></result_code>
            <prepay_id><![CDATA[wx201411101639507cbf6ffd8b0779950874]]></prepay_id>
            <trade_type><![CDATA[NATIVE]]></trade_type>
            <code_url><![CDATA[weixin://wxpay/bizpayurl?pr=Pwy8mw2zz]]></code_url>
        </xml>"#;

        let response = OrderService::parse_response(body).unwrap();
        assert_eq!(response.return_code, "SUCCESS");
        assert_eq!(response.prepay_id, "wx201411101639507cbf6ffd8b0779950874");
        assert_eq!(response.code_url, "weixin://wxpay/bizpayurl?pr=Pwy8mw2zz");
        assert!(response.err_code.is_empty());
        assert!(validate_status(&response).is_ok());
    }

    #[test]
    fn test_parse_failed_response() {
        let body = b"<xml><return_code><![CDATA[FAIL]]></return_code>\
                     <return_msg><![CDATA[appid not exist]]></return_msg></xml>";

        let response = OrderService::parse_response(body).unwrap();
        assert_eq!(response.return_msg, "appid not exist");
        match validate_status(&response) {
            Err(WxPayError::ProviderError {
                return_code,
                result_code,
            }) => {
                assert_eq!(return_code, "FAIL");
                assert_eq!(result_code, "");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_parse_malformed_response() {
        assert!(matches!(
            OrderService::parse_response(b"not xml at all"),
            Err(WxPayError::MalformedResponse(_))
        ));
        assert!(matches!(
            OrderService::parse_response(b""),
            Err(WxPayError::MalformedResponse(_))
        ));
    }
}
