// 微信支付HTTP客户端
// 负责把已签名的统一下单请求发送到微信支付并解析同步响应，不做重试

use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Client;

use crate::error::{Result, WxPayError};
use crate::models::{validate_status, AppCredentials, OrderDetails, OrderResponse};
use crate::services::OrderService;
use crate::utils::crypto::ensure_signature;

/// 统一下单接口地址
pub const UNIFIED_ORDER_URL: &str = "https://api.mch.weixin.qq.com/pay/unifiedorder";

/// 微信支付客户端
#[derive(Debug, Clone)]
pub struct WxPayClient {
    client: Client,
    order_service: OrderService,
    endpoint: String,
}

impl WxPayClient {
    /// 创建新的客户端实例
    ///
    /// # Arguments
    /// * `credentials` - 商户凭据
    /// * `endpoint` - 统一下单接口地址
    /// * `timeout` - 请求超时时间
    ///
    /// # Returns
    /// * 客户端实例
    pub fn new(credentials: AppCredentials, endpoint: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("wxpay-rs/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            order_service: OrderService::new(credentials),
            endpoint: endpoint.to_string(),
        })
    }

    /// 发送统一下单请求，返回原始响应体
    ///
    /// # Arguments
    /// * `details` - 订单字段
    ///
    /// # Returns
    /// * 微信支付返回的XML文本
    pub async fn send_unified_order(&self, details: OrderDetails) -> Result<String> {
        let out_trade_no = details.out_trade_no.clone();
        let payload = self.order_service.build_order_xml(details)?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/xml"));
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/xml;charset=utf-8"),
        );

        let start_time = Instant::now();
        let response = self
            .client
            .post(&self.endpoint)
            .headers(headers)
            .body(payload)
            .send()
            .await
            .map_err(|e| {
                log::error!("Unified order {} request failed: {}", out_trade_no, e);
                e
            })?
            .error_for_status()?;

        let body = response.text().await?;

        log::info!(
            "Unified order {} answered in {}ms",
            out_trade_no,
            start_time.elapsed().as_millis()
        );

        Ok(body)
    }

    /// 统一下单
    ///
    /// 发送请求、解析响应并校验通信标识与业务结果
    ///
    /// # Arguments
    /// * `details` - 订单字段
    ///
    /// # Returns
    /// * 成功的统一下单响应
    pub async fn unified_order(&self, details: OrderDetails) -> Result<OrderResponse> {
        let body = self.send_unified_order(details).await?;
        let response = OrderService::parse_response(body.as_bytes())?;

        if let Err(e) = validate_status(&response) {
            log::warn!(
                "Unified order rejected: {} ({} {})",
                e,
                response.err_code,
                response.err_code_des
            );
            return Err(e);
        }

        Ok(response)
    }

    /// 校验同步响应携带的签名
    pub fn verify_response(&self, response: &OrderResponse) -> Result<()> {
        let credentials = self.order_service.credentials();
        ensure_signature(response, credentials.api_key(), credentials.sign_type)
    }
}
