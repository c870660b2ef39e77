// 统一下单API处理器
// 处理扫码支付下单请求，返回二维码链接与二维码图片

use actix_web::{web, HttpRequest, HttpResponse, Result as ActixResult};
use serde::{Deserialize, Serialize};

use crate::error::WxPayError;
use crate::models::{ApiResponse, OrderDetails, TRADE_TYPE_NATIVE};
use crate::state::AppStateData;
use crate::utils::{generate_code_url_qr, generate_nonce, generate_out_trade_no, is_code_url};

/// 创建扫码支付订单请求
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    /// 商品描述
    pub body: String,
    /// 金额 (分)
    pub total_fee: i64,
    /// 终端IP (缺省取请求来源地址)
    pub client_ip: Option<String>,
    /// 商户订单号 (缺省按时间生成)
    pub out_trade_no: Option<String>,
    /// 商品ID
    pub product_id: Option<String>,
}

/// 创建扫码支付订单响应
#[derive(Debug, Serialize)]
pub struct CreateOrderResponse {
    /// 商户订单号
    pub out_trade_no: String,
    /// 预支付交易会话标识
    pub prepay_id: String,
    /// 二维码链接
    pub code_url: String,
    /// 二维码图片 (data URI)
    pub qr_code: Option<String>,
}

/// 创建扫码支付订单
///
/// POST /api/v1/orders
///
/// 请求体: CreateOrderRequest
/// 响应: CreateOrderResponse
pub async fn create_order(
    data: AppStateData,
    request: web::Json<CreateOrderRequest>,
    req: HttpRequest,
) -> ActixResult<HttpResponse> {
    let request = request.into_inner();

    let client_ip = request.client_ip.unwrap_or_else(|| {
        req.peer_addr()
            .map(|addr| addr.ip().to_string())
            .unwrap_or_else(|| "127.0.0.1".to_string())
    });

    let details = OrderDetails {
        nonce_str: generate_nonce(),
        body: request.body,
        out_trade_no: request.out_trade_no.unwrap_or_else(generate_out_trade_no),
        total_fee: request.total_fee,
        spbill_create_ip: client_ip,
        notify_url: data.config.wxpay.notify_url.clone(),
        trade_type: TRADE_TYPE_NATIVE.to_string(),
        product_id: request.product_id.unwrap_or_default(),
    };
    let out_trade_no = details.out_trade_no.clone();

    match data.client.unified_order(details).await {
        Ok(response) => {
            // 只为微信扫码链接渲染二维码
            let qr_code = if !is_code_url(&response.code_url) {
                log::warn!(
                    "Order {} returned unexpected code_url: {:?}",
                    out_trade_no,
                    response.code_url
                );
                None
            } else {
                match generate_code_url_qr(&response.code_url) {
                    Ok(qr) => Some(qr),
                    Err(e) => {
                        log::warn!("Failed to render QR code for order {}: {}", out_trade_no, e);
                        None
                    }
                }
            };

            log::info!("Created native order: {}", out_trade_no);

            Ok(HttpResponse::Created().json(ApiResponse::success(CreateOrderResponse {
                out_trade_no,
                prepay_id: response.prepay_id,
                code_url: response.code_url,
                qr_code,
            })))
        }
        Err(e @ WxPayError::InvalidInput(_)) => {
            Ok(HttpResponse::BadRequest().json(ApiResponse::<()>::error(400, &e.to_string())))
        }
        Err(e @ WxPayError::ProviderError { .. }) => {
            Ok(HttpResponse::UnprocessableEntity().json(ApiResponse::<()>::error(422, &e.to_string())))
        }
        Err(e) => {
            log::error!("Failed to create order {}: {}", out_trade_no, e);
            Ok(HttpResponse::BadGateway().json(ApiResponse::<()>::error(502, "Payment provider unavailable")))
        }
    }
}
