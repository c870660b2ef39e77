// 支付结果通知处理器
// 接收微信支付异步回调，验证后返回固定应答

use actix_web::{web, HttpResponse, Result as ActixResult};

use crate::error::WxPayError;
use crate::services::{acknowledge_notification, failure_reply};
use crate::state::AppStateData;

const XML_CONTENT_TYPE: &str = "application/xml;charset=utf-8";

/// 微信支付结果通知
///
/// POST /wxpay/notify
///
/// 请求体: 微信支付推送的XML
/// 响应: 受理成功返回 SUCCESS 应答，否则返回 FAIL 及原因
pub async fn payment_notify(data: AppStateData, body: web::Bytes) -> ActixResult<HttpResponse> {
    match data.notify_service.verify_notification(&body) {
        Ok(payload) => {
            // 记录所有验证通过的通知
            match serde_json::to_string(&payload) {
                Ok(json) => log::info!("Payment notification accepted: {}", json),
                Err(e) => log::warn!("Failed to encode notification for logging: {}", e),
            }

            Ok(HttpResponse::Ok()
                .content_type(XML_CONTENT_TYPE)
                .body(acknowledge_notification()))
        }
        Err(e) => {
            let reason = match &e {
                WxPayError::MalformedNotification(_) => "报文格式错误",
                WxPayError::ProviderError { .. } => "支付结果非成功",
                WxPayError::SignatureMismatch { .. } => "签名失败",
                _ => "处理失败",
            };
            log::warn!("Payment notification rejected: {}", e);

            Ok(HttpResponse::BadRequest()
                .content_type(XML_CONTENT_TYPE)
                .body(failure_reply(reason)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::notify_service::tests::{paid_notification, signed_notification_xml};
    use crate::state::AppState;
    use actix_web::{test, App};

    #[actix_web::test]
    async fn test_valid_notification_is_acknowledged() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(AppState::new_for_test("http://127.0.0.1:9")))
                .route("/wxpay/notify", web::post().to(payment_notify)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/wxpay/notify")
            .set_payload(signed_notification_xml(paid_notification()))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
        let body = test::read_body(resp).await;
        assert_eq!(body, acknowledge_notification().as_bytes());
    }

    #[actix_web::test]
    async fn test_forged_notification_is_rejected() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(AppState::new_for_test("http://127.0.0.1:9")))
                .route("/wxpay/notify", web::post().to(payment_notify)),
        )
        .await;

        let forged = signed_notification_xml(paid_notification())
            .replace("<total_fee>1</total_fee>", "<total_fee>100</total_fee>");
        let req = test::TestRequest::post()
            .uri("/wxpay/notify")
            .set_payload(forged)
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 400);
        let body = test::read_body(resp).await;
        assert_eq!(body, failure_reply("签名失败").as_bytes());
    }

    #[actix_web::test]
    async fn test_garbage_notification_is_rejected() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(AppState::new_for_test("http://127.0.0.1:9")))
                .route("/wxpay/notify", web::post().to(payment_notify)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/wxpay/notify")
            .set_payload("hello")
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 400);
    }
}
