// API路由配置
// 定义所有HTTP接口的路由规则

use actix_web::{web, Scope};

use crate::handlers::*;

/// API v1路由配置
pub fn api_v1_routes() -> Scope {
    web::scope("/api/v1").route("/orders", web::post().to(create_order))
}

/// 微信支付回调路由
pub fn wxpay_routes() -> Scope {
    web::scope("/wxpay").route("/notify", web::post().to(payment_notify))
}

/// 公共路由 (无需认证)
pub fn public_routes() -> Scope {
    web::scope("").route("/health", web::get().to(health_check))
}
