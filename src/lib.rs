// 微信支付统一下单客户端
// 提供统一下单请求签名与发送、同步响应解析以及支付结果通知验签

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

pub use error::{Result, WxPayError};
pub use models::{
    AppCredentials, NotificationPayload, OrderDetails, OrderResponse, OutboundOrder,
};
pub use services::{acknowledge_notification, NotifyService, OrderService, WxPayClient};
pub use utils::crypto::{sign, sign_with, verify, verify_with, SignType, SignableRecord};
