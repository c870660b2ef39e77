// 服务层模块
// 包含统一下单、支付通知验证以及HTTP客户端

pub mod notify_service;
pub mod order_service;
pub mod pay_client;

// 重新导出服务
pub use notify_service::{acknowledge_notification, failure_reply, NotifyService};
pub use order_service::OrderService;
pub use pay_client::{WxPayClient, UNIFIED_ORDER_URL};
