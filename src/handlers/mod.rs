// API处理器模块
// 包含下单、支付通知回调与健康检查的HTTP请求处理逻辑

pub mod health_handlers;
pub mod notify_handlers;
pub mod order_handlers;

// 重新导出处理器
pub use health_handlers::*;
pub use notify_handlers::*;
pub use order_handlers::*;
