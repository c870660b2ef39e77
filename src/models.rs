// 微信支付数据模型定义
// 包含商户凭据、统一下单请求/响应、支付结果通知等核心数据结构

mod credentials;
mod notify;
mod order;
pub mod status;

// 重新导出核心类型
pub use credentials::*;
pub use notify::*;
pub use order::*;
pub use status::{validate_status, ProviderStatus, SUCCESS};

use serde::Serialize;

/// 标准API响应格式
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    /// 响应状态码
    pub code: i32,
    /// 响应消息
    pub message: String,
    /// 响应数据
    pub data: Option<T>,
    /// 响应时间戳
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl<T> ApiResponse<T> {
    /// 创建成功响应
    pub fn success(data: T) -> Self {
        Self {
            code: 200,
            message: "Success".to_string(),
            data: Some(data),
            timestamp: chrono::Utc::now(),
        }
    }
}

impl ApiResponse<()> {
    /// 创建错误响应
    pub fn error(code: i32, message: &str) -> Self {
        ApiResponse {
            code,
            message: message.to_string(),
            data: None,
            timestamp: chrono::Utc::now(),
        }
    }
}
