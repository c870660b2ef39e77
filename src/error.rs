// 错误类型定义
// 统一下单、响应解析与回调验签过程中的所有错误

use thiserror::Error;

/// 微信支付客户端错误
#[derive(Debug, Error)]
pub enum WxPayError {
    /// 签名前的输入不合法 (缺少字段、密钥为空等)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// 统一下单响应无法按约定结构解析
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// 支付结果通知无法按约定结构解析
    #[error("Malformed notification: {0}")]
    MalformedNotification(String),

    /// 结构完整但通信标识或业务结果不是 SUCCESS
    #[error("Provider error: return_code={return_code}, result_code={result_code}")]
    ProviderError {
        return_code: String,
        result_code: String,
    },

    /// 收到的签名与本地重新计算的签名不一致
    #[error("Signature mismatch: received={received}, expected={expected}")]
    SignatureMismatch { received: String, expected: String },

    /// XML 序列化失败
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// HTTP 请求失败
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, WxPayError>;
