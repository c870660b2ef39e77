// 通信与业务状态判定
// 同步响应与异步通知共用同一条成功判定规则

use crate::error::{Result, WxPayError};

/// 成功标识
pub const SUCCESS: &str = "SUCCESS";

/// 携带通信标识与业务结果的记录
pub trait ProviderStatus {
    /// 通信标识
    fn return_code(&self) -> &str;

    /// 业务结果
    fn result_code(&self) -> &str;
}

/// 校验通信标识与业务结果
///
/// 只有 return_code 与 result_code 同时为 SUCCESS 才算成功，
/// 否则原样带回两个状态码。
pub fn validate_status<R: ProviderStatus + ?Sized>(record: &R) -> Result<()> {
    if record.return_code() == SUCCESS && record.result_code() == SUCCESS {
        return Ok(());
    }

    Err(WxPayError::ProviderError {
        return_code: record.return_code().to_string(),
        result_code: record.result_code().to_string(),
    })
}
