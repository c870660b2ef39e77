// 支付结果通知服务
// 负责解析微信支付异步回调、校验状态与签名并生成应答报文

use crate::error::{Result, WxPayError};
use crate::models::{validate_status, AppCredentials, NotificationPayload};
use crate::utils::crypto::ensure_signature;
use crate::utils::xml::{cdata, from_xml};

/// 通知处理成功后返回给微信支付的固定应答
pub const NOTIFY_SUCCESS_REPLY: &str =
    "<xml><return_code><![CDATA[SUCCESS]]></return_code><return_msg><![CDATA[OK]]></return_msg></xml>";

/// 支付结果通知服务
#[derive(Debug, Clone)]
pub struct NotifyService {
    credentials: AppCredentials,
}

impl NotifyService {
    /// 创建新的通知服务实例
    pub fn new(credentials: AppCredentials) -> Self {
        Self { credentials }
    }

    /// 验证支付结果通知
    ///
    /// 依次执行: 解析 → 状态校验 → 签名校验。
    /// 状态不是 SUCCESS 的通知在验签前即被拒绝。
    ///
    /// # Arguments
    /// * `body` - 回调请求体
    ///
    /// # Returns
    /// * 验证通过的通知内容
    pub fn verify_notification(&self, body: &[u8]) -> Result<NotificationPayload> {
        let payload: NotificationPayload =
            from_xml(body).map_err(WxPayError::MalformedNotification)?;

        validate_status(&payload)?;

        ensure_signature(
            &payload,
            self.credentials.api_key(),
            self.credentials.sign_type,
        )?;

        Ok(payload)
    }
}

/// 通知已受理的应答报文
pub fn acknowledge_notification() -> &'static str {
    NOTIFY_SUCCESS_REPLY
}

/// 通知处理失败的应答报文
///
/// # Arguments
/// * `message` - 失败原因，返回给微信支付用于排查
pub fn failure_reply(message: &str) -> String {
    format!(
        "<xml><return_code>{}</return_code><return_msg>{}</return_msg></xml>",
        cdata("FAIL"),
        cdata(message)
    )
}
