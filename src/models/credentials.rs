// 商户凭据
// 公众账号ID、商户号与API密钥，客户端生命周期内只读

use std::fmt;

use crate::error::{Result, WxPayError};
use crate::utils::crypto::SignType;

/// 商户应用凭据
///
/// API密钥只参与签名计算，不会出现在任何线上报文或日志中。
#[derive(Clone)]
pub struct AppCredentials {
    /// 公众账号ID
    pub app_id: String,
    /// 商户号
    pub mch_id: String,
    /// API密钥
    api_key: String,
    /// 签名算法
    pub sign_type: SignType,
}

impl AppCredentials {
    /// 创建使用MD5签名的凭据
    pub fn new(
        app_id: impl Into<String>,
        mch_id: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            app_id: app_id.into(),
            mch_id: mch_id.into(),
            api_key: api_key.into(),
            sign_type: SignType::Md5,
        }
    }

    /// 指定签名算法
    pub fn with_sign_type(mut self, sign_type: SignType) -> Self {
        self.sign_type = sign_type;
        self
    }

    /// API密钥
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// 检查凭据完整性
    pub fn validate(&self) -> Result<()> {
        if self.app_id.is_empty() {
            return Err(WxPayError::InvalidInput("appid cannot be empty".to_string()));
        }
        if self.mch_id.is_empty() {
            return Err(WxPayError::InvalidInput("mch_id cannot be empty".to_string()));
        }
        if self.api_key.is_empty() {
            return Err(WxPayError::InvalidInput("API key cannot be empty".to_string()));
        }
        Ok(())
    }
}

impl fmt::Debug for AppCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppCredentials")
            .field("app_id", &self.app_id)
            .field("mch_id", &self.mch_id)
            .field("api_key", &"***")
            .field("sign_type", &self.sign_type)
            .finish()
    }
}
