// 配置管理模块
// 负责从环境变量加载商户凭据、接口地址与服务监听配置

use std::env;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::models::AppCredentials;
use crate::services::UNIFIED_ORDER_URL;
use crate::utils::crypto::SignType;
use crate::utils::validation::validate_url;

/// 应用程序配置结构
#[derive(Debug, Clone)]
pub struct Config {
    /// 服务器配置
    pub server: ServerConfig,
    /// 微信支付配置
    pub wxpay: WxPayConfig,
}

/// 服务器配置
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// 服务器监听地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
    /// 工作线程数
    pub workers: Option<usize>,
}

/// 微信支付配置
#[derive(Debug, Clone)]
pub struct WxPayConfig {
    /// 商户凭据 (API密钥不会被打印)
    pub credentials: AppCredentials,
    /// 支付结果通知地址
    pub notify_url: String,
    /// 统一下单接口地址
    pub endpoint: String,
    /// 请求超时时间 (秒)
    pub timeout: u64,
}

impl WxPayConfig {
    /// 请求超时时间
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

impl Config {
    /// 从环境变量加载配置
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok(); // 加载.env文件，忽略错误

        let sign_type: SignType = env::var("WXPAY_SIGN_TYPE")
            .unwrap_or_else(|_| "MD5".to_string())
            .parse()
            .context("Invalid WXPAY_SIGN_TYPE")?;

        let credentials = AppCredentials::new(
            env::var("WXPAY_APP_ID").context("WXPAY_APP_ID environment variable is required")?,
            env::var("WXPAY_MCH_ID").context("WXPAY_MCH_ID environment variable is required")?,
            env::var("WXPAY_API_KEY").context("WXPAY_API_KEY environment variable is required")?,
        )
        .with_sign_type(sign_type);

        Ok(Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
                port: env::var("SERVER_PORT")
                    .unwrap_or_else(|_| "8080".to_string())
                    .parse()
                    .context("Invalid SERVER_PORT")?,
                workers: env::var("SERVER_WORKERS")
                    .ok()
                    .and_then(|s| s.parse().ok()),
            },
            wxpay: WxPayConfig {
                credentials,
                notify_url: env::var("WXPAY_NOTIFY_URL")
                    .context("WXPAY_NOTIFY_URL environment variable is required")?,
                endpoint: env::var("WXPAY_ENDPOINT")
                    .unwrap_or_else(|_| UNIFIED_ORDER_URL.to_string()),
                timeout: env::var("WXPAY_TIMEOUT")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()
                    .context("Invalid WXPAY_TIMEOUT")?,
            },
        })
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("Server port cannot be 0");
        }

        self.wxpay
            .credentials
            .validate()
            .context("Invalid WeChat Pay credentials")?;

        if !validate_url(&self.wxpay.notify_url) {
            anyhow::bail!("Notify URL must be an http(s) URL");
        }

        if !validate_url(&self.wxpay.endpoint) {
            anyhow::bail!("Unified order endpoint must be an http(s) URL");
        }

        if self.wxpay.timeout == 0 {
            anyhow::bail!("Request timeout cannot be 0");
        }

        Ok(())
    }

    /// 获取服务器绑定地址
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                workers: None,
            },
            wxpay: WxPayConfig {
                credentials: AppCredentials::new("", "", ""),
                notify_url: "http://127.0.0.1:8080/wxpay/notify".to_string(),
                endpoint: UNIFIED_ORDER_URL.to_string(),
                timeout: 30,
            },
        }
    }
}
