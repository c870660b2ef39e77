// 应用状态管理
// 包含微信支付客户端、通知服务与配置信息等全局只读状态

use actix_web::web;

use crate::config::Config;
use crate::error::Result;
use crate::services::{NotifyService, WxPayClient};

/// 应用全局状态
pub struct AppState {
    /// 统一下单客户端
    pub client: WxPayClient,
    /// 支付结果通知服务
    pub notify_service: NotifyService,
    /// 应用配置
    pub config: Config,
}

impl AppState {
    /// 根据配置创建应用状态
    ///
    /// # Arguments
    /// * `config` - 应用配置
    ///
    /// # Returns
    /// * 应用状态实例
    pub fn new(config: Config) -> Result<Self> {
        let client = WxPayClient::new(
            config.wxpay.credentials.clone(),
            &config.wxpay.endpoint,
            config.wxpay.timeout(),
        )?;
        let notify_service = NotifyService::new(config.wxpay.credentials.clone());

        Ok(Self {
            client,
            notify_service,
            config,
        })
    }

    /// 创建测试用的应用状态
    #[cfg(test)]
    pub fn new_for_test(endpoint: &str) -> Self {
        use crate::models::AppCredentials;

        let mut config = Config::default();
        config.wxpay.credentials =
            AppCredentials::new("wx2421b1c4370ec43b", "10000100", "192006250b4c09247ec02edce69f6a2d");
        config.wxpay.endpoint = endpoint.to_string();
        config.wxpay.timeout = 1;

        Self::new(config).expect("Failed to build test state")
    }
}

/// 应用状态数据类型别名
pub type AppStateData = web::Data<AppState>;
