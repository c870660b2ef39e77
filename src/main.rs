use std::io;
use std::io::Write;

use actix_web::{web, App, HttpServer};
use anyhow::Context;
use chrono::Local;
use log::info;

use wxpay::config::Config;
use wxpay::middleware::RequestLogging;
use wxpay::routes::{api_v1_routes, public_routes, wxpay_routes};
use wxpay::state::AppState;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志
    let mut log_builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    log_builder
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] - {}",
                Local::now().format("%Y-%m-%d %H:%M:%S %:z"),
                record.level(),
                record.args()
            )
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
        })
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate()?;

    let bind_address = config.bind_address();
    let workers = config.server.workers;
    info!(
        "Starting wxpay service on {} (mch_id={}, sign_type={})",
        bind_address, config.wxpay.credentials.mch_id, config.wxpay.credentials.sign_type
    );

    let app_state =
        web::Data::new(AppState::new(config).context("Failed to create WeChat Pay client")?);

    let mut server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(RequestLogging)
            .service(api_v1_routes())
            .service(wxpay_routes())
            .service(public_routes())
    });
    if let Some(workers) = workers {
        server = server.workers(workers);
    }

    server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run()
        .await?;

    info!("wxpay service stopped");
    Ok(())
}
