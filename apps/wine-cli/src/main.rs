//! WineSystem 命令行客户端入口。

mod cli;
mod commands;
mod error;
mod output;

use clap::Parser;
use cli::Args;
use wine_config::ClientConfig;
use wine_telemetry::{init_tracing, metrics};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 加载本地 .env（如存在）
    dotenvy::dotenv().ok();
    let args = Args::parse();

    // 环境变量配置，命令行参数覆盖
    let mut config = ClientConfig::from_env()?;
    if let Some(api_url) = args.api_url.as_deref() {
        config = config.with_api_url(api_url)?;
    }

    // 日志写 stderr；RUST_LOG 优先
    let filter = if args.verbose {
        "debug".to_string()
    } else {
        config.log_filter.clone().unwrap_or_else(|| "warn".to_string())
    };
    init_tracing(&filter);

    let result = commands::run(args, config).await;
    let snapshot = metrics().snapshot();
    tracing::debug!(
        sent = snapshot.requests_sent,
        succeeded = snapshot.requests_succeeded,
        http_failures = snapshot.http_failures,
        transport_failures = snapshot.transport_failures,
        "requests"
    );

    if let Err(err) = result {
        let alert = err.alert();
        eprintln!("{}: {}", alert.title, alert.message);
        std::process::exit(1);
    }
    Ok(())
}
