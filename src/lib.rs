// src/lib.rs

pub mod api;
pub mod cli;
pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod handoff;
pub mod lister;
pub mod logger;
pub mod models;
pub mod quality;
pub mod ui;

use crate::{
    api::XiaoetApi,
    cli::Cli,
    client::RobustClient,
    config::AppConfig,
    error::AppResult,
    handoff::{DownloaderHandoff, HandoffOptions},
    lister::CourseLister,
};
use log::{debug, info, warn};
use std::sync::Arc;

/// 库的公共入口点，由 `main.rs` 调用。返回值为进程退出码。
pub async fn run_from_cli(args: Arc<Cli>) -> AppResult<i32> {
    debug!("CLI 参数: {:?}", args);

    let config = Arc::new(AppConfig::load(&args.config)?);
    let http_client = Arc::new(RobustClient::new(config.clone())?);
    let lister = CourseLister::new(
        Arc::new(XiaoetApi::new(http_client)),
        config.product_id.clone(),
    );

    info!("列出课程内所有视频的 m3u8 地址");
    let records = lister.list_course_manifests(args.quality).await;

    if args.json {
        ui::print_records_json(&records)?;
    } else if !records.is_empty() {
        ui::print_records(&records);
    }

    if records.is_empty() {
        warn!("未获取到任何 m3u8 地址");
        return Ok(1);
    }

    if args.pipe {
        let options = HandoffOptions {
            prefix: args.pipe_prefix.clone(),
            retries: args.pipe_retries,
            timeout_secs: args.pipe_timeout,
        };
        let handoff = DownloaderHandoff::new(&config.downloader, &config.cookie, &config.app_id);
        let code = handoff.run(&records, &options).await?;
        if code != 0 {
            return Ok(code);
        }
    }

    Ok(0)
}
