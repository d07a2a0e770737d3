// src/main.rs

use clap::{CommandFactory, FromArgMatches};
use colored::*;
use log::{error, info, warn};
use std::sync::Arc;
use xiaoet_m3u8::{cli::Cli, constants, error::AppError, logger, run_from_cli, ui};

#[tokio::main]
async fn main() {
    // 为 Windows 终端启用 ANSI 颜色支持。
    #[cfg(windows)]
    {
        colored::control::set_virtual_terminal(true).ok();
    }

    let after_help = format!(
        "示例:\n  # 输出整个课程每个视频的 m3u8\n  {bin} --config config.json\n\n  # 指定清晰度\n  {bin} -c config.json --quality 720p\n\n  # 列出后交给外部下载器\n  {bin} -c config.json --pipe --pipe-prefix courseA",
        bin = clap::crate_name!()
    );
    let cmd = Cli::command().after_help(after_help);
    let args = match Cli::from_arg_matches(&cmd.get_matches()) {
        Ok(args) => Arc::new(args),
        Err(e) => e.exit(),
    };
    logger::init_logger(args.verbose, args.log_level);

    // 收到 Ctrl-C 时丢弃正在运行的任务，临时文件和下载器进程随之清理
    let interrupted = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("无法监听 Ctrl-C 信号: {}", e);
            std::future::pending::<()>().await;
        }
    };
    let mut run = Box::pin(run_from_cli(args));
    let outcome = tokio::select! {
        result = &mut run => Some(result),
        _ = interrupted => None,
    };
    drop(run);

    let Some(outcome) = outcome else {
        warn!("用户中断");
        std::process::exit(130);
    };

    match outcome {
        Ok(code) => {
            info!("程序退出，退出码: {}", code);
            std::process::exit(code);
        }
        Err(AppError::ConfigMissing(path)) => {
            error!("配置文件不存在: {}", path.display());
            info!("请创建配置文件，参考 {}", constants::EXAMPLE_CONFIG_FILE);
            std::process::exit(1);
        }
        Err(e) => {
            error!("程序执行出错: {}", e);
            eprintln!("\n{} {}", *ui::ERROR, format!("程序执行出错: {}", e).red());
            std::process::exit(1);
        }
    }
}
