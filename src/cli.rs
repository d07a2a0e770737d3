// src/cli.rs

use crate::{constants, quality::QualityChoice};
use clap::{Parser, ValueEnum, command, crate_version};
use std::path::PathBuf;

/// 定义日志文件的输出级别
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// 小鹅通课程 m3u8 列表输出工具
#[derive(Parser, Debug, Clone)]
#[command(
    version = crate_version!(),
    about,
    long_about = None,
    disable_help_flag = true,
    disable_version_flag = true,
)]
pub struct Cli {
    // --- 列表选项 (Options) ---
    /// 配置文件路径
    #[arg(short, long, value_name = "FILE", default_value_os_t = PathBuf::from(constants::DEFAULT_CONFIG_FILE), help_heading = "Options")]
    pub config: PathBuf,
    /// 导出指定清晰度的 m3u8 (auto 自动选择最佳)
    #[arg(short, long, value_enum, default_value_t = QualityChoice::Auto, help_heading = "Options")]
    pub quality: QualityChoice,
    /// 以 JSON 数组输出结果
    #[arg(long, action = clap::ArgAction::SetTrue, help_heading = "Options")]
    pub json: bool,
    /// 显示详细日志
    #[arg(short, long, action = clap::ArgAction::SetTrue, help_heading = "Options")]
    pub verbose: bool,

    // --- 外部下载器 (Downloader) ---
    /// 列出后直接调用外部批量下载器进行下载
    #[arg(long, action = clap::ArgAction::SetTrue, help_heading = "Downloader")]
    pub pipe: bool,
    /// [--pipe] 下载输出文件前缀
    #[arg(long, value_name = "PREFIX", default_value_t = constants::DEFAULT_PIPE_PREFIX.to_string(), help_heading = "Downloader")]
    pub pipe_prefix: String,
    /// [--pipe] 每个请求的最大重试次数
    #[arg(long, value_name = "N", default_value_t = constants::DEFAULT_PIPE_RETRIES, help_heading = "Downloader")]
    pub pipe_retries: u32,
    /// [--pipe] 请求超时 (秒)
    #[arg(long, value_name = "SECS", default_value_t = constants::DEFAULT_PIPE_TIMEOUT_SECS, help_heading = "Downloader")]
    pub pipe_timeout: u64,

    // --- 通用选项 (General) ---
    /// 显示此帮助信息并退出
    #[arg(short = 'h', long, action = clap::ArgAction::Help, global = true, help_heading = "General")]
    _help: Option<bool>,
    /// 显示版本信息并退出
    #[arg(short = 'V', long, action = clap::ArgAction::Version, global = true, help_heading = "General")]
    _version: Option<bool>,
    /// (隐藏参数) 设置日志文件的输出级别，用于调试
    #[arg(long, value_enum, default_value_t = LogLevel::Off, global = true, hide = true)]
    pub log_level: LogLevel,
}
