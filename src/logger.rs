// src/logger.rs

use crate::{cli::LogLevel, constants};
use fern::colors::{Color, ColoredLevelConfig};
use log::LevelFilter;
use std::{env, path::PathBuf};

/// 控制台日志写到 stderr；`file_level` 不为 `Off` 时另外写入日志文件。
pub fn init_logger(verbose: bool, file_level: LogLevel) {
    let console_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let colors = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Cyan)
        .debug(Color::BrightBlack)
        .trace(Color::BrightBlack);

    let console = fern::Dispatch::new()
        .level(console_level)
        // 第三方库的调试日志过于冗长
        .level_for("reqwest", LevelFilter::Warn)
        .level_for("hyper_util", LevelFilter::Warn)
        .format(move |out, message, record| {
            out.finish(format_args!("[{}] {}", colors.color(record.level()), message))
        })
        .chain(std::io::stderr());

    let mut root = fern::Dispatch::new().chain(console);
    if let Some(file_dispatch) = file_dispatch(file_level) {
        root = root.chain(file_dispatch);
    }

    if let Err(e) = root.apply() {
        eprintln!("警告: 日志系统初始化失败: {}", e);
    }
}

fn log_file_path() -> PathBuf {
    match dirs::home_dir() {
        Some(home) => home
            .join(constants::CONFIG_DIR_NAME)
            .join(constants::LOG_FILE_NAME),
        None => {
            eprintln!("警告: 无法获取用户主目录，日志将写入临时目录。");
            env::temp_dir()
                .join(clap::crate_name!())
                .join(constants::LOG_FILE_NAME)
        }
    }
}

fn file_dispatch(level: LogLevel) -> Option<fern::Dispatch> {
    if level == LogLevel::Off {
        return None;
    }

    let log_file_path = log_file_path();
    if let Some(dir) = log_file_path.parent()
        && let Err(e) = std::fs::create_dir_all(dir)
    {
        eprintln!("警告: 无法创建日志目录 {:?}: {}", dir, e);
    }

    let file = match fern::log_file(&log_file_path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!(
                "警告: 无法打开主日志文件 {:?} : {}。将尝试使用备用日志文件。",
                log_file_path, e
            );
            let fallback_path = env::temp_dir().join(format!(
                "{}-{}",
                clap::crate_name!(),
                constants::LOG_FALLBACK_FILE_NAME
            ));
            match fern::log_file(&fallback_path) {
                Ok(file) => {
                    eprintln!("警告: 日志将写入备用文件: {:?}", fallback_path);
                    file
                }
                Err(e_fb) => {
                    eprintln!(
                        "错误: 无法创建备用日志文件 {:?}: {}。日志将不会被记录到文件。",
                        fallback_path, e_fb
                    );
                    return None;
                }
            }
        }
    };

    Some(
        fern::Dispatch::new()
            .level(LevelFilter::from(level))
            .format(|out, message, record| {
                out.finish(format_args!(
                    "[{}] [{:<5}] [{}:{}] - {}",
                    chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                    record.level(),
                    record.target(),
                    record.line().unwrap_or(0),
                    message
                ))
            })
            .chain(file),
    )
}
