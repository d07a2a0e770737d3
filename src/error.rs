// src/error.rs

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("认证失败 (Cookie 无效或已过期)")]
    CookieInvalid,
    #[error("配置文件不存在: {}", .0.display())]
    ConfigMissing(PathBuf),
    #[error("配置无效: {0}")]
    ConfigInvalid(String),
    #[error("未配置接口地址模板 '{0}'")]
    UnknownTemplate(String),
    #[error("网络请求失败: {0}")]
    Network(#[from] reqwest::Error),
    #[error("网络中间件错误: {0}")]
    NetworkMiddleware(#[from] reqwest_middleware::Error),
    #[error("接口返回错误 (code={code}): {msg}")]
    Api { code: i64, msg: String },
    #[error("来自 '{0}' 的API响应缺少 data 字段")]
    MissingData(String),
    #[error("I/O 错误: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON 解析错误: {0}")]
    Json(#[from] serde_json::Error),
    #[error("无法解析来自 '{url}' 的API响应: {source}")]
    ApiParseFailed {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("URL 解析错误: {0}")]
    Url(#[from] url::ParseError),
    #[error("未知错误: {0}")]
    Other(#[from] anyhow::Error),
}

pub type AppResult<T> = Result<T, AppError>;
