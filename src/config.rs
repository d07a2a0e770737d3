// src/config.rs

use crate::{
    constants,
    error::{AppError, AppResult},
};
use anyhow::Context;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NetworkConfig {
    pub connect_timeout_secs: Option<u64>,
    pub timeout_secs: Option<u64>,
    pub max_retries: Option<u32>,
    pub page_size: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DownloaderConfigFromFile {
    pub program: Option<String>,
    pub args: Option<Vec<String>>,
    pub workdir: Option<PathBuf>,
}

/// 配置文件 (JSON) 的原始结构，未知字段会被忽略
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalConfig {
    pub app_id: String,
    pub product_id: String,
    pub cookie: String,
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub url_templates: HashMap<String, String>,
    #[serde(default)]
    pub downloader: DownloaderConfigFromFile,
}

pub fn default_url_templates() -> HashMap<String, String> {
    use constants::api::{HOST_TEMPLATE, templates};
    HashMap::from([
        (
            templates::NAVIGATION.into(),
            format!("{HOST_TEMPLATE}/xe.micro_page.navigation.get/1.0.0"),
        ),
        (
            templates::COLUMN_ITEMS.into(),
            format!("{HOST_TEMPLATE}/xe.course.business.column.items.get/2.0.0"),
        ),
        (
            templates::VIDEO_DETAIL.into(),
            format!("{HOST_TEMPLATE}/xe.course.business.video.detail_info.get/2.0.0"),
        ),
        (
            templates::PLAY_URL.into(),
            format!("{HOST_TEMPLATE}/xe.material-center.play/getPlayUrl"),
        ),
    ])
}

/// 外部批量下载器的调用方式
#[derive(Debug, Clone)]
pub struct DownloaderConfig {
    pub program: String,
    pub args: Vec<String>,
    pub workdir: Option<PathBuf>,
}

impl Default for DownloaderConfig {
    fn default() -> Self {
        Self {
            program: constants::downloader::PROGRAM.to_string(),
            args: constants::downloader::ARGS.iter().map(|s| s.to_string()).collect(),
            workdir: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app_id: String,
    pub product_id: String,
    pub cookie: String,
    pub user_agent: String,
    pub connect_timeout: Duration,
    pub timeout: Duration,
    pub max_retries: u32,
    pub page_size: u32,
    pub url_templates: HashMap<String, String>,
    pub downloader: DownloaderConfig,
}

impl AppConfig {
    /// 从指定路径加载配置文件。文件不存在时返回 `ConfigMissing`。
    pub fn load(path: &Path) -> AppResult<Self> {
        if !path.is_file() {
            return Err(AppError::ConfigMissing(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("读取配置文件 '{}' 失败", path.display()))?;
        let external: ExternalConfig = serde_json::from_str(&content)
            .with_context(|| format!("解析配置文件 '{}' 失败", path.display()))?;
        info!("已加载配置文件: {}", path.display());
        Self::from_external(external, path.parent())
    }

    /// `base_dir` 用于解析 `downloader.workdir` 中的相对路径
    pub fn from_external(external: ExternalConfig, base_dir: Option<&Path>) -> AppResult<Self> {
        let app_id = external.app_id.trim().to_string();
        let product_id = external.product_id.trim().to_string();
        if app_id.is_empty() {
            return Err(AppError::ConfigInvalid("app_id 不能为空".to_string()));
        }
        if product_id.is_empty() {
            return Err(AppError::ConfigInvalid("product_id 不能为空".to_string()));
        }

        let mut url_templates = default_url_templates();
        url_templates.extend(external.url_templates);

        let defaults = DownloaderConfig::default();
        let workdir = external.downloader.workdir.map(|dir| match base_dir {
            Some(base) if dir.is_relative() => base.join(dir),
            _ => dir,
        });
        let downloader = DownloaderConfig {
            program: external.downloader.program.unwrap_or(defaults.program),
            args: external.downloader.args.unwrap_or(defaults.args),
            workdir,
        };
        debug!(
            "课程配置: app_id={}, product_id={}, 下载器={:?}",
            app_id, product_id, downloader
        );

        let network = external.network;
        Ok(Self {
            app_id,
            product_id,
            cookie: external.cookie,
            user_agent: constants::USER_AGENT.into(),
            connect_timeout: Duration::from_secs(
                network
                    .connect_timeout_secs
                    .unwrap_or(constants::network::CONNECT_TIMEOUT_SECS),
            ),
            timeout: Duration::from_secs(
                network.timeout_secs.unwrap_or(constants::network::TIMEOUT_SECS),
            ),
            max_retries: network.max_retries.unwrap_or(constants::network::MAX_RETRIES),
            page_size: network
                .page_size
                .filter(|size| *size > 0)
                .unwrap_or(constants::network::PAGE_SIZE),
            url_templates,
            downloader,
        })
    }

    /// 取出接口地址模板并填入 `{app_id}`
    pub fn endpoint(&self, key: &str) -> AppResult<String> {
        self.url_templates
            .get(key)
            .map(|template| template.replace("{app_id}", &self.app_id))
            .ok_or_else(|| AppError::UnknownTemplate(key.to_string()))
    }
}

#[cfg(feature = "testing")]
impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_id: "app_test".to_string(),
            product_id: "p_test".to_string(),
            cookie: "cookie: ko_token=test".to_string(),
            user_agent: "test-agent/1.0".to_string(),
            connect_timeout: Duration::from_secs(5),
            timeout: Duration::from_secs(15),
            max_retries: 3,
            page_size: constants::network::PAGE_SIZE,
            url_templates: default_url_templates(),
            downloader: DownloaderConfig::default(),
        }
    }
}
