// src/lister.rs

use crate::{
    api::CourseApi,
    constants,
    error::*,
    models::{ResourceItem, ResultRecord},
    quality::{self, QualityChoice},
};
use log::{debug, error, info, warn};
use std::sync::Arc;
use url::Url;

/// 单个资源处理完毕后的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceOutcome {
    Resolved(ResultRecord),
    Skipped(SkipReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NotVideo,
    MissingPlaySign,
    NoPlayableQuality,
}

/// 列出课程内所有视频的 m3u8 地址
pub struct CourseLister {
    api: Arc<dyn CourseApi>,
    product_id: String,
}

impl CourseLister {
    pub fn new(api: Arc<dyn CourseApi>, product_id: impl Into<String>) -> Self {
        Self {
            api,
            product_id: product_id.into(),
        }
    }

    async fn resolve_user_id(&self) -> Option<String> {
        match self.api.navigation_info().await {
            Ok(info) => info.resolve_user_id().map(str::to_string),
            Err(e @ AppError::CookieInvalid) => {
                error!("获取导航信息失败: {}，请从浏览器重新复制 Cookie", e);
                None
            }
            Err(e) => {
                error!("获取导航信息失败: {}", e);
                None
            }
        }
    }

    /// 按课程顺序逐个解析视频资源，单个资源失败不会影响其余资源。
    pub async fn list_course_manifests(&self, desired: QualityChoice) -> Vec<ResultRecord> {
        let mut records = Vec::new();

        let Some(user_id) = self.resolve_user_id().await else {
            error!("无法获取用户ID");
            return records;
        };
        debug!("当前用户ID: {}", user_id);

        let items = match self.api.course_items(&self.product_id).await {
            Ok(items) => items,
            Err(e) => {
                error!("获取课程 '{}' 的资源列表失败: {}", self.product_id, e);
                return records;
            }
        };
        if items.is_empty() {
            warn!("未找到课程资源");
            return records;
        }

        let total = items.len();
        info!("找到 {} 个资源，开始获取 m3u8", total);
        for (index, item) in items.iter().enumerate() {
            let position = index + 1;
            match self.resolve_resource(&user_id, item, desired).await {
                Ok(ResourceOutcome::Resolved(record)) => {
                    info!("[{}/{}] {}: {}", position, total, record.quality, record.title);
                    records.push(record);
                }
                Ok(ResourceOutcome::Skipped(SkipReason::NotVideo)) => {
                    info!("跳过非视频资源: {}", item.title);
                }
                Ok(ResourceOutcome::Skipped(SkipReason::MissingPlaySign)) => {
                    warn!("无法获取播放标识: {}", item.title);
                }
                Ok(ResourceOutcome::Skipped(SkipReason::NoPlayableQuality)) => {
                    warn!("[{}/{}] 无法获取 m3u8: {}", position, total, item.title);
                }
                Err(e) => {
                    error!("获取视频 {} 的 m3u8 时出错: {}", item.title, e);
                }
            }
        }

        info!("共解析出 {}/{} 个 m3u8 地址", records.len(), total);
        records
    }

    /// 处理单个资源: 类型判断 -> 播放标识 -> 清晰度映射 -> 选择地址
    pub async fn resolve_resource(
        &self,
        user_id: &str,
        item: &ResourceItem,
        desired: QualityChoice,
    ) -> AppResult<ResourceOutcome> {
        if !item.resource_id.starts_with(constants::VIDEO_RESOURCE_PREFIX) {
            return Ok(ResourceOutcome::Skipped(SkipReason::NotVideo));
        }

        let detail = self.api.resource_detail(&item.resource_id).await?;
        let Some(play_sign) = detail.play_sign else {
            return Ok(ResourceOutcome::Skipped(SkipReason::MissingPlaySign));
        };

        let quality_map = self.api.playback_urls(user_id, &play_sign).await?;
        debug!(
            "资源 '{}' 可用清晰度: {:?}",
            item.resource_id,
            quality_map.keys().collect::<Vec<_>>()
        );
        let Some(selected) = quality::select_stream(desired, &quality_map) else {
            return Ok(ResourceOutcome::Skipped(SkipReason::NoPlayableQuality));
        };

        Url::parse(&selected.url)?;
        Ok(ResourceOutcome::Resolved(ResultRecord {
            resource_id: item.resource_id.clone(),
            title: item.title.clone(),
            m3u8: selected.url,
            quality: selected.quality,
        }))
    }
}
