// src/models/mod.rs

pub mod api;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 课程目录中的一个资源条目，顺序与接口返回一致
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceItem {
    pub resource_id: String,
    pub title: String,
}

impl ResourceItem {
    pub fn new(resource_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            resource_id: resource_id.into(),
            title: title.into(),
        }
    }
}

/// 资源详情中与播放相关的部分
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceDetail {
    pub play_sign: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayUrlEntry {
    #[serde(default)]
    pub play_url: Option<String>,
}

impl PlayUrlEntry {
    pub fn new(play_url: impl Into<String>) -> Self {
        Self {
            play_url: Some(play_url.into()),
        }
    }

    /// 去掉首尾空白后的播放地址；只含空白的地址与缺失同等对待
    pub fn usable_url(&self) -> Option<&str> {
        self.play_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

/// 清晰度键 (如 `720p_hls`) 到播放地址的映射
pub type QualityUrlMap = BTreeMap<String, PlayUrlEntry>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultRecord {
    pub resource_id: String,
    pub title: String,
    pub m3u8: String,
    pub quality: String,
}
