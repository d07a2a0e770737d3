// src/models/api.rs

use super::{QualityUrlMap, ResourceDetail, ResourceItem};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::HashMap;

// --- 通用结构体 ---

/// 所有接口统一的响应外壳: `{ "code": 0, "msg": "...", "data": ... }`
#[derive(Deserialize, Debug, Clone)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub msg: String,
    pub data: Option<T>,
}

/// 部分接口把 ID 返回为数字，这里统一转成字符串
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

// --- 导航信息 (Navigation) ---

#[derive(Deserialize, Debug, Clone, Default)]
pub struct UserRef {
    #[serde(default, deserialize_with = "string_or_number")]
    pub user_id: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct NavigationInfo {
    #[serde(default, deserialize_with = "string_or_number")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub user: Option<UserRef>,
    #[serde(default)]
    pub user_info: Option<UserRef>,
}

type UserIdExtractor = fn(&NavigationInfo) -> Option<&str>;

fn top_level_user_id(info: &NavigationInfo) -> Option<&str> {
    info.user_id.as_deref()
}

fn nested_user_id(info: &NavigationInfo) -> Option<&str> {
    info.user.as_ref()?.user_id.as_deref()
}

fn nested_user_info_id(info: &NavigationInfo) -> Option<&str> {
    info.user_info.as_ref()?.user_id.as_deref()
}

/// 按优先级排列的用户 ID 提取器
const USER_ID_EXTRACTORS: [UserIdExtractor; 3] =
    [top_level_user_id, nested_user_id, nested_user_info_id];

impl NavigationInfo {
    /// 依次尝试各提取器，返回第一个非空的用户 ID
    pub fn resolve_user_id(&self) -> Option<&str> {
        USER_ID_EXTRACTORS
            .iter()
            .filter_map(|extract| extract(self))
            .map(str::trim)
            .find(|id| !id.is_empty())
    }
}

// --- 专栏目录 (Column items) ---

#[derive(Deserialize, Debug, Clone)]
pub struct ColumnItem {
    pub resource_id: String,
    #[serde(alias = "title", default)]
    pub resource_title: String,
}

impl From<ColumnItem> for ResourceItem {
    fn from(item: ColumnItem) -> Self {
        ResourceItem::new(item.resource_id, item.resource_title)
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct ColumnItemsPage {
    #[serde(default)]
    pub list: Vec<ColumnItem>,
    pub total: Option<usize>,
}

// --- 视频详情 (Video detail) ---

#[derive(Deserialize, Debug, Clone, Default)]
pub struct VideoInfo {
    pub play_sign: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct VideoDetailResponse {
    pub video_info: Option<VideoInfo>,
    pub play_sign: Option<String>,
}

impl From<VideoDetailResponse> for ResourceDetail {
    fn from(detail: VideoDetailResponse) -> Self {
        let play_sign = detail
            .video_info
            .and_then(|info| info.play_sign)
            .or(detail.play_sign)
            .filter(|sign| !sign.trim().is_empty());
        ResourceDetail { play_sign }
    }
}

// --- 播放地址 (Play url) ---

#[derive(Deserialize, Debug, Clone, Default)]
pub struct PlaySignEntry {
    #[serde(default)]
    pub play_list: QualityUrlMap,
}

/// `data` 以 play_sign 为键
pub type PlayUrlResponse = HashMap<String, PlaySignEntry>;
