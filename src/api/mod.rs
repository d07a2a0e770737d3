// src/api/mod.rs

pub mod xiaoet;

pub use xiaoet::XiaoetApi;

use crate::{
    error::*,
    models::{QualityUrlMap, ResourceDetail, ResourceItem, api::NavigationInfo},
};
use async_trait::async_trait;

/// 课程平台接口。每个方法对应一次带认证的 HTTP 往返。
#[async_trait]
pub trait CourseApi: Send + Sync {
    /// 获取导航/会话信息，用于解析当前用户 ID
    async fn navigation_info(&self) -> AppResult<NavigationInfo>;

    /// 按原始顺序列出课程 (专栏) 下的全部资源
    async fn course_items(&self, product_id: &str) -> AppResult<Vec<ResourceItem>>;

    async fn resource_detail(&self, resource_id: &str) -> AppResult<ResourceDetail>;

    /// 用播放标识换取各清晰度的播放地址
    async fn playback_urls(&self, user_id: &str, play_sign: &str) -> AppResult<QualityUrlMap>;
}
