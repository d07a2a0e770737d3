// src/api/xiaoet.rs

use super::CourseApi;
use crate::{
    client::RobustClient,
    constants::api::{self as api_consts, templates},
    error::*,
    models::{
        QualityUrlMap, ResourceDetail, ResourceItem,
        api::{ColumnItemsPage, NavigationInfo, PlayUrlResponse, VideoDetailResponse},
    },
};
use async_trait::async_trait;
use log::{debug, warn};
use serde::Serialize;
use std::sync::Arc;

#[derive(Serialize, Debug)]
struct PlayUrlRequest<'a> {
    org_app_id: &'a str,
    app_id: &'a str,
    user_id: &'a str,
    play_sign: [&'a str; 1],
    play_line: &'a str,
    opr_user_id: &'a str,
}

/// 基于 `RobustClient` 的小鹅通接口实现
pub struct XiaoetApi {
    http_client: Arc<RobustClient>,
}

impl XiaoetApi {
    pub fn new(http_client: Arc<RobustClient>) -> Self {
        Self { http_client }
    }

    async fn fetch_items_page(
        &self,
        product_id: &str,
        page_index: u32,
        page_size: u32,
    ) -> AppResult<ColumnItemsPage> {
        let page_index = page_index.to_string();
        let page_size = page_size.to_string();
        self.http_client
            .fetch_form(
                templates::COLUMN_ITEMS,
                &[
                    ("bizData[column_id]", product_id),
                    ("bizData[page_index]", &page_index),
                    ("bizData[page_size]", &page_size),
                    ("bizData[sort]", api_consts::SORT_ASC),
                ],
            )
            .await
    }
}

#[async_trait]
impl CourseApi for XiaoetApi {
    async fn navigation_info(&self) -> AppResult<NavigationInfo> {
        let app_id = self.http_client.config().app_id.as_str();
        self.http_client
            .fetch_form(templates::NAVIGATION, &[("app_id", app_id)])
            .await
    }

    async fn course_items(&self, product_id: &str) -> AppResult<Vec<ResourceItem>> {
        let page_size = self.http_client.config().page_size;
        let mut items: Vec<ResourceItem> = Vec::new();
        let mut page_index = 1;
        let mut previous_first_id: Option<String> = None;
        loop {
            let page = self.fetch_items_page(product_id, page_index, page_size).await?;
            let fetched = page.list.len();
            debug!(
                "课程 '{}' 第 {} 页返回 {} 个资源 (total={:?})",
                product_id, page_index, fetched, page.total
            );

            // 服务端忽略页码时会反复返回同一页
            let first_id = page.list.first().map(|item| item.resource_id.clone());
            if first_id.is_some() && first_id == previous_first_id {
                warn!(
                    "课程 '{}' 第 {} 页与上一页重复，停止翻页",
                    product_id, page_index
                );
                break;
            }
            previous_first_id = first_id;

            items.extend(page.list.into_iter().map(ResourceItem::from));

            let reached_total = page.total.is_some_and(|total| items.len() >= total);
            if fetched == 0 || fetched < page_size as usize || reached_total {
                break;
            }
            page_index += 1;
        }
        Ok(items)
    }

    async fn resource_detail(&self, resource_id: &str) -> AppResult<ResourceDetail> {
        let product_id = self.http_client.config().product_id.as_str();
        let detail: VideoDetailResponse = self
            .http_client
            .fetch_form(
                templates::VIDEO_DETAIL,
                &[
                    ("bizData[resource_id]", resource_id),
                    ("bizData[product_id]", product_id),
                ],
            )
            .await?;
        Ok(detail.into())
    }

    async fn playback_urls(&self, user_id: &str, play_sign: &str) -> AppResult<QualityUrlMap> {
        let app_id = self.http_client.config().app_id.as_str();
        let request = PlayUrlRequest {
            org_app_id: app_id,
            app_id,
            user_id,
            play_sign: [play_sign],
            play_line: api_consts::PLAY_LINE,
            opr_user_id: user_id,
        };
        let mut data: PlayUrlResponse = self
            .http_client
            .fetch_json(templates::PLAY_URL, &request)
            .await?;

        let entry = match data.remove(play_sign) {
            Some(entry) => Some(entry),
            None if data.len() == 1 => data.into_values().next(),
            None => {
                warn!("播放地址响应中没有对应 play_sign 的条目");
                None
            }
        };
        Ok(entry.map(|e| e.play_list).unwrap_or_default())
    }
}
