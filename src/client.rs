// src/client.rs

use crate::{config::AppConfig, error::*, handoff, models::api::ApiEnvelope};
use log::{debug, trace};
use reqwest::{
    Response, StatusCode,
    header::{COOKIE, HeaderMap, HeaderValue, REFERER},
};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware, RequestBuilder};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use serde::{Serialize, de::DeserializeOwned};
use std::sync::Arc;

#[derive(Clone)]
pub struct RobustClient {
    pub client: ClientWithMiddleware,
    config: Arc<AppConfig>,
}

impl RobustClient {
    pub fn new(config: Arc<AppConfig>) -> AppResult<Self> {
        let retry_policy =
            ExponentialBackoff::builder().build_with_max_retries(config.max_retries);
        let client = ClientBuilder::new(
            reqwest::Client::builder()
                .user_agent(config.user_agent.clone())
                .default_headers(Self::auth_headers(&config)?)
                .connect_timeout(config.connect_timeout)
                .timeout(config.timeout)
                .build()?,
        )
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build();

        Ok(Self { client, config })
    }

    fn auth_headers(config: &AppConfig) -> AppResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        let cookie = handoff::normalize_cookie(&config.cookie);
        if !cookie.is_empty() {
            let value = HeaderValue::from_str(&cookie)
                .map_err(|e| AppError::ConfigInvalid(format!("cookie 含有非法字符: {}", e)))?;
            headers.insert(COOKIE, value);
        }
        let referer = HeaderValue::from_str(&handoff::referer_for(&config.app_id))
            .map_err(|e| AppError::ConfigInvalid(format!("app_id 含有非法字符: {}", e)))?;
        headers.insert(REFERER, referer);
        Ok(headers)
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    async fn send(&self, request: RequestBuilder) -> AppResult<Response> {
        let res = request.send().await?;
        if res.status() == StatusCode::UNAUTHORIZED || res.status() == StatusCode::FORBIDDEN {
            return Err(AppError::CookieInvalid);
        }
        Ok(res.error_for_status()?)
    }

    pub async fn post_form(&self, url: &str, form: &[(&str, &str)]) -> AppResult<Response> {
        self.send(self.client.post(url).form(form)).await
    }

    pub async fn post_json<B: Serialize + ?Sized>(&self, url: &str, body: &B) -> AppResult<Response> {
        self.send(self.client.post(url).json(body)).await
    }

    /// 以表单方式调用 `template_key` 对应的接口并解出 `data`
    pub async fn fetch_form<T: DeserializeOwned>(
        &self,
        template_key: &str,
        form: &[(&str, &str)],
    ) -> AppResult<T> {
        let url = self.config.endpoint(template_key)?;
        debug!("POST (form) {}", url);
        let res = self.post_form(&url, form).await?;
        Self::decode_envelope(&url, res).await
    }

    /// 以 JSON 请求体调用 `template_key` 对应的接口并解出 `data`
    pub async fn fetch_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        template_key: &str,
        body: &B,
    ) -> AppResult<T> {
        let url = self.config.endpoint(template_key)?;
        debug!("POST (json) {}", url);
        let res = self.post_json(&url, body).await?;
        Self::decode_envelope(&url, res).await
    }

    async fn decode_envelope<T: DeserializeOwned>(url: &str, res: Response) -> AppResult<T> {
        let body = res.text().await?;
        trace!("来自 '{}' 的响应: {}", url, body);
        let envelope: ApiEnvelope<T> =
            serde_json::from_str(&body).map_err(|source| AppError::ApiParseFailed {
                url: url.to_string(),
                source,
            })?;
        if envelope.code != 0 {
            return Err(AppError::Api {
                code: envelope.code,
                msg: envelope.msg,
            });
        }
        envelope
            .data
            .ok_or_else(|| AppError::MissingData(url.to_string()))
    }
}

impl std::fmt::Debug for RobustClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RobustClient")
            .field("app_id", &self.config.app_id)
            .finish_non_exhaustive()
    }
}
