use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use super::models::{ContentType, Entry, EntryQuery, Page};
use super::store::{RecordStore, StoreError};
use crate::core::config::PurgeConfig;


const MANAGEMENT_CONTENT_TYPE: &str = "application/vnd.contentful.management.v1+json";

const RATE_LIMIT_RESET_HEADER: &str = "x-contentful-ratelimit-reset";

const INITIAL_RETRY_DELAY_MS: u64 = 100;

const MAX_RETRY_DELAY_MS: u64 = 10000;

const LISTING_ORDER: &str = "sys.createdAt,sys.id";


/// Contentful Management API client bound to one space/environment.
pub struct ManagementClient {
    http: reqwest::Client,
    base_url: String,
    max_retries: u32,
}

impl ManagementClient {
    pub fn new(config: &PurgeConfig) -> Result<Self, StoreError> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.access_token))
            .map_err(|_| StoreError::Backend("access token contains invalid characters".to_string()))?;
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(MANAGEMENT_CONTENT_TYPE));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout))
            .build()?;

        let base_url = config.environment_url();
        info!("ManagementClient created for {}", base_url);

        Ok(Self {
            http,
            base_url,
            max_retries: config.max_retries,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send<F>(&self, operation: &str, build: F) -> Result<Response, StoreError>
    where
        F: Fn() -> RequestBuilder,
    {
        let attempts = self.max_retries.max(1);
        let mut last_error = None;
        let mut delay = Duration::from_millis(INITIAL_RETRY_DELAY_MS);

        for attempt in 1..=attempts {
            debug!("{} (attempt {})", operation, attempt);

            let wait = match build().send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Ok(response);
                    }
                    if status == StatusCode::NOT_FOUND {
                        return Err(StoreError::NotFound(operation.to_string()));
                    }
                    if status != StatusCode::TOO_MANY_REQUESTS && !status.is_server_error() {
                        let body = response.text().await.unwrap_or_default();
                        return Err(StoreError::Status {
                            operation: operation.to_string(),
                            status: status.as_u16(),
                            body,
                        });
                    }
                    last_error = Some(format!("HTTP {}", status));
                    rate_limit_reset(&response).unwrap_or(delay)
                }
                Err(e) if e.is_timeout() || e.is_connect() || e.is_request() => {
                    last_error = Some(e.to_string());
                    delay
                }
                Err(e) => return Err(StoreError::Http(e)),
            };

            if attempt < attempts {
                warn!(
                    "{} failed (attempt {}): {}, retrying in {:?}",
                    operation,
                    attempt,
                    last_error.as_deref().unwrap_or("unknown error"),
                    wait
                );
                tokio::time::sleep(wait).await;
                delay = (delay * 2).min(Duration::from_millis(MAX_RETRY_DELAY_MS));
            }
        }

        Err(StoreError::RetryExhausted(
            attempts,
            last_error.unwrap_or_else(|| "Unknown error".to_string()),
        ))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        operation: &str,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<T, StoreError> {
        let response = self
            .send(operation, || self.http.get(url).query(params))
            .await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn delete(&self, operation: &str, url: &str) -> Result<(), StoreError> {
        self.send(operation, || self.http.delete(url)).await?;
        Ok(())
    }
}

fn rate_limit_reset(response: &Response) -> Option<Duration> {
    let seconds: u64 = response
        .headers()
        .get(RATE_LIMIT_RESET_HEADER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()?;
    Some(Duration::from_secs(seconds).min(Duration::from_millis(MAX_RETRY_DELAY_MS)))
}

#[async_trait]
impl RecordStore for ManagementClient {
    async fn list_entries(
        &self,
        query: &EntryQuery,
        skip: usize,
        limit: usize,
    ) -> Result<Page<Entry>, StoreError> {
        let mut params = vec![
            ("skip", skip.to_string()),
            ("limit", limit.to_string()),
            ("order", LISTING_ORDER.to_string()),
        ];
        if let Some(content_type) = &query.content_type {
            params.push(("content_type", content_type.clone()));
        }
        let url = format!("{}/entries", self.base_url);
        self.get_json("list entries", &url, &params).await
    }

    async fn get_entry(&self, id: &str) -> Result<Entry, StoreError> {
        let url = format!("{}/entries/{}", self.base_url, id);
        self.get_json(&format!("get entry {}", id), &url, &[]).await
    }

    async fn unpublish_entry(&self, entry: &Entry) -> Result<(), StoreError> {
        let url = format!("{}/entries/{}/published", self.base_url, entry.id());
        self.delete(&format!("unpublish entry {}", entry.id()), &url).await
    }

    async fn delete_entry(&self, entry: &Entry) -> Result<(), StoreError> {
        let url = format!("{}/entries/{}", self.base_url, entry.id());
        self.delete(&format!("delete entry {}", entry.id()), &url).await
    }

    async fn list_content_types(
        &self,
        skip: usize,
        limit: usize,
    ) -> Result<Page<ContentType>, StoreError> {
        let params = [
            ("skip", skip.to_string()),
            ("limit", limit.to_string()),
            ("order", LISTING_ORDER.to_string()),
        ];
        let url = format!("{}/content_types", self.base_url);
        self.get_json("list content types", &url, &params).await
    }

    async fn unpublish_content_type(&self, content_type: &ContentType) -> Result<(), StoreError> {
        let url = format!("{}/content_types/{}/published", self.base_url, content_type.id());
        self.delete(&format!("unpublish content type {}", content_type.id()), &url)
            .await
    }

    async fn delete_content_type(&self, content_type: &ContentType) -> Result<(), StoreError> {
        let url = format!("{}/content_types/{}", self.base_url, content_type.id());
        self.delete(&format!("delete content type {}", content_type.id()), &url)
            .await
    }
}
