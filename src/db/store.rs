use async_trait::async_trait;
use thiserror::Error;

use super::models::{ContentType, Entry, EntryQuery, Page};


#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Backend rejected {operation} with status {status}: {body}")]
    Status {
        operation: String,
        status: u16,
        body: String,
    },
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Retry exhausted after {0} attempts: {1}")]
    RetryExhausted(u32, String),
    #[error("Backend error: {0}")]
    Backend(String),
}


/// Access to one space/environment of the content backend.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn list_entries(
        &self,
        query: &EntryQuery,
        skip: usize,
        limit: usize,
    ) -> Result<Page<Entry>, StoreError>;

    async fn get_entry(&self, id: &str) -> Result<Entry, StoreError>;

    async fn unpublish_entry(&self, entry: &Entry) -> Result<(), StoreError>;

    async fn delete_entry(&self, entry: &Entry) -> Result<(), StoreError>;

    async fn list_content_types(
        &self,
        skip: usize,
        limit: usize,
    ) -> Result<Page<ContentType>, StoreError>;

    async fn unpublish_content_type(&self, content_type: &ContentType) -> Result<(), StoreError>;

    async fn delete_content_type(&self, content_type: &ContentType) -> Result<(), StoreError>;
}

