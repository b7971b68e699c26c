#[cfg(test)]
pub(crate) mod fake;
pub mod http_client;

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::app::Result;
use crate::domain::{PageContent, ScrapeRecord, ScrapeRequest, Statistics};

pub use http_client::HttpApiClient;

/// `{ data: T }` wrapper used by the list and stats endpoints.
#[derive(Debug, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

/// Response of `POST /scrape`.
#[derive(Debug, Clone, Deserialize)]
pub struct ScrapeResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub data: ScrapeRecord,
}

/// Response of `POST /preview`; nothing is persisted.
#[derive(Debug, Clone, Deserialize)]
pub struct PreviewResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub data: PageContent,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

impl MessageResponse {
    /// The backend message, or `fallback` when it sent none or a blank one.
    pub fn message_or(&self, fallback: &str) -> String {
        self.message
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(fallback)
            .to_string()
    }
}

/// Response of `POST /refresh-stale`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StaleRefreshResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    /// Number of URLs queued for re-scraping, when the backend reports it.
    #[serde(default)]
    pub refreshed: Option<u64>,
}

impl StaleRefreshResponse {
    /// A successful response that actually refreshed something.
    pub fn has_refreshed(&self) -> bool {
        self.success && !self.message.trim().is_empty() && self.refreshed != Some(0)
    }
}

/// Remote operations of the scraping backend.
#[async_trait]
pub trait ScraperApi {
    async fn scrape_url(&self, request: &ScrapeRequest) -> Result<ScrapeResponse>;

    async fn preview_scrape(&self, request: &ScrapeRequest) -> Result<PreviewResponse>;

    /// One page of stored records, newest first.
    async fn list_data(&self, page: u32, limit: u32) -> Result<Vec<ScrapeRecord>>;

    async fn get_statistics(&self) -> Result<Statistics>;

    async fn delete_data(&self, id: &str) -> Result<MessageResponse>;

    /// Ask the backend to re-scrape records older than `threshold`.
    async fn refresh_stale(&self, threshold: Duration) -> Result<StaleRefreshResponse>;
}
