use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use crate::api::{
    DataEnvelope, MessageResponse, PreviewResponse, ScrapeResponse, ScraperApi,
    StaleRefreshResponse,
};
use crate::app::{Result, WebIntelError};
use crate::domain::{ScrapeRecord, ScrapeRequest, Statistics};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Error body the backend sends with non-2xx responses.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    details: Option<String>,
}

pub struct HttpApiClient {
    client: Client,
    base_url: Url,
}

impl HttpApiClient {
    /// Every request shares the same `timeout`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(WebIntelError::Config(format!(
                "API URL cannot be used as a base: {}",
                base_url
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .gzip(true)
            .brotli(true)
            .user_agent(concat!("webintel/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| WebIntelError::Config(format!("Invalid API URL: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let error: ErrorBody = serde_json::from_slice(&body).unwrap_or_default();
            return Err(WebIntelError::Backend {
                status: status.as_u16(),
                message: error.message.or(error.error),
                details: error.details,
            });
        }

        serde_json::from_slice(&body).map_err(|e| WebIntelError::Decode(e.to_string()))
    }
}

#[async_trait]
impl ScraperApi for HttpApiClient {
    async fn scrape_url(&self, request: &ScrapeRequest) -> Result<ScrapeResponse> {
        let url = self.endpoint(&["scrape"])?;
        tracing::debug!("POST {} ({})", url, request.url);
        let response = self.client.post(url).json(request).send().await?;
        Self::decode(response).await
    }

    async fn preview_scrape(&self, request: &ScrapeRequest) -> Result<PreviewResponse> {
        let url = self.endpoint(&["preview"])?;
        tracing::debug!("POST {} ({})", url, request.url);
        let response = self.client.post(url).json(request).send().await?;
        Self::decode(response).await
    }

    async fn list_data(&self, page: u32, limit: u32) -> Result<Vec<ScrapeRecord>> {
        let mut url = self.endpoint(&["data"])?;
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("limit", &limit.to_string());
        let response = self.client.get(url).send().await?;
        let envelope: DataEnvelope<Vec<ScrapeRecord>> = Self::decode(response).await?;
        Ok(envelope.data)
    }

    async fn get_statistics(&self) -> Result<Statistics> {
        let url = self.endpoint(&["data", "stats"])?;
        let response = self.client.get(url).send().await?;
        let envelope: DataEnvelope<Statistics> = Self::decode(response).await?;
        Ok(envelope.data)
    }

    async fn delete_data(&self, id: &str) -> Result<MessageResponse> {
        let url = self.endpoint(&["data", id])?;
        let response = self.client.delete(url).send().await?;
        Self::decode(response).await
    }

    async fn refresh_stale(&self, threshold: Duration) -> Result<StaleRefreshResponse> {
        let url = self.endpoint(&["refresh-stale"])?;
        let threshold_ms = u64::try_from(threshold.as_millis()).unwrap_or(u64::MAX);
        let body = serde_json::json!({ "thresholdMs": threshold_ms });
        let response = self.client.post(url).json(&body).send().await?;
        Self::decode(response).await
    }
}
