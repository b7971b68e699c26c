use serde::{Deserialize, Serialize};

/// Aggregate counts from `GET /data/stats`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    #[serde(default)]
    pub total_scraped: u64,
    #[serde(default)]
    pub unique_urls: u64,
    /// Scrapes within the last 24 hours.
    #[serde(default)]
    pub recent_scrapes: u64,
}
