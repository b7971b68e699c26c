//! Scriptable in-process [`ScraperApi`] for tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::api::{
    MessageResponse, PreviewResponse, ScrapeResponse, ScraperApi, StaleRefreshResponse,
};
use crate::app::{Result, WebIntelError};
use crate::domain::{PageContent, ScrapeRecord, ScrapeRequest, Statistics};

pub fn record(id: &str, created_at: DateTime<Utc>) -> ScrapeRecord {
    ScrapeRecord {
        id: id.to_string(),
        url: format!("https://example.com/{}", id),
        title: Some(format!("Page {}", id)),
        created_at,
        content: PageContent::default(),
    }
}

pub fn backend_error(message: &str) -> WebIntelError {
    WebIntelError::Backend {
        status: 500,
        message: Some(message.to_string()),
        details: None,
    }
}

#[derive(Default)]
pub struct FakeApi {
    pub stats: Mutex<Statistics>,
    pub records: Mutex<Vec<ScrapeRecord>>,
    /// Scripted `list_data` replies `(delay, records)` served before `records`.
    pub list_script: Mutex<VecDeque<(Duration, Vec<ScrapeRecord>)>>,
    pub stale_response: Mutex<StaleRefreshResponse>,
    pub fail_stats: AtomicBool,
    pub fail_list: AtomicBool,
    pub fail_stale: AtomicBool,
    pub fail_delete: Mutex<Option<String>>,
    pub fail_scrape: Mutex<Option<WebIntelError>>,
    pub stats_calls: AtomicUsize,
    pub list_calls: AtomicUsize,
    pub stale_calls: AtomicUsize,
    pub delete_calls: AtomicUsize,
    pub scrape_calls: AtomicUsize,
    pub preview_calls: AtomicUsize,
}

impl FakeApi {
    pub fn new(stats: Statistics, records: Vec<ScrapeRecord>) -> Self {
        Self {
            stats: Mutex::new(stats),
            records: Mutex::new(records),
            ..Default::default()
        }
    }

    pub fn fetch_calls(&self) -> usize {
        self.stats_calls.load(Ordering::SeqCst) + self.list_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ScraperApi for FakeApi {
    async fn scrape_url(&self, request: &ScrapeRequest) -> Result<ScrapeResponse> {
        self.scrape_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.fail_scrape.lock().unwrap().take() {
            return Err(err);
        }
        let mut data = record("new", Utc::now());
        data.url = request.url.clone();
        Ok(ScrapeResponse {
            message: Some("URL scraped and saved".to_string()),
            data,
        })
    }

    async fn preview_scrape(&self, request: &ScrapeRequest) -> Result<PreviewResponse> {
        self.preview_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.fail_scrape.lock().unwrap().take() {
            return Err(err);
        }
        Ok(PreviewResponse {
            message: None,
            data: PageContent {
                url: Some(request.url.clone()),
                title: Some("Preview".to_string()),
                ..Default::default()
            },
        })
    }

    async fn list_data(&self, _page: u32, limit: u32) -> Result<Vec<ScrapeRecord>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let scripted = self.list_script.lock().unwrap().pop_front();
        if let Some((delay, records)) = scripted {
            tokio::time::sleep(delay).await;
            return Ok(records);
        }
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(backend_error("list failed"));
        }
        let records = self.records.lock().unwrap();
        Ok(records.iter().take(limit as usize).cloned().collect())
    }

    async fn get_statistics(&self) -> Result<Statistics> {
        self.stats_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_stats.load(Ordering::SeqCst) {
            return Err(backend_error("stats failed"));
        }
        Ok(*self.stats.lock().unwrap())
    }

    async fn delete_data(&self, id: &str) -> Result<MessageResponse> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = self.fail_delete.lock().unwrap().clone() {
            return Err(WebIntelError::Backend {
                status: 404,
                message: if message.is_empty() { None } else { Some(message) },
                details: None,
            });
        }
        self.records.lock().unwrap().retain(|r| r.id != id);
        Ok(MessageResponse {
            message: Some(format!("Deleted {}", id)),
        })
    }

    async fn refresh_stale(&self, _threshold: Duration) -> Result<StaleRefreshResponse> {
        self.stale_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_stale.load(Ordering::SeqCst) {
            return Err(backend_error("stale refresh failed"));
        }
        Ok(self.stale_response.lock().unwrap().clone())
    }
}
