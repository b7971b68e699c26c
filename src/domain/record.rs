use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::AnalysisResult;

/// A stored scrape as returned by `GET /data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapeRecord {
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub content: PageContent,
}

impl ScrapeRecord {
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .or(self.content.title.as_deref())
            .unwrap_or("Untitled")
    }

    /// Scraped within the last 24 hours.
    pub fn is_recent(&self, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.created_at) <= Duration::hours(24)
    }

    pub fn analysis(&self) -> Option<&AnalysisResult> {
        self.content.ai_analysis.as_ref()
    }
}

/// Extracted page content plus optional AI analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageContent {
    pub title: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    pub metadata: Option<PageMetadata>,
    pub headings: Vec<Heading>,
    pub paragraphs: Vec<String>,
    pub links: Vec<PageLink>,
    pub images: Vec<PageImage>,
    pub content_stats: Option<ContentStats>,
    pub ai_analysis: Option<AnalysisResult>,
    pub custom_prompt_used: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageMetadata {
    pub author: Option<String>,
    pub keywords: Option<String>,
    pub canonical: Option<String>,
}

impl PageMetadata {
    pub fn is_empty(&self) -> bool {
        self.author.is_none() && self.keywords.is_none() && self.canonical.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heading {
    pub level: u8,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageLink {
    #[serde(default)]
    pub text: Option<String>,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageImage {
    pub src: String,
    #[serde(default)]
    pub alt: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentStats {
    pub word_count: u64,
    pub reading_time: u32,
    pub has_video: bool,
    pub has_audio: bool,
    pub has_form: bool,
}

/// Whatever the Results view is currently showing: a stored record or an
/// unsaved preview.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Displayed {
    Record(ScrapeRecord),
    Preview(PageContent),
}

impl Displayed {
    pub fn content(&self) -> &PageContent {
        match self {
            Displayed::Record(record) => &record.content,
            Displayed::Preview(content) => content,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Displayed::Record(record) => record.display_title(),
            Displayed::Preview(content) => content.title.as_deref().unwrap_or("Untitled Page"),
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            Displayed::Record(record) => Some(record.url.as_str()),
            Displayed::Preview(content) => content.url.as_deref(),
        }
    }
}
