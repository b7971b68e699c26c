pub mod analysis;
pub mod freshness;
pub mod record;
pub mod request;
pub mod stats;

pub use analysis::{
    format_score, AnalysisResult, ContentQuality, Credibility, ScoreCard, SeoAnalysis,
    UxAssessment,
};
pub use freshness::{classify_freshness, format_relative_time, Freshness};
pub use record::{
    ContentStats, Displayed, Heading, PageContent, PageImage, PageLink, PageMetadata,
    ScrapeRecord,
};
pub use request::{ScrapeMethod, ScrapeRequest};
pub use stats::Statistics;
