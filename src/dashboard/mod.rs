//! Dashboard refresh orchestration.
//!
//! [`DashboardController`] owns the dashboard snapshot (statistics, recent
//! records, refresh countdown) and the three periodic activities that keep it
//! current:
//!
//! ```text
//! data timer (60s)   ──► load_dashboard_data(silent)
//! stale timer (60s)  ──► refresh_stale_urls ──(settle delay)──► load_dashboard_data(silent)
//! countdown (1s)     ──► tick_countdown
//! ```
//!
//! [`DashboardController::start`] registers all three and returns a
//! [`RefreshHandle`]; dropping or stopping the handle tears all of them down
//! and disposes the controller so late responses are discarded.

mod controller;
mod timers;

pub use controller::{delete_with_feedback, DashboardController, DashboardSettings};
pub use timers::RefreshHandle;

use chrono::{DateTime, Utc};

use crate::domain::{classify_freshness, format_relative_time, Freshness, ScrapeRecord, Statistics};

/// Upper bound of the countdown display.
pub const COUNTDOWN_MAX: u32 = 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshState {
    pub auto_refresh_enabled: bool,
    /// Seconds until the next refresh, always within `0..=COUNTDOWN_MAX`.
    pub countdown_seconds: u32,
    pub last_updated_at: Option<DateTime<Utc>>,
}

impl Default for RefreshState {
    fn default() -> Self {
        Self {
            auto_refresh_enabled: true,
            countdown_seconds: COUNTDOWN_MAX,
            last_updated_at: None,
        }
    }
}

/// Everything the dashboard view renders, cloned out of the controller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardSnapshot {
    pub refresh: RefreshState,
    pub statistics: Option<Statistics>,
    pub recent: Vec<ScrapeRecord>,
    /// A user-initiated load is in flight.
    pub loading: bool,
}

/// A record with its derived display values.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordRow<'a> {
    pub record: &'a ScrapeRecord,
    pub freshness: Freshness,
    pub age: String,
    pub is_recent: bool,
}

impl DashboardSnapshot {
    pub fn rows(&self, now: DateTime<Utc>) -> Vec<RecordRow<'_>> {
        self.recent
            .iter()
            .map(|record| RecordRow {
                record,
                freshness: classify_freshness(record.created_at, now),
                age: format_relative_time(record.created_at, now),
                is_recent: record.is_recent(now),
            })
            .collect()
    }

    /// "Updated 12s ago", or "Never updated" before the first load.
    pub fn last_updated_label(&self, now: DateTime<Utc>) -> String {
        match self.refresh.last_updated_at {
            Some(at) => format!("Updated {}", format_relative_time(at, now)),
            None => "Never updated".to_string(),
        }
    }
}
