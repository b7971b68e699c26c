//! Age-derived display values for records.
//!
//! Both functions take `now` explicitly so they stay pure. Timestamps in the
//! future (client/server clock skew) are clamped to an age of zero: they read
//! as `"0s ago"` and classify as [`Freshness::Fresh`].

use chrono::{DateTime, Duration, Utc};

/// Visual freshness bucket, ordered from freshest to stalest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Freshness {
    Fresh,
    Moderate,
    Aging,
    Stale,
}

impl Freshness {
    pub fn label(self) -> &'static str {
        match self {
            Freshness::Fresh => "fresh",
            Freshness::Moderate => "moderate",
            Freshness::Aging => "aging",
            Freshness::Stale => "stale",
        }
    }
}

/// Age of `timestamp` relative to `now`, never negative.
pub fn age(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> Duration {
    now.signed_duration_since(timestamp).max(Duration::zero())
}

pub fn classify_freshness(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> Freshness {
    let age = age(timestamp, now);
    if age < Duration::minutes(5) {
        Freshness::Fresh
    } else if age < Duration::minutes(30) {
        Freshness::Moderate
    } else if age < Duration::minutes(60) {
        Freshness::Aging
    } else {
        Freshness::Stale
    }
}

/// `"Ns ago"`, `"Nm ago"`, `"Nh ago"` or `"Nd ago"`, truncating.
pub fn format_relative_time(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = age(timestamp, now).num_seconds();
    if secs < 60 {
        format!("{}s ago", secs)
    } else if secs < 3600 {
        format!("{}m ago", secs / 60)
    } else if secs < 86400 {
        format!("{}h ago", secs / 3600)
    } else {
        format!("{}d ago", secs / 86400)
    }
}
