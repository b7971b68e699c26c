//! Human-friendly durations: `"90s"`, `"30m"`, `"1h"`, `"1d"` or bare seconds.

use std::time::Duration;

/// Parse interval string like "1h", "30m", "6h", "1d"
pub fn parse_interval(s: &str) -> Result<Duration, String> {
    let s = s.trim().to_lowercase();

    let secs = if let Some(hours) = s.strip_suffix('h') {
        hours
            .parse::<u64>()
            .map(|h| h.saturating_mul(3600))
            .map_err(|_| format!("Invalid hours: {}", hours))
    } else if let Some(minutes) = s.strip_suffix('m') {
        minutes
            .parse::<u64>()
            .map(|m| m.saturating_mul(60))
            .map_err(|_| format!("Invalid minutes: {}", minutes))
    } else if let Some(days) = s.strip_suffix('d') {
        days.parse::<u64>()
            .map(|d| d.saturating_mul(86400))
            .map_err(|_| format!("Invalid days: {}", days))
    } else if let Some(secs) = s.strip_suffix('s') {
        secs.parse::<u64>()
            .map_err(|_| format!("Invalid seconds: {}", secs))
    } else {
        s.parse::<u64>()
            .map_err(|_| format!("Invalid interval: {}. Use format like '1h', '30m', '1d'", s))
    }?;

    Ok(Duration::from_secs(secs))
}

/// Longest stale threshold the backend is asked about.
pub const MAX_STALE_THRESHOLD: Duration = Duration::from_secs(365 * 86400);

/// [`parse_interval`] limited to `1s..=365d`, for stale thresholds.
pub fn parse_stale_threshold(s: &str) -> Result<Duration, String> {
    let threshold = parse_interval(s)?;
    if threshold.is_zero() || threshold > MAX_STALE_THRESHOLD {
        return Err(format!(
            "Stale threshold must be between 1s and {}: {}",
            format_interval(MAX_STALE_THRESHOLD),
            s.trim()
        ));
    }
    Ok(threshold)
}

/// Format interval for display
pub fn format_interval(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 86400 && secs % 86400 == 0 {
        format!("{}d", secs / 86400)
    } else if secs >= 3600 && secs % 3600 == 0 {
        format!("{}h", secs / 3600)
    } else if secs >= 60 && secs % 60 == 0 {
        format!("{}m", secs / 60)
    } else {
        format!("{}s", secs)
    }
}
