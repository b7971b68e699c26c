//! Headless dashboard refresh loop.
//!
//! Runs the same controller and timers as the TUI dashboard, printing
//! notifications to the console and logging each committed refresh until
//! SIGINT or SIGTERM arrives.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time::interval;
use tracing::info;

use crate::app::{AppContext, Result};
use crate::config::interval::format_interval;
use crate::dashboard::{DashboardController, DashboardSnapshot};
use crate::domain::Freshness;
use crate::notify::ConsoleNotifier;

/// How often the watcher checks for newly committed snapshots.
const REPORT_INTERVAL: Duration = Duration::from_secs(1);

pub struct Watcher {
    controller: Arc<DashboardController>,
}

impl Watcher {
    pub fn new(ctx: &AppContext) -> Result<Self> {
        let controller = ctx.dashboard(Arc::new(ConsoleNotifier::new()))?;
        Ok(Self { controller })
    }

    /// Load once, start the timers and block until a shutdown signal.
    pub async fn run(&self) -> Result<()> {
        let settings = self.controller.settings();
        info!(
            "Watching dashboard (refresh every {}, stale check every {}, threshold {})",
            format_interval(settings.data_interval),
            format_interval(settings.stale_interval),
            format_interval(settings.stale_threshold),
        );

        self.controller.load_dashboard_data(false).await;
        let mut last_reported = self.report(None);

        let mut handle = self.controller.start();
        let shutdown = shutdown_signal();
        tokio::pin!(shutdown);

        let mut ticker = interval(REPORT_INTERVAL);
        loop {
            tokio::select! {
                result = &mut shutdown => {
                    result?;
                    break;
                }
                _ = ticker.tick() => {
                    last_reported = self.report(last_reported);
                }
            }
        }

        info!("Shutting down watcher...");
        handle.stop();
        Ok(())
    }

    /// Log the snapshot if a refresh committed since `last_reported`.
    fn report(&self, last_reported: Option<DateTime<Utc>>) -> Option<DateTime<Utc>> {
        let snapshot = self.controller.snapshot();
        let updated = snapshot.refresh.last_updated_at;
        if updated.is_some() && updated != last_reported {
            info!("{}", summarize(&snapshot));
        }
        updated.or(last_reported)
    }
}

/// One-line summary of a committed dashboard refresh.
pub fn summarize(snapshot: &DashboardSnapshot) -> String {
    let now = Utc::now();
    let stale = snapshot
        .rows(now)
        .iter()
        .filter(|row| row.freshness == Freshness::Stale)
        .count();

    match &snapshot.statistics {
        Some(stats) => format!(
            "Dashboard refreshed: {} scraped, {} unique URLs, {} recent; {} records shown ({} stale)",
            stats.total_scraped,
            stats.unique_urls,
            stats.recent_scrapes,
            snapshot.recent.len(),
            stale
        ),
        None => format!("Dashboard refreshed: {} records shown", snapshot.recent.len()),
    }
}

#[cfg(unix)]
async fn shutdown_signal() -> Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;
    tokio::select! {
        _ = sigterm.recv() => {},
        _ = sigint.recv() => {},
    }
    Ok(())
}

#[cfg(not(unix))]
async fn shutdown_signal() -> Result<()> {
    tokio::signal::ctrl_c().await?;
    Ok(())
}
