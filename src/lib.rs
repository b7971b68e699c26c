//! # webintel
//!
//! A terminal client for a web-intelligence scraping backend: submit URLs
//! for scraping and AI analysis, browse stored results, and keep a live
//! dashboard of what has been scraped.
//!
//! ## Architecture
//!
//! ```text
//!            ┌──────────── Notifier (toasts / console) ◄───────────┐
//!            │                                                      │
//! CLI / TUI ─┼─► submit ──────────────┐                            │
//!            │                        ▼                            │
//!            └─► DashboardController ─► ScraperApi ─► backend HTTP  │
//!                   ▲   │                                          │
//!      RefreshHandle┘   └──── snapshot ─► layout / watch summary ──┘
//! ```
//!
//! The backend owns scraping, analysis and storage. This crate only talks
//! to it over HTTP and renders what comes back.
//!
//! ## Quick Start
//!
//! ```bash
//! # Scrape and save a page, with AI analysis
//! webintel scrape https://example.com
//!
//! # Recent records and totals
//! webintel list
//! webintel stats
//!
//! # Ask the backend to re-scrape records older than two hours
//! webintel refresh-stale --threshold 2h
//!
//! # Log dashboard refreshes until interrupted
//! webintel watch
//!
//! # Launch TUI
//! webintel tui
//! ```

/// Backend access.
///
/// - [`ScraperApi`](api::ScraperApi): Async trait over the backend endpoints
/// - [`HttpApiClient`](api::HttpApiClient): reqwest-based implementation
pub mod api;

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together config and the
/// backend client, and builds dashboard controllers.
pub mod app;

/// Command-line interface using clap.
///
/// Subcommands: `scrape`, `list`, `stats`, `delete`, `refresh-stale`,
/// `watch` and `tui`.
pub mod cli;

/// Configuration management.
///
/// Loads from `~/.config/webintel/config.toml`, supporting:
/// - Backend URL and timeout (overridable with `WEBINTEL_API_URL`)
/// - Refresh intervals and the stale threshold
/// - Custom colors (named or hex)
/// - Custom keybindings
pub mod config;

/// Live dashboard: loading, the three periodic timers and deletion.
pub mod dashboard;

/// Core domain models.
///
/// - [`ScrapeRecord`](domain::ScrapeRecord): A stored scrape
/// - [`AnalysisResult`](domain::AnalysisResult): AI analysis of a page
/// - [`Statistics`](domain::Statistics): Aggregate counts
/// - [`Freshness`](domain::Freshness): Age classification of a record
pub mod domain;

/// Writing the displayed result to disk as JSON.
pub mod export;

/// Toast notifications.
pub mod notify;

/// URL submission (scrape or preview).
pub mod submit;

/// Terminal user interface.
///
/// Three tabs built with ratatui:
/// - Scraper: URL form with AI and method options
/// - Dashboard: stat cards, refresh countdown and recent records
/// - Results: AI analysis, original data and raw JSON views
///
/// Keybindings: Tab cycles tabs, j/k navigate, e edits, s scrapes,
/// R refreshes, a toggles auto-refresh, d deletes, q quits.
pub mod tui;

/// Headless dashboard refresh loop for `webintel watch`.
pub mod watch;
