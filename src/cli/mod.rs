pub mod commands;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};

use crate::config::interval::parse_stale_threshold;
use crate::domain::ScrapeMethod;

#[derive(Parser)]
#[command(name = "webintel")]
#[command(about = "Scrape web pages, analyze them with AI and watch the results", long_about = None)]
pub struct Cli {
    /// Backend base URL (overrides config and WEBINTEL_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Config file to use instead of ~/.config/webintel/config.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scrape a URL and store the result
    Scrape {
        /// Page to scrape
        url: String,

        /// Preview only; nothing is saved
        #[arg(long)]
        preview: bool,

        /// Skip AI analysis
        #[arg(long)]
        no_ai: bool,

        /// Custom analysis prompt
        #[arg(short, long)]
        prompt: Option<String>,

        /// Fetch method: auto, static or dynamic
        #[arg(short, long, default_value_t = ScrapeMethod::Auto)]
        method: ScrapeMethod,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// List stored records
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,

        #[arg(long, default_value_t = 10)]
        limit: u32,
    },
    /// Show scrape statistics
    Stats,
    /// Delete a stored record
    Delete {
        /// Record id
        id: String,
    },
    /// Ask the backend to re-scrape stale records
    RefreshStale {
        /// Age after which a record is stale (e.g., "30m", "1h", "1d")
        #[arg(short, long, default_value = "1h", value_parser = parse_stale_threshold)]
        threshold: Duration,
    },
    /// Keep the dashboard refreshed and log every update
    Watch,
    /// Launch the TUI
    Tui,
}
