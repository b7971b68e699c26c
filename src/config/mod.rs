//! Configuration management for webintel.
//!
//! Configuration is read from `~/.config/webintel/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is created.
//! `WEBINTEL_API_URL` overrides `api.base_url`.

pub mod colors;
pub mod interval;
pub mod keybindings;

pub use colors::ColorConfig;
pub use keybindings::KeybindingConfig;

use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const API_URL_ENV: &str = "WEBINTEL_API_URL";
pub const DEFAULT_API_URL: &str = "https://backend-17-10-2025.netlify.app/.netlify/functions";

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub refresh: RefreshConfig,
    pub notifications: NotificationConfig,
    pub colors: ColorConfig,
    pub keybindings: KeybindingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    /// Applied uniformly to every request.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout_secs: 60,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

/// Longest allowed data refresh or stale check period (one day).
pub const MAX_REFRESH_INTERVAL_SECS: u64 = 86_400;

pub const MAX_SETTLE_DELAY_MS: u64 = 60_000;

/// Dashboard refresh timings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    pub auto_refresh: bool,
    pub data_interval_secs: u64,
    pub stale_interval_secs: u64,
    /// Starting value of the countdown display; capped at 60.
    pub countdown_secs: u32,
    pub page_size: u32,
    /// Records older than this are re-scraped by the backend.
    pub stale_threshold: String,
    /// Delay between a stale refresh and the follow-up reload.
    pub settle_delay_ms: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            auto_refresh: true,
            data_interval_secs: 60,
            stale_interval_secs: 60,
            countdown_secs: 60,
            page_size: 5,
            stale_threshold: "1h".to_string(),
            settle_delay_ms: 2000,
        }
    }
}

impl RefreshConfig {
    pub fn stale_threshold(&self) -> Result<Duration, ConfigError> {
        interval::parse_stale_threshold(&self.stale_threshold).map_err(ConfigError::Invalid)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let intervals = [self.data_interval_secs, self.stale_interval_secs];
        if intervals
            .iter()
            .any(|secs| !(1..=MAX_REFRESH_INTERVAL_SECS).contains(secs))
        {
            return Err(ConfigError::Invalid(format!(
                "refresh intervals must be between 1 and {} seconds",
                MAX_REFRESH_INTERVAL_SECS
            )));
        }
        if self.settle_delay_ms > MAX_SETTLE_DELAY_MS {
            return Err(ConfigError::Invalid(format!(
                "settle_delay_ms must be at most {}",
                MAX_SETTLE_DELAY_MS
            )));
        }
        if self.page_size == 0 {
            return Err(ConfigError::Invalid("page_size must be positive".to_string()));
        }
        self.stale_threshold()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    pub auto_close_ms: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            auto_close_ms: 3000,
        }
    }
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, creates a default one with comments.
    /// If the config file exists but is invalid, returns an error.
    /// Missing fields in the config file will use default values.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        let mut config = Self::load_from(&config_path)?;
        config.apply_env();
        Ok(config)
    }

    /// Apply `WEBINTEL_API_URL` when it is set and not blank.
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                self.api.base_url = url.trim().to_string();
            }
        }
    }

    /// Load and validate a config file at an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.refresh.validate()?;
        Ok(config)
    }

    /// Get the default config file path: `~/.config/webintel/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("webintel").join("config.toml"))
    }

    /// Create a default config file with comments.
    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    /// Generate the default config file content with comments.
    fn default_config_content() -> String {
        r##"# webintel configuration
#
# Colors can be specified as:
# - Named colors: Black, Red, Green, Yellow, Blue, Magenta, Cyan, Gray,
#   DarkGray, LightRed, LightGreen, LightYellow, LightBlue, LightMagenta,
#   LightCyan, White, Reset
# - Hex colors: "#RRGGBB" or "#RGB"
#
# Keybindings can be specified as:
# - Single characters: "a", "A", "1"
# - Special keys: Enter, Tab, BackTab, Backspace, Delete, Home, End,
#   PageUp, PageDown, Up, Down, Left, Right, Esc, Space, F1-F12
# - With modifiers: "Ctrl+c", "Shift+Tab", "Alt+Enter"

[api]
# Scraping backend (WEBINTEL_API_URL overrides this)
base_url = "https://backend-17-10-2025.netlify.app/.netlify/functions"

# Request timeout in seconds, applied to every call
timeout_secs = 60

[refresh]
# Start with dashboard auto-refresh enabled
auto_refresh = true

# Dashboard reload period in seconds
data_interval_secs = 60

# Stale URL remediation period in seconds
stale_interval_secs = 60

# Countdown shown until the next refresh
countdown_secs = 60

# Number of recent records on the dashboard
page_size = 5

# Records older than this get re-scraped ("30m", "1h", "1d", ...)
stale_threshold = "1h"

# Wait after a stale refresh before reloading (milliseconds)
settle_delay_ms = 2000

[notifications]
# How long toasts stay in the status bar (milliseconds)
auto_close_ms = 3000

[colors]
active_border = "Cyan"
inactive_border = "DarkGray"
selection_bg = "Cyan"
selection_fg = "Black"
accent = "White"
link = "Blue"

# Freshness indicators
fresh = "Green"
moderate = "LightGreen"
aging = "Yellow"
stale = "Red"

success = "Green"
error = "LightRed"
status_fg = "White"
status_bg = "DarkGray"

[keybindings]
quit = ["q", "Ctrl+c"]
next_tab = ["Tab"]
prev_tab = ["BackTab", "Shift+Tab"]
move_up = ["k", "Up"]
move_down = ["j", "Down"]
next_page = ["n", "PageDown"]
prev_page = ["p", "PageUp"]
select = ["Enter"]

# Scraper form
edit = ["e", "i"]
submit = ["s"]
preview = ["v"]
toggle_ai = ["t"]
cycle_method = ["M"]

# Dashboard
refresh = ["R"]
toggle_auto_refresh = ["a"]
delete_record = ["d", "Delete"]
open_in_browser = ["o"]

# Results
next_view = ["l", "Right"]
prev_view = ["h", "Left"]
export_json = ["x"]
"##
        .to_string()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
