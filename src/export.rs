//! JSON export of the result currently on screen.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{error, info};

use crate::app::Result;
use crate::domain::Displayed;
use crate::notify::Notifier;

/// File name used for an export taken at `millis` since the Unix epoch.
pub fn export_file_name(millis: i64) -> String {
    format!("scraped-data-{}.json", millis)
}

/// Write `displayed` as pretty JSON into `dir` and return the file path.
pub fn export_json(dir: &Path, displayed: &Displayed) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(export_file_name(Utc::now().timestamp_millis()));
    fs::write(&path, serde_json::to_string_pretty(displayed)?)?;
    info!("Exported {} to {}", displayed.title(), path.display());
    Ok(path)
}

/// [`export_json`] with the outcome reported through `notifier`.
pub fn export_and_notify(
    dir: &Path,
    displayed: &Displayed,
    notifier: &dyn Notifier,
) -> Option<PathBuf> {
    match export_json(dir, displayed) {
        Ok(path) => {
            notifier.success("JSON downloaded successfully!");
            Some(path)
        }
        Err(e) => {
            error!("Export failed: {}", e);
            notifier.error(&format!("Failed to export JSON: {}", e));
            None
        }
    }
}

/// Where exports land: the download directory, else the current directory.
pub fn default_export_dir() -> PathBuf {
    dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
}
