//! Per-user directories
//!
//! Everything the app writes outside the executable directory lives under
//! one folder named after the app in the platform data directory
//! (`%APPDATA%` on Windows, `~/Library/Application Support` on macOS).

use std::path::PathBuf;

/// Application name, also used as window title and folder name
pub const APP_TITLE: &str = "ARC Raiders Market";

/// Environment variable that relocates the data directory (tests, portable installs)
pub const DATA_DIR_ENV: &str = "ARC_MARKET_DATA_DIR";

/// Get the app data directory.
///
/// Priority:
/// 1. ARC_MARKET_DATA_DIR environment variable (if set)
/// 2. `<data dir>/ARC Raiders Market`
/// 3. Temp directory fallback
pub fn app_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        if !dir.trim().is_empty() {
            return PathBuf::from(dir);
        }
    }

    match dirs::data_dir() {
        Some(data) => data.join(APP_TITLE),
        None => std::env::temp_dir().join(APP_TITLE),
    }
}

/// Default config file: `<config dir>/ARC Raiders Market/config.json`
pub fn default_config_path() -> PathBuf {
    match dirs::config_dir() {
        Some(config) => config.join(APP_TITLE).join("config.json"),
        None => app_data_dir().join("config.json"),
    }
}

pub fn log_dir() -> PathBuf {
    app_data_dir().join("logs")
}
