//! Configuration loading from file system

use std::fs;
use std::path::Path;
use tracing::{info, instrument, warn};

use super::types::Config;

/// Load configuration from a JSON file.
///
/// A missing file is normal (first run) and yields defaults. An unreadable
/// or malformed file is logged and also yields defaults.
#[instrument(name = "load_config", fields(path = %config_path.display()))]
pub fn load_config(config_path: &Path) -> Config {
    if !config_path.exists() {
        info!("Config file not found, using defaults");
        return Config::default();
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            warn!(error = %e, "Failed to read config file, using defaults");
            return Config::default();
        }
    };

    match parse_config(&content) {
        Ok(config) => {
            info!(hotkey = %config.hotkey.display(), "Successfully loaded config");
            config
        }
        Err(e) => {
            let error_hint = if e.to_string().contains("missing field `modifiers`")
                || e.to_string().contains("missing field `key`")
            {
                "\n\nHint: 'hotkey' requires 'modifiers' (array) and 'key' (string). Example:\n\
                 \"hotkey\": { \"modifiers\": [\"ctrl\"], \"key\": \"KeyF\" }"
            } else {
                ""
            };

            warn!(
                error = %e,
                hint = %error_hint,
                "Failed to parse config JSON, using defaults"
            );
            Config::default()
        }
    }
}

pub(crate) fn parse_config(content: &str) -> serde_json::Result<Config> {
    let config: Config = serde_json::from_str(content)?;
    if !(0.0..=1.0).contains(&config.similarity_cutoff) {
        warn!(
            similarity_cutoff = config.similarity_cutoff,
            "similarityCutoff outside 0.0..=1.0, it will be clamped"
        );
    }
    Ok(config)
}
