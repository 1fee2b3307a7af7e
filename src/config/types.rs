//! Configuration type definitions

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::defaults::*;
use crate::matcher::MatchSettings;

// ============================================
// HOTKEY
// ============================================

/// A key chord in config form, e.g. `{"modifiers": ["ctrl"], "key": "KeyF"}`.
///
/// Modifier names: "meta", "ctrl", "alt", "shift".
/// Key names follow the DOM `code` values: "KeyA", "Digit0", "F1", "Escape", ...
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotkeyConfig {
    pub modifiers: Vec<String>,
    pub key: String,
}

impl HotkeyConfig {
    pub fn default_summon_hotkey() -> Self {
        HotkeyConfig {
            modifiers: DEFAULT_HOTKEY_MODIFIERS
                .iter()
                .map(|m| m.to_string())
                .collect(),
            key: DEFAULT_HOTKEY_KEY.to_string(),
        }
    }

    /// A chord without modifiers
    pub fn bare(key: &str) -> Self {
        HotkeyConfig {
            modifiers: Vec::new(),
            key: key.to_string(),
        }
    }

    /// Config-style display string, e.g. "ctrl+KeyF" (used in logs)
    pub fn display(&self) -> String {
        let mut parts: Vec<&str> = self.modifiers.iter().map(String::as_str).collect();
        parts.push(&self.key);
        parts.join("+")
    }

    /// Human label, e.g. "Ctrl+F" (used in the tray menu)
    pub fn label(&self) -> String {
        let mut parts: Vec<String> = self
            .modifiers
            .iter()
            .map(|m| match m.to_lowercase().as_str() {
                "meta" | "cmd" | "command" => {
                    if cfg!(target_os = "macos") {
                        "Cmd".to_string()
                    } else {
                        "Win".to_string()
                    }
                }
                "ctrl" | "control" => "Ctrl".to_string(),
                "alt" | "option" => "Alt".to_string(),
                "shift" => "Shift".to_string(),
                other => other.to_string(),
            })
            .collect();

        let key = self
            .key
            .strip_prefix("Key")
            .or_else(|| self.key.strip_prefix("Digit"))
            .unwrap_or(&self.key);
        parts.push(key.to_string());
        parts.join("+")
    }
}

impl Default for HotkeyConfig {
    fn default() -> Self {
        Self::default_summon_hotkey()
    }
}

// ============================================
// MAIN CONFIG
// ============================================

/// Application configuration, read from `config.json`.
///
/// Every field has a default so a partial (or empty) file is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub hotkey: HotkeyConfig,
    /// Key that dismisses the overlay while visible (default: "Escape")
    #[serde(default = "default_cancel_key")]
    pub cancel_key: String,
    /// Title prefix of the game window (default: "ARC Raiders")
    #[serde(default = "default_target_window_keyword")]
    pub target_window_keyword: String,
    /// Price file location (default: next to the executable)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_path: Option<PathBuf>,
    /// Minimum similarity ratio for a match (default: 0.5)
    #[serde(default = "default_similarity_cutoff")]
    pub similarity_cutoff: f64,
    /// Shortest query that triggers a lookup (default: 3)
    #[serde(default = "default_min_query_length")]
    pub min_query_length: usize,
    #[serde(default = "default_focus_click_delay_ms")]
    pub focus_click_delay_ms: u64,
    #[serde(default = "default_restore_click_delay_ms")]
    pub restore_click_delay_ms: u64,
    #[serde(default = "default_forward_rearm_delay_ms")]
    pub forward_rearm_delay_ms: u64,
}

fn default_cancel_key() -> String {
    DEFAULT_CANCEL_KEY.to_string()
}
fn default_target_window_keyword() -> String {
    DEFAULT_TARGET_WINDOW_KEYWORD.to_string()
}
fn default_similarity_cutoff() -> f64 {
    DEFAULT_SIMILARITY_CUTOFF
}
fn default_min_query_length() -> usize {
    DEFAULT_MIN_QUERY_LENGTH
}
fn default_focus_click_delay_ms() -> u64 {
    DEFAULT_FOCUS_CLICK_DELAY_MS
}
fn default_restore_click_delay_ms() -> u64 {
    DEFAULT_RESTORE_CLICK_DELAY_MS
}
fn default_forward_rearm_delay_ms() -> u64 {
    DEFAULT_FORWARD_REARM_DELAY_MS
}

impl Default for Config {
    fn default() -> Self {
        Config {
            hotkey: HotkeyConfig::default(),
            cancel_key: default_cancel_key(),
            target_window_keyword: default_target_window_keyword(),
            database_path: None,
            similarity_cutoff: DEFAULT_SIMILARITY_CUTOFF,
            min_query_length: DEFAULT_MIN_QUERY_LENGTH,
            focus_click_delay_ms: DEFAULT_FOCUS_CLICK_DELAY_MS,
            restore_click_delay_ms: DEFAULT_RESTORE_CLICK_DELAY_MS,
            forward_rearm_delay_ms: DEFAULT_FORWARD_REARM_DELAY_MS,
        }
    }
}

impl Config {
    /// Matcher settings, with the cutoff clamped into `[0.0, 1.0]`.
    pub fn match_settings(&self) -> MatchSettings {
        let cutoff = if self.similarity_cutoff.is_finite() {
            self.similarity_cutoff.clamp(0.0, 1.0)
        } else {
            DEFAULT_SIMILARITY_CUTOFF
        };
        MatchSettings {
            cutoff,
            min_query_length: self.min_query_length,
        }
    }

    pub fn cancel_hotkey(&self) -> HotkeyConfig {
        HotkeyConfig::bare(&self.cancel_key)
    }

    pub fn focus_click_delay(&self) -> Duration {
        Duration::from_millis(self.focus_click_delay_ms)
    }

    pub fn restore_click_delay(&self) -> Duration {
        Duration::from_millis(self.restore_click_delay_ms)
    }

    pub fn forward_rearm_delay(&self) -> Duration {
        Duration::from_millis(self.forward_rearm_delay_ms)
    }
}
