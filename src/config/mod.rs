//! Configuration module - Application settings
//!
//! This module provides functionality for:
//! - Loading configuration from `<config dir>/ARC Raiders Market/config.json`
//! - Default values for all settings
//! - Type definitions for config structures
//!
//! # Module Structure
//!
//! - `defaults` - All default constant values
//! - `types` - Configuration struct definitions (Config, HotkeyConfig)
//! - `loader` - File system loading and parsing

mod defaults;
mod loader;
mod types;

pub use defaults::DEFAULT_TARGET_WINDOW_KEYWORD;

pub use types::{Config, HotkeyConfig};

pub use loader::load_config;

#[cfg(test)]
pub use defaults::{
    DEFAULT_CANCEL_KEY, DEFAULT_FOCUS_CLICK_DELAY_MS, DEFAULT_MIN_QUERY_LENGTH,
    DEFAULT_SIMILARITY_CUTOFF,
};

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
