//! Default configuration values
//!
//! All constants used throughout the config module are defined here.

/// Default summon hotkey: Ctrl+F
pub const DEFAULT_HOTKEY_MODIFIERS: &[&str] = &["ctrl"];
pub const DEFAULT_HOTKEY_KEY: &str = "KeyF";

/// Key that dismisses the overlay while it is visible
pub const DEFAULT_CANCEL_KEY: &str = "Escape";

/// Foreground window title prefix that identifies the game
pub const DEFAULT_TARGET_WINDOW_KEYWORD: &str = "ARC Raiders";

/// Matching defaults
pub const DEFAULT_SIMILARITY_CUTOFF: f64 = crate::matcher::DEFAULT_SIMILARITY_CUTOFF;
pub const DEFAULT_MIN_QUERY_LENGTH: usize = crate::matcher::DEFAULT_MIN_QUERY_LENGTH;

/// Delay between showing the overlay and clicking its input (ms)
pub const DEFAULT_FOCUS_CLICK_DELAY_MS: u64 = 50;
/// Delay between restoring the game window and clicking its center (ms)
pub const DEFAULT_RESTORE_CLICK_DELAY_MS: u64 = 50;
/// Pause between replaying the summon chord into another application and
/// registering it again (ms)
pub const DEFAULT_FORWARD_REARM_DELAY_MS: u64 = 100;
