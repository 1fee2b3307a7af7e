#![allow(unexpected_cfgs)]

//! ARC Raiders Market - price lookup overlay for ARC Raiders
//!
//! A global hotkey, pressed while the game has focus, summons a small
//! always-on-top window. Typing an item name fuzzy-matches it against a
//! local price table and shows its sell price in the item's rarity color.

pub mod app;
pub mod config;
pub mod coordinator;
pub mod dialog;
pub mod error;
pub mod hotkeys;
pub mod items;
pub mod logging;
pub mod matcher;
pub mod overlay;
pub mod paths;
pub mod platform;
pub mod startup;

// System tray (Windows and macOS menu bars only)
#[cfg(any(target_os = "windows", target_os = "macos"))]
pub mod tray;
