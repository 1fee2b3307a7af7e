//! Item price table
//!
//! - `types` - Item, Rarity and display colors
//! - `defaults` - the built-in fallback table
//! - `database` - the owned table with its lowercase index
//! - `loader` - reading and seeding the price file

mod database;
mod defaults;
mod loader;
mod types;

pub use database::ItemDatabase;
pub use defaults::{fallback_items, DATABASE_FILENAME};
pub use loader::{
    default_database_path, load_from, DatabaseSource, FallbackReason, LoadOutcome, RunMode,
};
pub use types::{Item, Rarity, RarityColor};

#[cfg(test)]
#[path = "items_tests.rs"]
mod tests;
