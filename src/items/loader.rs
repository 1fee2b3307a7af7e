//! Price file loading
//!
//! Reads the JSON price table that lives next to the executable. Every
//! failure degrades to the built-in table; nothing here returns an error
//! to the caller.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::{info, instrument, warn};

use super::database::ItemDatabase;
use super::defaults::{fallback_items, DATABASE_FILENAME};
use super::types::{Item, ItemRecord, Rarity};
use crate::error::{MarketError, Result};

/// How the program is being run. Only development runs seed the price file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Running from a source checkout (`cargo run`, debug builds)
    Development,
    /// Running as a packaged release binary
    Packaged,
}

impl RunMode {
    /// Debug builds are development runs. `ARC_MARKET_DEV` overrides either way.
    pub fn detect() -> Self {
        match std::env::var("ARC_MARKET_DEV") {
            Ok(value) if value == "1" || value.eq_ignore_ascii_case("true") => {
                RunMode::Development
            }
            Ok(value) if value == "0" || value.eq_ignore_ascii_case("false") => RunMode::Packaged,
            _ if cfg!(debug_assertions) => RunMode::Development,
            _ => RunMode::Packaged,
        }
    }

    pub fn is_development(&self) -> bool {
        matches!(self, RunMode::Development)
    }
}

/// Why the built-in table was used instead of the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    Missing,
    Invalid,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseSource {
    File(PathBuf),
    Fallback(FallbackReason),
}

#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub database: ItemDatabase,
    pub source: DatabaseSource,
    /// True when the fallback table was written to disk during this load
    pub seeded: bool,
}

/// Default price file location: beside the running executable.
pub fn default_database_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .map(|dir| dir.join(DATABASE_FILENAME))
        .unwrap_or_else(|| PathBuf::from(DATABASE_FILENAME))
}

/// Load the price table from `path`.
#[instrument(name = "load_item_database", skip(run_mode), fields(path = %path.display()))]
pub fn load_from(path: &Path, run_mode: RunMode) -> LoadOutcome {
    if !path.exists() {
        info!("Price file not found, using built-in table");
        let seeded = run_mode.is_development()
            && match write_seed(path) {
                Ok(()) => {
                    info!(path = %path.display(), "Wrote built-in table as starting price file");
                    true
                }
                Err(e) => {
                    warn!(error = %e, "Could not write starting price file");
                    false
                }
            };
        return LoadOutcome {
            database: ItemDatabase::fallback(),
            source: DatabaseSource::Fallback(FallbackReason::Missing),
            seeded,
        };
    }

    match read_database(path) {
        Ok(database) => {
            if database.is_empty() {
                warn!("Price file has no usable entries, every search will miss");
            }
            info!(item_count = database.len(), "Loaded price file");
            LoadOutcome {
                database,
                source: DatabaseSource::File(path.to_path_buf()),
                seeded: false,
            }
        }
        Err(e) => {
            warn!(error = %e, "Price file is invalid, using built-in table");
            LoadOutcome {
                database: ItemDatabase::fallback(),
                source: DatabaseSource::Fallback(FallbackReason::Invalid),
                seeded: false,
            }
        }
    }
}

fn read_database(path: &Path) -> Result<ItemDatabase> {
    let content = fs::read_to_string(path).map_err(|source| MarketError::DatabaseRead {
        path: path.display().to_string(),
        source,
    })?;
    parse_database(&content)
}

/// Parse price file content. Bad entries are skipped, a bad document is an error.
pub(crate) fn parse_database(content: &str) -> Result<ItemDatabase> {
    let document: Value = serde_json::from_str(content)?;
    let Value::Object(entries) = document else {
        return Err(MarketError::DatabaseShape(
            "top level must be an object of item names".to_string(),
        ));
    };

    let items = entries.into_iter().filter_map(|(name, value)| {
        let item = parse_entry(&name, &value);
        if item.is_none() {
            warn!(name = %name, entry = %value, "Skipping price entry without a valid price");
        }
        item
    });
    Ok(ItemDatabase::from_items(items.collect::<Vec<_>>()))
}

fn parse_entry(name: &str, value: &Value) -> Option<Item> {
    if name.trim().is_empty() {
        return None;
    }
    let fields = value.as_object()?;
    let price = fields.get("price").and_then(Value::as_u64)?;
    let rarity = Rarity::parse(fields.get("rarity").and_then(Value::as_str));
    Some(Item::new(name, price, rarity))
}

/// Serialize items in canonical order, 4-space indented.
pub(crate) fn render_items(items: &[Item]) -> Result<String> {
    let mut document = Map::new();
    for item in items {
        document.insert(item.name.clone(), serde_json::to_value(ItemRecord::from(item))?);
    }

    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    serde::Serialize::serialize(&Value::Object(document), &mut serializer)?;
    String::from_utf8(buffer).map_err(|e| MarketError::DatabaseShape(e.to_string()))
}

/// Write the built-in table to `path` via a temp file and rename.
fn write_seed(path: &Path) -> Result<()> {
    let rendered = render_items(&fallback_items())?;
    let tmp_path = path.with_extension("json.tmp");
    let to_write_error = |source| MarketError::DatabaseWrite {
        path: path.display().to_string(),
        source,
    };

    let mut file = fs::File::create(&tmp_path).map_err(to_write_error)?;
    file.write_all(rendered.as_bytes()).map_err(to_write_error)?;
    file.sync_all().map_err(to_write_error)?;
    drop(file);

    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(to_write_error(e));
    }
    Ok(())
}
