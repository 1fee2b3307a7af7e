//! In-memory price table with its derived lookup indexes

use std::collections::HashMap;

use tracing::warn;

use super::defaults::fallback_items;
use super::types::{Item, RarityColor};

/// Ordered price table plus the lowercase index used for matching.
///
/// Built once per load and never mutated; a reload replaces the whole value.
#[derive(Debug, Clone)]
pub struct ItemDatabase {
    items: Vec<Item>,
    /// Lowercase name of each item, same order as `items`
    lowercase_names: Vec<String>,
    /// Lowercase name -> index into `items`
    by_lowercase: HashMap<String, usize>,
}

impl ItemDatabase {
    /// Build a database from items in canonical order.
    ///
    /// Names that collide case-insensitively keep their first occurrence.
    pub fn from_items(items: impl IntoIterator<Item = Item>) -> Self {
        let mut kept = Vec::new();
        let mut lowercase_names = Vec::new();
        let mut by_lowercase = HashMap::new();

        for item in items {
            let lower = item.name.to_lowercase();
            if by_lowercase.contains_key(&lower) {
                warn!(
                    name = %item.name,
                    "Duplicate item name (case-insensitive), keeping first entry"
                );
                continue;
            }
            by_lowercase.insert(lower.clone(), kept.len());
            lowercase_names.push(lower);
            kept.push(item);
        }

        Self {
            items: kept,
            lowercase_names,
            by_lowercase,
        }
    }

    /// The built-in table.
    pub fn fallback() -> Self {
        Self::from_items(fallback_items())
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Match corpus, in canonical order.
    pub fn lowercase_names(&self) -> &[String] {
        &self.lowercase_names
    }

    /// Case-insensitive lookup.
    pub fn get(&self, name: &str) -> Option<&Item> {
        self.by_lowercase
            .get(&name.to_lowercase())
            .map(|&index| &self.items[index])
    }

    /// Item at a position of [`lowercase_names`](Self::lowercase_names).
    pub fn item_at(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    /// Original casing for a lowercase key.
    pub fn canonical_name(&self, lowercase: &str) -> Option<&str> {
        self.by_lowercase
            .get(lowercase)
            .map(|&index| self.items[index].name.as_str())
    }

    /// Display color of an item, looked up case-insensitively.
    pub fn color_of(&self, name: &str) -> Option<RarityColor> {
        self.get(name).map(|item| item.rarity.color())
    }
}

impl Default for ItemDatabase {
    fn default() -> Self {
        Self::fallback()
    }
}
