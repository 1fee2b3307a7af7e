//! Item and rarity type definitions

use serde::{Deserialize, Serialize};

/// Rarity tier of an item. Only used to pick the display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Rarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    pub const ALL: [Rarity; 5] = [
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::Epic,
        Rarity::Legendary,
    ];

    /// Parse a rarity name case-insensitively.
    ///
    /// Unknown, empty or missing names resolve to [`Rarity::Common`].
    pub fn parse(name: Option<&str>) -> Self {
        let Some(name) = name else {
            return Rarity::Common;
        };
        match name.trim().to_ascii_uppercase().as_str() {
            "UNCOMMON" => Rarity::Uncommon,
            "RARE" => Rarity::Rare,
            "EPIC" => Rarity::Epic,
            "LEGENDARY" => Rarity::Legendary,
            _ => Rarity::Common,
        }
    }

    /// Display name as written in the price file.
    pub fn as_str(&self) -> &'static str {
        match self {
            Rarity::Common => "Common",
            Rarity::Uncommon => "Uncommon",
            Rarity::Rare => "Rare",
            Rarity::Epic => "Epic",
            Rarity::Legendary => "Legendary",
        }
    }

    pub fn color(&self) -> RarityColor {
        match self {
            Rarity::Common => RarityColor(0x8C8C8C),
            Rarity::Uncommon => RarityColor(0x26BF57),
            Rarity::Rare => RarityColor(0x00A8F2),
            Rarity::Epic => RarityColor(0xDF40AA),
            Rarity::Legendary => RarityColor(0xFFC600),
        }
    }
}

impl std::fmt::Display for Rarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 24-bit RGB color, `0xRRGGBB`. Converts directly into `gpui::rgb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RarityColor(pub u32);

impl RarityColor {
    pub fn hex(&self) -> String {
        format!("#{:06X}", self.0)
    }
}

/// A single entry of the price table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub name: String,
    pub price: u64,
    pub rarity: Rarity,
}

impl Item {
    pub fn new(name: impl Into<String>, price: u64, rarity: Rarity) -> Self {
        Self {
            name: name.into(),
            price,
            rarity,
        }
    }
}

/// On-disk shape of one price file entry.
///
/// `rarity` stays a raw string so that unknown tiers degrade to Common
/// instead of failing the whole file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct ItemRecord {
    pub price: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rarity: Option<String>,
}

impl From<&Item> for ItemRecord {
    fn from(item: &Item) -> Self {
        ItemRecord {
            price: item.price,
            rarity: Some(item.rarity.as_str().to_string()),
        }
    }
}
