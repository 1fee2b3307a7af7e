//! Built-in price table used when no price file can be read

use super::types::{Item, Rarity};

/// File name of the price table, resolved next to the executable.
pub const DATABASE_FILENAME: &str = "ARC_Raiders_Market_Database.json";

const FALLBACK_ITEMS: &[(&str, u64, Rarity)] = &[
    ("Matriarch Reactor", 13000, Rarity::Legendary),
    ("Magnetron", 6000, Rarity::Epic),
    ("Microscope", 3000, Rarity::Rare),
    ("Duct Tape", 300, Rarity::Uncommon),
    ("Chemicals", 50, Rarity::Common),
    ("Crystallized Hydroxide", 1050, Rarity::Rare),
    ("Infrared Lens", 800, Rarity::Uncommon),
    ("Quantum Entangler", 25000, Rarity::Legendary),
    ("Fusion Coil", 9500, Rarity::Epic),
    ("Nanotube Fiber", 450, Rarity::Uncommon),
    ("Scrap Metal", 10, Rarity::Common),
];

/// The fallback table in canonical order.
pub fn fallback_items() -> Vec<Item> {
    FALLBACK_ITEMS
        .iter()
        .map(|(name, price, rarity)| Item::new(*name, *price, *rarity))
        .collect()
}
