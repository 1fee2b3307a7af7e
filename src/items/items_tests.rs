use super::loader::{parse_database, render_items};
use super::*;
use std::fs;
use tempfile::TempDir;

fn write_file(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(DATABASE_FILENAME);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_rarity_parse_is_case_insensitive() {
    assert_eq!(Rarity::parse(Some("legendary")), Rarity::Legendary);
    assert_eq!(Rarity::parse(Some("LEGENDARY")), Rarity::Legendary);
    assert_eq!(Rarity::parse(Some(" Epic ")), Rarity::Epic);
    assert_eq!(Rarity::parse(Some("uNcOmMoN")), Rarity::Uncommon);
    assert_eq!(Rarity::parse(Some("Rare")), Rarity::Rare);
}

#[test]
fn test_rarity_defaults_to_common() {
    assert_eq!(Rarity::parse(None), Rarity::Common);
    assert_eq!(Rarity::parse(Some("")), Rarity::Common);
    assert_eq!(Rarity::parse(Some("Mythic")), Rarity::Common);
}

#[test]
fn test_rarity_colors() {
    assert_eq!(Rarity::Common.color().hex(), "#8C8C8C");
    assert_eq!(Rarity::Uncommon.color().hex(), "#26BF57");
    assert_eq!(Rarity::Rare.color().hex(), "#00A8F2");
    assert_eq!(Rarity::Epic.color().hex(), "#DF40AA");
    assert_eq!(Rarity::Legendary.color().hex(), "#FFC600");
}

#[test]
fn test_rarity_order() {
    let mut sorted = Rarity::ALL;
    sorted.sort();
    assert_eq!(sorted, Rarity::ALL);
    assert!(Rarity::Common < Rarity::Legendary);
}

#[test]
fn test_fallback_table() {
    let db = ItemDatabase::fallback();
    assert_eq!(db.len(), 11);
    assert_eq!(db.items()[0].name, "Matriarch Reactor");
    assert_eq!(db.items()[10].name, "Scrap Metal");

    let scrap = db.get("scrap metal").unwrap();
    assert_eq!(scrap.price, 10);
    assert_eq!(scrap.rarity, Rarity::Common);

    let entangler = db.get("Quantum Entangler").unwrap();
    assert_eq!(entangler.price, 25000);
    assert_eq!(entangler.rarity, Rarity::Legendary);
}

#[test]
fn test_derived_indexes() {
    let db = ItemDatabase::fallback();
    assert_eq!(db.lowercase_names().len(), db.len());
    assert_eq!(db.lowercase_names()[3], "duct tape");
    assert_eq!(db.canonical_name("duct tape"), Some("Duct Tape"));
    assert_eq!(db.canonical_name("Duct Tape"), None);
    assert_eq!(db.color_of("FUSION COIL"), Some(Rarity::Epic.color()));
    assert_eq!(db.color_of("unknown"), None);
}

#[test]
fn test_duplicate_lowercase_names_keep_first() {
    let db = ItemDatabase::from_items(vec![
        Item::new("Gear", 5, Rarity::Rare),
        Item::new("GEAR", 7, Rarity::Epic),
        Item::new("Bolt", 1, Rarity::Common),
    ]);
    assert_eq!(db.len(), 2);
    assert_eq!(db.canonical_name("gear"), Some("Gear"));
    assert_eq!(db.get("gear").unwrap().price, 5);
}

#[test]
fn test_parse_keeps_file_order_and_defaults_rarity() {
    let db = parse_database(
        r#"{
            "Zeta Part": {"price": 5, "rarity": "epic"},
            "Alpha Part": {"price": 7},
            "Mid Part": {"price": 9, "rarity": "Shiny"}
        }"#,
    )
    .unwrap();

    let names: Vec<_> = db.items().iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["Zeta Part", "Alpha Part", "Mid Part"]);
    assert_eq!(db.get("zeta part").unwrap().rarity, Rarity::Epic);
    assert_eq!(db.get("alpha part").unwrap().rarity, Rarity::Common);
    assert_eq!(db.get("mid part").unwrap().rarity, Rarity::Common);
}

#[test]
fn test_parse_skips_entries_without_valid_price() {
    let db = parse_database(
        r#"{
            "Good": {"price": 100, "rarity": "Rare"},
            "Negative": {"price": -5},
            "Text": {"price": "lots"},
            "NoPrice": {"rarity": "Epic"},
            "NotAnObject": 42
        }"#,
    )
    .unwrap();
    assert_eq!(db.len(), 1);
    assert_eq!(db.items()[0].name, "Good");
}

#[test]
fn test_parse_rejects_non_object_document() {
    assert!(parse_database("[1, 2, 3]").is_err());
    assert!(parse_database("\"text\"").is_err());
    assert!(parse_database("{ not json").is_err());
}

#[test]
fn test_load_existing_file() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        r#"{"Ion Core": {"price": 1234, "rarity": "Legendary"}}"#,
    );

    let outcome = load_from(&path, RunMode::Development);
    assert_eq!(outcome.source, DatabaseSource::File(path.clone()));
    assert!(!outcome.seeded);
    assert_eq!(outcome.database.len(), 1);
    assert_eq!(outcome.database.get("ion core").unwrap().price, 1234);
}

#[test]
fn test_load_missing_file_in_development_seeds_fallback() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(DATABASE_FILENAME);

    let outcome = load_from(&path, RunMode::Development);
    assert_eq!(
        outcome.source,
        DatabaseSource::Fallback(FallbackReason::Missing)
    );
    assert!(outcome.seeded);
    assert_eq!(outcome.database.items(), fallback_items().as_slice());

    // The written file reproduces the table and loads back as a file source
    assert!(path.exists());
    let reloaded = load_from(&path, RunMode::Development);
    assert_eq!(reloaded.source, DatabaseSource::File(path.clone()));
    assert_eq!(reloaded.database.items(), fallback_items().as_slice());

    // No temp file left behind
    assert!(!path.with_extension("json.tmp").exists());
}

#[test]
fn test_load_missing_file_when_packaged_does_not_write() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(DATABASE_FILENAME);

    let outcome = load_from(&path, RunMode::Packaged);
    assert_eq!(outcome.database.len(), 11);
    assert!(!outcome.seeded);
    assert!(!path.exists());
}

#[test]
fn test_load_malformed_file_falls_back_without_writing() {
    let dir = TempDir::new().unwrap();
    let content = "{ \"Scrap Metal\": { \"price\": 10, ";
    let path = write_file(&dir, content);

    let outcome = load_from(&path, RunMode::Development);
    assert_eq!(
        outcome.source,
        DatabaseSource::Fallback(FallbackReason::Invalid)
    );
    assert!(!outcome.seeded);
    assert_eq!(outcome.database.items(), fallback_items().as_slice());
    assert_eq!(fs::read_to_string(&path).unwrap(), content);
}

#[test]
fn test_load_file_without_usable_entries_is_used_as_is() {
    let dir = TempDir::new().unwrap();
    for content in ["{}", r#"{"Broken": {"rarity": "Epic"}}"#] {
        let path = write_file(&dir, content);

        let outcome = load_from(&path, RunMode::Development);
        assert_eq!(outcome.source, DatabaseSource::File(path.clone()));
        assert!(outcome.database.is_empty());
        assert!(!outcome.seeded);
        assert_eq!(fs::read_to_string(&path).unwrap(), content);
    }
}

#[test]
fn test_rendered_seed_uses_four_space_indent() {
    let rendered = render_items(&fallback_items()).unwrap();
    assert!(rendered.starts_with("{\n    \"Matriarch Reactor\": {\n        \"price\": 13000,"));
    assert!(rendered.contains("\"rarity\": \"Legendary\""));
}
