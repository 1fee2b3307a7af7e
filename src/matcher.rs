//! Fuzzy item lookup
//!
//! Scores every item name against the query with the Ratcliff/Obershelp
//! similarity ratio (`2 * matched / total_len`) and keeps the single best
//! candidate at or above the cutoff.

use crate::items::{Item, ItemDatabase};

/// Queries shorter than this produce no lookup at all.
pub const DEFAULT_MIN_QUERY_LENGTH: usize = 3;
/// Candidates scoring below this ratio are not matches.
pub const DEFAULT_SIMILARITY_CUTOFF: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchSettings {
    pub cutoff: f64,
    pub min_query_length: usize,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            cutoff: DEFAULT_SIMILARITY_CUTOFF,
            min_query_length: DEFAULT_MIN_QUERY_LENGTH,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemMatch {
    pub item: Item,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MatchOutcome {
    /// Query too short to search; not the same as a failed search
    TooShort,
    /// Nothing reached the cutoff
    NoMatch,
    Match(ItemMatch),
}

/// Find the best item for `query`.
///
/// The query is used as typed: surrounding spaces count towards the
/// length and take part in scoring. Equal scores keep the item that comes
/// first in the table.
pub fn best_match(query: &str, database: &ItemDatabase, settings: &MatchSettings) -> MatchOutcome {
    if query.chars().count() < settings.min_query_length {
        return MatchOutcome::TooShort;
    }

    let needle: Vec<char> = query.to_lowercase().chars().collect();
    let mut best: Option<(usize, f64)> = None;

    for (index, candidate) in database.lowercase_names().iter().enumerate() {
        let haystack: Vec<char> = candidate.chars().collect();
        if quick_ratio_bound(&haystack, &needle) < settings.cutoff {
            continue;
        }
        let score = similarity_ratio(&haystack, &needle);
        if score < settings.cutoff {
            continue;
        }
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((index, score)),
        }
    }

    match best.and_then(|(index, score)| database.item_at(index).map(|item| (item, score))) {
        Some((item, score)) => MatchOutcome::Match(ItemMatch {
            item: item.clone(),
            score,
        }),
        None => MatchOutcome::NoMatch,
    }
}

/// Similarity ratio of two strings, in `[0.0, 1.0]`.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    similarity_ratio(&a, &b)
}

fn similarity_ratio(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matched_chars(a, b) as f64 / total as f64
}

/// Upper bound on the ratio from length alone; skips hopeless candidates.
fn quick_ratio_bound(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * a.len().min(b.len()) as f64 / total as f64
}

/// Count characters in matching blocks: take the longest common block,
/// then repeat on the pieces to its left and right.
fn matched_chars(a: &[char], b: &[char]) -> usize {
    let mut total = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let (i, j, size) = longest_common_block(a, b, alo, ahi, blo, bhi);
        if size == 0 {
            continue;
        }
        total += size;
        if alo < i && blo < j {
            pending.push((alo, i, blo, j));
        }
        if i + size < ahi && j + size < bhi {
            pending.push((i + size, ahi, j + size, bhi));
        }
    }

    total
}

/// Longest block `a[i..i+size] == b[j..j+size]` inside the given ranges.
/// Among equally long blocks the one starting earliest in `a`, then `b`, wins.
fn longest_common_block(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);
    // run[j - blo + 1] = length of the common run ending at (i - 1, j)
    let width = bhi - blo + 1;
    let mut previous = vec![0usize; width];
    let mut current = vec![0usize; width];

    for i in alo..ahi {
        for j in blo..bhi {
            let slot = j - blo + 1;
            if a[i] == b[j] {
                let size = previous[slot - 1] + 1;
                current[slot] = size;
                if size > best_size {
                    best_i = i + 1 - size;
                    best_j = j + 1 - size;
                    best_size = size;
                }
            } else {
                current[slot] = 0;
            }
        }
        std::mem::swap(&mut previous, &mut current);
    }

    (best_i, best_j, best_size)
}

/// `$` plus the price with comma thousands separators.
pub fn format_price(price: u64) -> String {
    let digits = price.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("${}", grouped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::{Item, Rarity};

    fn settings() -> MatchSettings {
        MatchSettings::default()
    }

    fn matched_name(outcome: &MatchOutcome) -> Option<&str> {
        match outcome {
            MatchOutcome::Match(m) => Some(m.item.name.as_str()),
            _ => None,
        }
    }

    #[test]
    fn test_ratio_basics() {
        assert_eq!(ratio("", ""), 1.0);
        assert_eq!(ratio("abc", "abc"), 1.0);
        assert_eq!(ratio("abc", "xyz"), 0.0);
        // 5 matched chars over 16 total
        assert!((ratio("scrap metal", "scrap") - 0.625).abs() < 1e-9);
        // "ab" then "d": 3 matched over 8 total
        assert!((ratio("abcd", "abxd") - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_longest_block_prefers_earliest() {
        let a: Vec<char> = "abab".chars().collect();
        let b: Vec<char> = "ab".chars().collect();
        assert_eq!(longest_common_block(&a, &b, 0, 4, 0, 2), (0, 0, 2));
    }

    #[test]
    fn test_short_queries_are_too_short() {
        let db = ItemDatabase::fallback();
        for query in ["", "s", "sc", " s", "Du"] {
            assert_eq!(best_match(query, &db, &settings()), MatchOutcome::TooShort);
        }
    }

    #[test]
    fn test_padded_query_is_searched_as_typed() {
        let db = ItemDatabase::fallback();
        assert_eq!(best_match("sc ", &db, &settings()), MatchOutcome::NoMatch);
        assert_ne!(best_match("  d", &db, &settings()), MatchOutcome::TooShort);

        let outcome = best_match("scrap ", &db, &settings());
        assert_eq!(matched_name(&outcome), Some("Scrap Metal"));
        let padded = match outcome {
            MatchOutcome::Match(m) => m.score,
            other => panic!("expected match, got {:?}", other),
        };
        let bare = match best_match("scrap", &db, &settings()) {
            MatchOutcome::Match(m) => m.score,
            other => panic!("expected match, got {:?}", other),
        };
        assert!((padded - ratio("scrap metal", "scrap ")).abs() < 1e-9);
        assert!(padded != bare);
    }

    #[test]
    fn test_exact_match_is_case_insensitive() {
        let db = ItemDatabase::fallback();
        for query in ["duct tape", "DUCT TAPE", "Duct Tape"] {
            match best_match(query, &db, &settings()) {
                MatchOutcome::Match(m) => {
                    assert_eq!(m.item.name, "Duct Tape");
                    assert!((m.score - 1.0).abs() < 1e-9);
                }
                other => panic!("expected match, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_partial_query_finds_item() {
        let db = ItemDatabase::fallback();
        let outcome = best_match("scrap", &db, &settings());
        match outcome {
            MatchOutcome::Match(m) => {
                assert_eq!(m.item.name, "Scrap Metal");
                assert_eq!(m.item.price, 10);
                assert_eq!(m.item.rarity, Rarity::Common);
            }
            other => panic!("expected match, got {:?}", other),
        }
    }

    #[test]
    fn test_misspelled_query_finds_item() {
        let db = ItemDatabase::fallback();
        let outcome = best_match("magnetrn", &db, &settings());
        assert_eq!(matched_name(&outcome), Some("Magnetron"));
        let outcome = best_match("fusoin coil", &db, &settings());
        assert_eq!(matched_name(&outcome), Some("Fusion Coil"));
    }

    #[test]
    fn test_below_cutoff_is_no_match() {
        let db = ItemDatabase::fallback();
        assert_eq!(best_match("zzzzz", &db, &settings()), MatchOutcome::NoMatch);
        assert_eq!(best_match("qqqqqqqq", &db, &settings()), MatchOutcome::NoMatch);
    }

    #[test]
    fn test_cutoff_is_configurable() {
        let db = ItemDatabase::fallback();
        let strict = MatchSettings {
            cutoff: 0.9,
            ..MatchSettings::default()
        };
        assert_eq!(best_match("scrap", &db, &strict), MatchOutcome::NoMatch);
    }

    #[test]
    fn test_ties_keep_first_item_in_table_order() {
        let db = ItemDatabase::from_items(vec![
            Item::new("Gear B", 2, Rarity::Rare),
            Item::new("Gear A", 1, Rarity::Common),
        ]);
        let outcome = best_match("gear", &db, &settings());
        assert_eq!(matched_name(&outcome), Some("Gear B"));

        let db = ItemDatabase::from_items(vec![
            Item::new("Gear A", 1, Rarity::Common),
            Item::new("Gear B", 2, Rarity::Rare),
        ]);
        let outcome = best_match("gear", &db, &settings());
        assert_eq!(matched_name(&outcome), Some("Gear A"));
    }

    #[test]
    fn test_empty_database_is_no_match() {
        let db = ItemDatabase::from_items(Vec::new());
        assert_eq!(best_match("anything", &db, &settings()), MatchOutcome::NoMatch);
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(0), "$0");
        assert_eq!(format_price(10), "$10");
        assert_eq!(format_price(999), "$999");
        assert_eq!(format_price(1050), "$1,050");
        assert_eq!(format_price(25000), "$25,000");
        assert_eq!(format_price(1234567), "$1,234,567");
    }
}
