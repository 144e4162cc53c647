//! Symbol keys, canonical classes, and the built-in default paytable
//!
//! Symbols are string keys. Storage-style keys without an underscore
//! (`high1`, `low3`) normalize to the canonical form (`high_1`, `low_3`)
//! before any paytable lookup. The special classes `wild`, `scatter`,
//! `bonus`, and `holdspin` pass through unchanged.

use std::collections::HashMap;

/// Wild substitutes for any non-feature symbol in line matching.
pub const WILD: &str = "wild";
/// Scatter triggers free spins; never part of a line match.
pub const SCATTER: &str = "scatter";
/// Bonus triggers wheel / pick-and-click; never part of a line match.
pub const BONUS: &str = "bonus";
/// Hold-and-spin trigger symbol; never part of a line match.
pub const HOLDSPIN: &str = "holdspin";

/// Canonical regular symbol classes, highest paying first.
pub const REGULAR_KEYS: [&str; 12] = [
    "high_1", "high_2", "high_3", "high_4", "medium_1", "medium_2", "medium_3", "medium_4",
    "low_1", "low_2", "low_3", "low_4",
];

/// Normalize a storage-style key to its canonical form.
///
/// `high1` → `high_1`, `medium3` → `medium_3`; keys already canonical and
/// the special classes (`wild`, `scatter`, `bonus`, `holdspin`) pass through.
pub fn canonical_key(key: &str) -> String {
    if matches!(key, WILD | SCATTER | BONUS | HOLDSPIN) {
        return key.to_string();
    }
    for prefix in ["high", "medium", "low"] {
        if let Some(rest) = key.strip_prefix(prefix) {
            if rest.len() == 1 && rest.chars().all(|c| c.is_ascii_digit()) {
                return format!("{}_{}", prefix, rest);
            }
        }
    }
    key.to_string()
}

/// Is this the wild symbol?
pub fn is_wild(key: &str) -> bool {
    key == WILD
}

/// Symbols that terminate a line scan and never participate in line wins.
pub fn is_line_blocker(key: &str) -> bool {
    matches!(key, SCATTER | BONUS | HOLDSPIN)
}

/// Built-in default paytable rows: symbol → (match count → multiplier).
///
/// Used whenever the configured table is missing or malformed.
pub fn default_paytable_entries() -> HashMap<String, HashMap<u8, f64>> {
    let rows: [(&str, [f64; 3]); 14] = [
        (WILD, [25.0, 100.0, 500.0]),
        (SCATTER, [2.0, 10.0, 50.0]),
        ("high_1", [20.0, 80.0, 400.0]),
        ("high_2", [15.0, 60.0, 250.0]),
        ("high_3", [10.0, 40.0, 150.0]),
        ("high_4", [8.0, 30.0, 100.0]),
        ("medium_1", [5.0, 20.0, 75.0]),
        ("medium_2", [4.0, 15.0, 60.0]),
        ("medium_3", [3.0, 12.0, 50.0]),
        ("medium_4", [3.0, 10.0, 40.0]),
        ("low_1", [2.0, 8.0, 25.0]),
        ("low_2", [2.0, 6.0, 20.0]),
        ("low_3", [1.0, 5.0, 15.0]),
        ("low_4", [1.0, 4.0, 10.0]),
    ];

    rows.iter()
        .map(|(key, pays)| {
            let row = (3u8..=5).zip(pays.iter().copied()).collect();
            (key.to_string(), row)
        })
        .collect()
}

/// Weighted filler pool for reel tapes and random grids.
///
/// Low symbols dominate, wilds and feature symbols are rare; the exact
/// weights are presentation texture, not a certified reel model.
pub fn filler_pool() -> Vec<(&'static str, u32)> {
    vec![
        ("high_1", 2),
        ("high_2", 3),
        ("high_3", 3),
        ("high_4", 4),
        ("medium_1", 5),
        ("medium_2", 5),
        ("medium_3", 6),
        ("medium_4", 6),
        ("low_1", 8),
        ("low_2", 8),
        ("low_3", 9),
        ("low_4", 9),
        (WILD, 2),
        (SCATTER, 1),
        (BONUS, 1),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_key_normalization() {
        assert_eq!(canonical_key("high1"), "high_1");
        assert_eq!(canonical_key("medium4"), "medium_4");
        assert_eq!(canonical_key("low2"), "low_2");
        assert_eq!(canonical_key("high_1"), "high_1");
    }

    #[test]
    fn test_canonical_key_special_passthrough() {
        assert_eq!(canonical_key("wild"), "wild");
        assert_eq!(canonical_key("scatter"), "scatter");
        assert_eq!(canonical_key("bonus"), "bonus");
        assert_eq!(canonical_key("holdspin"), "holdspin");
    }

    #[test]
    fn test_line_blockers() {
        assert!(is_line_blocker("scatter"));
        assert!(is_line_blocker("bonus"));
        assert!(is_line_blocker("holdspin"));
        assert!(!is_line_blocker("wild"));
        assert!(!is_line_blocker("high_1"));
    }

    #[test]
    fn test_default_paytable_covers_classes() {
        let table = default_paytable_entries();
        for key in REGULAR_KEYS {
            assert!(table.contains_key(key), "missing {}", key);
        }
        assert_eq!(table["high_1"][&3], 20.0);
        assert_eq!(table["low_1"][&5], 25.0);
    }
}
