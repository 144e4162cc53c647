//! Paytable and betline resolution
//!
//! Both resolvers are pure and non-fatal: a malformed configuration falls
//! back to generated defaults with a warning, never an error.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::symbols::{self, canonical_key};

/// A betline pattern: one row index per reel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Betline {
    /// Betline index (0-based, stable evaluation order)
    pub index: u8,
    /// Row position for each reel
    pub rows: Vec<u8>,
}

impl Betline {
    /// A straight line (same row across all reels)
    pub fn straight(index: u8, row: u8, reels: u8) -> Self {
        Self {
            index,
            rows: vec![row; reels as usize],
        }
    }
}

/// Generate the canonical pattern set for a grid shape.
///
/// Order is deterministic: straights top-to-bottom, then V / inverted V,
/// then zigzag pairs, then wrapped diagonals. The list is long enough for
/// any realistic betline count; callers truncate.
pub fn generate_patterns(reels: u8, rows: u8, count: usize) -> Vec<Betline> {
    let reels_us = reels as usize;
    let mut patterns: Vec<Vec<u8>> = Vec::new();

    // Straights
    for row in 0..rows {
        patterns.push(vec![row; reels_us]);
    }

    if rows >= 2 {
        // V shape and inverted V
        let mid = reels / 2;
        let v: Vec<u8> = (0..reels)
            .map(|r| {
                let depth = if r <= mid { r } else { reels - 1 - r };
                depth.min(rows - 1)
            })
            .collect();
        let inverted: Vec<u8> = v.iter().map(|&d| rows - 1 - d).collect();
        patterns.push(v);
        patterns.push(inverted);

        // Zigzags between adjacent row pairs
        for top in 0..rows - 1 {
            let bottom = top + 1;
            patterns.push(
                (0..reels_us)
                    .map(|r| if r % 2 == 0 { top } else { bottom })
                    .collect(),
            );
            patterns.push(
                (0..reels_us)
                    .map(|r| if r % 2 == 0 { bottom } else { top })
                    .collect(),
            );
        }
    }

    // Wrapped diagonals fill out large betline counts
    let mut offset = 1u8;
    while patterns.len() < count {
        patterns.push(
            (0..reels_us)
                .map(|r| ((r as u8 + offset) % rows.max(1)))
                .collect(),
        );
        offset = offset.wrapping_add(1);
        if offset == 0 {
            break;
        }
    }

    patterns.truncate(count.max(1));
    patterns
        .into_iter()
        .enumerate()
        .map(|(i, rows)| Betline {
            index: i as u8,
            rows,
        })
        .collect()
}

/// Resolve the active betline patterns for a grid shape.
///
/// Configured patterns are used only when every pattern has one row per
/// reel and all indices are in range; otherwise the canonical set is
/// generated. The result is truncated or extended to `betline_count`.
pub fn resolve_patterns(
    reels: u8,
    rows: u8,
    configured: &[Vec<u8>],
    betline_count: usize,
) -> Vec<Betline> {
    let count = betline_count.max(1);
    let valid = !configured.is_empty()
        && configured
            .iter()
            .all(|p| p.len() == reels as usize && p.iter().all(|&r| r < rows));

    if !valid {
        if !configured.is_empty() {
            log::warn!(
                "betline patterns do not match {}x{} grid; regenerating defaults",
                reels,
                rows
            );
        }
        return generate_patterns(reels, rows, count);
    }

    let mut lines: Vec<Betline> = configured
        .iter()
        .take(count)
        .enumerate()
        .map(|(i, rows)| Betline {
            index: i as u8,
            rows: rows.clone(),
        })
        .collect();

    if lines.len() < count {
        for extra in generate_patterns(reels, rows, count).into_iter().skip(lines.len()) {
            let mut extra = extra;
            extra.index = lines.len() as u8;
            lines.push(extra);
            if lines.len() == count {
                break;
            }
        }
    }

    lines
}

/// Symbol → match-count → payout multiplier, with canonical-key lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayTable {
    entries: HashMap<String, HashMap<u8, f64>>,
}

impl PayTable {
    /// The built-in default table.
    pub fn default_table() -> Self {
        Self {
            entries: symbols::default_paytable_entries(),
        }
    }

    /// Payout multiplier for `symbol` at `count` of a kind.
    ///
    /// The key is canonicalized first; a missing entry falls back to the
    /// `low_1` row, then to zero.
    pub fn pay(&self, symbol: &str, count: u8) -> f64 {
        if count < 3 {
            return 0.0;
        }
        let key = canonical_key(symbol);
        let row = self.entries.get(&key).or_else(|| self.entries.get("low_1"));
        row.and_then(|r| r.get(&count)).copied().unwrap_or(0.0)
    }

    /// Direct access to the entries (for export).
    pub fn entries(&self) -> &HashMap<String, HashMap<u8, f64>> {
        &self.entries
    }
}

/// Resolve the paytable: configured verbatim when well-formed, otherwise
/// the built-in default.
pub fn resolve_paytable(configured: Option<&HashMap<String, HashMap<u8, f64>>>) -> PayTable {
    match configured {
        Some(table) if is_well_formed(table) => PayTable {
            entries: table.clone(),
        },
        Some(_) => {
            log::warn!("configured paytable is malformed; using built-in defaults");
            PayTable::default_table()
        }
        None => PayTable::default_table(),
    }
}

fn is_well_formed(table: &HashMap<String, HashMap<u8, f64>>) -> bool {
    !table.is_empty()
        && table.values().all(|row| {
            !row.is_empty()
                && row
                    .iter()
                    .all(|(&count, &pay)| (3..=5).contains(&count) && pay.is_finite() && pay >= 0.0)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_straight_betline() {
        let line = Betline::straight(0, 1, 5);
        assert_eq!(line.rows, vec![1, 1, 1, 1, 1]);
    }

    #[test]
    fn test_generate_patterns_shape() {
        let patterns = generate_patterns(5, 3, 20);
        assert_eq!(patterns.len(), 20);
        for (i, p) in patterns.iter().enumerate() {
            assert_eq!(p.index as usize, i);
            assert_eq!(p.rows.len(), 5);
            assert!(p.rows.iter().all(|&r| r < 3));
        }
    }

    #[test]
    fn test_resolve_patterns_accepts_valid_config() {
        let configured = vec![vec![0, 0, 0, 0, 0], vec![2, 1, 0, 1, 2]];
        let lines = resolve_patterns(5, 3, &configured, 2);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].rows, vec![2, 1, 0, 1, 2]);
    }

    #[test]
    fn test_resolve_patterns_rejects_bad_shape() {
        // Pattern too short for a 5-reel grid
        let configured = vec![vec![0, 0, 0]];
        let lines = resolve_patterns(5, 3, &configured, 10);
        assert_eq!(lines.len(), 10);
        assert!(lines.iter().all(|l| l.rows.len() == 5));
    }

    #[test]
    fn test_resolve_patterns_rejects_out_of_range_row() {
        let configured = vec![vec![0, 0, 0, 0, 3]]; // row 3 on a 3-row grid
        let lines = resolve_patterns(5, 3, &configured, 5);
        assert!(lines.iter().all(|l| l.rows.iter().all(|&r| r < 3)));
    }

    #[test]
    fn test_resolve_patterns_extends_short_config() {
        let configured = vec![vec![1, 1, 1, 1, 1]];
        let lines = resolve_patterns(5, 3, &configured, 5);
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0].rows, vec![1, 1, 1, 1, 1]);
    }

    #[test]
    fn test_paytable_canonical_lookup() {
        let table = PayTable::default_table();
        assert_eq!(table.pay("high1", 3), table.pay("high_1", 3));
        assert!(table.pay("high_1", 3) > 0.0);
        assert_eq!(table.pay("high_1", 2), 0.0);
    }

    #[test]
    fn test_paytable_low_1_fallback() {
        let table = PayTable::default_table();
        // Unknown symbol falls back to the low_1 row
        assert_eq!(table.pay("mystery", 3), table.pay("low_1", 3));
    }

    #[test]
    fn test_resolve_paytable_malformed_falls_back() {
        let mut bad = HashMap::new();
        bad.insert("high_1".to_string(), HashMap::from([(7u8, 5.0)]));
        let table = resolve_paytable(Some(&bad));
        // Fallback table answers with defaults, not the bad row
        assert_eq!(table.pay("high_1", 3), 20.0);
    }

    #[test]
    fn test_resolve_paytable_verbatim() {
        let mut good = HashMap::new();
        good.insert("low_1".to_string(), HashMap::from([(3u8, 99.0)]));
        let table = resolve_paytable(Some(&good));
        assert_eq!(table.pay("low_1", 3), 99.0);
    }
}
