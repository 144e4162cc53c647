//! Win evaluation: line scan and grid aggregation
//!
//! Both entry points are pure and deterministic. Malformed betlines are
//! skipped with a warning, never raised.

use serde::{Deserialize, Serialize};

use crate::grid::Grid;
use crate::paytable::{Betline, PayTable};
use crate::symbols::{self, canonical_key, WILD};

/// Outcome of scanning a single betline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineResult {
    pub amount: f64,
    pub count: u8,
    pub symbol: Option<String>,
}

impl LineResult {
    pub fn zero() -> Self {
        Self {
            amount: 0.0,
            count: 0,
            symbol: None,
        }
    }
}

/// One winning betline in a grid result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WinDetail {
    /// Betline index
    pub line: u8,
    /// Full symbol sequence along the betline
    pub symbols: Vec<String>,
    /// (reel, row) of each matched cell, contiguous from the left
    pub positions: Vec<(u8, u8)>,
    /// Matched symbol count
    pub count: u8,
    /// The winning symbol (canonical key)
    pub symbol: String,
    /// Payout for this line
    pub amount: f64,
}

/// Aggregate result for one evaluated grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridResult {
    pub total_win: f64,
    pub win_details: Vec<WinDetail>,
}

impl GridResult {
    pub fn zero() -> Self {
        Self {
            total_win: 0.0,
            win_details: Vec::new(),
        }
    }
}

/// Scan one line of symbols left to right.
///
/// Leading wilds count without fixing the winning symbol; the first
/// non-wild establishes it. Scatter-class symbols terminate the scan at
/// any position. An all-wild line resolves to `wild`.
pub fn evaluate_line(line: &[String], bet_per_line: f64, paytable: &PayTable) -> LineResult {
    if line.len() < 3 {
        return LineResult::zero();
    }

    let mut winning: Option<String> = None;
    let mut count: u8 = 0;

    for symbol in line {
        let key = canonical_key(symbol);
        if symbols::is_line_blocker(&key) {
            break;
        }
        match &winning {
            None => {
                if symbols::is_wild(&key) {
                    count += 1;
                } else {
                    winning = Some(key);
                    count += 1;
                }
            }
            Some(win) => {
                if symbols::is_wild(&key) || &key == win {
                    count += 1;
                } else {
                    break;
                }
            }
        }
    }

    // All wilds: the winning symbol is wild itself
    let winning = match winning {
        Some(w) => w,
        None if count >= 3 => WILD.to_string(),
        None => return LineResult::zero(),
    };

    if count < 3 || symbols::is_line_blocker(&winning) {
        return LineResult::zero();
    }

    // A sparse paytable may not pay the full scanned run; the paid match
    // is the longest prefix with a paying entry.
    let paid = (3..=count)
        .rev()
        .map(|c| (c, paytable.pay(&winning, c)))
        .find(|&(_, pay)| pay > 0.0);

    match paid {
        Some((paid_count, unit)) => LineResult {
            amount: unit * bet_per_line,
            count: paid_count,
            symbol: Some(winning),
        },
        None => LineResult::zero(),
    }
}

/// Evaluate every active betline against the final grid.
///
/// Lines are scanned in index order; only winning lines appear in
/// `win_details`, preserving that order for sequential reveal.
pub fn evaluate_grid(
    grid: &Grid,
    patterns: &[Betline],
    paytable: &PayTable,
    bet_amount: f64,
    betline_count: usize,
) -> GridResult {
    let active = betline_count.min(patterns.len());
    if active == 0 || bet_amount <= 0.0 {
        return GridResult::zero();
    }
    let bet_per_line = bet_amount / active as f64;

    let mut total_win = 0.0;
    let mut win_details = Vec::new();

    for pattern in patterns.iter().take(active) {
        if pattern.rows.len() != grid.reels() {
            log::warn!(
                "betline {} has {} rows for {} reels; skipped",
                pattern.index,
                pattern.rows.len(),
                grid.reels()
            );
            continue;
        }

        let mut line: Vec<String> = Vec::with_capacity(pattern.rows.len());
        let mut complete = true;
        for (reel, &row) in pattern.rows.iter().enumerate() {
            match grid.symbol_at(reel, row as usize) {
                Some(sym) => line.push(sym.to_string()),
                None => {
                    complete = false;
                    break;
                }
            }
        }
        if !complete {
            log::warn!("betline {} references a missing cell; skipped", pattern.index);
            continue;
        }

        let result = evaluate_line(&line, bet_per_line, paytable);
        if result.amount > 0.0 {
            let positions: Vec<(u8, u8)> = pattern
                .rows
                .iter()
                .enumerate()
                .take(result.count as usize)
                .map(|(reel, &row)| (reel as u8, row))
                .collect();
            total_win += result.amount;
            win_details.push(WinDetail {
                line: pattern.index,
                symbols: line,
                positions,
                count: result.count,
                symbol: result.symbol.unwrap_or_default(),
                amount: result.amount,
            });
        }
    }

    GridResult {
        total_win,
        win_details,
    }
}
