//! Grid model: the displayed matrix and the pending final matrix

use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::symbols;

/// A reels × rows matrix of symbol keys. Outer index is the reel (column).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    columns: Vec<Vec<String>>,
}

impl Grid {
    /// Build from columns; each inner vec is one reel top-to-bottom.
    pub fn from_columns(columns: Vec<Vec<String>>) -> Self {
        Self { columns }
    }

    /// A grid filled with a single symbol.
    pub fn filled(reels: u8, rows: u8, symbol: &str) -> Self {
        Self {
            columns: vec![vec![symbol.to_string(); rows as usize]; reels as usize],
        }
    }

    /// Draw a random grid from the weighted filler pool.
    pub fn random(reels: u8, rows: u8, rng: &mut StdRng) -> Self {
        let columns = (0..reels)
            .map(|_| (0..rows).map(|_| weighted_symbol(rng)).collect())
            .collect();
        Self { columns }
    }

    pub fn reels(&self) -> usize {
        self.columns.len()
    }

    pub fn rows(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    /// Does this grid match the given shape exactly?
    pub fn matches_shape(&self, reels: u8, rows: u8) -> bool {
        self.columns.len() == reels as usize
            && self.columns.iter().all(|c| c.len() == rows as usize)
    }

    /// Symbol at (reel, row), if in range.
    pub fn symbol_at(&self, reel: usize, row: usize) -> Option<&str> {
        self.columns.get(reel)?.get(row).map(String::as_str)
    }

    /// One reel's column, top-to-bottom.
    pub fn column(&self, reel: usize) -> Option<&[String]> {
        self.columns.get(reel).map(Vec::as_slice)
    }

    pub fn columns(&self) -> &[Vec<String>] {
        &self.columns
    }

    /// Count cells whose canonical key equals `symbol`.
    pub fn count_symbol(&self, symbol: &str) -> usize {
        self.columns
            .iter()
            .flatten()
            .filter(|s| symbols::canonical_key(s) == symbol)
            .count()
    }

    /// Owned column matrix, for event payloads.
    pub fn to_columns(&self) -> Vec<Vec<String>> {
        self.columns.clone()
    }
}

/// Pick one symbol from the weighted filler pool.
pub fn weighted_symbol(rng: &mut StdRng) -> String {
    let pool = symbols::filler_pool();
    let total: u32 = pool.iter().map(|(_, w)| w).sum();
    let mut roll = rng.random_range(0..total);
    for (key, weight) in &pool {
        if roll < *weight {
            return key.to_string();
        }
        roll -= weight;
    }
    // Unreachable with a non-empty pool
    pool[0].0.to_string()
}

/// The displayed grid plus the pending final grid for an in-flight spin.
#[derive(Debug, Clone)]
pub struct GridModel {
    reels: u8,
    rows: u8,
    current: Grid,
    pending: Option<Grid>,
}

impl GridModel {
    pub fn new(reels: u8, rows: u8, rng: &mut StdRng) -> Self {
        Self {
            reels,
            rows,
            current: Grid::random(reels, rows, rng),
            pending: None,
        }
    }

    pub fn current(&self) -> &Grid {
        &self.current
    }

    pub fn pending(&self) -> Option<&Grid> {
        self.pending.as_ref()
    }

    /// Stage the final grid for the spin in flight.
    pub fn stage_final(&mut self, grid: Grid) {
        self.pending = Some(grid);
    }

    /// Swap the pending final grid into the displayed grid at settle.
    ///
    /// Returns the committed grid, or `None` when no final grid was staged
    /// (the no-op completion case).
    pub fn commit_final(&mut self) -> Option<Grid> {
        let grid = self.pending.take()?;
        self.current = grid.clone();
        Some(grid)
    }

    /// Re-apply the shape invariant after a configuration change.
    ///
    /// A mismatched current grid is regenerated and any staged final grid
    /// is dropped.
    pub fn reshape(&mut self, reels: u8, rows: u8, rng: &mut StdRng) {
        if self.reels == reels && self.rows == rows && self.current.matches_shape(reels, rows) {
            return;
        }
        log::debug!("grid reshaped to {}x{}", reels, rows);
        self.reels = reels;
        self.rows = rows;
        self.current = Grid::random(reels, rows, rng);
        self.pending = None;
    }
}
