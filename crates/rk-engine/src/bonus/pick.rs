//! Pick-and-click bonus: a grid of hidden prizes
//!
//! Prizes are drawn from the configured pool; a zero prize is the
//! "collect" cell that ends the feature. Picking an already-revealed cell
//! is a rejected no-op.

use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::PickConfig;

/// Outcome of one pick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PickResult {
    /// A prize was revealed; the feature continues
    Revealed { amount: f64 },
    /// The collect cell was revealed; the feature is over
    Collected { total_win: f64 },
    /// The last hidden cell was revealed; the feature is over
    Exhausted { amount: f64, total_win: f64 },
    /// Already-revealed cell, out-of-range index, or finished feature
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PickCell {
    /// Prize multiplier × bet; zero marks the collect cell
    prize: f64,
    revealed: bool,
}

/// One pick-and-click instance.
#[derive(Debug, Clone)]
pub struct PickBonus {
    cells: Vec<PickCell>,
    total_win: f64,
    finished: bool,
}

impl PickBonus {
    /// Fill a rows×cols grid by drawing from the configured prize pool.
    pub fn new(config: &PickConfig, bet: f64, rng: &mut StdRng) -> Self {
        let cell_count = (config.rows as usize * config.cols as usize).max(1);
        let pool: &[f64] = if config.prizes.is_empty() {
            &[1.0, 2.0, 5.0, 0.0]
        } else {
            &config.prizes
        };
        let cells = (0..cell_count)
            .map(|_| PickCell {
                prize: pool[rng.random_range(0..pool.len())] * bet,
                revealed: false,
            })
            .collect();
        Self {
            cells,
            total_win: 0.0,
            finished: false,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn total_win(&self) -> f64 {
        self.total_win
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Reveal the cell at `index`.
    pub fn pick(&mut self, index: usize) -> PickResult {
        if self.finished {
            return PickResult::Rejected;
        }
        let Some(cell) = self.cells.get_mut(index) else {
            log::debug!("pick index {} out of range; ignored", index);
            return PickResult::Rejected;
        };
        if cell.revealed {
            return PickResult::Rejected;
        }
        cell.revealed = true;

        if cell.prize == 0.0 {
            self.finished = true;
            return PickResult::Collected {
                total_win: self.total_win,
            };
        }

        self.total_win += cell.prize;
        let amount = cell.prize;
        if self.cells.iter().all(|c| c.revealed) {
            self.finished = true;
            return PickResult::Exhausted {
                amount,
                total_win: self.total_win,
            };
        }
        PickResult::Revealed { amount }
    }
}
