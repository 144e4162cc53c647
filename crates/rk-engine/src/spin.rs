//! Reel spin state machine
//!
//! Each reel owns a timeline over a symbol tape. The scroll offset is the
//! authoritative value; the visible window is derived from it, so displayed
//! symbols can never jump independently of motion. Quick-stop forces every
//! timeline to its end and reuses the same completion check as a natural
//! finish.

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::config::SpinTuning;
use crate::easing::Easing;
use crate::grid::{weighted_symbol, Grid};

/// Animation phase of one reel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReelPhase {
    Idle,
    Spinning,
    Settling,
    Settled,
}

/// Phase of the whole spin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SpinPhase {
    #[default]
    Idle,
    Spinning,
    Complete,
}

/// Progress fraction past which a reel counts as settling.
const SETTLING_PROGRESS: f64 = 0.8;

/// One reel's scroll timeline.
///
/// The tape starts with the currently displayed column (no visual jump),
/// runs through filler, then the final column, then a short trailing
/// margin. Scrolling the full `total_offset` leaves the final column in
/// the visible window.
#[derive(Debug, Clone)]
pub struct ReelTimeline {
    pub reel_index: u8,
    tape: Vec<String>,
    rows: usize,
    cell_height: f64,
    total_offset: f64,
    duration_ms: f64,
    elapsed_ms: f64,
    easing: Easing,
    phase: ReelPhase,
}

impl ReelTimeline {
    pub fn new(
        reel_index: u8,
        current_column: &[String],
        final_column: &[String],
        cell_height: f64,
        tuning: &SpinTuning,
        rng: &mut StdRng,
    ) -> Self {
        let rows = final_column.len();
        let spin_cells = tuning.spin_cells.max(1) as usize;

        let mut tape = Vec::with_capacity(rows * 2 + spin_cells + 2);
        tape.extend(current_column.iter().cloned());
        // Pad a short current column rather than desync the window math
        while tape.len() < rows {
            tape.push(weighted_symbol(rng));
        }
        tape.truncate(rows);
        for _ in 0..spin_cells {
            tape.push(weighted_symbol(rng));
        }
        tape.extend(final_column.iter().cloned());
        for _ in 0..2 {
            tape.push(weighted_symbol(rng));
        }

        Self {
            reel_index,
            tape,
            rows,
            cell_height,
            total_offset: (rows + spin_cells) as f64 * cell_height,
            duration_ms: tuning.base_duration_ms + reel_index as f64 * tuning.stagger_ms,
            elapsed_ms: 0.0,
            easing: tuning.easing,
            phase: ReelPhase::Spinning,
        }
    }

    pub fn phase(&self) -> ReelPhase {
        self.phase
    }

    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    /// Eased scroll offset; authoritative for everything visible.
    pub fn offset(&self) -> f64 {
        if self.phase == ReelPhase::Settled {
            return self.total_offset;
        }
        let t = (self.elapsed_ms / self.duration_ms).clamp(0.0, 1.0);
        self.total_offset * self.easing.apply(t)
    }

    /// The visible window, derived from the offset.
    pub fn visible_symbols(&self) -> Vec<String> {
        let cell = (self.offset() / self.cell_height).floor() as usize;
        let start = cell.min(self.tape.len().saturating_sub(self.rows));
        self.tape[start..start + self.rows].to_vec()
    }

    /// Advance by `dt_ms`. Returns true on the tick the reel settles.
    pub fn tick(&mut self, dt_ms: f64) -> bool {
        match self.phase {
            ReelPhase::Idle | ReelPhase::Settled => false,
            ReelPhase::Spinning | ReelPhase::Settling => {
                self.elapsed_ms += dt_ms;
                let progress = self.elapsed_ms / self.duration_ms;
                if progress >= 1.0 {
                    self.settle();
                    true
                } else {
                    if progress >= SETTLING_PROGRESS {
                        self.phase = ReelPhase::Settling;
                    }
                    false
                }
            }
        }
    }

    /// Snap exactly to the final offset.
    fn settle(&mut self) {
        self.elapsed_ms = self.duration_ms;
        self.phase = ReelPhase::Settled;
    }

    /// Force-finish for quick-stop. Returns true if the reel was in flight.
    pub fn force_settle(&mut self) -> bool {
        if self.phase == ReelPhase::Settled {
            return false;
        }
        self.settle();
        true
    }
}

/// What happened during one machine tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpinTickReport {
    /// Reels that settled on this tick, in index order
    pub settled_reels: Vec<u8>,
    /// True exactly once, on the tick the last reel settled
    pub completed: bool,
}

/// The timeline arena plus the global spin phase.
#[derive(Debug, Default)]
pub struct SpinMachine {
    timelines: Vec<ReelTimeline>,
    phase: SpinPhase,
}

impl SpinMachine {
    pub fn new() -> Self {
        Self {
            timelines: Vec::new(),
            phase: SpinPhase::Idle,
        }
    }

    pub fn phase(&self) -> SpinPhase {
        self.phase
    }

    pub fn is_spinning(&self) -> bool {
        self.phase == SpinPhase::Spinning
    }

    pub fn timelines(&self) -> &[ReelTimeline] {
        &self.timelines
    }

    /// Build one timeline per reel and enter `Spinning`.
    pub fn start(
        &mut self,
        current: &Grid,
        final_grid: &Grid,
        cell_height: f64,
        tuning: &SpinTuning,
        rng: &mut StdRng,
    ) {
        let empty: Vec<String> = Vec::new();
        self.timelines = (0..final_grid.reels())
            .map(|reel| {
                let current_column = current.column(reel).unwrap_or(&empty);
                let final_column = final_grid.column(reel).unwrap_or(&empty);
                ReelTimeline::new(
                    reel as u8,
                    current_column,
                    final_column,
                    cell_height,
                    tuning,
                    rng,
                )
            })
            .collect();
        self.phase = SpinPhase::Spinning;
    }

    /// Advance all reels by `dt_ms`.
    pub fn tick(&mut self, dt_ms: f64) -> SpinTickReport {
        if self.phase != SpinPhase::Spinning {
            return SpinTickReport::default();
        }
        let mut report = SpinTickReport::default();
        for timeline in &mut self.timelines {
            if timeline.tick(dt_ms) {
                report.settled_reels.push(timeline.reel_index);
            }
        }
        report.completed = self.check_complete();
        report
    }

    /// Cancel: one pass over the arena forcing every reel to its final
    /// offset, then the same completion check a natural finish uses.
    pub fn quick_stop(&mut self) -> SpinTickReport {
        if self.phase != SpinPhase::Spinning {
            return SpinTickReport::default();
        }
        let mut report = SpinTickReport::default();
        for timeline in &mut self.timelines {
            if timeline.force_settle() {
                report.settled_reels.push(timeline.reel_index);
            }
        }
        report.completed = self.check_complete();
        report
    }

    /// Shared completion path: transitions to `Complete` exactly once.
    fn check_complete(&mut self) -> bool {
        if self.phase == SpinPhase::Spinning
            && self.timelines.iter().all(|t| t.phase() == ReelPhase::Settled)
        {
            self.phase = SpinPhase::Complete;
            return true;
        }
        false
    }

    /// Return to idle after downstream work has run.
    pub fn reset(&mut self) {
        self.timelines.clear();
        self.phase = SpinPhase::Idle;
    }
}
