//! Bonus coordinator
//!
//! Runs once per completed spin, strictly after win evaluation. While a
//! bonus modal is open the engine is suspended; spin commands are rejected
//! until the modal resolves.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use rk_stage::BonusKind;

use crate::bonus::free_spins::FreeSpinsState;
use crate::bonus::pick::{PickBonus, PickResult};
use crate::bonus::wheel::{WheelBonus, WheelOutcome};
use crate::config::EngineConfig;
use crate::grid::Grid;
use crate::symbols::{BONUS, SCATTER};

/// A bonus trigger produced by inspecting a settled grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BonusTrigger {
    FreeSpins { awarded: u32, retrigger: bool },
    Wheel,
    PickAndClick,
}

impl BonusTrigger {
    pub fn kind(&self) -> BonusKind {
        match self {
            BonusTrigger::FreeSpins { .. } => BonusKind::FreeSpins,
            BonusTrigger::Wheel => BonusKind::Wheel,
            BonusTrigger::PickAndClick => BonusKind::PickAndClick,
        }
    }
}

/// A closed modal's final accounting.
#[derive(Debug, Clone, PartialEq)]
pub struct ModalSettled {
    pub kind: BonusKind,
    pub total_win: f64,
}

#[derive(Debug)]
enum ActiveModal {
    Wheel(WheelBonus),
    Pick(PickBonus),
}

impl ActiveModal {
    fn kind(&self) -> BonusKind {
        match self {
            ActiveModal::Wheel(_) => BonusKind::Wheel,
            ActiveModal::Pick(_) => BonusKind::PickAndClick,
        }
    }
}

/// Owns free-spin state and the modal queue.
#[derive(Debug, Default)]
pub struct BonusCoordinator {
    free_spins: FreeSpinsState,
    active: Option<ActiveModal>,
    queued: VecDeque<ActiveModal>,
}

impl BonusCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn free_spins(&self) -> &FreeSpinsState {
        &self.free_spins
    }

    pub fn free_spins_mut(&mut self) -> &mut FreeSpinsState {
        &mut self.free_spins
    }

    /// A modal is open; the spin loop is held.
    pub fn is_suspended(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_modal_kind(&self) -> Option<BonusKind> {
        self.active.as_ref().map(ActiveModal::kind)
    }

    /// Inspect the settled grid and fire the configured triggers.
    ///
    /// Wheel and pick-and-click are independently triggerable from the
    /// same bonus-symbol count; when both fire, the wheel modal opens
    /// first and the pick modal is queued behind it.
    pub fn on_spin_complete(
        &mut self,
        grid: &Grid,
        config: &EngineConfig,
        bet: f64,
        rng: &mut StdRng,
    ) -> Vec<BonusTrigger> {
        let mut triggers = Vec::new();

        let scatters = grid.count_symbol(SCATTER);
        let fs = &config.free_spins;
        if fs.enabled && scatters as u32 >= fs.trigger_count {
            if !self.free_spins.is_active() {
                self.free_spins.start(fs.award_count);
                triggers.push(BonusTrigger::FreeSpins {
                    awarded: fs.award_count,
                    retrigger: false,
                });
            } else if fs.can_retrigger {
                self.free_spins.retrigger(fs.retrigger_spins);
                triggers.push(BonusTrigger::FreeSpins {
                    awarded: fs.retrigger_spins,
                    retrigger: true,
                });
            } else {
                log::debug!("scatter trigger during active free spins; retrigger disabled");
            }
        }

        let bonuses = grid.count_symbol(BONUS);
        if bonuses >= 3 {
            if config.wheel.enabled {
                self.enqueue(ActiveModal::Wheel(WheelBonus::new(&config.wheel)));
                triggers.push(BonusTrigger::Wheel);
            }
            if config.pick.enabled {
                self.enqueue(ActiveModal::Pick(PickBonus::new(&config.pick, bet, rng)));
                triggers.push(BonusTrigger::PickAndClick);
            }
        }

        triggers
    }

    fn enqueue(&mut self, modal: ActiveModal) {
        if self.active.is_none() {
            self.active = Some(modal);
        } else {
            self.queued.push_back(modal);
        }
    }

    /// Advance the active modal's announcement countdown.
    pub fn tick(&mut self, dt_ms: f64) {
        if let Some(ActiveModal::Wheel(wheel)) = self.active.as_mut() {
            wheel.tick(dt_ms);
        }
    }

    /// Resolve the open wheel modal. Rejected while the announcement is
    /// still running; concluding the feature closes the modal and promotes
    /// the next queued one.
    pub fn resolve_wheel(&mut self, bet: f64, rng: &mut StdRng) -> Option<WheelOutcome> {
        match self.active.as_mut() {
            Some(ActiveModal::Wheel(wheel)) => {
                let outcome = wheel.resolve(bet, rng)?;
                self.close_active();
                Some(outcome)
            }
            _ => {
                log::debug!("wheel resolve with no wheel modal open; ignored");
                None
            }
        }
    }

    /// Pick a cell in the open pick-and-click modal. A concluding result
    /// closes the modal.
    pub fn pick_cell(&mut self, index: usize) -> Option<PickResult> {
        match self.active.as_mut() {
            Some(ActiveModal::Pick(pick)) => {
                let result = pick.pick(index);
                if pick.is_finished() {
                    self.close_active();
                }
                Some(result)
            }
            _ => {
                log::debug!("pick with no pick modal open; ignored");
                None
            }
        }
    }

    /// Explicitly close the open modal (user dismissal). Returns what the
    /// modal had accumulated.
    pub fn close_modal(&mut self) -> Option<ModalSettled> {
        let modal = self.active.take()?;
        let settled = match &modal {
            ActiveModal::Wheel(wheel) => ModalSettled {
                kind: BonusKind::Wheel,
                total_win: wheel.outcome().map_or(0.0, |o| o.amount),
            },
            ActiveModal::Pick(pick) => ModalSettled {
                kind: BonusKind::PickAndClick,
                total_win: pick.total_win(),
            },
        };
        self.active = self.queued.pop_front();
        Some(settled)
    }

    fn close_active(&mut self) {
        self.active = self.queued.pop_front();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(21)
    }

    fn grid_with(symbol: &str, count: usize) -> Grid {
        let mut cells: Vec<String> = vec!["low_3".to_string(); 15];
        for cell in cells.iter_mut().take(count) {
            *cell = symbol.to_string();
        }
        Grid::from_columns(cells.chunks(3).map(|c| c.to_vec()).collect())
    }

    #[test]
    fn test_three_scatters_start_free_spins() {
        let mut coord = BonusCoordinator::new();
        let config = EngineConfig::default();
        let triggers =
            coord.on_spin_complete(&grid_with("scatter", 3), &config, 1.0, &mut rng());
        assert_eq!(
            triggers,
            vec![BonusTrigger::FreeSpins {
                awarded: 10,
                retrigger: false
            }]
        );
        assert!(coord.free_spins().is_active());
        assert_eq!(coord.free_spins().remaining(), 10);
    }

    #[test]
    fn test_two_scatters_no_trigger() {
        let mut coord = BonusCoordinator::new();
        let config = EngineConfig::default();
        let triggers =
            coord.on_spin_complete(&grid_with("scatter", 2), &config, 1.0, &mut rng());
        assert!(triggers.is_empty());
    }

    #[test]
    fn test_retrigger_respects_rule() {
        let mut coord = BonusCoordinator::new();
        let mut config = EngineConfig::default();
        let grid = grid_with("scatter", 3);
        coord.on_spin_complete(&grid, &config, 1.0, &mut rng());

        config.free_spins.can_retrigger = false;
        let triggers = coord.on_spin_complete(&grid, &config, 1.0, &mut rng());
        assert!(triggers.is_empty());
        assert_eq!(coord.free_spins().remaining(), 10);

        config.free_spins.can_retrigger = true;
        let triggers = coord.on_spin_complete(&grid, &config, 1.0, &mut rng());
        assert_eq!(
            triggers,
            vec![BonusTrigger::FreeSpins {
                awarded: 5,
                retrigger: true
            }]
        );
        assert_eq!(coord.free_spins().remaining(), 15);
    }

    #[test]
    fn test_both_modals_trigger_from_one_count() {
        let mut coord = BonusCoordinator::new();
        let mut config = EngineConfig::default();
        config.wheel.enabled = true;
        config.pick.enabled = true;

        let triggers =
            coord.on_spin_complete(&grid_with("bonus", 3), &config, 1.0, &mut rng());
        assert_eq!(triggers, vec![BonusTrigger::Wheel, BonusTrigger::PickAndClick]);
        assert!(coord.is_suspended());
        assert_eq!(coord.active_modal_kind(), Some(BonusKind::Wheel));
    }

    #[test]
    fn test_wheel_resolve_promotes_queued_pick() {
        let mut coord = BonusCoordinator::new();
        let mut config = EngineConfig::default();
        config.wheel.enabled = true;
        config.pick.enabled = true;
        let mut rng = rng();
        coord.on_spin_complete(&grid_with("bonus", 4), &config, 2.0, &mut rng);

        // Announcement still running: resolve is a rejected no-op
        assert!(coord.resolve_wheel(2.0, &mut rng).is_none());
        assert_eq!(coord.active_modal_kind(), Some(BonusKind::Wheel));

        coord.tick(2000.0);
        let outcome = coord.resolve_wheel(2.0, &mut rng).unwrap();
        assert!(outcome.amount > 0.0);
        // Pick modal takes over; still suspended
        assert_eq!(coord.active_modal_kind(), Some(BonusKind::PickAndClick));
        assert!(coord.is_suspended());
    }

    #[test]
    fn test_close_modal_unsuspends() {
        let mut coord = BonusCoordinator::new();
        let mut config = EngineConfig::default();
        config.wheel.enabled = true;
        let mut rng = rng();
        coord.on_spin_complete(&grid_with("bonus", 3), &config, 1.0, &mut rng);

        let settled = coord.close_modal().unwrap();
        assert_eq!(settled.kind, BonusKind::Wheel);
        assert!(!coord.is_suspended());
    }

    #[test]
    fn test_resolve_wheel_without_modal() {
        let mut coord = BonusCoordinator::new();
        assert!(coord.resolve_wheel(1.0, &mut rng()).is_none());
    }

    #[test]
    fn test_pick_feature_conclusion_closes_modal() {
        let mut coord = BonusCoordinator::new();
        let mut config = EngineConfig::default();
        config.pick.enabled = true;
        config.pick.rows = 1;
        config.pick.cols = 2;
        config.pick.prizes = vec![3.0];
        let mut rng = rng();
        coord.on_spin_complete(&grid_with("bonus", 3), &config, 1.0, &mut rng);

        assert!(matches!(coord.pick_cell(0), Some(PickResult::Revealed { .. })));
        assert!(coord.is_suspended());
        assert!(matches!(coord.pick_cell(1), Some(PickResult::Exhausted { .. })));
        assert!(!coord.is_suspended());
    }
}
