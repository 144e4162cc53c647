//! Free-spins accounting
//!
//! The counter decrements before each spin's evaluation. When it reaches
//! zero the feature stays open for a short presentation delay, then closes
//! and reports the single accumulated total.

use crate::config::FreeSpinsConfig;

/// What a tick of free-spin bookkeeping produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FreeSpinsTick {
    /// Nothing to report
    Idle,
    /// The end delay elapsed; the feature is over with this total win
    Ended { total_win: f64 },
}

/// Free-spin mode state, persistent across spins while active.
#[derive(Debug, Clone, Default)]
pub struct FreeSpinsState {
    active: bool,
    remaining: u32,
    total_win: f64,
    /// Countdown to close once the last spin has been evaluated, in ms
    end_countdown_ms: Option<f64>,
}

impl FreeSpinsState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn total_win(&self) -> f64 {
        self.total_win
    }

    /// Enter free-spin mode with the configured award.
    pub fn start(&mut self, award_count: u32) {
        self.active = true;
        self.remaining = award_count;
        self.total_win = 0.0;
        self.end_countdown_ms = None;
    }

    /// Extend an active feature. Caller checks the retrigger rule.
    pub fn retrigger(&mut self, extra_spins: u32) {
        if self.active {
            self.remaining += extra_spins;
            self.end_countdown_ms = None;
        }
    }

    /// Consume one spin, before its evaluation. Returns false when no
    /// spins remain.
    pub fn begin_spin(&mut self) -> bool {
        if !self.active || self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }

    /// Accumulate a spin's winnings into the feature total.
    pub fn add_win(&mut self, amount: f64) {
        if self.active {
            self.total_win += amount;
        }
    }

    /// Called after evaluation; arms the end delay once no spins remain.
    pub fn after_evaluation(&mut self, config: &FreeSpinsConfig) {
        if self.active && self.remaining == 0 && self.end_countdown_ms.is_none() {
            self.end_countdown_ms = Some(config.end_delay_ms.max(0.0));
        }
    }

    /// Advance the end delay. Closing resets the state.
    pub fn tick(&mut self, dt_ms: f64) -> FreeSpinsTick {
        let Some(countdown) = self.end_countdown_ms.as_mut() else {
            return FreeSpinsTick::Idle;
        };
        *countdown -= dt_ms;
        if *countdown > 0.0 {
            return FreeSpinsTick::Idle;
        }
        let total_win = self.total_win;
        *self = Self::default();
        FreeSpinsTick::Ended { total_win }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> FreeSpinsConfig {
        FreeSpinsConfig::default()
    }

    #[test]
    fn test_start_and_decrement() {
        let mut state = FreeSpinsState::new();
        state.start(10);
        assert!(state.is_active());
        assert!(state.begin_spin());
        assert_eq!(state.remaining(), 9);
    }

    #[test]
    fn test_retrigger_extends() {
        let mut state = FreeSpinsState::new();
        state.start(2);
        state.begin_spin();
        state.retrigger(5);
        assert_eq!(state.remaining(), 6);
    }

    #[test]
    fn test_end_after_delay_reports_total() {
        let mut state = FreeSpinsState::new();
        state.start(1);
        assert!(state.begin_spin());
        state.add_win(120.0);
        state.after_evaluation(&config());

        // Delay has not yet elapsed
        assert_eq!(state.tick(500.0), FreeSpinsTick::Idle);
        assert!(state.is_active());

        assert_eq!(
            state.tick(1200.0),
            FreeSpinsTick::Ended { total_win: 120.0 }
        );
        assert!(!state.is_active());
    }

    #[test]
    fn test_retrigger_disarms_pending_end() {
        let mut state = FreeSpinsState::new();
        state.start(1);
        state.begin_spin();
        state.after_evaluation(&config());
        state.retrigger(3);
        assert_eq!(state.tick(10_000.0), FreeSpinsTick::Idle);
        assert_eq!(state.remaining(), 3);
    }

    #[test]
    fn test_begin_spin_when_exhausted() {
        let mut state = FreeSpinsState::new();
        state.start(1);
        assert!(state.begin_spin());
        assert!(!state.begin_spin());
    }
}
