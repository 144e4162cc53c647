//! Wheel bonus: a timed announcement phase, then an interactive modal
//! that resolves to one segment.

use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::WheelConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WheelPhase {
    /// Announcement banner before the modal opens
    Announce,
    /// Modal open, waiting for the resolve command
    Modal,
    Resolved,
}

/// Result of a wheel resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelOutcome {
    pub segment_index: usize,
    /// Prize: segment multiplier × bet
    pub amount: f64,
}

/// One wheel-bonus instance.
#[derive(Debug, Clone)]
pub struct WheelBonus {
    segments: Vec<f64>,
    phase: WheelPhase,
    outcome: Option<WheelOutcome>,
    announce_remaining_ms: f64,
}

impl WheelBonus {
    pub fn new(config: &WheelConfig) -> Self {
        let segments = if config.segments.is_empty() {
            log::warn!("wheel configured with no segments; using defaults");
            WheelConfig::default().segments
        } else {
            config.segments.clone()
        };
        Self {
            segments,
            phase: WheelPhase::Announce,
            outcome: None,
            announce_remaining_ms: config.announce_ms.max(0.0),
        }
    }

    pub fn phase(&self) -> WheelPhase {
        self.phase
    }

    pub fn segments(&self) -> &[f64] {
        &self.segments
    }

    pub fn outcome(&self) -> Option<WheelOutcome> {
        self.outcome
    }

    /// Advance the announcement countdown. Returns true on the tick the
    /// modal opens.
    pub fn tick(&mut self, dt_ms: f64) -> bool {
        if self.phase != WheelPhase::Announce {
            return false;
        }
        self.announce_remaining_ms -= dt_ms;
        if self.announce_remaining_ms <= 0.0 {
            self.phase = WheelPhase::Modal;
            true
        } else {
            false
        }
    }

    /// Spin the wheel. Rejected while the announcement is still running;
    /// a second resolve returns the stored outcome.
    pub fn resolve(&mut self, bet: f64, rng: &mut StdRng) -> Option<WheelOutcome> {
        match self.phase {
            WheelPhase::Announce => {
                log::debug!("wheel resolve during announcement; ignored");
                None
            }
            WheelPhase::Resolved => self.outcome,
            WheelPhase::Modal => {
                let segment_index = rng.random_range(0..self.segments.len());
                let outcome = WheelOutcome {
                    segment_index,
                    amount: self.segments[segment_index] * bet,
                };
                self.phase = WheelPhase::Resolved;
                self.outcome = Some(outcome);
                Some(outcome)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_phases_advance_through_announcement() {
        let mut wheel = WheelBonus::new(&WheelConfig::default());
        assert_eq!(wheel.phase(), WheelPhase::Announce);

        assert!(!wheel.tick(500.0));
        assert_eq!(wheel.phase(), WheelPhase::Announce);
        assert!(wheel.tick(1000.0));
        assert_eq!(wheel.phase(), WheelPhase::Modal);

        let mut rng = StdRng::seed_from_u64(3);
        assert!(wheel.resolve(10.0, &mut rng).is_some());
        assert_eq!(wheel.phase(), WheelPhase::Resolved);
    }

    #[test]
    fn test_resolve_during_announcement_rejected() {
        let mut wheel = WheelBonus::new(&WheelConfig::default());
        let mut rng = StdRng::seed_from_u64(4);
        assert!(wheel.resolve(10.0, &mut rng).is_none());
        assert_eq!(wheel.phase(), WheelPhase::Announce);
    }

    #[test]
    fn test_resolve_pays_segment_times_bet() {
        let config = WheelConfig {
            enabled: true,
            segments: vec![2.0, 5.0, 10.0],
            ..WheelConfig::default()
        };
        let mut wheel = WheelBonus::new(&config);
        wheel.tick(10_000.0);
        let mut rng = StdRng::seed_from_u64(9);
        let outcome = wheel.resolve(4.0, &mut rng).unwrap();
        assert!(outcome.segment_index < 3);
        assert_eq!(outcome.amount, config.segments[outcome.segment_index] * 4.0);
    }

    #[test]
    fn test_double_resolve_is_stable() {
        let mut wheel = WheelBonus::new(&WheelConfig::default());
        wheel.tick(10_000.0);
        let mut rng = StdRng::seed_from_u64(5);
        let first = wheel.resolve(1.0, &mut rng);
        let second = wheel.resolve(1.0, &mut rng);
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_segments_fall_back() {
        let wheel = WheelBonus::new(&WheelConfig {
            enabled: true,
            segments: vec![],
            ..WheelConfig::default()
        });
        assert!(!wheel.segments().is_empty());
    }
}
