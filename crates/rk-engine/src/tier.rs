//! Win-tier classification and the particle budget

use serde::{Deserialize, Serialize};

use rk_stage::WinTier;

use crate::config::{ParticleTuning, WinTierThresholds};

/// Classify a win against the configured tier thresholds.
///
/// Thresholds are win/bet multipliers checked descending with `>=`, so a
/// multiplier exactly on a boundary lands in the higher tier.
pub fn classify(bet_amount: f64, win_amount: f64, thresholds: &WinTierThresholds) -> WinTier {
    if win_amount <= 0.0 || bet_amount <= 0.0 {
        return WinTier::Small;
    }
    let multiplier = win_amount / bet_amount;
    if multiplier >= thresholds.super_win {
        WinTier::Super
    } else if multiplier >= thresholds.mega_win {
        WinTier::Mega
    } else if multiplier >= thresholds.big_win {
        WinTier::Big
    } else {
        WinTier::Small
    }
}

/// Spawn count for one particle type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleBudget {
    pub kind: String,
    pub count: u32,
}

/// Compute the per-type particle counts for a celebration.
///
/// Each type contributes `base / num_types * density%`. When the sum would
/// exceed the cap, every contribution is scaled by `cap / total` so relative
/// weighting survives the clamp.
pub fn budget_particles(tier: WinTier, tuning: &ParticleTuning) -> Vec<ParticleBudget> {
    if tuning.types.is_empty() {
        return Vec::new();
    }

    let base = match tier {
        WinTier::Small => tuning.base_small,
        WinTier::Big => tuning.base_big,
        WinTier::Mega => tuning.base_mega,
        WinTier::Super => tuning.base_super,
    } as f64;
    let per_type = base / tuning.types.len() as f64;

    let raw: Vec<f64> = tuning
        .types
        .iter()
        .map(|t| per_type * (t.density.max(0.0) / 100.0))
        .collect();
    let total: f64 = raw.iter().sum();

    let scale = if total > tuning.cap as f64 {
        tuning.cap as f64 / total
    } else {
        1.0
    };

    tuning
        .types
        .iter()
        .zip(raw)
        .map(|(t, count)| ParticleBudget {
            kind: t.kind.clone(),
            count: (count * scale).floor() as u32,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParticleTypeConfig;

    fn thresholds() -> WinTierThresholds {
        WinTierThresholds::default()
    }

    #[test]
    fn test_classify_boundaries() {
        let t = thresholds();
        assert_eq!(classify(10.0, 0.0, &t), WinTier::Small);
        assert_eq!(classify(10.0, 49.0, &t), WinTier::Small);
        assert_eq!(classify(10.0, 50.0, &t), WinTier::Big); // exactly 5x
        assert_eq!(classify(10.0, 250.0, &t), WinTier::Mega); // 25x, below super
        assert_eq!(classify(10.0, 1000.0, &t), WinTier::Super); // exactly 100x
    }

    #[test]
    fn test_classify_monotone() {
        let t = thresholds();
        let mut prev = WinTier::Small;
        for win in (0..2000).map(|i| i as f64) {
            let tier = classify(10.0, win, &t);
            assert!(tier >= prev, "tier dropped at win {}", win);
            prev = tier;
        }
    }

    fn tuning(types: &[(&str, f64)], base_super: u32) -> ParticleTuning {
        ParticleTuning {
            cap: 1000,
            types: types
                .iter()
                .map(|(kind, density)| ParticleTypeConfig {
                    kind: kind.to_string(),
                    density: *density,
                })
                .collect(),
            base_small: 150,
            base_big: 450,
            base_mega: 900,
            base_super,
        }
    }

    #[test]
    fn test_budget_under_cap_unscaled() {
        let tuning = tuning(&[("coin", 100.0), ("star", 50.0)], 1400);
        let budget = budget_particles(WinTier::Big, &tuning);
        // 450 / 2 types: coin 225, star 112
        assert_eq!(budget[0].count, 225);
        assert_eq!(budget[1].count, 112);
    }

    #[test]
    fn test_budget_capped_proportionally() {
        let tuning = tuning(&[("coin", 100.0), ("star", 100.0)], 1400);
        let budget = budget_particles(WinTier::Super, &tuning);
        let total: u32 = budget.iter().map(|b| b.count).sum();
        assert!(total <= 1000);
        // Equal densities stay equal after scaling
        assert_eq!(budget[0].count, budget[1].count);
        // Scale is 1000/1400; each raw 700 becomes 500
        assert_eq!(budget[0].count, 500);
    }

    #[test]
    fn test_budget_preserves_proportions_under_cap() {
        let tuning = tuning(&[("coin", 100.0), ("star", 50.0)], 2800);
        let budget = budget_particles(WinTier::Super, &tuning);
        let total: u32 = budget.iter().map(|b| b.count).sum();
        assert!(total <= 1000);
        // 2:1 density ratio survives the clamp within rounding
        let ratio = budget[0].count as f64 / budget[1].count as f64;
        assert!((ratio - 2.0).abs() < 0.02);
    }

    #[test]
    fn test_budget_empty_types() {
        let tuning = tuning(&[], 1400);
        assert!(budget_particles(WinTier::Mega, &tuning).is_empty());
    }

    #[test]
    fn test_budget_never_exceeds_cap_across_tiers() {
        let tuning = tuning(&[("a", 100.0), ("b", 100.0), ("c", 100.0)], 5000);
        for tier in [WinTier::Small, WinTier::Big, WinTier::Mega, WinTier::Super] {
            let total: u32 = budget_particles(tier, &tuning).iter().map(|b| b.count).sum();
            assert!(total <= tuning.cap, "{:?} exceeded cap", tier);
        }
    }
}
