//! Easing functions for reel motion

use serde::{Deserialize, Serialize};

/// Easing curve applied to a reel's normalized progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    Linear,
    QuadOut,
    #[default]
    CubicOut,
    QuartOut,
    /// Overshoots slightly past 1.0 before settling
    BackOut,
}

impl Easing {
    /// Map normalized time `t` in [0,1] to eased progress.
    ///
    /// `apply(1.0)` is exactly 1.0 for every curve, so the settle snap is
    /// pixel-exact.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        if t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }
        match self {
            Easing::Linear => t,
            Easing::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::CubicOut => 1.0 - (1.0 - t).powi(3),
            Easing::QuartOut => 1.0 - (1.0 - t).powi(4),
            Easing::BackOut => {
                const C1: f64 = 1.70158;
                const C3: f64 = C1 + 1.0;
                let u = t - 1.0;
                1.0 + C3 * u.powi(3) + C1 * u.powi(2)
            }
        }
    }
}
