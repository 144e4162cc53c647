//! Engine configuration
//!
//! Everything is resolved eagerly at construction: serde defaults fill
//! missing fields, so runtime code never reaches through optionals.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::easing::Easing;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse engine config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Grid shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSpec {
    #[serde(default = "default_reels")]
    pub reels: u8,
    #[serde(default = "default_rows")]
    pub rows: u8,
}

fn default_reels() -> u8 {
    5
}
fn default_rows() -> u8 {
    3
}

impl Default for GridSpec {
    fn default() -> Self {
        Self { reels: 5, rows: 3 }
    }
}

/// Reel motion timing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpinTuning {
    /// Base spin duration for reel 0, in ms
    pub base_duration_ms: f64,
    /// Extra duration per reel index, in ms
    pub stagger_ms: f64,
    /// Cells of filler tape scrolled past before the final column
    pub spin_cells: u32,
    pub easing: Easing,
    /// Per-line reveal duration in sequential-reveal mode, ms
    pub reveal_speed_ms: f64,
    /// Pause between revealed lines, ms
    pub reveal_pause_ms: f64,
    /// Reveal win lines one at a time rather than all at once
    pub sequential_reveal: bool,
}

impl Default for SpinTuning {
    fn default() -> Self {
        Self {
            base_duration_ms: 1200.0,
            stagger_ms: 250.0,
            spin_cells: 24,
            easing: Easing::CubicOut,
            reveal_speed_ms: 600.0,
            reveal_pause_ms: 200.0,
            sequential_reveal: true,
        }
    }
}

/// Win-tier boundaries as win/bet multipliers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WinTierThresholds {
    pub big_win: f64,
    pub mega_win: f64,
    pub super_win: f64,
}

impl Default for WinTierThresholds {
    fn default() -> Self {
        Self {
            big_win: 5.0,
            mega_win: 25.0,
            super_win: 100.0,
        }
    }
}

/// Free-spins feature parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FreeSpinsConfig {
    pub enabled: bool,
    /// Spins awarded on trigger
    pub award_count: u32,
    pub can_retrigger: bool,
    /// Spins added on retrigger
    pub retrigger_spins: u32,
    /// Scatter count required to trigger
    pub trigger_count: u32,
    /// Presentation delay before the feature closes, ms
    pub end_delay_ms: f64,
}

impl Default for FreeSpinsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            award_count: 10,
            can_retrigger: true,
            retrigger_spins: 5,
            trigger_count: 3,
            end_delay_ms: 1500.0,
        }
    }
}

/// Wheel-bonus parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WheelConfig {
    pub enabled: bool,
    /// Prize multipliers, one per wheel segment
    pub segments: Vec<f64>,
    /// Announcement banner duration before the modal opens, ms
    pub announce_ms: f64,
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            segments: vec![2.0, 5.0, 10.0, 2.0, 25.0, 5.0, 50.0, 10.0],
            announce_ms: 1200.0,
        }
    }
}

/// Pick-and-click bonus parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickConfig {
    pub enabled: bool,
    pub rows: u8,
    pub cols: u8,
    /// Prize multipliers drawn into the hidden grid; zero means "collect"
    pub prizes: Vec<f64>,
}

impl Default for PickConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            rows: 3,
            cols: 4,
            prizes: vec![1.0, 2.0, 3.0, 5.0, 10.0, 0.0],
        }
    }
}

/// One particle type in the celebration schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleTypeConfig {
    pub kind: String,
    /// Density percentage, 100 = full weight
    #[serde(default = "default_density")]
    pub density: f64,
}

fn default_density() -> f64 {
    100.0
}

/// Particle budget tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleTuning {
    /// Hard cap on total spawned particles
    pub cap: u32,
    pub types: Vec<ParticleTypeConfig>,
    /// Base counts per tier: small, big, mega, super
    pub base_small: u32,
    pub base_big: u32,
    pub base_mega: u32,
    pub base_super: u32,
}

impl Default for ParticleTuning {
    fn default() -> Self {
        Self {
            cap: 1000,
            types: vec![
                ParticleTypeConfig {
                    kind: "coin".to_string(),
                    density: 100.0,
                },
                ParticleTypeConfig {
                    kind: "star".to_string(),
                    density: 60.0,
                },
                ParticleTypeConfig {
                    kind: "confetti".to_string(),
                    density: 80.0,
                },
            ],
            base_small: 150,
            base_big: 450,
            base_mega: 900,
            base_super: 1400,
        }
    }
}

/// Full engine configuration.
///
/// `betline_patterns` and `paytable` are raw configured values; the engine
/// resolves them through [`crate::paytable`] at construction.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub grid: GridSpec,
    pub betlines: BetlineConfig,
    /// Configured paytable, used verbatim when well-formed
    pub paytable: Option<HashMap<String, HashMap<u8, f64>>>,
    pub spin: SpinTuning,
    pub tiers: WinTierThresholds,
    pub free_spins: FreeSpinsConfig,
    pub wheel: WheelConfig,
    pub pick: PickConfig,
    pub particles: ParticleTuning,
    /// Default bet amount
    pub bet: f64,
}

/// Betline count and optional explicit patterns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BetlineConfig {
    pub count: u32,
    /// Row index per reel, one vec per betline
    pub patterns: Vec<Vec<u8>>,
}

impl Default for BetlineConfig {
    fn default() -> Self {
        Self {
            count: 20,
            patterns: Vec::new(),
        }
    }
}

impl EngineConfig {
    /// Parse from JSON; missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_json::from_str(json)?;
        config.normalize();
        Ok(config)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Clamp out-of-range values to workable defaults.
    pub fn normalize(&mut self) {
        if self.grid.reels == 0 {
            log::warn!("grid.reels of 0 is unusable; using 5");
            self.grid.reels = 5;
        }
        if self.grid.rows == 0 {
            log::warn!("grid.rows of 0 is unusable; using 3");
            self.grid.rows = 3;
        }
        if self.betlines.count == 0 {
            self.betlines.count = 1;
        }
        if !(self.bet > 0.0) {
            self.bet = 1.0;
        }
        if self.particles.cap == 0 {
            self.particles.cap = 1000;
        }
    }
}
