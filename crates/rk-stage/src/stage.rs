//! Canonical stage taxonomy
//!
//! Every observable moment of a spin maps to exactly one `Stage` variant.
//! Presentation layers match on these instead of engine internals.

use serde::{Deserialize, Serialize};

/// Win size classification driving celebration intensity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinTier {
    Small,
    Big,
    Mega,
    Super,
}

impl WinTier {
    /// Display name for UI banners.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Small => "Win",
            Self::Big => "Big Win",
            Self::Mega => "Mega Win",
            Self::Super => "Super Win",
        }
    }

    /// Ordering index (higher = bigger celebration).
    pub fn index(&self) -> u8 {
        match self {
            Self::Small => 0,
            Self::Big => 1,
            Self::Mega => 2,
            Self::Super => 3,
        }
    }
}

/// Which bonus feature a trigger refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BonusKind {
    FreeSpins,
    Wheel,
    PickAndClick,
}

impl BonusKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::FreeSpins => "Free Spins",
            Self::Wheel => "Wheel Bonus",
            Self::PickAndClick => "Pick & Click",
        }
    }
}

/// A canonical stage in the spin presentation timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stage {
    /// Spin button accepted, reels about to move
    SpinStart,

    /// A reel entered its spinning loop
    ReelSpinning { reel_index: u8 },

    /// A reel settled on its final symbols
    ReelStop {
        reel_index: u8,
        symbols: Vec<String>,
    },

    /// Player cancelled the natural easing; all reels forced to final
    QuickStop,

    /// All reels settled, evaluation runs
    EvaluateWins,

    /// Total win revealed
    WinPresent { win_amount: f64, line_count: u8 },

    /// One winning betline highlighted
    WinLineShow { line_index: u8, line_amount: f64 },

    /// Tier celebration (particles, banner)
    TierCelebration { tier: WinTier, amount: f64 },

    /// A bonus feature was triggered by the final grid
    BonusTrigger { kind: BonusKind },

    /// Free spin mode entered
    FreeSpinsEnter { awarded: u32 },

    /// Remaining free spin count changed
    FreeSpinsUpdate { remaining: u32 },

    /// Free spin mode ended, accumulated total reported once
    FreeSpinsExit { total_win: f64 },

    /// Wheel bonus announcement phase
    WheelAnnounce,

    /// Wheel landed on a segment
    WheelResult { segment_index: u8, amount: f64 },

    /// A pick-and-click cell was revealed
    PickReveal { cell_index: u8, prize_amount: f64 },

    /// Bonus modal closed, engine resumes idle
    BonusComplete { kind: BonusKind, total_win: f64 },

    /// Spin fully presented, engine idle
    SpinEnd,
}

impl Stage {
    /// Stable type name for logging and audio cue routing.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::SpinStart => "SPIN_START",
            Self::ReelSpinning { .. } => "REEL_SPINNING",
            Self::ReelStop { .. } => "REEL_STOP",
            Self::QuickStop => "QUICK_STOP",
            Self::EvaluateWins => "EVALUATE_WINS",
            Self::WinPresent { .. } => "WIN_PRESENT",
            Self::WinLineShow { .. } => "WIN_LINE_SHOW",
            Self::TierCelebration { .. } => "TIER_CELEBRATION",
            Self::BonusTrigger { .. } => "BONUS_TRIGGER",
            Self::FreeSpinsEnter { .. } => "FREE_SPINS_ENTER",
            Self::FreeSpinsUpdate { .. } => "FREE_SPINS_UPDATE",
            Self::FreeSpinsExit { .. } => "FREE_SPINS_EXIT",
            Self::WheelAnnounce => "WHEEL_ANNOUNCE",
            Self::WheelResult { .. } => "WHEEL_RESULT",
            Self::PickReveal { .. } => "PICK_REVEAL",
            Self::BonusComplete { .. } => "BONUS_COMPLETE",
            Self::SpinEnd => "SPIN_END",
        }
    }

    /// Whether this stage belongs to a bonus feature timeline.
    pub fn is_bonus_stage(&self) -> bool {
        matches!(
            self,
            Self::BonusTrigger { .. }
                | Self::FreeSpinsEnter { .. }
                | Self::FreeSpinsUpdate { .. }
                | Self::FreeSpinsExit { .. }
                | Self::WheelAnnounce
                | Self::WheelResult { .. }
                | Self::PickReveal { .. }
                | Self::BonusComplete { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_ordering() {
        assert!(WinTier::Small < WinTier::Big);
        assert!(WinTier::Big < WinTier::Mega);
        assert!(WinTier::Mega < WinTier::Super);
        assert_eq!(WinTier::Super.index(), 3);
    }

    #[test]
    fn test_stage_type_names() {
        assert_eq!(Stage::SpinStart.type_name(), "SPIN_START");
        assert_eq!(
            Stage::ReelStop {
                reel_index: 2,
                symbols: vec!["low_1".into()]
            }
            .type_name(),
            "REEL_STOP"
        );
    }

    #[test]
    fn test_bonus_stage_classification() {
        assert!(Stage::WheelAnnounce.is_bonus_stage());
        assert!(Stage::FreeSpinsEnter { awarded: 10 }.is_bonus_stage());
        assert!(!Stage::SpinEnd.is_bonus_stage());
    }

    #[test]
    fn test_stage_serialization() {
        let stage = Stage::WinPresent {
            win_amount: 12.5,
            line_count: 3,
        };
        let json = serde_json::to_string(&stage).unwrap();
        assert!(json.contains("WIN_PRESENT"));

        let back: Stage = serde_json::from_str(&json).unwrap();
        assert_eq!(back, stage);
    }
}
