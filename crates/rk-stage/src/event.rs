//! StageEvent — a stage occurrence with timing and payload

use serde::{Deserialize, Serialize};

use crate::stage::Stage;

/// A stage event positioned on the spin presentation timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageEvent {
    /// The canonical stage
    pub stage: Stage,

    /// Timestamp in milliseconds from the start of the spin
    pub timestamp_ms: f64,

    /// Additional payload data
    #[serde(default)]
    pub payload: StagePayload,
}

impl StageEvent {
    /// Create a new stage event
    pub fn new(stage: Stage, timestamp_ms: f64) -> Self {
        Self {
            stage,
            timestamp_ms,
            payload: StagePayload::default(),
        }
    }

    /// Create with payload
    pub fn with_payload(stage: Stage, timestamp_ms: f64, payload: StagePayload) -> Self {
        Self {
            stage,
            timestamp_ms,
            payload,
        }
    }

    /// Get stage type name
    pub fn type_name(&self) -> &'static str {
        self.stage.type_name()
    }
}

/// Sort a batch of events by timestamp.
///
/// Events are generated grouped by concern (reel stops, win reveal, bonus),
/// which does not always match timeline order; consumers require a sorted
/// stream.
pub fn sort_by_timestamp(events: &mut [StageEvent]) {
    events.sort_by(|a, b| {
        a.timestamp_ms
            .partial_cmp(&b.timestamp_ms)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

/// Additional payload data for a stage event
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StagePayload {
    /// Total win amount
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub win_amount: Option<f64>,

    /// Bet amount (for ratio calculations)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bet_amount: Option<f64>,

    /// Win-to-bet ratio
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub win_ratio: Option<f64>,

    /// Spins remaining in a feature
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spins_remaining: Option<u32>,

    /// Full reel grid (reels × rows) at this stage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid: Option<Vec<Vec<String>>>,

    /// Arbitrary JSON for engine-specific data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom: Option<serde_json::Value>,
}

impl StagePayload {
    /// Create empty payload
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with win data
    pub fn with_win(win_amount: f64, bet_amount: Option<f64>) -> Self {
        let win_ratio = bet_amount.map(|bet| if bet > 0.0 { win_amount / bet } else { 0.0 });

        Self {
            win_amount: Some(win_amount),
            bet_amount,
            win_ratio,
            ..Default::default()
        }
    }

    /// Builder: set spins remaining
    pub fn spins_remaining(mut self, spins: u32) -> Self {
        self.spins_remaining = Some(spins);
        self
    }

    /// Builder: attach the grid
    pub fn grid(mut self, grid: Vec<Vec<String>>) -> Self {
        self.grid = Some(grid);
        self
    }

    /// Builder: set custom data
    pub fn custom(mut self, data: serde_json::Value) -> Self {
        self.custom = Some(data);
        self
    }

    /// Calculate win ratio if both amounts are present
    pub fn calculate_ratio(&self) -> Option<f64> {
        match (self.win_amount, self.bet_amount) {
            (Some(win), Some(bet)) if bet > 0.0 => Some(win / bet),
            _ => None,
        }
    }
}
