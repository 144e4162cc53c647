//! Stage-trace generation for a completed spin
//!
//! Produces the presentation timeline as [`StageEvent`]s. Events are
//! generated grouped by concern and sorted by timestamp before they are
//! returned; win-line reveals follow evaluation order.

use rk_stage::{sort_by_timestamp, BonusKind, Stage, StageEvent, StagePayload, WinTier};

use crate::bonus::BonusTrigger;
use crate::config::SpinTuning;
use crate::evaluate::GridResult;
use crate::grid::Grid;

/// Pause after the last reel stops before evaluation shows, ms.
const EVALUATE_GAP_MS: f64 = 150.0;
/// Celebration runs after the line reveals, ms.
const CELEBRATION_GAP_MS: f64 = 300.0;

/// Build the sorted stage trace for one settled spin.
pub fn generate_spin_stages(
    final_grid: &Grid,
    result: &GridResult,
    win_tier: WinTier,
    triggers: &[BonusTrigger],
    tuning: &SpinTuning,
    bet: f64,
) -> Vec<StageEvent> {
    let mut events = Vec::new();

    events.push(StageEvent::new(Stage::SpinStart, 0.0));
    for reel in 0..final_grid.reels() {
        events.push(StageEvent::new(
            Stage::ReelSpinning {
                reel_index: reel as u8,
            },
            0.0,
        ));
    }

    let mut last_stop = 0.0;
    for reel in 0..final_grid.reels() {
        let at = tuning.base_duration_ms + reel as f64 * tuning.stagger_ms;
        last_stop = at;
        events.push(StageEvent::with_payload(
            Stage::ReelStop {
                reel_index: reel as u8,
                symbols: final_grid.column(reel).map(<[String]>::to_vec).unwrap_or_default(),
            },
            at,
            StagePayload::new(),
        ));
    }

    let evaluate_at = last_stop + EVALUATE_GAP_MS;
    events.push(StageEvent::with_payload(
        Stage::EvaluateWins,
        evaluate_at,
        StagePayload::new().grid(final_grid.to_columns()),
    ));

    let mut cursor = evaluate_at;
    if result.total_win > 0.0 {
        events.push(StageEvent::with_payload(
            Stage::WinPresent {
                win_amount: result.total_win,
                line_count: result.win_details.len().min(u8::MAX as usize) as u8,
            },
            cursor,
            StagePayload::with_win(result.total_win, Some(bet)),
        ));

        let step = if tuning.sequential_reveal {
            tuning.reveal_speed_ms + tuning.reveal_pause_ms
        } else {
            0.0
        };
        for (i, detail) in result.win_details.iter().enumerate() {
            events.push(StageEvent::new(
                Stage::WinLineShow {
                    line_index: detail.line,
                    line_amount: detail.amount,
                },
                evaluate_at + i as f64 * step,
            ));
        }
        cursor = evaluate_at + result.win_details.len().saturating_sub(1) as f64 * step;

        if win_tier > WinTier::Small {
            cursor += CELEBRATION_GAP_MS;
            events.push(StageEvent::with_payload(
                Stage::TierCelebration {
                    tier: win_tier,
                    amount: result.total_win,
                },
                cursor,
                StagePayload::with_win(result.total_win, Some(bet)),
            ));
        }
    }

    for trigger in triggers {
        cursor += CELEBRATION_GAP_MS;
        events.push(StageEvent::new(
            Stage::BonusTrigger {
                kind: trigger.kind(),
            },
            cursor,
        ));
        match trigger {
            BonusTrigger::FreeSpins { awarded, retrigger } if !*retrigger => {
                events.push(StageEvent::with_payload(
                    Stage::FreeSpinsEnter { awarded: *awarded },
                    cursor,
                    StagePayload::new().spins_remaining(*awarded),
                ));
            }
            BonusTrigger::Wheel => {
                // The wheel opens with an announcement banner
                events.push(StageEvent::new(Stage::WheelAnnounce, cursor));
            }
            _ => {}
        }
    }

    events.push(StageEvent::new(Stage::SpinEnd, cursor + CELEBRATION_GAP_MS));

    sort_by_timestamp(&mut events);
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluate::WinDetail;

    fn tuning() -> SpinTuning {
        SpinTuning::default()
    }

    fn grid() -> Grid {
        Grid::filled(5, 3, "low_2")
    }

    fn winning_result() -> GridResult {
        let detail = |line: u8, amount: f64| WinDetail {
            line,
            symbols: vec!["high_1".into(); 5],
            positions: vec![(0, 0), (1, 0), (2, 0)],
            count: 3,
            symbol: "high_1".into(),
            amount,
        };
        GridResult {
            total_win: 30.0,
            win_details: vec![detail(0, 10.0), detail(4, 20.0)],
        }
    }

    #[test]
    fn test_trace_sorted_and_bracketed() {
        let events = generate_spin_stages(
            &grid(),
            &winning_result(),
            WinTier::Big,
            &[],
            &tuning(),
            10.0,
        );
        assert_eq!(events.first().unwrap().stage, Stage::SpinStart);
        assert_eq!(events.last().unwrap().stage, Stage::SpinEnd);
        for pair in events.windows(2) {
            assert!(pair[0].timestamp_ms <= pair[1].timestamp_ms);
        }
    }

    #[test]
    fn test_reel_stops_staggered() {
        let events = generate_spin_stages(
            &grid(),
            &GridResult::zero(),
            WinTier::Small,
            &[],
            &tuning(),
            10.0,
        );
        let stops: Vec<f64> = events
            .iter()
            .filter(|e| matches!(e.stage, Stage::ReelStop { .. }))
            .map(|e| e.timestamp_ms)
            .collect();
        assert_eq!(stops.len(), 5);
        for pair in stops.windows(2) {
            assert_eq!(pair[1] - pair[0], tuning().stagger_ms);
        }
    }

    #[test]
    fn test_sequential_reveal_spacing() {
        let events = generate_spin_stages(
            &grid(),
            &winning_result(),
            WinTier::Big,
            &[],
            &tuning(),
            10.0,
        );
        let shows: Vec<&StageEvent> = events
            .iter()
            .filter(|e| matches!(e.stage, Stage::WinLineShow { .. }))
            .collect();
        assert_eq!(shows.len(), 2);
        let step = tuning().reveal_speed_ms + tuning().reveal_pause_ms;
        assert_eq!(shows[1].timestamp_ms - shows[0].timestamp_ms, step);
        // Reveal order follows evaluation order
        assert!(matches!(shows[0].stage, Stage::WinLineShow { line_index: 0, .. }));
        assert!(matches!(shows[1].stage, Stage::WinLineShow { line_index: 4, .. }));
    }

    #[test]
    fn test_zero_win_has_no_present_or_celebration() {
        let events = generate_spin_stages(
            &grid(),
            &GridResult::zero(),
            WinTier::Small,
            &[],
            &tuning(),
            10.0,
        );
        assert!(!events
            .iter()
            .any(|e| matches!(e.stage, Stage::WinPresent { .. } | Stage::TierCelebration { .. })));
    }

    #[test]
    fn test_bonus_trigger_appears() {
        let triggers = vec![BonusTrigger::FreeSpins {
            awarded: 10,
            retrigger: false,
        }];
        let events = generate_spin_stages(
            &grid(),
            &GridResult::zero(),
            WinTier::Small,
            &triggers,
            &tuning(),
            10.0,
        );
        assert!(events
            .iter()
            .any(|e| matches!(e.stage, Stage::BonusTrigger { .. })));
        assert!(events
            .iter()
            .any(|e| matches!(e.stage, Stage::FreeSpinsEnter { awarded: 10 })));
    }

    #[test]
    fn test_wheel_trigger_announces() {
        let triggers = vec![BonusTrigger::Wheel];
        let events = generate_spin_stages(
            &grid(),
            &GridResult::zero(),
            WinTier::Small,
            &triggers,
            &tuning(),
            10.0,
        );
        let trigger_at = events
            .iter()
            .find(|e| matches!(e.stage, Stage::BonusTrigger { kind: BonusKind::Wheel }))
            .map(|e| e.timestamp_ms)
            .unwrap();
        let announce = events
            .iter()
            .find(|e| e.stage == Stage::WheelAnnounce)
            .expect("announcement stage present");
        assert!(announce.timestamp_ms >= trigger_at);
    }
}
