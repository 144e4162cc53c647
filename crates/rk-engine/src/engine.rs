//! Engine orchestration
//!
//! `ReelEngine` ties the grid model, spin machine, evaluator, and bonus
//! coordinator together behind a typed command/event channel. All mutation
//! happens inside `tick`; callers enqueue commands and read events.

use crossbeam_channel::{unbounded, Receiver, Sender};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use rk_stage::{BonusKind, StageEvent, WinTier};

use crate::bonus::{BonusCoordinator, BonusTrigger, FreeSpinsTick, PickResult, WheelOutcome};
use crate::config::EngineConfig;
use crate::evaluate::{evaluate_grid, GridResult, WinDetail};
use crate::grid::{Grid, GridModel};
use crate::interfaces::{AudioSink, LayoutMetrics, NullAudioSink, TextureProvider, TextureRef};
use crate::symbols;
use crate::paytable::{self, Betline, PayTable};
use crate::spin::{SpinMachine, SpinTickReport};
use crate::stages::generate_spin_stages;
use crate::tier;

/// Commands accepted by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EngineCommand {
    Spin,
    QuickStop,
    ResolveWheel,
    PickCell { index: usize },
    CloseBonus,
    SetBet { amount: f64 },
}

/// Events the engine reports back.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    SpinStarted { free_spin: bool },
    ReelSettled { reel: u8 },
    SpinCompleted { outcome: SpinOutcome, stages: Vec<StageEvent> },
    BonusTriggered { trigger: BonusTrigger },
    FreeSpinsUpdated { remaining: u32 },
    FreeSpinsEnded { total_win: f64 },
    WheelResolved { outcome: WheelOutcome },
    PickRevealed { result: PickResult },
    BonusClosed { kind: BonusKind, total_win: f64 },
}

/// Result of one completed spin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpinOutcome {
    pub final_grid: Grid,
    pub total_win: f64,
    pub win_details: Vec<WinDetail>,
    pub tier: WinTier,
}

/// Coarse engine phase, queryable by presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnginePhase {
    Idle,
    Spinning,
    /// A bonus modal is open; spins are rejected
    Suspended,
}

/// Running session counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub spins: u64,
    pub winning_spins: u64,
    pub total_bet: f64,
    pub total_win: f64,
}

impl SessionStats {
    pub fn rtp(&self) -> f64 {
        if self.total_bet > 0.0 {
            self.total_win / self.total_bet
        } else {
            0.0
        }
    }

    pub fn hit_rate(&self) -> f64 {
        if self.spins > 0 {
            self.winning_spins as f64 / self.spins as f64
        } else {
            0.0
        }
    }
}

/// The reel/outcome engine.
pub struct ReelEngine {
    config: EngineConfig,
    patterns: Vec<Betline>,
    paytable: PayTable,
    grid: GridModel,
    machine: SpinMachine,
    coordinator: BonusCoordinator,
    rng: StdRng,
    bet: f64,
    cell_height: f64,
    in_free_spin: bool,
    stats: SessionStats,
    audio: Box<dyn AudioSink>,
    cmd_tx: Sender<EngineCommand>,
    cmd_rx: Receiver<EngineCommand>,
    evt_tx: Sender<EngineEvent>,
    evt_rx: Receiver<EngineEvent>,
}

impl ReelEngine {
    /// Build an engine; config is normalized and the paytable/betlines are
    /// resolved once, here.
    pub fn new(mut config: EngineConfig) -> Self {
        config.normalize();
        let patterns = paytable::resolve_patterns(
            config.grid.reels,
            config.grid.rows,
            &config.betlines.patterns,
            config.betlines.count as usize,
        );
        let paytable = paytable::resolve_paytable(config.paytable.as_ref());
        let mut rng = StdRng::from_os_rng();
        let grid = GridModel::new(config.grid.reels, config.grid.rows, &mut rng);
        let (cmd_tx, cmd_rx) = unbounded();
        let (evt_tx, evt_rx) = unbounded();

        Self {
            bet: config.bet,
            patterns,
            paytable,
            grid,
            machine: SpinMachine::new(),
            coordinator: BonusCoordinator::new(),
            rng,
            cell_height: 100.0,
            in_free_spin: false,
            stats: SessionStats::default(),
            audio: Box::new(NullAudioSink),
            config,
            cmd_tx,
            cmd_rx,
            evt_tx,
            evt_rx,
        }
    }

    /// Reseed the RNG for a reproducible run.
    pub fn seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// Replace the audio sink. Cues are fire-and-forget; the default sink
    /// only logs.
    pub fn set_audio_sink(&mut self, sink: Box<dyn AudioSink>) {
        self.audio = sink;
    }

    /// Resolve a texture for every symbol class ahead of the first render.
    /// Misses come back as placeholders; the spin never blocks on assets.
    pub fn warm_textures(&self, provider: &dyn TextureProvider) -> Vec<TextureRef> {
        let mut keys: Vec<&str> = symbols::REGULAR_KEYS.to_vec();
        keys.extend([symbols::WILD, symbols::SCATTER, symbols::BONUS, symbols::HOLDSPIN]);
        let refs: Vec<TextureRef> = keys.into_iter().map(|k| provider.lookup(k)).collect();
        let misses = refs.iter().filter(|r| r.placeholder).count();
        if misses > 0 {
            log::debug!("{} symbol textures using placeholders", misses);
        }
        refs
    }

    /// Adopt cell geometry from the layout provider. The engine never
    /// computes layout itself.
    pub fn apply_layout(&mut self, layout: &dyn LayoutMetrics, viewport: (f64, f64)) {
        let metrics =
            layout.cell_metrics(viewport, self.config.grid.reels, self.config.grid.rows);
        self.cell_height = metrics.cell_height.max(1.0);
    }

    /// Command sender and event receiver for callers.
    pub fn channel(&self) -> (Sender<EngineCommand>, Receiver<EngineEvent>) {
        (self.cmd_tx.clone(), self.evt_rx.clone())
    }

    pub fn phase(&self) -> EnginePhase {
        if self.coordinator.is_suspended() {
            EnginePhase::Suspended
        } else if self.machine.is_spinning() {
            EnginePhase::Spinning
        } else {
            EnginePhase::Idle
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn bet(&self) -> f64 {
        self.bet
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn current_grid(&self) -> &Grid {
        self.grid.current()
    }

    pub fn free_spins_remaining(&self) -> u32 {
        self.coordinator.free_spins().remaining()
    }

    /// Advance the engine: drain pending commands, move the reels, close
    /// out any elapsed free-spin end delay.
    pub fn tick(&mut self, dt_ms: f64) {
        while let Ok(command) = self.cmd_rx.try_recv() {
            self.handle_command(command);
        }

        let report = self.machine.tick(dt_ms);
        self.apply_report(report);

        self.coordinator.tick(dt_ms);

        if let FreeSpinsTick::Ended { total_win } =
            self.coordinator.free_spins_mut().tick(dt_ms)
        {
            self.in_free_spin = false;
            self.emit(EngineEvent::FreeSpinsEnded { total_win });
        }
    }

    fn handle_command(&mut self, command: EngineCommand) {
        match command {
            EngineCommand::Spin => self.start_spin(),
            EngineCommand::QuickStop => {
                let report = self.machine.quick_stop();
                self.apply_report(report);
            }
            EngineCommand::ResolveWheel => {
                if let Some(outcome) = self.coordinator.resolve_wheel(self.bet, &mut self.rng) {
                    self.stats.total_win += outcome.amount;
                    self.audio.trigger("bonus", "wheel_land");
                    self.emit(EngineEvent::WheelResolved { outcome });
                    // Resolving concludes the wheel; report the close too
                    self.emit(EngineEvent::BonusClosed {
                        kind: BonusKind::Wheel,
                        total_win: outcome.amount,
                    });
                }
            }
            EngineCommand::PickCell { index } => {
                if let Some(result) = self.coordinator.pick_cell(index) {
                    match result {
                        PickResult::Revealed { amount }
                        | PickResult::Exhausted { amount, .. } => {
                            self.stats.total_win += amount;
                        }
                        PickResult::Collected { .. } | PickResult::Rejected => {}
                    }
                    self.emit(EngineEvent::PickRevealed { result });
                    match result {
                        PickResult::Collected { total_win }
                        | PickResult::Exhausted { total_win, .. } => {
                            self.emit(EngineEvent::BonusClosed {
                                kind: BonusKind::PickAndClick,
                                total_win,
                            });
                        }
                        PickResult::Revealed { .. } | PickResult::Rejected => {}
                    }
                }
            }
            EngineCommand::CloseBonus => {
                if let Some(settled) = self.coordinator.close_modal() {
                    self.emit(EngineEvent::BonusClosed {
                        kind: settled.kind,
                        total_win: settled.total_win,
                    });
                }
            }
            EngineCommand::SetBet { amount } => {
                if amount > 0.0 && amount.is_finite() {
                    self.bet = amount;
                } else {
                    log::warn!("rejected bet of {}", amount);
                }
            }
        }
    }

    fn start_spin(&mut self) {
        match self.phase() {
            EnginePhase::Spinning => {
                log::debug!("spin requested while spinning; ignored");
                return;
            }
            EnginePhase::Suspended => {
                log::debug!("spin requested while a bonus modal is open; ignored");
                return;
            }
            EnginePhase::Idle => {}
        }

        let free_spin = if self.coordinator.free_spins().is_active() {
            // Decrement before evaluation
            self.coordinator.free_spins_mut().begin_spin()
        } else {
            false
        };
        self.in_free_spin = free_spin;

        self.stats.spins += 1;
        if !free_spin {
            self.stats.total_bet += self.bet;
        }

        let final_grid = Grid::random(self.config.grid.reels, self.config.grid.rows, &mut self.rng);
        self.grid.stage_final(final_grid.clone());
        self.machine.start(
            self.grid.current(),
            &final_grid,
            self.cell_height,
            &self.config.spin,
            &mut self.rng,
        );
        self.audio.trigger("spin", "start");
        self.emit(EngineEvent::SpinStarted { free_spin });
    }

    fn apply_report(&mut self, report: SpinTickReport) {
        for reel in &report.settled_reels {
            self.emit(EngineEvent::ReelSettled { reel: *reel });
        }
        if report.completed {
            self.complete_spin();
        }
    }

    /// Runs exactly once per spin, for natural finish and quick-stop alike.
    fn complete_spin(&mut self) {
        let (final_grid, result) = match self.grid.commit_final() {
            Some(grid) => {
                let result = evaluate_grid(
                    &grid,
                    &self.patterns,
                    &self.paytable,
                    self.bet,
                    self.config.betlines.count as usize,
                );
                (grid, result)
            }
            None => {
                // Defensive: no staged grid still completes, with nothing won
                log::warn!("spin settled without a staged final grid");
                (self.grid.current().clone(), GridResult::zero())
            }
        };

        let win_tier = tier::classify(self.bet, result.total_win, &self.config.tiers);
        self.stats.total_win += result.total_win;
        if result.total_win > 0.0 {
            self.stats.winning_spins += 1;
            let cue = match win_tier {
                WinTier::Small => "win_small",
                WinTier::Big => "win_big",
                WinTier::Mega => "win_mega",
                WinTier::Super => "win_super",
            };
            self.audio.trigger("win", cue);
        }

        if self.in_free_spin {
            self.coordinator.free_spins_mut().add_win(result.total_win);
            self.emit(EngineEvent::FreeSpinsUpdated {
                remaining: self.coordinator.free_spins().remaining(),
            });
        }

        let triggers =
            self.coordinator
                .on_spin_complete(&final_grid, &self.config, self.bet, &mut self.rng);
        if self.in_free_spin {
            self.coordinator.free_spins_mut().after_evaluation(&self.config.free_spins);
        }

        let outcome = SpinOutcome {
            final_grid: final_grid.clone(),
            total_win: result.total_win,
            win_details: result.win_details.clone(),
            tier: win_tier,
        };
        let stages = generate_spin_stages(
            &final_grid,
            &result,
            win_tier,
            &triggers,
            &self.config.spin,
            self.bet,
        );
        self.emit(EngineEvent::SpinCompleted { outcome, stages });

        for trigger in triggers {
            self.audio.trigger("bonus", "trigger");
            self.emit(EngineEvent::BonusTriggered { trigger });
        }

        self.machine.reset();
    }

    /// Force a specific final grid for the next spin (test and replay hook).
    pub fn stage_next_grid(&mut self, grid: Grid) -> bool {
        if grid.matches_shape(self.config.grid.reels, self.config.grid.rows) {
            self.grid.stage_final(grid);
            true
        } else {
            log::warn!("staged grid does not match configured shape; ignored");
            false
        }
    }

    fn emit(&self, event: EngineEvent) {
        if self.evt_tx.send(event).is_err() {
            log::debug!("event dropped; no receivers");
        }
    }
}
