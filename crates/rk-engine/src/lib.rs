//! # rk-engine — Reel/Outcome Engine
//!
//! Deterministic core of the slot simulator: the reel spin state machine,
//! the win-evaluation algorithm, the bonus-trigger coordinator, and the
//! reward-tier/particle-budget calculator. Rendering, audio, and layout are
//! external collaborators reached through the narrow traits in
//! [`interfaces`].
//!
//! ## Architecture
//!
//! ```text
//! ReelEngine
//!     │
//!     ├── EngineConfig (grid shape, betlines, paytable, feature toggles)
//!     ├── GridModel (current + pending final matrix)
//!     ├── SpinMachine (per-reel timelines, stagger, quick-stop arena)
//!     ├── BonusCoordinator (free spins / wheel / pick-and-click)
//!     └── tier + particles (celebration budget)
//!           │
//!           v
//!     SpinOutcome → Vec<StageEvent>
//! ```
//!
//! All game-rule inconsistencies degrade gracefully: the engine never leaves
//! a spin stuck short of `Complete`.

pub mod bonus;
pub mod config;
pub mod easing;
pub mod engine;
pub mod evaluate;
pub mod grid;
pub mod interfaces;
pub mod paytable;
pub mod spin;
pub mod stages;
pub mod symbols;
pub mod tier;

pub use config::*;
pub use engine::*;
pub use evaluate::*;
pub use grid::*;
pub use paytable::*;
pub use spin::*;
pub use tier::*;

pub use rk_stage::{BonusKind, Stage, StageEvent, WinTier};
