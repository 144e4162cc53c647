//! # rk-stage — Presentation stage events for ReelKit
//!
//! Defines the typed event contract between the reel/outcome engine and the
//! presentation layers (animation, audio, UI). The engine emits a timeline of
//! [`StageEvent`]s per spin; consumers key their cues off the canonical
//! [`Stage`] variants instead of ad-hoc string events.
//!
//! ```text
//! rk-engine
//!     │  SpinOutcome
//!     v
//! Vec<StageEvent>  ──►  animation / audio / UI
//! ```

pub mod event;
pub mod stage;

pub use event::*;
pub use stage::*;
