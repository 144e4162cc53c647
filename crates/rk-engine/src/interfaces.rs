//! Contracts for external collaborators
//!
//! Rendering, layout, and audio live outside the engine. These traits are
//! infallible on purpose: a missing texture yields a placeholder, a failed
//! audio cue is logged, and the engine never blocks on presentation.

use serde::{Deserialize, Serialize};

/// Handle to a drawable texture, resolved by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureRef {
    pub key: String,
    /// True when the lookup missed and a neutral placeholder was returned
    pub placeholder: bool,
}

impl TextureRef {
    pub fn placeholder(key: &str) -> Self {
        Self {
            key: key.to_string(),
            placeholder: true,
        }
    }
}

/// Texture lookup. Must never fail; absence yields a placeholder.
pub trait TextureProvider {
    fn lookup(&self, symbol_key: &str) -> TextureRef;
}

/// Cell geometry computed by the layout system.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellMetrics {
    pub cell_width: f64,
    pub cell_height: f64,
    pub reel_spacing: f64,
}

/// Layout provider: viewport + grid shape in, cell geometry out.
/// Authoritative for positioning; the engine does not compute layout.
pub trait LayoutMetrics {
    fn cell_metrics(&self, viewport: (f64, f64), reels: u8, rows: u8) -> CellMetrics;
}

/// Fire-and-forget audio cues keyed by category and name.
pub trait AudioSink {
    fn trigger(&self, category: &str, cue: &str);
}

/// Placeholder-only texture provider for tests and headless runs.
#[derive(Debug, Default)]
pub struct NullTextureProvider;

impl TextureProvider for NullTextureProvider {
    fn lookup(&self, symbol_key: &str) -> TextureRef {
        TextureRef::placeholder(symbol_key)
    }
}

/// Even grid split of the viewport.
#[derive(Debug, Default)]
pub struct UniformLayout;

impl LayoutMetrics for UniformLayout {
    fn cell_metrics(&self, viewport: (f64, f64), reels: u8, rows: u8) -> CellMetrics {
        let reels = reels.max(1) as f64;
        let rows = rows.max(1) as f64;
        CellMetrics {
            cell_width: viewport.0 / reels,
            cell_height: viewport.1 / rows,
            reel_spacing: 0.0,
        }
    }
}

/// Audio sink that only logs.
#[derive(Debug, Default)]
pub struct NullAudioSink;

impl AudioSink for NullAudioSink {
    fn trigger(&self, category: &str, cue: &str) {
        log::debug!("audio cue {}/{}", category, cue);
    }
}
