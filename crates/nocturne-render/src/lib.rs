//! Nocturne Render Dispatcher - FluidSynth Subprocess Invocation
//!
//! The final pipeline stage: hands an encoded MIDI file to the external
//! FluidSynth synthesizer and returns the resulting audio artifact path.
//! The dispatcher is deliberately thin: it resolves the executable and a
//! SoundFont, runs one bounded subprocess, and maps every failure mode to a
//! typed [`RenderError`]. It never retries a failed render.

pub mod error;
pub mod renderer;

// Re-export main types
pub use error::{RenderError, RenderResult};
pub use renderer::{Renderer, RendererConfig, DEFAULT_SAMPLE_RATE, DEFAULT_TIMEOUT_SECS};

/// Crate version for backend identification.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
