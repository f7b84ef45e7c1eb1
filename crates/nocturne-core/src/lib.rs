//! Nocturne Core - Mood Classification and Note Sequence Validation
//!
//! This crate provides the leaf components of the nocturne music generation
//! pipeline: the mood classifier that maps free-text mood words onto an
//! arousal/valence grid, the typed note-event model, and the validator that
//! turns the untrusted text produced by the melody generation service into a
//! strongly-typed note sequence.
//!
//! # Pipeline position
//!
//! ```text
//! mood word ──> classify ──> (palette, coordinate)      [record-keeping]
//! mood+genre ─> MelodyGenerator (external) ──> raw text
//! raw text ───> parse_melody ──> Vec<NoteEvent> ──> nocturne-midi encoder
//! ```
//!
//! Classification misses are a defined empty result (`None`), never an error.
//! Validation failures are typed (`NoteValidationError`) and reject the whole
//! sequence; nothing is ever clamped into range.

pub mod generate;
pub mod mood;
pub mod note;
pub mod validate;

// Re-export main types
pub use generate::{
    select_genre, GeneratedMelody, GenerateError, GeneratorCredentials, MelodyGenerator,
    MelodyRequest,
};
pub use mood::{classify, coordinate_for, Classification, MoodCoordinate, MoodPalette};
pub use note::NoteEvent;
pub use validate::{parse_melody, validate_events, NoteValidationError};

/// Crate version for pipeline identification.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
