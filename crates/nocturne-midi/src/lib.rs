//! Nocturne MIDI Backend - Deterministic Standard MIDI File Encoding
//!
//! This crate turns a validated note sequence into a byte-exact Standard
//! MIDI File: a fixed header chunk (format 0, one track, 960 ticks per
//! beat) and a single track chunk carrying one tempo meta event, the
//! note-on/note-off stream with variable-length delta-times, and an
//! end-of-track terminator.
//!
//! # Determinism
//!
//! Encoding is fully deterministic: the same events and tempo always yield
//! byte-identical output. There is no randomness and no clock dependency,
//! and the BLAKE3 hash of the output is exposed so callers can assert it.
//!
//! # Module structure
//!
//! - [`vlq`]: variable-length-quantity codec for delta-times
//! - [`event`]: track event representation and byte emission
//! - [`encode`]: note sequence to SMF bytes
//! - [`validator`]: byte-level SMF validation and round-trip decoding

pub mod encode;
pub mod event;
pub mod validator;
pub mod vlq;

// Re-export main types
pub use encode::{encode_smf, EncodeError, SmfResult};
pub use event::{SmfEvent, TimedEvent, TICKS_PER_BEAT};
pub use validator::{decode_smf, validate_smf_bytes, DecodedSmf, NoteSpan, SmfFormatError};

/// Crate version for backend identification.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Backend identifier for artifact records.
pub const BACKEND_ID: &str = "nocturne-midi";
