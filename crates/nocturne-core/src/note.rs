//! Typed note-event model shared by the validator and the MIDI encoder.

use serde::{Deserialize, Serialize};

/// Maximum MIDI pitch value.
pub const PITCH_MAX: u8 = 127;

/// Maximum MIDI velocity value.
pub const VELOCITY_MAX: u8 = 127;

/// A single validated note event.
///
/// Field names on the wire follow the melody generation service's
/// vocabulary (`note`, `start_time`, `duration`, `velocity`); times are in
/// beats. Pitch and velocity are guaranteed in 0-127 once an event has
/// passed validation; out-of-range values are rejected upstream, never
/// clamped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoteEvent {
    /// MIDI pitch number (0-127).
    #[serde(rename = "note")]
    pub pitch: u8,
    /// Onset time in beats from the start of the song (>= 0).
    #[serde(rename = "start_time")]
    pub start_beats: f64,
    /// Sounding length in beats (> 0).
    #[serde(rename = "duration")]
    pub duration_beats: f64,
    /// MIDI velocity (0-127).
    pub velocity: u8,
}

impl NoteEvent {
    /// Create a new note event.
    pub fn new(pitch: u8, start_beats: f64, duration_beats: f64, velocity: u8) -> Self {
        Self {
            pitch,
            start_beats,
            duration_beats,
            velocity,
        }
    }

    /// The release time in beats.
    pub fn end_beats(&self) -> f64 {
        self.start_beats + self.duration_beats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_beats() {
        let note = NoteEvent::new(60, 1.5, 0.5, 100);
        assert!((note.end_beats() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_wire_field_names() {
        let note = NoteEvent::new(64, 0.0, 1.0, 90);
        let json = serde_json::to_value(note).unwrap();
        assert_eq!(json["note"], 64);
        assert_eq!(json["start_time"], 0.0);
        assert_eq!(json["duration"], 1.0);
        assert_eq!(json["velocity"], 90);
    }
}
