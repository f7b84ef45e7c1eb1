//! Track event representation and byte emission.

use byteorder::WriteBytesExt;
use std::io::{self, Write};

/// Tick resolution of every file this crate writes.
pub const TICKS_PER_BEAT: u16 = 960;

/// Channel all note events are written on.
pub const CHANNEL: u8 = 0;

/// Note-on status nibble.
pub const NOTE_ON_STATUS: u8 = 0x90;

/// Note-off status nibble.
pub const NOTE_OFF_STATUS: u8 = 0x80;

/// Meta event escape byte.
pub const META_PREFIX: u8 = 0xFF;

/// Meta type for set-tempo.
pub const META_TEMPO: u8 = 0x51;

/// Meta type for end-of-track.
pub const META_END_OF_TRACK: u8 = 0x2F;

/// A single track event, without timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmfEvent {
    /// Set-tempo meta event (microseconds per quarter note).
    Tempo {
        /// Microseconds per quarter note.
        microseconds_per_beat: u32,
    },
    /// Release of a sounding pitch.
    NoteOff {
        /// MIDI pitch (0-127).
        pitch: u8,
        /// Release velocity (0-127).
        velocity: u8,
    },
    /// Start of a sounding pitch.
    NoteOn {
        /// MIDI pitch (0-127).
        pitch: u8,
        /// Attack velocity (0-127).
        velocity: u8,
    },
    /// End-of-track meta event.
    EndOfTrack,
}

impl SmfEvent {
    /// Ordering rank for events sharing an absolute tick.
    ///
    /// Tempo changes come first, then note-offs, then note-ons, so a pitch
    /// released and re-struck at the same instant is never misread as a
    /// retrigger of the still-sounding note. End-of-track sorts last.
    pub fn sort_rank(&self) -> u8 {
        match self {
            SmfEvent::Tempo { .. } => 0,
            SmfEvent::NoteOff { .. } => 1,
            SmfEvent::NoteOn { .. } => 2,
            SmfEvent::EndOfTrack => 3,
        }
    }

    /// Write the event bytes (status + data, no delta-time).
    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        match *self {
            SmfEvent::Tempo {
                microseconds_per_beat,
            } => {
                writer.write_u8(META_PREFIX)?;
                writer.write_u8(META_TEMPO)?;
                writer.write_u8(3)?;
                // 24-bit big-endian value.
                let bytes = microseconds_per_beat.to_be_bytes();
                writer.write_all(&bytes[1..4])
            }
            SmfEvent::NoteOff { pitch, velocity } => {
                writer.write_u8(NOTE_OFF_STATUS | CHANNEL)?;
                writer.write_u8(pitch)?;
                writer.write_u8(velocity)
            }
            SmfEvent::NoteOn { pitch, velocity } => {
                writer.write_u8(NOTE_ON_STATUS | CHANNEL)?;
                writer.write_u8(pitch)?;
                writer.write_u8(velocity)
            }
            SmfEvent::EndOfTrack => {
                writer.write_u8(META_PREFIX)?;
                writer.write_u8(META_END_OF_TRACK)?;
                writer.write_u8(0)
            }
        }
    }
}

/// An event tagged with its absolute tick.
///
/// Absolute ticks exist only while the stream is being assembled; they are
/// re-expressed as delta-times at serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimedEvent {
    /// Absolute time in ticks from the start of the track.
    pub tick: u64,
    /// The event payload.
    pub event: SmfEvent,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_tempo_event_bytes() {
        // 120 bpm -> 500_000 us per beat -> 0x07 0xA1 0x20.
        let mut buf = Vec::new();
        SmfEvent::Tempo {
            microseconds_per_beat: 500_000,
        }
        .write(&mut buf)
        .unwrap();
        assert_eq!(buf, vec![0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20]);
    }

    #[test]
    fn test_note_event_bytes() {
        let mut buf = Vec::new();
        SmfEvent::NoteOn {
            pitch: 60,
            velocity: 100,
        }
        .write(&mut buf)
        .unwrap();
        SmfEvent::NoteOff {
            pitch: 60,
            velocity: 100,
        }
        .write(&mut buf)
        .unwrap();
        assert_eq!(buf, vec![0x90, 60, 100, 0x80, 60, 100]);
    }

    #[test]
    fn test_end_of_track_bytes() {
        let mut buf = Vec::new();
        SmfEvent::EndOfTrack.write(&mut buf).unwrap();
        assert_eq!(buf, vec![0xFF, 0x2F, 0x00]);
    }

    #[test]
    fn test_sort_rank_off_before_on() {
        let off = SmfEvent::NoteOff {
            pitch: 60,
            velocity: 0,
        };
        let on = SmfEvent::NoteOn {
            pitch: 60,
            velocity: 100,
        };
        assert!(off.sort_rank() < on.sort_rank());
        assert!(SmfEvent::Tempo {
            microseconds_per_beat: 500_000
        }
        .sort_rank()
            < off.sort_rank());
        assert!(on.sort_rank() < SmfEvent::EndOfTrack.sort_rank());
    }
}
