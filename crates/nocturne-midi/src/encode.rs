//! Note sequence to Standard MIDI File encoding.
//!
//! The encoder is the only producer of binary artifacts in the pipeline.
//! Given a validated note sequence and a tempo it emits a two-chunk SMF
//! (header + single track) that is byte-exact for a given input: no
//! randomness, no clock, no environment.
//!
//! Input events arrive in generation order, which is not necessarily
//! start-time order. Because track timing is expressed as cumulative
//! delta-times, absolute times are made monotonic first: events are
//! stable-sorted by onset, expanded into note-on/note-off pairs, and merged
//! into one stream where note-offs precede note-ons at equal ticks.

use byteorder::{BigEndian, WriteBytesExt};
use std::io::{self, Write};

use thiserror::Error;

use nocturne_core::note::{NoteEvent, PITCH_MAX, VELOCITY_MAX};

use crate::event::{SmfEvent, TimedEvent, TICKS_PER_BEAT};
use crate::vlq::{write_vlq, VLQ_MAX};

/// Header chunk magic.
pub const MTHD_MAGIC: &[u8; 4] = b"MThd";

/// Track chunk magic.
pub const MTRK_MAGIC: &[u8; 4] = b"MTrk";

/// SMF format written by this encoder (single track).
pub const SMF_FORMAT: u16 = 0;

/// Number of tracks written by this encoder.
pub const SMF_NUM_TRACKS: u16 = 1;

/// Microseconds in one minute, for tempo conversion.
pub const MICROSECONDS_PER_MINUTE: u32 = 60_000_000;

/// Lowest accepted tempo.
pub const MIN_TEMPO_BPM: u16 = 1;

/// Highest accepted tempo.
pub const MAX_TEMPO_BPM: u16 = 600;

/// Error type for SMF encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Tempo outside the accepted range.
    #[error("tempo must be 1-600 bpm, got {0}")]
    InvalidTempo(u16),

    /// An event violates the validated-input contract.
    ///
    /// The validator upstream should make this unreachable; hitting it means
    /// the encoder was handed unvalidated data, which is a contract breach
    /// surfaced loudly rather than clamped away.
    #[error("encoding invariant violated at event {index}: field '{field}' has value {value}")]
    InvariantViolation {
        /// Position of the offending event.
        index: usize,
        /// The field that breaks the contract.
        field: &'static str,
        /// The offending value.
        value: f64,
    },

    /// The song spans more ticks than a delta-time can express.
    #[error("song is too long to encode: {ticks} ticks exceeds the delta-time range")]
    SongTooLong {
        /// Total tick span of the song.
        ticks: u64,
    },

    /// IO error during writing.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result of SMF encoding.
#[derive(Debug, Clone)]
pub struct SmfResult {
    /// Encoded file bytes.
    pub data: Vec<u8>,
    /// BLAKE3 hash of the bytes.
    pub hash: String,
    /// File extension ("mid").
    pub extension: &'static str,
}

/// Convert a tempo in beats per minute to microseconds per quarter note.
pub fn tempo_to_microseconds(bpm: u16) -> u32 {
    MICROSECONDS_PER_MINUTE / bpm as u32
}

/// Convert beats to absolute ticks at the fixed resolution.
pub fn beats_to_ticks(beats: f64) -> u64 {
    (beats * TICKS_PER_BEAT as f64).round() as u64
}

/// Check the validated-input contract on every event.
fn assert_encodable(events: &[NoteEvent]) -> Result<(), EncodeError> {
    for (index, event) in events.iter().enumerate() {
        if event.pitch > PITCH_MAX {
            return Err(EncodeError::InvariantViolation {
                index,
                field: "pitch",
                value: event.pitch as f64,
            });
        }
        if event.velocity > VELOCITY_MAX {
            return Err(EncodeError::InvariantViolation {
                index,
                field: "velocity",
                value: event.velocity as f64,
            });
        }
        if !event.start_beats.is_finite() || event.start_beats < 0.0 {
            return Err(EncodeError::InvariantViolation {
                index,
                field: "start_beats",
                value: event.start_beats,
            });
        }
        if !event.duration_beats.is_finite() || event.duration_beats <= 0.0 {
            return Err(EncodeError::InvariantViolation {
                index,
                field: "duration_beats",
                value: event.duration_beats,
            });
        }
    }
    Ok(())
}

/// Build the time-ordered event stream for one track.
///
/// Assumes events already satisfy the contract checked by
/// [`assert_encodable`]. The returned stream starts with the tempo meta
/// event at tick zero and ends with end-of-track at the final tick.
pub fn build_event_stream(events: &[NoteEvent], tempo_bpm: u16) -> Vec<TimedEvent> {
    // Monotonic onsets before delta encoding; stable so ties keep
    // generation order.
    let mut sorted: Vec<NoteEvent> = events.to_vec();
    sorted.sort_by(|a, b| a.start_beats.total_cmp(&b.start_beats));

    let mut stream = Vec::with_capacity(events.len() * 2 + 2);
    stream.push(TimedEvent {
        tick: 0,
        event: SmfEvent::Tempo {
            microseconds_per_beat: tempo_to_microseconds(tempo_bpm),
        },
    });

    for note in &sorted {
        let on_tick = beats_to_ticks(note.start_beats);
        // A note always spans at least one tick, so its off event can never
        // precede its own on event in the merged stream.
        let off_tick = on_tick + beats_to_ticks(note.duration_beats).max(1);
        stream.push(TimedEvent {
            tick: on_tick,
            event: SmfEvent::NoteOn {
                pitch: note.pitch,
                velocity: note.velocity,
            },
        });
        stream.push(TimedEvent {
            tick: off_tick,
            event: SmfEvent::NoteOff {
                pitch: note.pitch,
                velocity: note.velocity,
            },
        });
    }

    stream.sort_by_key(|e| (e.tick, e.event.sort_rank()));

    let end_tick = stream.last().map(|e| e.tick).unwrap_or(0);
    stream.push(TimedEvent {
        tick: end_tick,
        event: SmfEvent::EndOfTrack,
    });

    stream
}

/// Encode a validated note sequence into a Standard MIDI File.
///
/// The output is deterministic: identical events and tempo produce
/// byte-identical files. An empty sequence yields a minimal valid file
/// containing only the tempo and end-of-track events.
pub fn encode_smf(events: &[NoteEvent], tempo_bpm: u16) -> Result<SmfResult, EncodeError> {
    if !(MIN_TEMPO_BPM..=MAX_TEMPO_BPM).contains(&tempo_bpm) {
        return Err(EncodeError::InvalidTempo(tempo_bpm));
    }
    assert_encodable(events)?;

    let stream = build_event_stream(events, tempo_bpm);

    // Serialize the track body with delta-times.
    let mut body = Vec::new();
    let mut previous_tick = 0u64;
    for timed in &stream {
        let delta = timed.tick - previous_tick;
        if delta > VLQ_MAX as u64 {
            return Err(EncodeError::SongTooLong { ticks: timed.tick });
        }
        write_vlq(&mut body, delta as u32)?;
        timed.event.write(&mut body)?;
        previous_tick = timed.tick;
    }

    let mut data = Vec::with_capacity(14 + 8 + body.len());
    write_header(&mut data)?;
    data.write_all(MTRK_MAGIC)?;
    data.write_u32::<BigEndian>(body.len() as u32)?;
    data.write_all(&body)?;

    let hash = blake3::hash(&data).to_hex().to_string();
    Ok(SmfResult {
        data,
        hash,
        extension: "mid",
    })
}

/// Write the fixed 14-byte header chunk.
fn write_header<W: Write>(writer: &mut W) -> io::Result<()> {
    writer.write_all(MTHD_MAGIC)?;
    writer.write_u32::<BigEndian>(6)?;
    writer.write_u16::<BigEndian>(SMF_FORMAT)?;
    writer.write_u16::<BigEndian>(SMF_NUM_TRACKS)?;
    writer.write_u16::<BigEndian>(TICKS_PER_BEAT)
}
