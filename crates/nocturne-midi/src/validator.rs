//! Byte-level Standard MIDI File validation and decoding.
//!
//! The decoder walks the chunk structure the encoder emits (header plus one
//! track), re-derives absolute ticks from delta-times, and pairs note-on
//! events with their releases. It exists so encoder output can be verified
//! structurally and so tests can check the round-trip property: the decoded
//! note spans must match the encoded sequence.

use std::collections::HashMap;
use std::fmt;

use crate::encode::{MTHD_MAGIC, MTRK_MAGIC};
use crate::event::{META_END_OF_TRACK, META_PREFIX, META_TEMPO};
use crate::vlq::read_vlq;

/// Category of SMF format error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmfErrorCategory {
    /// File structure error (too small, truncated, bad magic).
    Structure,
    /// Header chunk error.
    Header,
    /// Track chunk error.
    Track,
    /// Event-level error inside a track.
    Event,
}

impl fmt::Display for SmfErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SmfErrorCategory::Structure => "structure",
            SmfErrorCategory::Header => "header",
            SmfErrorCategory::Track => "track",
            SmfErrorCategory::Event => "event",
        };
        write!(f, "{}", name)
    }
}

/// Validation error for SMF data.
#[derive(Debug, Clone, PartialEq)]
pub struct SmfFormatError {
    /// Category of the error.
    pub category: SmfErrorCategory,
    /// Detailed error message.
    pub message: String,
    /// Byte offset where the error occurred (if applicable).
    pub offset: Option<usize>,
}

impl SmfFormatError {
    /// Create a new format error.
    pub fn new(category: SmfErrorCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
            offset: None,
        }
    }

    /// Create an error at a specific byte offset.
    pub fn at_offset(
        category: SmfErrorCategory,
        message: impl Into<String>,
        offset: usize,
    ) -> Self {
        Self {
            category,
            message: message.into(),
            offset: Some(offset),
        }
    }
}

impl fmt::Display for SmfFormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SMF {} error", self.category)?;
        if let Some(offset) = self.offset {
            write!(f, " at offset 0x{:04X}", offset)?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for SmfFormatError {}

/// One reconstructed note: a matched note-on/note-off pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NoteSpan {
    /// MIDI pitch.
    pub pitch: u8,
    /// Attack velocity.
    pub velocity: u8,
    /// Absolute tick of the note-on.
    pub on_tick: u64,
    /// Absolute tick of the note-off.
    pub off_tick: u64,
}

/// Decoded contents of an SMF file.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedSmf {
    /// Header format field.
    pub format: u16,
    /// Declared track count.
    pub num_tracks: u16,
    /// Ticks per quarter note.
    pub division: u16,
    /// Tempo from the first set-tempo meta event, if present.
    pub tempo_microseconds_per_beat: Option<u32>,
    /// Reconstructed note spans in note-on order.
    pub notes: Vec<NoteSpan>,
    /// Absolute tick of the end-of-track event.
    pub end_tick: u64,
}

/// Check that `data` is a structurally valid single-track SMF.
pub fn validate_smf_bytes(data: &[u8]) -> Result<(), SmfFormatError> {
    decode_smf(data).map(|_| ())
}

/// Decode a single-track SMF into its header fields and note spans.
pub fn decode_smf(data: &[u8]) -> Result<DecodedSmf, SmfFormatError> {
    if data.len() < 14 {
        return Err(SmfFormatError::new(
            SmfErrorCategory::Structure,
            format!("file too small: {} bytes", data.len()),
        ));
    }

    if &data[0..4] != MTHD_MAGIC {
        return Err(SmfFormatError::at_offset(
            SmfErrorCategory::Structure,
            "missing MThd magic",
            0,
        ));
    }
    let header_len = u32::from_be_bytes([data[4], data[5], data[6], data[7]]);
    if header_len != 6 {
        return Err(SmfFormatError::at_offset(
            SmfErrorCategory::Header,
            format!("header length must be 6, got {}", header_len),
            4,
        ));
    }
    let format = u16::from_be_bytes([data[8], data[9]]);
    let num_tracks = u16::from_be_bytes([data[10], data[11]]);
    let division = u16::from_be_bytes([data[12], data[13]]);
    if division & 0x8000 != 0 {
        return Err(SmfFormatError::at_offset(
            SmfErrorCategory::Header,
            "SMPTE time division is not supported",
            12,
        ));
    }
    if num_tracks != 1 {
        return Err(SmfFormatError::at_offset(
            SmfErrorCategory::Header,
            format!("expected exactly one track, got {}", num_tracks),
            10,
        ));
    }

    let track_start = 14;
    if data.len() < track_start + 8 {
        return Err(SmfFormatError::at_offset(
            SmfErrorCategory::Track,
            "truncated track chunk header",
            track_start,
        ));
    }
    if &data[track_start..track_start + 4] != MTRK_MAGIC {
        return Err(SmfFormatError::at_offset(
            SmfErrorCategory::Track,
            "missing MTrk magic",
            track_start,
        ));
    }
    let track_len = u32::from_be_bytes([
        data[track_start + 4],
        data[track_start + 5],
        data[track_start + 6],
        data[track_start + 7],
    ]) as usize;
    let body_start = track_start + 8;
    let body_end = body_start
        .checked_add(track_len)
        .filter(|&end| end <= data.len())
        .ok_or_else(|| {
            SmfFormatError::at_offset(
                SmfErrorCategory::Track,
                format!(
                    "declared track length {} overruns file of {} bytes",
                    track_len,
                    data.len()
                ),
                track_start + 4,
            )
        })?;
    if body_end != data.len() {
        return Err(SmfFormatError::at_offset(
            SmfErrorCategory::Track,
            format!("{} trailing bytes after track chunk", data.len() - body_end),
            body_end,
        ));
    }

    let (notes, tempo, end_tick) = decode_track(&data[body_start..body_end], body_start)?;

    Ok(DecodedSmf {
        format,
        num_tracks,
        division,
        tempo_microseconds_per_beat: tempo,
        notes,
        end_tick,
    })
}

/// Decode one track body into note spans.
///
/// `base` is the track body's offset in the whole file, for error reporting.
fn decode_track(
    body: &[u8],
    base: usize,
) -> Result<(Vec<NoteSpan>, Option<u32>, u64), SmfFormatError> {
    let mut pos = 0usize;
    let mut tick = 0u64;
    let mut tempo: Option<u32> = None;
    let mut running_status: Option<u8> = None;
    let mut notes: Vec<NoteSpan> = Vec::new();
    // Indices of open note-ons per pitch, matched first-in-first-out.
    let mut open: HashMap<u8, Vec<usize>> = HashMap::new();
    let mut saw_end = false;

    while pos < body.len() {
        let delta = read_vlq(body, &mut pos).ok_or_else(|| {
            SmfFormatError::at_offset(SmfErrorCategory::Event, "bad delta-time", base + pos)
        })?;
        tick += delta as u64;

        let status_offset = pos;
        let first = *body.get(pos).ok_or_else(|| {
            SmfFormatError::at_offset(SmfErrorCategory::Event, "truncated event", base + pos)
        })?;

        let status = if first & 0x80 != 0 {
            pos += 1;
            if first < 0xF0 {
                running_status = Some(first);
            }
            first
        } else {
            running_status.ok_or_else(|| {
                SmfFormatError::at_offset(
                    SmfErrorCategory::Event,
                    "data byte without running status",
                    base + status_offset,
                )
            })?
        };

        match status {
            META_PREFIX => {
                let meta_type = read_byte(body, &mut pos, base)?;
                let len = read_vlq(body, &mut pos).ok_or_else(|| {
                    SmfFormatError::at_offset(
                        SmfErrorCategory::Event,
                        "bad meta event length",
                        base + pos,
                    )
                })? as usize;
                if pos + len > body.len() {
                    return Err(SmfFormatError::at_offset(
                        SmfErrorCategory::Event,
                        "truncated meta event",
                        base + pos,
                    ));
                }
                match meta_type {
                    META_TEMPO => {
                        if len != 3 {
                            return Err(SmfFormatError::at_offset(
                                SmfErrorCategory::Event,
                                format!("tempo meta event must carry 3 bytes, got {}", len),
                                base + pos,
                            ));
                        }
                        let value = u32::from_be_bytes([
                            0,
                            body[pos],
                            body[pos + 1],
                            body[pos + 2],
                        ]);
                        tempo.get_or_insert(value);
                    }
                    META_END_OF_TRACK => {
                        if pos + len != body.len() {
                            return Err(SmfFormatError::at_offset(
                                SmfErrorCategory::Event,
                                "data after end-of-track",
                                base + pos + len,
                            ));
                        }
                        saw_end = true;
                    }
                    _ => {}
                }
                pos += len;
            }
            0xF0 | 0xF7 => {
                // SysEx: length-prefixed payload, skipped.
                let len = read_vlq(body, &mut pos).ok_or_else(|| {
                    SmfFormatError::at_offset(
                        SmfErrorCategory::Event,
                        "bad sysex length",
                        base + pos,
                    )
                })? as usize;
                if pos + len > body.len() {
                    return Err(SmfFormatError::at_offset(
                        SmfErrorCategory::Event,
                        "truncated sysex event",
                        base + pos,
                    ));
                }
                pos += len;
            }
            _ => {
                let kind = status & 0xF0;
                match kind {
                    0x80 | 0x90 => {
                        let pitch = read_byte(body, &mut pos, base)?;
                        let velocity = read_byte(body, &mut pos, base)?;
                        let is_on = kind == 0x90 && velocity > 0;
                        if is_on {
                            open.entry(pitch).or_default().push(notes.len());
                            notes.push(NoteSpan {
                                pitch,
                                velocity,
                                on_tick: tick,
                                off_tick: tick,
                            });
                        } else {
                            let queue = open
                                .get_mut(&pitch)
                                .filter(|q| !q.is_empty())
                                .ok_or_else(|| {
                                    SmfFormatError::at_offset(
                                        SmfErrorCategory::Event,
                                        format!("note-off for pitch {} without a note-on", pitch),
                                        base + status_offset,
                                    )
                                })?;
                            let slot = queue.remove(0);
                            notes[slot].off_tick = tick;
                        }
                    }
                    0xA0 | 0xB0 | 0xE0 => {
                        pos += 2;
                    }
                    0xC0 | 0xD0 => {
                        pos += 1;
                    }
                    _ => {
                        return Err(SmfFormatError::at_offset(
                            SmfErrorCategory::Event,
                            format!("unexpected status byte 0x{:02X}", status),
                            base + status_offset,
                        ));
                    }
                }
                if pos > body.len() {
                    return Err(SmfFormatError::at_offset(
                        SmfErrorCategory::Event,
                        "truncated channel event",
                        base + status_offset,
                    ));
                }
            }
        }
    }

    if !saw_end {
        return Err(SmfFormatError::new(
            SmfErrorCategory::Track,
            "track does not end with an end-of-track event",
        ));
    }
    if let Some((pitch, _)) = open.iter().find(|(_, q)| !q.is_empty()) {
        return Err(SmfFormatError::new(
            SmfErrorCategory::Event,
            format!("note-on for pitch {} is never released", pitch),
        ));
    }

    Ok((notes, tempo, tick))
}

fn read_byte(body: &[u8], pos: &mut usize, base: usize) -> Result<u8, SmfFormatError> {
    let byte = *body.get(*pos).ok_or_else(|| {
        SmfFormatError::at_offset(SmfErrorCategory::Event, "truncated event", base + *pos)
    })?;
    *pos += 1;
    Ok(byte)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::encode_smf;
    use crate::event::TICKS_PER_BEAT;
    use nocturne_core::note::NoteEvent;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_accepts_encoder_output() {
        let events = [
            NoteEvent::new(60, 0.0, 0.5, 100),
            NoteEvent::new(64, 0.5, 0.5, 90),
        ];
        let result = encode_smf(&events, 120).unwrap();
        assert!(validate_smf_bytes(&result.data).is_ok());
    }

    #[test]
    fn test_decode_header_fields() {
        let result = encode_smf(&[], 120).unwrap();
        let decoded = decode_smf(&result.data).unwrap();
        assert_eq!(decoded.format, 0);
        assert_eq!(decoded.num_tracks, 1);
        assert_eq!(decoded.division, TICKS_PER_BEAT);
        assert_eq!(decoded.tempo_microseconds_per_beat, Some(500_000));
        assert_eq!(decoded.notes, vec![]);
        assert_eq!(decoded.end_tick, 0);
    }

    #[test]
    fn test_decode_note_spans() {
        let events = [
            NoteEvent::new(60, 0.0, 1.0, 100),
            NoteEvent::new(62, 1.0, 0.5, 80),
        ];
        let result = encode_smf(&events, 120).unwrap();
        let decoded = decode_smf(&result.data).unwrap();
        assert_eq!(
            decoded.notes,
            vec![
                NoteSpan {
                    pitch: 60,
                    velocity: 100,
                    on_tick: 0,
                    off_tick: 960,
                },
                NoteSpan {
                    pitch: 62,
                    velocity: 80,
                    on_tick: 960,
                    off_tick: 1440,
                },
            ]
        );
    }

    #[test]
    fn test_rejects_too_small() {
        let err = validate_smf_bytes(&[0x4D, 0x54]).unwrap_err();
        assert_eq!(err.category, SmfErrorCategory::Structure);
    }

    #[test]
    fn test_rejects_bad_magic() {
        let mut data = encode_smf(&[], 120).unwrap().data;
        data[0] = b'X';
        let err = validate_smf_bytes(&data).unwrap_err();
        assert_eq!(err.category, SmfErrorCategory::Structure);
        assert_eq!(err.offset, Some(0));
    }

    #[test]
    fn test_rejects_track_length_mismatch() {
        let mut data = encode_smf(&[], 120).unwrap().data;
        // Inflate the declared track length past the end of the file.
        data[21] = 0xFF;
        let err = validate_smf_bytes(&data).unwrap_err();
        assert_eq!(err.category, SmfErrorCategory::Track);
    }

    #[test]
    fn test_rejects_trailing_bytes() {
        let mut data = encode_smf(&[], 120).unwrap().data;
        data.push(0x00);
        let err = validate_smf_bytes(&data).unwrap_err();
        assert_eq!(err.category, SmfErrorCategory::Track);
    }

    #[test]
    fn test_rejects_missing_end_of_track() {
        let mut data = encode_smf(&[], 120).unwrap().data;
        // Truncate the end-of-track event and fix up the declared length.
        data.truncate(data.len() - 4);
        let body_len = (data.len() - 22) as u32;
        data[18..22].copy_from_slice(&body_len.to_be_bytes());
        let err = validate_smf_bytes(&data).unwrap_err();
        assert_eq!(err.category, SmfErrorCategory::Track);
    }

    #[test]
    fn test_rejects_unmatched_note_off() {
        // Hand-built track: note-off with no preceding note-on.
        let mut data = Vec::new();
        data.extend_from_slice(&[
            0x4D, 0x54, 0x68, 0x64, 0x00, 0x00, 0x00, 0x06, //
            0x00, 0x00, 0x00, 0x01, 0x03, 0xC0,
        ]);
        let body = [
            0x00, 0x80, 0x3C, 0x00, // note-off C4
            0x00, 0xFF, 0x2F, 0x00, // end-of-track
        ];
        data.extend_from_slice(&[0x4D, 0x54, 0x72, 0x6B]);
        data.extend_from_slice(&(body.len() as u32).to_be_bytes());
        data.extend_from_slice(&body);

        let err = validate_smf_bytes(&data).unwrap_err();
        assert_eq!(err.category, SmfErrorCategory::Event);
    }

    #[test]
    fn test_note_on_velocity_zero_is_release() {
        let mut data = Vec::new();
        data.extend_from_slice(&[
            0x4D, 0x54, 0x68, 0x64, 0x00, 0x00, 0x00, 0x06, //
            0x00, 0x00, 0x00, 0x01, 0x03, 0xC0,
        ]);
        let body = [
            0x00, 0x90, 0x3C, 0x64, // note-on C4
            0x60, 0x90, 0x3C, 0x00, // +96 ticks, note-on velocity 0 = release
            0x00, 0xFF, 0x2F, 0x00,
        ];
        data.extend_from_slice(&[0x4D, 0x54, 0x72, 0x6B]);
        data.extend_from_slice(&(body.len() as u32).to_be_bytes());
        data.extend_from_slice(&body);

        let decoded = decode_smf(&data).unwrap();
        assert_eq!(
            decoded.notes,
            vec![NoteSpan {
                pitch: 0x3C,
                velocity: 0x64,
                on_tick: 0,
                off_tick: 96,
            }]
        );
    }

    #[test]
    fn test_running_status() {
        let mut data = Vec::new();
        data.extend_from_slice(&[
            0x4D, 0x54, 0x68, 0x64, 0x00, 0x00, 0x00, 0x06, //
            0x00, 0x00, 0x00, 0x01, 0x03, 0xC0,
        ]);
        let body = [
            0x00, 0x90, 0x3C, 0x64, // note-on C4
            0x60, 0x3C, 0x00, // running status: release C4
            0x00, 0xFF, 0x2F, 0x00,
        ];
        data.extend_from_slice(&[0x4D, 0x54, 0x72, 0x6B]);
        data.extend_from_slice(&(body.len() as u32).to_be_bytes());
        data.extend_from_slice(&body);

        let decoded = decode_smf(&data).unwrap();
        assert_eq!(decoded.notes.len(), 1);
        assert_eq!(decoded.notes[0].off_tick, 96);
    }
}
