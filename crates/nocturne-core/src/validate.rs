//! Note sequence validation.
//!
//! The melody generation service returns a text blob that is *expected* to
//! contain a list of note records, but nothing about it can be trusted. This
//! module parses that text strictly as data (it is never evaluated) and
//! checks every field against the [`NoteEvent`] invariants before anything
//! downstream sees it.
//!
//! Validation is order-preserving and non-lossy: the output sequence is the
//! input sequence, typed. Reordering for serialization is the encoder's
//! concern.

use serde_json::Value;
use thiserror::Error;

use crate::note::{NoteEvent, PITCH_MAX, VELOCITY_MAX};

/// Keys every note record must carry.
const REQUIRED_FIELDS: [&str; 4] = ["note", "start_time", "duration", "velocity"];

/// Error type for note sequence validation.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum NoteValidationError {
    /// The text is not parseable as a JSON value at all.
    #[error("melody text is not valid JSON: {0}")]
    Syntax(String),

    /// The text parsed, but the top-level value is not a sequence.
    #[error("melody text must be a sequence of note records, got {got}")]
    NotASequence {
        /// JSON type name of the value that was found.
        got: &'static str,
    },

    /// A record is missing a key or has a wrong-typed value.
    #[error("malformed note event at index {index}: field '{field}' {detail}")]
    MalformedEvent {
        /// Position of the offending record in the sequence.
        index: usize,
        /// The field that failed.
        field: &'static str,
        /// What was wrong with it.
        detail: String,
    },

    /// A field parsed but violates its numeric range.
    #[error("note event at index {index}: field '{field}' out of range: {value}")]
    OutOfRange {
        /// Position of the offending record in the sequence.
        index: usize,
        /// The field that failed.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },
}

/// Parse a raw melody text blob into a validated note sequence.
///
/// The text is parsed as JSON after stripping Markdown code fences. If the
/// strict parse fails, a second attempt is made with single quotes
/// normalized to double quotes, since the generation service tends to emit
/// Python-literal style lists. The text is never executed.
///
/// An empty sequence is valid: the encoder still produces a minimal file.
pub fn parse_melody(raw: &str) -> Result<Vec<NoteEvent>, NoteValidationError> {
    let cleaned = strip_code_fences(raw.trim());

    let value: Value = match serde_json::from_str(cleaned) {
        Ok(value) => value,
        Err(strict_err) => {
            let relaxed = cleaned.replace('\'', "\"");
            serde_json::from_str(&relaxed)
                .map_err(|_| NoteValidationError::Syntax(strict_err.to_string()))?
        }
    };

    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(NoteValidationError::NotASequence {
                got: json_type_name(&other),
            })
        }
    };

    validate_events(&items)
}

/// Validate a sequence of loosely-typed note records.
///
/// Every record must be a map carrying numeric `note`, `start_time`,
/// `duration`, and `velocity` fields; the whole sequence is rejected on the
/// first violation. Output order matches input order.
pub fn validate_events(items: &[Value]) -> Result<Vec<NoteEvent>, NoteValidationError> {
    let mut events = Vec::with_capacity(items.len());

    for (index, item) in items.iter().enumerate() {
        let map = item.as_object().ok_or_else(|| {
            NoteValidationError::MalformedEvent {
                index,
                field: "note",
                detail: format!("record must be a map, got {}", json_type_name(item)),
            }
        })?;

        let mut fields = [0.0f64; 4];
        for (slot, &field) in fields.iter_mut().zip(REQUIRED_FIELDS.iter()) {
            let value = map
                .get(field)
                .ok_or_else(|| NoteValidationError::MalformedEvent {
                    index,
                    field,
                    detail: "is missing".to_string(),
                })?;
            *slot = value
                .as_f64()
                .ok_or_else(|| NoteValidationError::MalformedEvent {
                    index,
                    field,
                    detail: format!("must be a number, got {}", json_type_name(value)),
                })?;
        }
        let [pitch, start_time, duration, velocity] = fields;

        let pitch = midi_byte(pitch, index, "note", PITCH_MAX)?;
        let velocity = midi_byte(velocity, index, "velocity", VELOCITY_MAX)?;

        if start_time < 0.0 {
            return Err(NoteValidationError::OutOfRange {
                index,
                field: "start_time",
                value: start_time,
            });
        }
        if duration <= 0.0 {
            return Err(NoteValidationError::OutOfRange {
                index,
                field: "duration",
                value: duration,
            });
        }

        events.push(NoteEvent::new(pitch, start_time, duration, velocity));
    }

    Ok(events)
}

/// Check a pitch/velocity value: integral and within 0..=max.
fn midi_byte(
    value: f64,
    index: usize,
    field: &'static str,
    max: u8,
) -> Result<u8, NoteValidationError> {
    if value.fract() != 0.0 {
        return Err(NoteValidationError::MalformedEvent {
            index,
            field,
            detail: format!("must be an integer, got {}", value),
        });
    }
    if value < 0.0 || value > max as f64 {
        return Err(NoteValidationError::OutOfRange {
            index,
            field,
            value,
        });
    }
    Ok(value as u8)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Strip a surrounding Markdown code fence, if any.
///
/// The generation service sometimes wraps its output in ``` fences with an
/// optional language tag. Only a leading and trailing fence are removed;
/// the interior is untouched.
fn strip_code_fences(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the remainder of the fence line (e.g. "json").
    let body = match rest.find('\n') {
        Some(pos) => &rest[pos + 1..],
        None => return text,
    };
    match body.rfind("```") {
        Some(pos) => body[..pos].trim(),
        None => body.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const WELL_FORMED: &str = r#"[
        {"note": 60, "start_time": 0.0, "duration": 0.5, "velocity": 100},
        {"note": 62, "start_time": 0.5, "duration": 0.5, "velocity": 100},
        {"note": 64, "start_time": 1.0, "duration": 0.5, "velocity": 100}
    ]"#;

    #[test]
    fn test_parse_well_formed() {
        let events = parse_melody(WELL_FORMED).unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0], NoteEvent::new(60, 0.0, 0.5, 100));
        assert_eq!(events[2].pitch, 64);
    }

    #[test]
    fn test_parse_preserves_order() {
        // Events deliberately not sorted by start time.
        let raw = r#"[
            {"note": 72, "start_time": 2.0, "duration": 1.0, "velocity": 80},
            {"note": 60, "start_time": 0.0, "duration": 1.0, "velocity": 80}
        ]"#;
        let events = parse_melody(raw).unwrap();
        assert_eq!(events[0].pitch, 72);
        assert_eq!(events[1].pitch, 60);
    }

    #[test]
    fn test_parse_python_style_quotes() {
        let raw = "[{'note': 60, 'start_time': 0.0, 'duration': 0.5, 'velocity': 100}]";
        let events = parse_melody(raw).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].pitch, 60);
    }

    #[test]
    fn test_parse_strips_code_fences() {
        let raw = format!("```json\n{}\n```", WELL_FORMED);
        let events = parse_melody(&raw).unwrap();
        assert_eq!(events.len(), 3);
    }

    #[test]
    fn test_empty_sequence_is_accepted() {
        assert_eq!(parse_melody("[]").unwrap(), vec![]);
        assert_eq!(parse_melody("  [ ]  ").unwrap(), vec![]);
    }

    #[test]
    fn test_garbage_is_syntax_error() {
        let err = parse_melody("here is your melody!").unwrap_err();
        assert!(matches!(err, NoteValidationError::Syntax(_)));
    }

    #[test]
    fn test_non_sequence_is_rejected() {
        let err = parse_melody(r#"{"note": 60}"#).unwrap_err();
        assert_eq!(err, NoteValidationError::NotASequence { got: "object" });
    }

    #[test]
    fn test_missing_velocity_is_malformed() {
        let raw = r#"[{"note": 60, "start_time": 0.0, "duration": 0.5}]"#;
        let err = parse_melody(raw).unwrap_err();
        assert_eq!(
            err,
            NoteValidationError::MalformedEvent {
                index: 0,
                field: "velocity",
                detail: "is missing".to_string(),
            }
        );
    }

    #[test]
    fn test_non_numeric_field_is_malformed() {
        let raw = r#"[{"note": "C4", "start_time": 0.0, "duration": 0.5, "velocity": 100}]"#;
        let err = parse_melody(raw).unwrap_err();
        assert!(matches!(
            err,
            NoteValidationError::MalformedEvent { index: 0, field: "note", .. }
        ));
    }

    #[test]
    fn test_pitch_128_is_out_of_range() {
        let raw = r#"[{"note": 128, "start_time": 0.0, "duration": 0.5, "velocity": 100}]"#;
        let err = parse_melody(raw).unwrap_err();
        assert_eq!(
            err,
            NoteValidationError::OutOfRange {
                index: 0,
                field: "note",
                value: 128.0,
            }
        );
    }

    #[test]
    fn test_negative_velocity_is_out_of_range() {
        let raw = r#"[{"note": 60, "start_time": 0.0, "duration": 0.5, "velocity": -1}]"#;
        let err = parse_melody(raw).unwrap_err();
        assert!(matches!(
            err,
            NoteValidationError::OutOfRange { field: "velocity", .. }
        ));
    }

    #[test]
    fn test_negative_start_time_is_out_of_range() {
        let raw = r#"[{"note": 60, "start_time": -0.5, "duration": 0.5, "velocity": 100}]"#;
        let err = parse_melody(raw).unwrap_err();
        assert!(matches!(
            err,
            NoteValidationError::OutOfRange { field: "start_time", .. }
        ));
    }

    #[test]
    fn test_zero_duration_is_out_of_range() {
        let raw = r#"[{"note": 60, "start_time": 0.0, "duration": 0.0, "velocity": 100}]"#;
        let err = parse_melody(raw).unwrap_err();
        assert!(matches!(
            err,
            NoteValidationError::OutOfRange { field: "duration", .. }
        ));
    }

    #[test]
    fn test_fractional_pitch_is_malformed() {
        let raw = r#"[{"note": 60.5, "start_time": 0.0, "duration": 0.5, "velocity": 100}]"#;
        let err = parse_melody(raw).unwrap_err();
        assert!(matches!(
            err,
            NoteValidationError::MalformedEvent { field: "note", .. }
        ));
    }

    #[test]
    fn test_error_cites_record_index() {
        let raw = r#"[
            {"note": 60, "start_time": 0.0, "duration": 0.5, "velocity": 100},
            {"note": 200, "start_time": 0.5, "duration": 0.5, "velocity": 100}
        ]"#;
        let err = parse_melody(raw).unwrap_err();
        assert!(matches!(
            err,
            NoteValidationError::OutOfRange { index: 1, field: "note", .. }
        ));
    }
}
