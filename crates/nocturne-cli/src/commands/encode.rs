//! Encode command implementation.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;
use std::process::ExitCode;

use nocturne_core::validate::parse_melody;
use nocturne_midi::encode::encode_smf;

/// Run the encode command.
///
/// Validates the melody text and writes the encoded MIDI file, printing
/// the output size and BLAKE3 hash.
pub fn run(notes_path: &str, tempo_bpm: u16, output: &str, json_output: bool) -> Result<ExitCode> {
    let raw = std::fs::read_to_string(Path::new(notes_path))
        .with_context(|| format!("Failed to read notes file: {}", notes_path))?;

    let events = match parse_melody(&raw) {
        Ok(events) => events,
        Err(err) => {
            if json_output {
                let value = serde_json::json!({ "ok": false, "error": err.to_string() });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                println!("{} {}", "Invalid melody:".red().bold(), err);
            }
            return Ok(ExitCode::FAILURE);
        }
    };

    let result = encode_smf(&events, tempo_bpm).context("MIDI encoding failed")?;
    std::fs::write(Path::new(output), &result.data)
        .with_context(|| format!("Failed to write MIDI file: {}", output))?;

    if json_output {
        let value = serde_json::json!({
            "ok": true,
            "output": output,
            "events": events.len(),
            "bytes": result.data.len(),
            "hash": result.hash,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("{} {}", "Encoded:".green().bold(), output);
        println!(
            "  {} events, {} bytes, {} bpm",
            events.len(),
            result.data.len(),
            tempo_bpm
        );
        println!("  {} {}", "hash:".dimmed(), result.hash);
    }

    Ok(ExitCode::SUCCESS)
}
