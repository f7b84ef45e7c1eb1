//! Validate command implementation.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;
use std::process::ExitCode;

use nocturne_core::validate::parse_melody;

/// Run the validate command.
///
/// Reads a raw melody text file and reports whether it parses into a valid
/// note sequence. Exit code 0 for a valid sequence, 1 otherwise.
pub fn run(notes_path: &str, json_output: bool) -> Result<ExitCode> {
    let raw = std::fs::read_to_string(Path::new(notes_path))
        .with_context(|| format!("Failed to read notes file: {}", notes_path))?;

    match parse_melody(&raw) {
        Ok(events) => {
            if json_output {
                let value = serde_json::json!({
                    "ok": true,
                    "events": events.len(),
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                println!(
                    "{} {} ({} events)",
                    "Valid:".green().bold(),
                    notes_path,
                    events.len()
                );
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            if json_output {
                let value = serde_json::json!({
                    "ok": false,
                    "error": err.to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                println!("{} {}", "Invalid:".red().bold(), notes_path);
                println!("  {} {}", "x".red(), err);
            }
            Ok(ExitCode::FAILURE)
        }
    }
}
