//! Classify command implementation.

use anyhow::Result;
use colored::Colorize;
use std::process::ExitCode;

use nocturne_core::mood::classify;

/// Run the classify command.
///
/// A word absent from every palette is a normal result, not a failure; the
/// command still exits 0 so scripted callers can branch on the JSON output.
pub fn run(word: &str, json_output: bool) -> Result<ExitCode> {
    let classification = classify(word);

    if json_output {
        let value = match classification {
            Some(c) => serde_json::json!({
                "word": word,
                "matched": true,
                "palette": c.palette.as_str(),
                "coordinate": { "x": c.coordinate.x, "y": c.coordinate.y },
                "index": c.index,
            }),
            None => serde_json::json!({
                "word": word,
                "matched": false,
            }),
        };
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(ExitCode::SUCCESS);
    }

    match classification {
        Some(c) => {
            println!("{} {}", "Word:".cyan().bold(), word);
            println!("{} {}", "Palette:".cyan().bold(), c.palette.as_str());
            println!(
                "{} ({}, {})",
                "Coordinate:".cyan().bold(),
                c.coordinate.x,
                c.coordinate.y
            );
        }
        None => {
            println!(
                "{} '{}' is not in any mood palette",
                "No match:".yellow().bold(),
                word
            );
        }
    }

    Ok(ExitCode::SUCCESS)
}
