//! Pipeline command implementation.
//!
//! Runs the full symbolic-to-audio path over an already-generated melody
//! text: classify the mood word (record-keeping only), validate the note
//! sequence, encode it to MIDI, and dispatch the file to FluidSynth. Each
//! stage consumes the previous stage's complete output; the first failure
//! stops the run.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;
use std::process::ExitCode;

use nocturne_core::mood::classify;
use nocturne_core::validate::parse_melody;
use nocturne_midi::encode::encode_smf;
use nocturne_render::{Renderer, RendererConfig};

/// Arguments for one pipeline run.
pub struct PipelineArgs<'a> {
    /// Path to the raw melody text file.
    pub notes_path: &'a str,
    /// Mood word for classification.
    pub mood: &'a str,
    /// Tempo in beats per minute.
    pub tempo_bpm: u16,
    /// Directory receiving the artifacts.
    pub output_dir: &'a str,
    /// Base name for the artifacts.
    pub title: &'a str,
    /// Optional SoundFont override.
    pub sound_font: Option<&'a str>,
    /// Skip the render stage (stop after encoding).
    pub no_render: bool,
}

/// Run the pipeline command.
pub fn run(args: &PipelineArgs<'_>, json_output: bool) -> Result<ExitCode> {
    let classification = classify(args.mood);
    if !json_output {
        match classification {
            Some(c) => println!(
                "{} '{}' -> {} ({}, {})",
                "Mood:".cyan().bold(),
                args.mood,
                c.palette.as_str(),
                c.coordinate.x,
                c.coordinate.y
            ),
            None => println!(
                "{} '{}' is not in any mood palette",
                "Mood:".cyan().bold(),
                args.mood
            ),
        }
    }

    let raw = std::fs::read_to_string(Path::new(args.notes_path))
        .with_context(|| format!("Failed to read notes file: {}", args.notes_path))?;
    let events = match parse_melody(&raw) {
        Ok(events) => events,
        Err(err) => {
            if json_output {
                let value = serde_json::json!({ "ok": false, "stage": "validate", "error": err.to_string() });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                println!("{} {}", "Invalid melody:".red().bold(), err);
            }
            return Ok(ExitCode::FAILURE);
        }
    };

    let output_dir = Path::new(args.output_dir);
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory: {}", args.output_dir))?;

    let result = encode_smf(&events, args.tempo_bpm).context("MIDI encoding failed")?;
    let midi_path = output_dir.join(format!("{}.{}", args.title, result.extension));
    std::fs::write(&midi_path, &result.data)
        .with_context(|| format!("Failed to write MIDI file: {}", midi_path.display()))?;
    if !json_output {
        println!(
            "{} {} ({} events, {} bytes)",
            "Encoded:".green().bold(),
            midi_path.display(),
            events.len(),
            result.data.len()
        );
    }

    let audio_path = output_dir.join(format!("{}.wav", args.title));
    if args.no_render {
        if json_output {
            let value = serde_json::json!({
                "ok": true,
                "mood": mood_json(args.mood, &classification),
                "midi": midi_path,
                "hash": result.hash,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        return Ok(ExitCode::SUCCESS);
    }

    let mut config = RendererConfig::default();
    if let Some(sf) = args.sound_font {
        config = config.sound_font(sf);
    }
    let renderer = Renderer::with_config(config);
    match renderer.render(&midi_path, &audio_path) {
        Ok(path) => {
            if json_output {
                let value = serde_json::json!({
                    "ok": true,
                    "mood": mood_json(args.mood, &classification),
                    "midi": midi_path,
                    "audio": path,
                    "hash": result.hash,
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                println!("{} {}", "Rendered:".green().bold(), path.display());
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            if json_output {
                let value = serde_json::json!({ "ok": false, "stage": "render", "error": err.to_string() });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                println!("{} {}", "Render failed:".red().bold(), err);
            }
            Ok(ExitCode::FAILURE)
        }
    }
}

fn mood_json(
    word: &str,
    classification: &Option<nocturne_core::mood::Classification>,
) -> serde_json::Value {
    match classification {
        Some(c) => serde_json::json!({
            "word": word,
            "matched": true,
            "palette": c.palette.as_str(),
            "coordinate": { "x": c.coordinate.x, "y": c.coordinate.y },
        }),
        None => serde_json::json!({ "word": word, "matched": false }),
    }
}
