//! Nocturne CLI - mood-driven MIDI generation pipeline.
//!
//! This binary provides commands for classifying mood words, validating
//! generated melody text, encoding it to Standard MIDI Files, and
//! dispatching renders to FluidSynth.

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::process::ExitCode;

use nocturne_cli::commands;

/// Nocturne - Mood-Driven Music Generation Pipeline
#[derive(Parser)]
#[command(name = "nocturne")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a mood word into a palette and grid coordinate
    Classify {
        /// The mood word (case-sensitive, exact match)
        #[arg(short, long)]
        word: String,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Validate a raw melody text file
    Validate {
        /// Path to the melody text file
        #[arg(short, long)]
        notes: String,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Encode a melody text file into a Standard MIDI File
    Encode {
        /// Path to the melody text file
        #[arg(short, long)]
        notes: String,

        /// Tempo in beats per minute
        #[arg(short, long, default_value_t = 120)]
        tempo: u16,

        /// Output MIDI file path
        #[arg(short, long)]
        output: String,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Render an encoded MIDI file to audio via FluidSynth
    Render {
        /// Path to the input MIDI file
        #[arg(short, long)]
        input: String,

        /// Output audio file path
        #[arg(short, long)]
        output: String,

        /// SoundFont file to synthesize with
        #[arg(long)]
        sound_font: Option<String>,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Run the full pipeline: classify, validate, encode, render
    Pipeline {
        /// Path to the melody text file
        #[arg(short, long)]
        notes: String,

        /// Mood word for classification
        #[arg(short, long)]
        mood: String,

        /// Tempo in beats per minute
        #[arg(short, long, default_value_t = 120)]
        tempo: u16,

        /// Directory receiving the artifacts
        #[arg(short, long, default_value = ".")]
        output_dir: String,

        /// Base name for the artifacts
        #[arg(long, default_value = "nocturne")]
        title: String,

        /// SoundFont file to synthesize with
        #[arg(long)]
        sound_font: Option<String>,

        /// Stop after encoding (skip the render stage)
        #[arg(long)]
        no_render: bool,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Classify { word, json } => commands::classify::run(word, *json),
        Commands::Validate { notes, json } => commands::validate::run(notes, *json),
        Commands::Encode {
            notes,
            tempo,
            output,
            json,
        } => commands::encode::run(notes, *tempo, output, *json),
        Commands::Render {
            input,
            output,
            sound_font,
            json,
        } => commands::render::run(input, output, sound_font.as_deref(), *json),
        Commands::Pipeline {
            notes,
            mood,
            tempo,
            output_dir,
            title,
            sound_font,
            no_render,
            json,
        } => commands::pipeline::run(
            &commands::pipeline::PipelineArgs {
                notes_path: notes,
                mood,
                tempo_bpm: *tempo,
                output_dir,
                title,
                sound_font: sound_font.as_deref(),
                no_render: *no_render,
            },
            *json,
        ),
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{} {:#}", "Error:".red().bold(), err);
            ExitCode::FAILURE
        }
    }
}
