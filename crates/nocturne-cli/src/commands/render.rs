//! Render command implementation.

use anyhow::Result;
use colored::Colorize;
use std::path::Path;
use std::process::ExitCode;

use nocturne_render::{Renderer, RendererConfig};

/// Run the render command.
///
/// Dispatches an encoded MIDI file to FluidSynth. Failures are reported,
/// never retried; rerunning the command is the caller's retry policy.
pub fn run(
    input: &str,
    output: &str,
    sound_font: Option<&str>,
    json_output: bool,
) -> Result<ExitCode> {
    let mut config = RendererConfig::default();
    if let Some(sf) = sound_font {
        config = config.sound_font(sf);
    }
    let renderer = Renderer::with_config(config);

    match renderer.render(Path::new(input), Path::new(output)) {
        Ok(path) => {
            if json_output {
                let value = serde_json::json!({ "ok": true, "output": path });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                println!("{} {}", "Rendered:".green().bold(), path.display());
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            if json_output {
                let value = serde_json::json!({ "ok": false, "error": err.to_string() });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                println!("{} {}", "Render failed:".red().bold(), err);
            }
            Ok(ExitCode::FAILURE)
        }
    }
}
