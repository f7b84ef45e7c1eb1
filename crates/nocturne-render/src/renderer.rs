//! FluidSynth subprocess dispatcher.
//!
//! The dispatcher is a thin boundary around the external synthesizer: it
//! resolves the executable and a SoundFont, invokes
//! `fluidsynth -ni <soundfont> <midi> -F <audio> -r <rate>`, and reports the
//! outcome as a typed result. It never retries; rendering is not known to be
//! safe to repeat blindly, so retry policy stays with the caller.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use crate::error::{RenderError, RenderResult};

/// Default timeout for FluidSynth execution (2 minutes).
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default output sample rate in Hz.
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// Common SoundFont installation paths, checked in order.
const COMMON_SOUND_FONTS: &[&str] = &[
    "/usr/share/sounds/sf2/FluidR3_GM.sf2",
    "/usr/share/sounds/sf2/default-GM.sf2",
    "/usr/share/soundfonts/default.sf2",
    "/usr/share/soundfonts/FluidR3_GM.sf2",
];

/// Configuration for the render dispatcher.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Path to the FluidSynth executable.
    pub fluidsynth_path: Option<PathBuf>,
    /// Path to the SoundFont used for synthesis.
    pub sound_font: Option<PathBuf>,
    /// Output sample rate in Hz.
    pub sample_rate: u32,
    /// Timeout for FluidSynth execution.
    pub timeout: Duration,
    /// Whether to capture FluidSynth's stderr.
    pub capture_output: bool,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            fluidsynth_path: None,
            sound_font: None,
            sample_rate: DEFAULT_SAMPLE_RATE,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            capture_output: true,
        }
    }
}

impl RendererConfig {
    /// Sets the FluidSynth executable path.
    pub fn fluidsynth_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.fluidsynth_path = Some(path.into());
        self
    }

    /// Sets the SoundFont path.
    pub fn sound_font(mut self, path: impl Into<PathBuf>) -> Self {
        self.sound_font = Some(path.into());
        self
    }

    /// Sets the output sample rate.
    pub fn sample_rate(mut self, rate: u32) -> Self {
        self.sample_rate = rate;
        self
    }

    /// Sets the timeout in seconds.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }
}

/// The render dispatcher.
pub struct Renderer {
    config: RendererConfig,
}

impl Renderer {
    /// Creates a dispatcher with default configuration.
    pub fn new() -> Self {
        Self {
            config: RendererConfig::default(),
        }
    }

    /// Creates a dispatcher with the given configuration.
    pub fn with_config(config: RendererConfig) -> Self {
        Self { config }
    }

    /// Finds the FluidSynth executable.
    fn find_fluidsynth(&self) -> RenderResult<PathBuf> {
        // Check config override first
        if let Some(ref path) = self.config.fluidsynth_path {
            if path.exists() {
                return Ok(path.clone());
            }
        }

        // Check FLUIDSYNTH_PATH environment variable
        if let Ok(path) = std::env::var("FLUIDSYNTH_PATH") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Ok(path);
            }
        }

        // Try to find fluidsynth in PATH
        if let Ok(path) = which::which("fluidsynth") {
            return Ok(path);
        }

        // Try common installation paths
        let common_paths = if cfg!(target_os = "macos") {
            vec![
                "/opt/homebrew/bin/fluidsynth",
                "/usr/local/bin/fluidsynth",
            ]
        } else {
            vec!["/usr/bin/fluidsynth", "/usr/local/bin/fluidsynth"]
        };

        for path_str in common_paths {
            let path = PathBuf::from(path_str);
            if path.exists() {
                return Ok(path);
            }
        }

        Err(RenderError::SynthNotFound)
    }

    /// Finds a SoundFont to synthesize with.
    fn find_sound_font(&self) -> RenderResult<PathBuf> {
        if let Some(ref path) = self.config.sound_font {
            if path.exists() {
                return Ok(path.clone());
            }
        }

        if let Ok(path) = std::env::var("NOCTURNE_SOUND_FONT") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Ok(path);
            }
        }

        for path_str in COMMON_SOUND_FONTS {
            let path = PathBuf::from(path_str);
            if path.exists() {
                return Ok(path);
            }
        }

        Err(RenderError::SoundFontNotFound)
    }

    /// Renders a MIDI file to an audio file.
    ///
    /// # Arguments
    ///
    /// * `midi_path` - Path to the input MIDI file
    /// * `audio_path` - Path where the audio output should be written
    ///
    /// Returns the audio output path on success. A non-zero exit from
    /// FluidSynth surfaces as [`RenderError::BackendFailure`]; the call is
    /// never retried internally.
    pub fn render(&self, midi_path: &Path, audio_path: &Path) -> RenderResult<PathBuf> {
        if !midi_path.exists() {
            return Err(RenderError::MidiNotFound {
                path: midi_path.to_path_buf(),
            });
        }

        let fluidsynth = self.find_fluidsynth()?;
        let sound_font = self.find_sound_font()?;

        // fluidsynth -ni <soundfont> <midi> -F <audio> -r <rate>
        let mut cmd = Command::new(&fluidsynth);
        cmd.arg("-ni")
            .arg(&sound_font)
            .arg(midi_path)
            .arg("-F")
            .arg(audio_path)
            .arg("-r")
            .arg(self.config.sample_rate.to_string());

        if self.config.capture_output {
            // Keep stdout unpiped so a chatty synth can never fill the pipe
            // and deadlock; only stderr is surfaced.
            cmd.stdout(Stdio::null()).stderr(Stdio::piped());
        }

        let child = cmd.spawn().map_err(RenderError::SpawnFailed)?;

        let (status, stderr) =
            wait_with_timeout(child, self.config.timeout, self.config.capture_output)?;

        if !status.success() {
            let exit_code = status.code().unwrap_or(-1);
            return Err(RenderError::backend_failure(exit_code, stderr));
        }

        if !audio_path.exists() {
            return Err(RenderError::OutputNotFound {
                path: audio_path.to_path_buf(),
            });
        }

        Ok(audio_path.to_path_buf())
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

fn wait_with_timeout(
    mut child: Child,
    timeout: Duration,
    capture_output: bool,
) -> RenderResult<(ExitStatus, String)> {
    let start = Instant::now();

    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {
                if start.elapsed() > timeout {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(RenderError::Timeout {
                        timeout_secs: timeout.as_secs(),
                    });
                }
                std::thread::sleep(Duration::from_millis(50));
            }
            Err(e) => return Err(RenderError::SpawnFailed(e)),
        }
    };

    let stderr = if capture_output {
        let mut buf = String::new();
        if let Some(mut err) = child.stderr.take() {
            let _ = err.read_to_string(&mut buf);
        }
        buf
    } else {
        String::new()
    };

    Ok((status, stderr))
}
