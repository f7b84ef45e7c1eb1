//! Error types for the render dispatcher.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for render operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur while dispatching a render job.
#[derive(Debug, Error)]
pub enum RenderError {
    /// FluidSynth executable not found.
    #[error("FluidSynth executable not found. Ensure fluidsynth is installed and in PATH, or set FLUIDSYNTH_PATH environment variable")]
    SynthNotFound,

    /// No SoundFont available for synthesis.
    #[error("No SoundFont found. Install a General MIDI SoundFont or set NOCTURNE_SOUND_FONT environment variable")]
    SoundFontNotFound,

    /// The input MIDI file does not exist.
    #[error("Input MIDI file not found: {path}")]
    MidiNotFound {
        /// The missing input path.
        path: PathBuf,
    },

    /// Failed to spawn the FluidSynth process.
    #[error("Failed to spawn FluidSynth process: {0}")]
    SpawnFailed(#[source] std::io::Error),

    /// The FluidSynth process exceeded the configured timeout.
    #[error("FluidSynth process timed out after {timeout_secs} seconds")]
    Timeout {
        /// Configured timeout in seconds.
        timeout_secs: u64,
    },

    /// The FluidSynth process exited with non-zero status.
    ///
    /// Never retried here: the dispatcher cannot tell a transient failure
    /// from a persistent one, so retry policy belongs to the caller.
    #[error("FluidSynth exited with status {exit_code}: {stderr}")]
    BackendFailure {
        /// Process exit code (-1 when terminated by signal).
        exit_code: i32,
        /// Captured stderr output.
        stderr: String,
    },

    /// FluidSynth reported success but the audio file is missing.
    #[error("Expected audio output not found: {path}")]
    OutputNotFound {
        /// The missing output path.
        path: PathBuf,
    },

    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RenderError {
    /// Creates a new backend failure error.
    pub fn backend_failure(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self::BackendFailure {
            exit_code,
            stderr: stderr.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RenderError::SynthNotFound;
        assert!(err.to_string().contains("FluidSynth executable not found"));

        let err = RenderError::Timeout { timeout_secs: 120 };
        assert!(err.to_string().contains("120 seconds"));

        let err = RenderError::backend_failure(3, "synthesis failed");
        assert!(err.to_string().contains("status 3"));
        assert!(err.to_string().contains("synthesis failed"));
    }
}
