//! Interface to the external melody generation service.
//!
//! The service itself (an LLM completion API) lives outside this workspace;
//! this module defines the boundary: the request/response types, the
//! credential configuration that callers inject explicitly, and the trait a
//! concrete client implements. Nothing here performs I/O.

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default completion model requested from the generation service.
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Credentials and model selection for the generation service.
///
/// Passed explicitly to whatever implements [`MelodyGenerator`]; there is no
/// process-wide client or ambient API key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorCredentials {
    /// API key for the completion service.
    pub api_key: String,
    /// Model identifier to request.
    pub model: String,
}

impl GeneratorCredentials {
    /// Create credentials with the default model.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Override the model identifier.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

/// A request for one generated melody.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MelodyRequest {
    /// Free-text mood word (also fed to the mood classifier).
    pub mood: String,
    /// Genre the melody should follow.
    pub genre: String,
    /// Requested song length in beats.
    pub duration_beats: f64,
}

/// The raw product of the generation service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedMelody {
    /// Untrusted note-list text; must go through
    /// [`parse_melody`](crate::validate::parse_melody) before use.
    pub notes_text: String,
    /// One-word song title, used to name output artifacts.
    pub title: String,
}

/// Error type for melody generation.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// No API key was configured.
    #[error("generation service credentials are missing")]
    MissingCredentials,

    /// The service rejected the request or failed.
    #[error("generation service error: {0}")]
    Backend(String),

    /// The service answered with something other than a melody.
    #[error("generation service returned an unusable response: {0}")]
    MalformedResponse(String),
}

/// A client for the external melody generation service.
pub trait MelodyGenerator {
    /// Request one melody for the given mood/genre/duration.
    fn generate(&self, request: &MelodyRequest) -> Result<GeneratedMelody, GenerateError>;
}

/// Pick a genre uniformly at random from a caller-supplied list.
///
/// Returns `None` for an empty list. The index is always within bounds.
pub fn select_genre<'a, R: Rng>(genres: &'a [String], rng: &mut R) -> Option<&'a str> {
    if genres.is_empty() {
        return None;
    }
    let index = rng.gen_range(0..genres.len());
    Some(genres[index].as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_credentials_default_model() {
        let creds = GeneratorCredentials::new("sk-test");
        assert_eq!(creds.model, DEFAULT_MODEL);
        let creds = creds.with_model("gpt-4o-mini");
        assert_eq!(creds.model, "gpt-4o-mini");
    }

    #[test]
    fn test_select_genre_empty() {
        let mut rng = Pcg32::seed_from_u64(1);
        assert_eq!(select_genre(&[], &mut rng), None);
    }

    #[test]
    fn test_select_genre_single() {
        let mut rng = Pcg32::seed_from_u64(1);
        let genres = vec!["classical".to_string()];
        assert_eq!(select_genre(&genres, &mut rng), Some("classical"));
    }

    #[test]
    fn test_select_genre_always_in_bounds() {
        let genres: Vec<String> = ["classical", "jazz", "ambient"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let mut rng = Pcg32::seed_from_u64(42);
        for _ in 0..1000 {
            let picked = select_genre(&genres, &mut rng).unwrap();
            assert!(genres.iter().any(|g| g == picked));
        }
    }

    #[test]
    fn test_select_genre_deterministic_under_seed() {
        let genres: Vec<String> = ["classical", "jazz", "ambient"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let mut a = Pcg32::seed_from_u64(7);
        let mut b = Pcg32::seed_from_u64(7);
        for _ in 0..100 {
            assert_eq!(select_genre(&genres, &mut a), select_genre(&genres, &mut b));
        }
    }
}
