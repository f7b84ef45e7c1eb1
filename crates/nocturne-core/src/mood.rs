//! Mood classification over an arousal/valence word grid.
//!
//! Each palette is a fixed, ordered list of 36 mood words laid out as a
//! 6x6 grid. A word's position in its list encodes a 2D coordinate: columns
//! move away from the valence axis, rows move toward neutral arousal. The
//! four lists are disjoint by construction, so a word identifies exactly one
//! palette.
//!
//! Lookup is a single static word -> (palette, coordinate) map built once at
//! first use; classification is a pure function over that table.

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// Width of a palette grid row.
pub const GRID_WIDTH: usize = 6;

/// Number of words in each palette list.
pub const PALETTE_SIZE: usize = 36;

/// One of the four arousal/valence quadrants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoodPalette {
    /// High arousal, negative valence (anger, fear, stress).
    HighArousalNegative,
    /// Low arousal, negative valence (sadness, fatigue, despair).
    LowArousalNegative,
    /// High arousal, positive valence (excitement, joy, elation).
    HighArousalPositive,
    /// Low arousal, positive valence (calm, contentment, serenity).
    LowArousalPositive,
}

impl MoodPalette {
    /// Returns the palette as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            MoodPalette::HighArousalNegative => "high_arousal_negative",
            MoodPalette::LowArousalNegative => "low_arousal_negative",
            MoodPalette::HighArousalPositive => "high_arousal_positive",
            MoodPalette::LowArousalPositive => "low_arousal_positive",
        }
    }

    /// Returns all palettes in lookup order.
    ///
    /// The order is significant: when a word would appear in more than one
    /// list, the first palette containing it wins.
    pub fn all() -> &'static [MoodPalette] {
        &[
            MoodPalette::HighArousalNegative,
            MoodPalette::LowArousalNegative,
            MoodPalette::HighArousalPositive,
            MoodPalette::LowArousalPositive,
        ]
    }

    /// Returns the ordered word list backing this palette.
    pub fn words(&self) -> &'static [&'static str; PALETTE_SIZE] {
        match self {
            MoodPalette::HighArousalNegative => &HIGH_AROUSAL_NEGATIVE,
            MoodPalette::LowArousalNegative => &LOW_AROUSAL_NEGATIVE,
            MoodPalette::HighArousalPositive => &HIGH_AROUSAL_POSITIVE,
            MoodPalette::LowArousalPositive => &LOW_AROUSAL_POSITIVE,
        }
    }

    /// True for the two positive-valence palettes.
    pub fn is_positive_valence(&self) -> bool {
        matches!(
            self,
            MoodPalette::HighArousalPositive | MoodPalette::LowArousalPositive
        )
    }

    /// True for the two high-arousal palettes.
    pub fn is_high_arousal(&self) -> bool {
        matches!(
            self,
            MoodPalette::HighArousalNegative | MoodPalette::HighArousalPositive
        )
    }
}

/// A 2D point on the arousal/valence grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoodCoordinate {
    /// Valence axis: negative values for negative-valence palettes.
    pub x: i32,
    /// Arousal axis: negative values for low-arousal palettes.
    pub y: i32,
}

/// Result of a successful classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// The palette containing the word.
    pub palette: MoodPalette,
    /// The word's grid coordinate.
    pub coordinate: MoodCoordinate,
    /// The word's index within the palette list.
    pub index: usize,
}

/// High arousal, negative valence words, most intense first.
pub const HIGH_AROUSAL_NEGATIVE: [&str; PALETTE_SIZE] = [
    "enraged", "panicked", "stressed", "jittery", "shocked", "livid",
    "furious", "frantic", "tense", "nervous", "stunned", "fuming",
    "frightened", "angry", "restless", "anxious", "apprehensive", "worried",
    "irritated", "annoyed", "repulsed", "troubled", "concerned", "uneasy",
    "alarmed", "agitated", "exasperated", "rattled", "startled", "impatient",
    "peeved", "cross", "flustered", "unsettled", "wary", "perturbed",
];

/// Low arousal, negative valence words.
pub const LOW_AROUSAL_NEGATIVE: [&str; PALETTE_SIZE] = [
    "disgusted", "glum", "disappointed", "down", "apathetic", "pessimistic",
    "morose", "discouraged", "sad", "bored", "tired", "indifferent",
    "ashamed", "guilty", "mopey", "lonely", "disheartened", "drained",
    "despondent", "depressed", "sullen", "weary", "fatigued", "numb",
    "despairing", "hopeless", "desolate", "miserable", "sluggish", "listless",
    "alienated", "defeated", "dejected", "gloomy", "exhausted", "spent",
];

/// High arousal, positive valence words.
pub const HIGH_AROUSAL_POSITIVE: [&str; PALETTE_SIZE] = [
    "surprised", "upbeat", "festive", "exhilarated", "ecstatic", "elated",
    "hyper", "cheerful", "motivated", "inspired", "euphoric", "thrilled",
    "energized", "lively", "excited", "optimistic", "enthusiastic", "overjoyed",
    "pleased", "focused", "happy", "proud", "delighted", "jubilant",
    "pleasant", "joyful", "hopeful", "playful", "radiant", "eager",
    "amused", "gleeful", "spirited", "uplifted", "vibrant", "alive",
];

/// Low arousal, positive valence words.
pub const LOW_AROUSAL_POSITIVE: [&str; PALETTE_SIZE] = [
    "blessed", "grateful", "touched", "fulfilled", "loving", "blissful",
    "calm", "secure", "satisfied", "content", "warm", "tender",
    "relaxed", "restful", "balanced", "comfortable", "carefree", "easygoing",
    "mellow", "thoughtful", "peaceful", "gentle", "soothed", "settled",
    "sleepy", "complacent", "tranquil", "cozy", "serene", "safe",
    "drowsy", "dreamy", "placid", "untroubled", "composed", "rested",
];

/// Compute the grid coordinate for a word index within a palette.
///
/// Row and column are derived with integer division over the fixed grid
/// width; the palette determines the sign of each axis.
///
/// # Examples
/// ```
/// use nocturne_core::mood::{coordinate_for, MoodCoordinate, MoodPalette};
///
/// let c = coordinate_for(MoodPalette::HighArousalNegative, 0);
/// assert_eq!(c, MoodCoordinate { x: 0, y: 6 });
///
/// let c = coordinate_for(MoodPalette::HighArousalNegative, 6);
/// assert_eq!(c, MoodCoordinate { x: 0, y: 5 });
/// ```
pub fn coordinate_for(palette: MoodPalette, index: usize) -> MoodCoordinate {
    let row = (index / GRID_WIDTH) as i32;
    let col = (index % GRID_WIDTH) as i32;

    let x = if palette.is_positive_valence() {
        col
    } else {
        -col
    };
    let y = if palette.is_high_arousal() {
        GRID_WIDTH as i32 - row
    } else {
        -(GRID_WIDTH as i32 - row)
    };

    MoodCoordinate { x, y }
}

static WORD_INDEX: OnceLock<HashMap<&'static str, Classification>> = OnceLock::new();

fn word_index() -> &'static HashMap<&'static str, Classification> {
    WORD_INDEX.get_or_init(|| {
        let mut map = HashMap::new();
        for &palette in MoodPalette::all() {
            for (index, &word) in palette.words().iter().enumerate() {
                // First palette containing a word wins.
                map.entry(word).or_insert(Classification {
                    palette,
                    coordinate: coordinate_for(palette, index),
                    index,
                });
            }
        }
        map
    })
}

/// Classify a mood word.
///
/// The match is case-sensitive and exact; no stemming or normalization is
/// applied. A word absent from all four palettes yields `None`, which is a
/// normal result rather than a failure.
///
/// # Examples
/// ```
/// use nocturne_core::mood::{classify, MoodPalette};
///
/// let c = classify("sad").unwrap();
/// assert_eq!(c.palette, MoodPalette::LowArousalNegative);
///
/// assert!(classify("Sad").is_none());
/// assert!(classify("defenestrated").is_none());
/// ```
pub fn classify(word: &str) -> Option<Classification> {
    word_index().get(word).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_palette_lists_are_full_grids() {
        for &palette in MoodPalette::all() {
            assert_eq!(palette.words().len(), PALETTE_SIZE);
        }
    }

    #[test]
    fn test_palette_lists_are_disjoint() {
        let mut seen = HashSet::new();
        for &palette in MoodPalette::all() {
            for &word in palette.words() {
                assert!(
                    seen.insert(word),
                    "word '{}' appears in more than one palette",
                    word
                );
            }
        }
        assert_eq!(seen.len(), PALETTE_SIZE * 4);
    }

    #[test]
    fn test_coordinate_boundaries() {
        // First word of the grid sits on the arousal axis at full intensity.
        assert_eq!(
            coordinate_for(MoodPalette::HighArousalNegative, 0),
            MoodCoordinate { x: 0, y: 6 }
        );
        // Start of the second row drops one arousal step.
        assert_eq!(
            coordinate_for(MoodPalette::HighArousalNegative, 6),
            MoodCoordinate { x: 0, y: 5 }
        );
        // Last cell of the grid.
        assert_eq!(
            coordinate_for(MoodPalette::HighArousalNegative, 35),
            MoodCoordinate { x: -5, y: 1 }
        );
        assert_eq!(
            coordinate_for(MoodPalette::LowArousalPositive, 35),
            MoodCoordinate { x: 5, y: -1 }
        );
    }

    #[test]
    fn test_coordinate_signs_per_quadrant() {
        for &palette in MoodPalette::all() {
            for index in 0..PALETTE_SIZE {
                let c = coordinate_for(palette, index);
                if palette.is_positive_valence() {
                    assert!(c.x >= 0);
                } else {
                    assert!(c.x <= 0);
                }
                if palette.is_high_arousal() {
                    assert!(c.y > 0);
                } else {
                    assert!(c.y < 0);
                }
                assert!(c.x.abs() <= 6 && c.y.abs() <= 6);
            }
        }
    }

    #[test]
    fn test_classify_known_words() {
        let c = classify("enraged").unwrap();
        assert_eq!(c.palette, MoodPalette::HighArousalNegative);
        assert_eq!(c.coordinate, MoodCoordinate { x: 0, y: 6 });
        assert_eq!(c.index, 0);

        let c = classify("furious").unwrap();
        assert_eq!(c.coordinate, MoodCoordinate { x: 0, y: 5 });

        let c = classify("sad").unwrap();
        assert_eq!(c.palette, MoodPalette::LowArousalNegative);
        assert_eq!(c.index, 8);
        assert_eq!(c.coordinate, MoodCoordinate { x: -2, y: -5 });

        let c = classify("serene").unwrap();
        assert_eq!(c.palette, MoodPalette::LowArousalPositive);
    }

    #[test]
    fn test_classify_is_deterministic_and_total_over_lists() {
        for &palette in MoodPalette::all() {
            for (index, &word) in palette.words().iter().enumerate() {
                let first = classify(word).expect("listed word must classify");
                let second = classify(word).unwrap();
                assert_eq!(first, second);
                assert_eq!(first.palette, palette);
                assert_eq!(first.index, index);
                assert_eq!(first.coordinate, coordinate_for(palette, index));
            }
        }
    }

    #[test]
    fn test_classify_miss_is_none() {
        assert!(classify("").is_none());
        assert!(classify("melancholy").is_none());
        // Case-sensitive: no normalization of input.
        assert!(classify("Enraged").is_none());
        assert!(classify("SAD").is_none());
    }
}
