//! Mood vocabulary and the static tables around it.
//!
//! The emotion classifier speaks a seven-word native vocabulary. It is folded
//! into four canonical moods, and each mood picks a song search term and a
//! movie genre. Every table has an explicit default so that a drifting label
//! set degrades to a sensible answer instead of an error.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical mood reported to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoodLabel {
    Happy,
    Sad,
    Angry,
    Neutral,
}

impl MoodLabel {
    pub const ALL: [MoodLabel; 4] = [Self::Happy, Self::Sad, Self::Angry, Self::Neutral];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Happy => "happy",
            Self::Sad => "sad",
            Self::Angry => "angry",
            Self::Neutral => "neutral",
        }
    }
}

impl fmt::Display for MoodLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Native classifier labels, in output-index order. Argmax ties resolve to
/// the earliest entry.
pub const NATIVE_LABELS: [&str; 7] = [
    "sadness", "joy", "anger", "fear", "surprise", "disgust", "neutral",
];

const NATIVE_TO_MOOD: &[(&str, MoodLabel)] = &[
    ("joy", MoodLabel::Happy),
    ("sadness", MoodLabel::Sad),
    ("anger", MoodLabel::Angry),
    ("neutral", MoodLabel::Neutral),
];

pub const DEFAULT_MOOD: MoodLabel = MoodLabel::Neutral;

const SONG_QUERIES: &[(&str, &str)] = &[
    ("happy", "happy upbeat"),
    ("sad", "sad emotional"),
    ("angry", "rock aggressive"),
    ("neutral", "chill lo-fi"),
];

pub const DEFAULT_SONG_QUERY: &str = "chill music";

const MOVIE_GENRES: &[(&str, &str)] = &[
    ("happy", "Comedy"),
    ("sad", "Drama"),
    ("angry", "Action"),
    ("neutral", "Adventure"),
];

pub const DEFAULT_MOVIE_GENRE: &str = "Drama";

fn lookup<T: Copy>(table: &[(&str, T)], key: &str) -> Option<T> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

/// Fold a native classifier label into a canonical mood. Labels without an
/// entry (fear, surprise, disgust, anything unknown) become neutral.
pub fn normalize(native_label: &str) -> MoodLabel {
    lookup(NATIVE_TO_MOOD, native_label).unwrap_or(DEFAULT_MOOD)
}

/// Music catalog search term for a mood name
pub fn song_query_for(mood: &str) -> &'static str {
    lookup(SONG_QUERIES, mood).unwrap_or(DEFAULT_SONG_QUERY)
}

/// Film catalog genre term for a mood name
pub fn movie_genre_for(mood: &str) -> &'static str {
    lookup(MOVIE_GENRES, mood).unwrap_or(DEFAULT_MOVIE_GENRE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapped_native_labels_normalize_to_their_mood() {
        assert_eq!(normalize("joy"), MoodLabel::Happy);
        assert_eq!(normalize("sadness"), MoodLabel::Sad);
        assert_eq!(normalize("anger"), MoodLabel::Angry);
        assert_eq!(normalize("neutral"), MoodLabel::Neutral);
    }

    #[test]
    fn unmapped_native_labels_normalize_to_neutral() {
        for label in ["fear", "surprise", "disgust", "love", "", "JOY", "joy "] {
            assert_eq!(normalize(label), MoodLabel::Neutral, "label {label:?}");
        }
    }

    #[test]
    fn every_native_label_normalizes_to_a_canonical_mood() {
        for label in NATIVE_LABELS {
            assert!(MoodLabel::ALL.contains(&normalize(label)));
        }
    }

    #[test]
    fn canonical_moods_map_to_documented_terms() {
        let expected = [
            (MoodLabel::Happy, "happy upbeat", "Comedy"),
            (MoodLabel::Sad, "sad emotional", "Drama"),
            (MoodLabel::Angry, "rock aggressive", "Action"),
            (MoodLabel::Neutral, "chill lo-fi", "Adventure"),
        ];
        for (mood, song_query, genre) in expected {
            assert_eq!(song_query_for(mood.as_str()), song_query);
            assert_eq!(movie_genre_for(mood.as_str()), genre);
        }
    }

    #[test]
    fn unknown_mood_names_fall_back_to_defaults() {
        assert_eq!(song_query_for("ecstatic"), "chill music");
        assert_eq!(movie_genre_for("ecstatic"), "Drama");
        assert_eq!(song_query_for(""), DEFAULT_SONG_QUERY);
    }

    #[test]
    fn lookups_are_stable_across_calls() {
        for label in ["joy", "disgust", "whatever"] {
            assert_eq!(normalize(label), normalize(label));
        }
        for mood in MoodLabel::ALL {
            assert_eq!(song_query_for(mood.as_str()), song_query_for(mood.as_str()));
            assert_eq!(movie_genre_for(mood.as_str()), movie_genre_for(mood.as_str()));
        }
    }

    #[test]
    fn mood_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&MoodLabel::Angry).unwrap(), "\"angry\"");
        assert_eq!(MoodLabel::Happy.to_string(), "happy");
    }
}
