use serde::{Deserialize, Serialize};

use crate::mood::MoodLabel;

/// A song suggestion. Sentinel entries carry their message in `name` and
/// leave `artist` and `url` empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    pub name: String,
    pub artist: String,
    pub url: String,
}

/// A movie suggestion. Sentinel entries carry their message in `title`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    pub title: String,
}

/// Everything one `/recommend` call returns. All four fields are always
/// present; `songs` and `movies` are never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationResult {
    pub chatbot_response: String,
    pub mood: MoodLabel,
    pub songs: Vec<Song>,
    pub movies: Vec<Movie>,
}

#[derive(Debug, Deserialize)]
pub struct RecommendParams {
    pub query: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}
