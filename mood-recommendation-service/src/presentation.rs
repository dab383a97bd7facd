//! Plain-text rendering of a recommendation for terminal clients.

use std::fmt::{self, Write};

use crate::models::RecommendationResult;

pub const EMPTY_INPUT_WARNING: &str = "Please enter how you're feeling.";
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch recommendations. Please try again.";

pub fn render(result: &RecommendationResult) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    write_sections(&mut out, result).ok();
    out
}

fn write_sections(out: &mut impl Write, result: &RecommendationResult) -> fmt::Result {
    writeln!(out, "Chatbot Response")?;
    writeln!(out, "{}\n", result.chatbot_response)?;
    writeln!(out, "Detected Mood: {}\n", capitalize(result.mood.as_str()))?;

    writeln!(out, "Recommended Songs:")?;
    for song in &result.songs {
        if song.url.is_empty() {
            writeln!(out, "  {} - {}", song.name, song.artist)?;
        } else {
            writeln!(out, "  {} - {} ({})", song.name, song.artist, song.url)?;
        }
    }

    writeln!(out, "\nRecommended Movies:")?;
    for movie in &result.movies {
        writeln!(out, "  {}", movie.title)?;
    }
    Ok(())
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
