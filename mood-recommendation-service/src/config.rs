use std::time::Duration;

use crate::error::ConfigError;

const DEFAULT_CHAT_MODEL: &str = "llama3.2";
const DEFAULT_EMOTION_MODEL: &str = "nateraw/bert-base-uncased-emotion";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;
const DEFAULT_CHAT_TIMEOUT_SECS: u64 = 120;

/// Configuration for the recommendation service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub spotify_client_id: String,
    pub spotify_client_secret: String,
    /// Ollama model used for the supportive reply
    pub chat_model: String,
    /// Hugging Face id of the emotion classifier
    pub emotion_model: String,
    /// Local snapshot of the emotion classifier; skips the hub download
    pub emotion_model_dir: Option<String>,
    pub port: u16,
    /// Timeout for catalog provider calls
    pub http_timeout: Duration,
    /// Timeout for one chat backend call
    pub chat_timeout: Duration,
}

impl ServiceConfig {
    /// Load from the process environment. Call `dotenvy::dotenv()` first to
    /// pick up a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required =
            |key: &'static str| non_blank(key).ok_or(ConfigError::Missing(key));

        Ok(Self {
            spotify_client_id: required("SPOTIFY_CLIENT_ID")?,
            spotify_client_secret: required("SPOTIFY_CLIENT_SECRET")?,
            chat_model: non_blank("CHAT_MODEL").unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string()),
            emotion_model: non_blank("EMOTION_MODEL")
                .unwrap_or_else(|| DEFAULT_EMOTION_MODEL.to_string()),
            emotion_model_dir: non_blank("EMOTION_MODEL_DIR"),
            port: parse_or("PORT", non_blank("PORT"), DEFAULT_PORT)?,
            http_timeout: Duration::from_secs(parse_or(
                "HTTP_TIMEOUT_SECS",
                non_blank("HTTP_TIMEOUT_SECS"),
                DEFAULT_HTTP_TIMEOUT_SECS,
            )?),
            chat_timeout: Duration::from_secs(parse_or(
                "CHAT_TIMEOUT_SECS",
                non_blank("CHAT_TIMEOUT_SECS"),
                DEFAULT_CHAT_TIMEOUT_SECS,
            )?),
        })
    }
}

fn parse_or<T>(var: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            reason: format!("{raw:?}: {e}"),
        }),
    }
}
