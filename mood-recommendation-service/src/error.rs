use thiserror::Error;

/// Failure of the text-generation or emotion-classification backend.
/// Fatal to the request that hit it.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Chat backend error: {0}")]
    Generation(String),

    #[error("Emotion classifier error: {0}")]
    Classification(String),
}

/// Failure of a music or film catalog. Never leaves the catalog step; it is
/// turned into a sentinel recommendation instead.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Invalid or missing start-up configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set. Add it to the environment or the .env file")]
    Missing(&'static str),

    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },
}
