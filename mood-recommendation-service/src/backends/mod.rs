pub mod bert;
pub mod ollama;

pub use bert::BertEmotionBackend;
pub use ollama::OllamaChatBackend;
