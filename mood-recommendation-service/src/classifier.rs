use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::{
    error::BackendError,
    mood::{DEFAULT_MOOD, MoodLabel, NATIVE_LABELS, normalize},
};

/// A pretrained emotion classifier.
#[async_trait]
pub trait EmotionBackend: Send + Sync {
    /// Probability per native label, indexed like [`NATIVE_LABELS`].
    async fn scores(&self, text: &str) -> Result<Vec<f32>, BackendError>;
}

/// Reduces the classifier distribution for a text to a canonical mood.
#[derive(Clone)]
pub struct MoodClassifier {
    backend: Arc<dyn EmotionBackend>,
}

impl MoodClassifier {
    pub fn new(backend: Arc<dyn EmotionBackend>) -> Self {
        Self { backend }
    }

    /// Only a failing backend is an error. Odd distributions (empty, all NaN,
    /// argmax past the known labels) resolve to the default mood.
    pub async fn classify_mood(&self, text: &str) -> Result<MoodLabel, BackendError> {
        let scores = self.backend.scores(text).await?;
        let native = argmax_label(&scores);
        let mood = native.map(normalize).unwrap_or(DEFAULT_MOOD);

        info!(
            native_label = native.unwrap_or("<none>"),
            %mood,
            "Mood classified"
        );
        Ok(mood)
    }
}

/// Native label with the highest score. Ties go to the first index; NaN
/// scores are skipped.
pub fn argmax_label(scores: &[f32]) -> Option<&'static str> {
    let mut best: Option<(usize, f32)> = None;
    for (idx, &score) in scores.iter().enumerate() {
        if score.is_nan() {
            continue;
        }
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((idx, score)),
        }
    }
    best.and_then(|(idx, _)| NATIVE_LABELS.get(idx).copied())
}
