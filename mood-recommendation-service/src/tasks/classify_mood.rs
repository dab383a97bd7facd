use async_trait::async_trait;
use mood_flow::GraphError::{ContextError, TaskExecutionFailed};
use mood_flow::{Context, NextAction, Task, TaskResult};
use tracing::{error, info};

use super::context_keys;
use crate::classifier::MoodClassifier;

/// Task that classifies the generated reply, not the raw user query, so the
/// mood reflects the whole exchange
pub struct ClassifyMoodTask {
    classifier: MoodClassifier,
}

impl ClassifyMoodTask {
    pub fn new(classifier: MoodClassifier) -> Self {
        Self { classifier }
    }
}

#[async_trait]
impl Task for ClassifyMoodTask {
    async fn run(&self, context: Context) -> mood_flow::Result<TaskResult> {
        let reply: String = context
            .get(context_keys::CHATBOT_RESPONSE)
            .await
            .ok_or_else(|| ContextError("chatbot_response not found in context".into()))?;

        let mood = self.classifier.classify_mood(&reply).await.map_err(|e| {
            error!("Mood classification failed: {}", e);
            TaskExecutionFailed(e.to_string())
        })?;

        info!(%mood, "Detected mood");
        context.set(context_keys::MOOD, mood).await;

        Ok(TaskResult::new(None, NextAction::Continue))
    }
}
