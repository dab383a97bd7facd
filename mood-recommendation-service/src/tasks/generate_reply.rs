use async_trait::async_trait;
use mood_flow::GraphError::{ContextError, TaskExecutionFailed};
use mood_flow::{Context, NextAction, Task, TaskResult};
use tracing::{error, info};

use super::context_keys;
use crate::generator::ResponseGenerator;

/// Task that asks the chat backend for a supportive reply to the user query
pub struct GenerateReplyTask {
    generator: ResponseGenerator,
}

impl GenerateReplyTask {
    pub fn new(generator: ResponseGenerator) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl Task for GenerateReplyTask {
    async fn run(&self, context: Context) -> mood_flow::Result<TaskResult> {
        let request_id: String = context
            .get(context_keys::REQUEST_ID)
            .await
            .unwrap_or_else(|| "unknown".to_string());

        let user_query: String = context
            .get(context_keys::USER_QUERY)
            .await
            .ok_or_else(|| ContextError("user_query not found in context".into()))?;

        info!(%request_id, "Generating chat reply");

        let reply = self.generator.generate_reply(&user_query).await.map_err(|e| {
            error!(%request_id, "Reply generation failed: {}", e);
            TaskExecutionFailed(e.to_string())
        })?;

        context.set(context_keys::CHATBOT_RESPONSE, reply.clone()).await;

        Ok(TaskResult::new(Some(reply), NextAction::Continue))
    }
}
