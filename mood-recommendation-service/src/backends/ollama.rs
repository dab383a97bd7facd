use std::time::Duration;

use async_trait::async_trait;
use rig::completion::Prompt;
use rig::prelude::*;
use rig::providers::ollama;
use tracing::{error, info};

use crate::{error::BackendError, generator::ChatBackend};

/// Chat backend served by a local Ollama daemon through rig.
pub struct OllamaChatBackend {
    client: ollama::Client,
    model: String,
    timeout: Duration,
}

impl OllamaChatBackend {
    /// Uses the daemon on its default local address.
    pub fn new(model: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: ollama::Client::new(),
            model: model.into(),
            timeout,
        }
    }
}

#[async_trait]
impl ChatBackend for OllamaChatBackend {
    async fn chat(&self, system: &str, user: &str) -> Result<Option<String>, BackendError> {
        info!(model = %self.model, "Sending prompt to chat backend");

        let agent = self.client.agent(&self.model).preamble(system).build();

        let reply = tokio::time::timeout(self.timeout, agent.prompt(user))
            .await
            .map_err(|_| {
                error!(model = %self.model, timeout_secs = self.timeout.as_secs(), "Chat backend timed out");
                BackendError::Generation(format!(
                    "{} timed out after {}s",
                    self.model,
                    self.timeout.as_secs()
                ))
            })?
            .map_err(|e| {
                error!(model = %self.model, "Chat backend failed: {}", e);
                BackendError::Generation(format!("{} error: {}", self.model, e))
            })?;

        Ok(usable_reply(reply))
    }
}

/// A whitespace-only answer counts as no answer.
fn usable_reply(reply: String) -> Option<String> {
    Some(reply).filter(|r| !r.trim().is_empty())
}
