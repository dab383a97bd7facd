use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::error::BackendError;

/// Fixed system turn sent ahead of every user message
pub const SYSTEM_INSTRUCTION: &str =
    "You are a helpful AI that provides emotional support and recommendations.";

/// Used when the backend answers successfully but without any content
pub const FALLBACK_REPLY: &str = "I'm not sure how to respond to that.";

/// A conversational text generator.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Send a system turn and a user turn.
    ///
    /// `Ok(None)` means the backend answered but the reply carried no usable
    /// content. Transport failures, timeouts and backend errors are `Err`.
    async fn chat(&self, system: &str, user: &str) -> Result<Option<String>, BackendError>;
}

/// Produces the supportive reply for a user message.
#[derive(Clone)]
pub struct ResponseGenerator {
    backend: Arc<dyn ChatBackend>,
}

impl ResponseGenerator {
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self { backend }
    }

    /// The reply is never empty: an empty answer becomes [`FALLBACK_REPLY`].
    /// A failing backend is returned as an error, not papered over.
    pub async fn generate_reply(&self, user_text: &str) -> Result<String, BackendError> {
        match self.backend.chat(SYSTEM_INSTRUCTION, user_text).await? {
            Some(reply) => {
                info!(reply_len = reply.len(), "Chat reply generated");
                Ok(reply)
            }
            None => {
                warn!("Chat backend returned no content, using fallback reply");
                Ok(FALLBACK_REPLY.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    enum Canned {
        Reply(&'static str),
        Empty,
        Fail,
    }

    struct CannedBackend {
        canned: Canned,
        seen: Mutex<Vec<(String, String)>>,
    }

    impl CannedBackend {
        fn new(canned: Canned) -> Arc<Self> {
            Arc::new(Self {
                canned,
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl ChatBackend for CannedBackend {
        async fn chat(&self, system: &str, user: &str) -> Result<Option<String>, BackendError> {
            self.seen
                .lock()
                .unwrap()
                .push((system.to_string(), user.to_string()));
            match self.canned {
                Canned::Reply(text) => Ok(Some(text.to_string())),
                Canned::Empty => Ok(None),
                Canned::Fail => Err(BackendError::Generation("connection refused".into())),
            }
        }
    }

    #[tokio::test]
    async fn sends_fixed_system_turn_and_user_text() {
        let backend = CannedBackend::new(Canned::Reply("Congratulations!"));
        let generator = ResponseGenerator::new(backend.clone());

        let reply = generator.generate_reply("I just got a promotion!").await.unwrap();

        assert_eq!(reply, "Congratulations!");
        let seen = backend.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, SYSTEM_INSTRUCTION);
        assert_eq!(seen[0].1, "I just got a promotion!");
    }

    #[tokio::test]
    async fn empty_answer_becomes_placeholder() {
        let generator = ResponseGenerator::new(CannedBackend::new(Canned::Empty));
        let reply = generator.generate_reply("hello").await.unwrap();
        assert_eq!(reply, FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn backend_failure_is_not_substituted() {
        let generator = ResponseGenerator::new(CannedBackend::new(Canned::Fail));
        let err = generator.generate_reply("hello").await.unwrap_err();
        assert!(matches!(err, BackendError::Generation(msg) if msg == "connection refused"));
    }
}
