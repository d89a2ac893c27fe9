//! Model client abstraction.
//!
//! The chat service never talks to a concrete LLM. It holds an
//! `Arc<dyn ModelClient>` and calls [`ModelClient::generate`] with the
//! conversation so far. [`EchoModel`] is the built-in client used by the
//! CLI and tests.

use async_trait::async_trait;

use crate::conversation::count_turns;
use crate::error::Result;
use crate::types::Message;

/// A language model that can continue a conversation.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Name of the model, for logs and stats.
    fn name(&self) -> &str;

    /// Called once when a conversation is created for the cache.
    ///
    /// Clients with per-session remote state set it up here. Failing aborts
    /// creation and nothing is cached.
    async fn start_conversation(&self, _session_id: &str) -> Result<()> {
        Ok(())
    }

    /// Produce the reply to `prompt` given the prior `history`.
    async fn generate(&self, history: &[Message], prompt: &str) -> Result<String>;
}

/// Model that answers by repeating the prompt.
#[derive(Debug, Clone, Default)]
pub struct EchoModel;

impl EchoModel {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ModelClient for EchoModel {
    fn name(&self) -> &str {
        "echo"
    }

    async fn generate(&self, history: &[Message], prompt: &str) -> Result<String> {
        let turn = count_turns(history) + 1;
        Ok(format!("[turn {turn}] {prompt}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_echo_first_turn() {
        let model = EchoModel::new();
        let reply = model.generate(&[], "hello").await.unwrap();
        assert_eq!(reply, "[turn 1] hello");
    }

    #[tokio::test]
    async fn test_echo_counts_prior_turns() {
        let model = EchoModel::new();
        let history = vec![
            Message::user("a"),
            Message::model("[turn 1] a"),
            Message::user("b"),
            Message::model("[turn 2] b"),
        ];
        let reply = model.generate(&history, "c").await.unwrap();
        assert_eq!(reply, "[turn 3] c");
    }

    #[tokio::test]
    async fn test_default_start_conversation_succeeds() {
        let model = EchoModel::new();
        assert!(model.start_conversation("s1").await.is_ok());
        assert_eq!(model.name(), "echo");
    }
}
