//! Durable message history.
//!
//! The cache only holds live conversations. Whatever a session said before
//! it was evicted comes back from a [`HistorySource`] when the conversation
//! is recreated.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::Result;
use crate::types::Message;

/// Store of persisted messages keyed by session id.
#[async_trait]
pub trait HistorySource: Send + Sync {
    /// Load every message recorded for a session, oldest first.
    ///
    /// Unknown sessions yield an empty list.
    async fn load_history(&self, session_id: &str) -> Result<Vec<Message>>;

    /// Persist one prompt/response pair.
    async fn record_exchange(&self, session_id: &str, prompt: &Message, reply: &Message)
    -> Result<()>;
}

/// Process-local history store.
#[derive(Debug, Default)]
pub struct InMemoryHistory {
    sessions: RwLock<HashMap<String, Vec<Message>>>,
}

impl InMemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sessions with recorded messages.
    pub fn session_count(&self) -> usize {
        self.sessions.read().len()
    }

    /// Number of messages recorded for a session.
    pub fn message_count(&self, session_id: &str) -> usize {
        self.sessions
            .read()
            .get(session_id)
            .map(Vec::len)
            .unwrap_or(0)
    }

    /// Replace the stored history for a session.
    pub fn seed(&self, session_id: impl Into<String>, messages: Vec<Message>) {
        self.sessions.write().insert(session_id.into(), messages);
    }
}

#[async_trait]
impl HistorySource for InMemoryHistory {
    async fn load_history(&self, session_id: &str) -> Result<Vec<Message>> {
        Ok(self
            .sessions
            .read()
            .get(session_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn record_exchange(
        &self,
        session_id: &str,
        prompt: &Message,
        reply: &Message,
    ) -> Result<()> {
        let mut sessions = self.sessions.write();
        let messages = sessions.entry(session_id.to_string()).or_default();
        messages.push(prompt.clone());
        messages.push(reply.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Role;

    #[tokio::test]
    async fn test_unknown_session_is_empty() {
        let history = InMemoryHistory::new();
        assert!(history.load_history("nope").await.unwrap().is_empty());
        assert_eq!(history.message_count("nope"), 0);
    }

    #[tokio::test]
    async fn test_record_then_load() {
        let history = InMemoryHistory::new();
        history
            .record_exchange("s1", &Message::user("hi"), &Message::model("hello"))
            .await
            .unwrap();
        history
            .record_exchange("s1", &Message::user("again"), &Message::model("sure"))
            .await
            .unwrap();

        let loaded = history.load_history("s1").await.unwrap();
        assert_eq!(loaded.len(), 4);
        assert_eq!(loaded[0].role, Role::User);
        assert_eq!(loaded[3].text, "sure");
        assert_eq!(history.session_count(), 1);
    }

    #[tokio::test]
    async fn test_sessions_are_separate() {
        let history = InMemoryHistory::new();
        history.seed("a", vec![Message::user("x")]);
        history.seed("b", vec![Message::user("y"), Message::model("z")]);

        assert_eq!(history.message_count("a"), 1);
        assert_eq!(history.message_count("b"), 2);
    }
}
