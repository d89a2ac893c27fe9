//! The live conversation object held in the session cache.

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, MutexGuard};

use crate::types::{Message, Role};

/// Live state of one conversation.
///
/// Shared by every request for the same session through the cache. The
/// message list sits behind an async mutex so that a whole turn (read
/// history, call the model, append both messages) runs without another
/// request interleaving.
#[derive(Debug)]
pub struct Conversation {
    session_id: String,
    created_at: DateTime<Utc>,
    history: Mutex<Vec<Message>>,
}

impl Conversation {
    /// Start an empty conversation.
    pub fn new(session_id: impl Into<String>) -> Self {
        Self::with_history(session_id, Vec::new())
    }

    /// Start a conversation seeded with previously persisted messages.
    pub fn with_history(session_id: impl Into<String>, history: Vec<Message>) -> Self {
        Self {
            session_id: session_id.into(),
            created_at: Utc::now(),
            history: Mutex::new(history),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Exclusive access to the message list for the duration of a turn.
    pub async fn lock(&self) -> MutexGuard<'_, Vec<Message>> {
        self.history.lock().await
    }

    /// Replace the message list.
    pub async fn seed(&self, messages: Vec<Message>) {
        *self.history.lock().await = messages;
    }

    /// Copy of the current messages.
    pub async fn snapshot(&self) -> Vec<Message> {
        self.history.lock().await.clone()
    }

    /// Number of messages.
    pub async fn len(&self) -> usize {
        self.history.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.history.lock().await.is_empty()
    }

    /// Number of completed user turns.
    pub async fn turn_count(&self) -> usize {
        count_turns(&self.history.lock().await)
    }
}

/// Count user messages in a history slice.
pub(crate) fn count_turns(history: &[Message]) -> usize {
    history.iter().filter(|m| m.role == Role::User).count()
}
