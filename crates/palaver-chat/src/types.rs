//! Message types exchanged with the model and the history source.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Author of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// One message in a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Create a user message stamped now.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            created_at: Utc::now(),
        }
    }

    /// Create a model message stamped now.
    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
            created_at: Utc::now(),
        }
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }
}

/// Result of sending a prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    /// Session the exchange belongs to (minted for new conversations).
    pub session_id: String,
    /// The model's reply.
    pub response: String,
    /// Suggested chat room name, set only when the session was just minted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_name: Option<String>,
    /// Whether this call started a new conversation.
    pub new_session: bool,
}
