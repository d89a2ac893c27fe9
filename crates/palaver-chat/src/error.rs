//! Error types for chat operations.

/// Result type for chat operations.
pub type Result<T> = std::result::Result<T, ChatError>;

/// Errors surfaced by the chat service and its collaborators.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    /// The prompt was empty after trimming.
    #[error("Prompt is empty")]
    EmptyPrompt,

    /// The model client failed to start a conversation or generate a reply.
    #[error("Model error: {0}")]
    Model(String),

    /// The history source failed to load or record messages.
    #[error("History error: {0}")]
    History(String),

    /// The session cache rejected the request.
    #[error(transparent)]
    Cache(#[from] palaver_session::Error),
}
