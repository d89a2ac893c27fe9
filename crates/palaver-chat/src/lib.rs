//! Chat layer for Palaver.
//!
//! Wraps a [`palaver_session::SessionCache`] of live [`Conversation`]s with
//! the two collaborators a chat backend needs:
//!
//! - a [`ModelClient`] that produces replies, and
//! - a [`HistorySource`] that persists exchanges so an evicted conversation
//!   can be rebuilt when its session comes back.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use palaver_chat::{ChatService, EchoModel, InMemoryHistory};
//! use palaver_session::CacheConfig;
//!
//! let service = ChatService::new(
//!     CacheConfig::new(),
//!     Arc::new(EchoModel::new()),
//!     Arc::new(InMemoryHistory::new()),
//! )?;
//! service.start()?;
//!
//! let first = service.send(None, "hello there").await?;
//! let next = service.send(Some(&first.session_id), "and again").await?;
//! ```

mod conversation;
mod error;
mod history;
mod model;
mod naming;
mod service;
mod types;

pub use conversation::Conversation;
pub use error::{ChatError, Result};
pub use history::{HistorySource, InMemoryHistory};
pub use model::{EchoModel, ModelClient};
pub use naming::{DEFAULT_ROOM_NAME_WORDS, room_name};
pub use service::ChatService;
pub use types::{ChatReply, Message, Role};
