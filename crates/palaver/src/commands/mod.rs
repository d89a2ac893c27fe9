//! CLI command handlers.

use std::sync::Arc;

use anyhow::{Result, bail};
use palaver_chat::{ChatService, EchoModel, InMemoryHistory, ModelClient};
use palaver_config::{LoadedConfig, PalaverConfig};
use palaver_session::CacheConfig;

pub mod ask;
pub mod chat;
pub mod config;
pub mod repl;

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Configuration discovered at startup.
    pub config: LoadedConfig,
    /// Output as JSON for scripting.
    pub json_output: bool,
    /// Verbose output enabled.
    pub verbose: bool,
}

/// Build a chat service from the effective configuration.
pub fn build_service(config: &PalaverConfig) -> Result<ChatService> {
    config.validate()?;

    let session = config.session();
    let chat = config.chat();

    let model: Arc<dyn ModelClient> = match chat.model.as_str() {
        "echo" => Arc::new(EchoModel::new()),
        other => bail!("Unknown model '{}' (available: echo)", other),
    };

    let cache = CacheConfig::from_durations(session.ttl(), session.sweep_interval());
    let service = ChatService::new(cache, model, Arc::new(InMemoryHistory::new()))?
        .with_room_name_words(chat.room_name_words);
    Ok(service)
}
