//! Chat service: routes prompts to cached conversations.

use std::sync::Arc;

use parking_lot::Mutex;
use palaver_session::{CacheConfig, CacheStats, ReclaimerHandle, SessionCache};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::conversation::Conversation;
use crate::error::{ChatError, Result};
use crate::history::HistorySource;
use crate::model::ModelClient;
use crate::naming::{DEFAULT_ROOM_NAME_WORDS, room_name};
use crate::types::{ChatReply, Message};

/// Front door for chat requests.
///
/// Each prompt is routed to the live [`Conversation`] for its session. A
/// conversation that is not cached (new, or evicted after sitting idle) is
/// created once, seeded from the [`HistorySource`], and shared by every
/// concurrent request for that session.
pub struct ChatService {
    cache: SessionCache<Conversation>,
    model: Arc<dyn ModelClient>,
    history: Arc<dyn HistorySource>,
    room_name_words: usize,
    reclaimer: Mutex<Option<ReclaimerHandle>>,
}

impl ChatService {
    /// Create a service. The reclaimer is not started until [`start`](Self::start).
    pub fn new(
        config: CacheConfig,
        model: Arc<dyn ModelClient>,
        history: Arc<dyn HistorySource>,
    ) -> Result<Self> {
        Ok(Self {
            cache: SessionCache::new(config)?,
            model,
            history,
            room_name_words: DEFAULT_ROOM_NAME_WORDS,
            reclaimer: Mutex::new(None),
        })
    }

    /// Set how many prompt words go into a new room name.
    pub fn with_room_name_words(mut self, words: usize) -> Self {
        self.room_name_words = words;
        self
    }

    /// Start the background reclaimer. Calling it while one is running is a
    /// no-op; a reclaimer whose task has exited is replaced.
    pub fn start(&self) -> Result<()> {
        let mut slot = self.reclaimer.lock();
        if slot.as_ref().is_some_and(ReclaimerHandle::is_running) {
            return Ok(());
        }
        *slot = Some(self.cache.start_reclaimer()?);
        info!(model = self.model.name(), "Chat service started");
        Ok(())
    }

    /// Stop the reclaimer and wait for it to exit.
    pub async fn shutdown(&self) {
        let handle = self.reclaimer.lock().take();
        if let Some(handle) = handle {
            handle.stop().await;
            info!("Chat service stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.reclaimer
            .lock()
            .as_ref()
            .is_some_and(ReclaimerHandle::is_running)
    }

    /// The underlying session cache.
    pub fn cache(&self) -> &SessionCache<Conversation> {
        &self.cache
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// The live conversation for a session, if cached. Does not refresh it.
    pub fn conversation(&self, session_id: &str) -> Option<Arc<Conversation>> {
        self.cache.peek(session_id)
    }

    /// Drop a session from the cache. Its persisted history is kept.
    pub fn end_session(&self, session_id: &str) -> bool {
        self.cache.invalidate(session_id).is_some()
    }

    /// Send a prompt.
    ///
    /// Without a session id a new conversation is started and a room name is
    /// suggested from the prompt.
    pub async fn send(&self, session_id: Option<&str>, prompt: &str) -> Result<ChatReply> {
        if prompt.trim().is_empty() {
            return Err(ChatError::EmptyPrompt);
        }

        let (session_id, room, new_session) = match session_id {
            Some(id) => (id.to_string(), None, false),
            None => {
                let id = Uuid::new_v4().to_string();
                let name = room_name(prompt, self.room_name_words);
                debug!(session_id = %id, room_name = %name, "Starting new conversation");
                (id, Some(name), true)
            }
        };

        let conversation = self.conversation_for(&session_id, new_session).await?;

        let mut messages = conversation.lock().await;
        let response = self.model.generate(&messages, prompt).await?;

        let user = Message::user(prompt);
        let reply = Message::model(response.clone());
        if let Err(e) = self
            .history
            .record_exchange(&session_id, &user, &reply)
            .await
        {
            warn!(session_id = %session_id, error = %e, "Failed to record exchange");
            return Err(e);
        }
        messages.push(user);
        messages.push(reply);

        Ok(ChatReply {
            session_id,
            response,
            room_name: room,
            new_session,
        })
    }

    async fn conversation_for(
        &self,
        session_id: &str,
        new_session: bool,
    ) -> Result<Arc<Conversation>> {
        let model = Arc::clone(&self.model);
        let history = Arc::clone(&self.history);
        let id = session_id.to_string();

        self.cache
            .get_or_create(session_id, move || async move {
                model.start_conversation(&id).await?;
                let messages = if new_session {
                    Vec::new()
                } else {
                    history.load_history(&id).await?
                };
                debug!(session_id = %id, restored = messages.len(), "Conversation created");
                Ok::<_, ChatError>(Conversation::with_history(id, messages))
            })
            .await
    }
}

impl std::fmt::Debug for ChatService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatService")
            .field("model", &self.model.name())
            .field("sessions", &self.cache.len())
            .field("room_name_words", &self.room_name_words)
            .finish()
    }
}
