use super::view::ChatView;
use crate::reply_source::{CannedReplySource, ReplySource};
use manu_core::config::ChatConfig;
use manu_core::error::{ChatError, Result};
use manu_core::reply::TopicTable;
use manu_core::session::{Message, SessionRegistry};
use std::sync::Arc;
use std::time::Duration;

/// Wires the session registry, the reply source and configuration together.
///
/// One service is built at startup and owns the registry for the lifetime of
/// the application; views borrow it through `Arc` handles.
pub struct ChatService {
    registry: Arc<SessionRegistry>,
    source: Arc<dyn ReplySource>,
    topics: Arc<TopicTable>,
    reply_timeout: Duration,
}

impl ChatService {
    /// Creates a new ChatService.
    ///
    /// # Arguments
    ///
    /// * `registry` - Registry owning all sessions
    /// * `source` - Where replies come from
    /// * `topics` - Topic table reported by [`topics`](Self::topics)
    /// * `reply_timeout` - Upper bound on each reply wait
    pub fn new(
        registry: Arc<SessionRegistry>,
        source: Arc<dyn ReplySource>,
        topics: Arc<TopicTable>,
        reply_timeout: Duration,
    ) -> Self {
        Self {
            registry,
            source,
            topics,
            reply_timeout,
        }
    }

    /// Builds a service with a fresh registry and the canned reply source
    /// described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::InvalidTopicTable`] for malformed custom topics.
    pub fn from_config(config: &ChatConfig) -> Result<Self> {
        let selector = config.reply_selector()?;
        let topics = Arc::new(selector.table().clone());
        let source = CannedReplySource::new(selector, config.assistant.typing_delay());

        tracing::info!(
            "[ChatService] {} topics, policy {}, timeout {} ms",
            topics.topics().len(),
            config.assistant.variant_policy,
            config.assistant.reply_timeout_ms
        );

        Ok(Self::new(
            Arc::new(SessionRegistry::new()),
            Arc::new(source),
            topics,
            config.assistant.reply_timeout(),
        ))
    }

    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }

    pub fn topics(&self) -> &TopicTable {
        &self.topics
    }

    pub fn reply_timeout(&self) -> Duration {
        self.reply_timeout
    }

    /// Opens a view on a new session.
    pub async fn open_view(&self) -> ChatView {
        ChatView::open(self.registry.clone(), self.source.clone(), self.reply_timeout).await
    }

    /// Opens a view on an existing session.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::SessionNotFound`] for an unknown session.
    pub async fn attach_view(&self, session_id: &str) -> Result<ChatView> {
        ChatView::attach(
            self.registry.clone(),
            self.source.clone(),
            session_id,
            self.reply_timeout,
        )
        .await
    }

    /// One-shot question: runs a throwaway session and returns the reply.
    ///
    /// # Errors
    ///
    /// Propagates timeout errors from the view. Blank input is rejected as
    /// [`ChatError::Internal`] since there is nothing to answer.
    pub async fn ask(&self, text: &str) -> Result<Message> {
        let view = self.open_view().await;
        let session_id = view.session_id().await;

        let outcome = view.send(text).await;
        view.close();
        self.registry.close_session(&session_id).await;

        outcome?.ok_or_else(|| ChatError::internal("nothing to ask: input is blank"))
    }

    /// Drops every session.
    pub async fn shutdown(&self) {
        self.registry.clear().await;
    }
}
