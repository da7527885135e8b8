use super::snapshot::ChatSnapshot;
use crate::reply_source::ReplySource;
use manu_core::error::{ChatError, Result};
use manu_core::session::{Message, SessionRegistry, ViewState};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::{RwLock, watch};
use tokio_util::sync::CancellationToken;

/// Interaction state machine for one assistant conversation.
///
/// ```text
/// Idle --send--> AwaitingReply --reply appended--> Idle
///                      |--timeout / cancel------> Idle (nothing appended)
/// ```
///
/// The wait for a reply is bounded by `reply_timeout` and by the view's
/// cancellation token, which fires on [`close`](Self::close) or drop.
pub struct ChatView {
    registry: Arc<SessionRegistry>,
    source: Arc<dyn ReplySource>,
    session_id: RwLock<String>,
    reply_timeout: Duration,
    state: watch::Sender<ViewState>,
    input_focused: AtomicBool,
    cancel: CancellationToken,
}

impl ChatView {
    /// Opens a view on a brand-new session.
    pub async fn open(
        registry: Arc<SessionRegistry>,
        source: Arc<dyn ReplySource>,
        reply_timeout: Duration,
    ) -> Self {
        let session_id = registry.create_session().await;
        Self::with_session(registry, source, session_id, reply_timeout)
    }

    /// Opens a view on an existing session.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::SessionNotFound`] if the registry does not know
    /// `session_id`.
    pub async fn attach(
        registry: Arc<SessionRegistry>,
        source: Arc<dyn ReplySource>,
        session_id: &str,
        reply_timeout: Duration,
    ) -> Result<Self> {
        if !registry.contains(session_id).await {
            return Err(ChatError::session_not_found(session_id));
        }
        Ok(Self::with_session(
            registry,
            source,
            session_id.to_string(),
            reply_timeout,
        ))
    }

    fn with_session(
        registry: Arc<SessionRegistry>,
        source: Arc<dyn ReplySource>,
        session_id: String,
        reply_timeout: Duration,
    ) -> Self {
        let (state, _) = watch::channel(ViewState::Idle);
        Self {
            registry,
            source,
            session_id: RwLock::new(session_id),
            reply_timeout,
            state,
            input_focused: AtomicBool::new(false),
            cancel: CancellationToken::new(),
        }
    }

    pub async fn session_id(&self) -> String {
        self.session_id.read().await.clone()
    }

    /// Current state of the send/reply cycle.
    pub fn state(&self) -> ViewState {
        *self.state.borrow()
    }

    /// Whether the typing indicator should be shown.
    pub fn is_typing(&self) -> bool {
        self.state().is_typing()
    }

    /// Subscribes to state transitions (drives the typing indicator).
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.subscribe()
    }

    /// Sends user text and waits for the assistant reply.
    ///
    /// Input is trimmed; blank input does nothing and returns `Ok(None)`.
    /// On success the committed assistant message is returned.
    ///
    /// # Errors
    ///
    /// - [`ChatError::ReplyInFlight`] if a previous send has not finished
    /// - [`ChatError::SessionNotFound`] if the session was closed underneath
    ///   the view (see [`ensure_session`](Self::ensure_session))
    /// - [`ChatError::ReplyTimeout`] if no reply arrived in time
    /// - [`ChatError::Cancelled`] if the view was closed
    ///
    /// After any of these the view is back in [`ViewState::Idle`].
    pub async fn send(&self, text: &str) -> Result<Option<Message>> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        if self.cancel.is_cancelled() {
            return Err(ChatError::Cancelled);
        }

        let entered = self.state.send_if_modified(|state| {
            if *state == ViewState::Idle {
                *state = ViewState::AwaitingReply;
                true
            } else {
                false
            }
        });
        if !entered {
            return Err(ChatError::ReplyInFlight);
        }

        // Quick replies hide once something is sent.
        self.input_focused.store(false, Ordering::Relaxed);

        let result = self.exchange(text).await;
        self.state.send_replace(ViewState::Idle);

        if let Err(e) = &result {
            tracing::warn!("[ChatView] Send failed: {}", e);
        }
        result.map(Some)
    }

    /// Sends the cleaned prompt of a conversation starter.
    pub async fn send_starter(&self, starter: &str) -> Result<Option<Message>> {
        let prompt = self.source.starter_prompt(starter);
        self.send(&prompt).await
    }

    /// Sends a quick reply as-is.
    pub async fn send_quick_reply(&self, reply: &str) -> Result<Option<Message>> {
        self.send(reply).await
    }

    async fn exchange(&self, text: &str) -> Result<Message> {
        let session_id = self.session_id().await;
        self.registry
            .append_message(&session_id, Message::user_text(text))
            .await?;
        let session = self.registry.get_session(&session_id).await?;

        tracing::debug!("[ChatView] Awaiting reply in session {}", session_id);
        let reply = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(ChatError::Cancelled),
            _ = tokio::time::sleep(self.reply_timeout) => {
                return Err(ChatError::reply_timeout(self.reply_timeout.as_millis() as u64));
            }
            reply = self.source.generate(&session, text) => reply,
        };

        let messages = self.registry.append_message(&session_id, reply).await?;
        messages
            .last()
            .cloned()
            .ok_or_else(|| ChatError::internal("reply vanished after append"))
    }

    /// Sends a heart reaction as its own message.
    ///
    /// Hearts get no assistant reply, so this never enters
    /// [`ViewState::AwaitingReply`] and is allowed while a reply is pending.
    ///
    /// # Errors
    ///
    /// [`ChatError::SessionNotFound`] or [`ChatError::Cancelled`].
    pub async fn send_heart(&self) -> Result<Message> {
        self.append_without_reply(Message::heart()).await
    }

    /// Sends an image by URL. No assistant reply follows.
    ///
    /// A blank URL does nothing and returns `Ok(None)`.
    pub async fn send_image(&self, url: &str) -> Result<Option<Message>> {
        let url = url.trim();
        if url.is_empty() {
            return Ok(None);
        }
        self.append_without_reply(Message::image(url)).await.map(Some)
    }

    async fn append_without_reply(&self, message: Message) -> Result<Message> {
        if self.cancel.is_cancelled() {
            return Err(ChatError::Cancelled);
        }
        let session_id = self.session_id().await;
        let kind = message.kind;
        let messages = self.registry.append_message(&session_id, message).await?;

        tracing::debug!("[ChatView] Sent {} in session {}", kind, session_id);
        messages
            .last()
            .cloned()
            .ok_or_else(|| ChatError::internal("message vanished after append"))
    }

    /// Marks the input as focused, which reveals quick replies.
    pub fn focus_input(&self) {
        self.input_focused.store(true, Ordering::Relaxed);
    }

    pub fn blur_input(&self) {
        self.input_focused.store(false, Ordering::Relaxed);
    }

    /// Makes sure the view points at a live session, creating a fresh one if
    /// the current session is gone. Returns the (possibly new) session id.
    pub async fn ensure_session(&self) -> String {
        let mut session_id = self.session_id.write().await;
        if !self.registry.contains(session_id.as_str()).await {
            tracing::info!(
                "[ChatView] Session {} is gone, starting a new one",
                session_id.as_str()
            );
            *session_id = self.registry.create_session().await;
        }
        session_id.clone()
    }

    /// Switches the view to a brand-new session.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::ReplyInFlight`] while a reply is pending.
    pub async fn start_new_session(&self) -> Result<String> {
        if self.is_typing() {
            return Err(ChatError::ReplyInFlight);
        }
        let new_id = self.registry.create_session().await;

        // The idle check runs under the state lock, so it is ordered with the
        // transition in `send`. A send that starts afterwards waits on the
        // write guard and picks up the new id.
        let mut session_id = self.session_id.write().await;
        let mut idle = false;
        self.state.send_if_modified(|state| {
            idle = *state == ViewState::Idle;
            false
        });

        if !idle {
            drop(session_id);
            self.registry.close_session(&new_id).await;
            return Err(ChatError::ReplyInFlight);
        }
        *session_id = new_id.clone();
        Ok(new_id)
    }

    /// Builds the render model of the view.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::SessionNotFound`] if the session is gone.
    pub async fn snapshot(&self) -> Result<ChatSnapshot> {
        let session = self.registry.get_session(&self.session_id().await).await?;
        let show_starters = session.shows_conversation_starters();
        let show_quick_replies = self.input_focused.load(Ordering::Relaxed);

        Ok(ChatSnapshot {
            session_id: session.id.clone(),
            messages: session.messages().to_vec(),
            is_typing: self.is_typing(),
            conversation_starters: if show_starters {
                self.source.conversation_starters()
            } else {
                Vec::new()
            },
            quick_replies: if show_quick_replies {
                self.source.quick_replies()
            } else {
                Vec::new()
            },
        })
    }

    /// Abandons any pending reply. Subsequent sends fail with
    /// [`ChatError::Cancelled`]. The session itself stays in the registry.
    pub fn close(&self) {
        self.cancel.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// A token that fires when this view is closed.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }
}

impl Drop for ChatView {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
