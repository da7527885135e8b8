use super::message::Message;
use super::model::Session;
use crate::error::{ChatError, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

/// Owns every live assistant session.
///
/// `SessionRegistry` is responsible for:
/// - Creating sessions (each seeded with the welcome message)
/// - Looking sessions up by identifier
/// - Serializing appends per session
/// - Tearing sessions down
///
/// Nothing is persisted. The registry is an ordinary value: construct it at
/// startup, share it behind an `Arc`, drop or [`clear`](Self::clear) it at
/// shutdown.
#[derive(Default)]
pub struct SessionRegistry {
    /// Live sessions, each behind its own single-writer lock
    sessions: RwLock<HashMap<String, Arc<Mutex<Session>>>>,
}

impl SessionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new session and returns its identifier.
    ///
    /// The identifier is a fresh UUID v4. The session starts with exactly one
    /// message, the welcome message.
    pub async fn create_session(&self) -> String {
        let session_id = Uuid::new_v4().to_string();
        let session = Session::with_welcome(session_id.clone());

        let mut sessions = self.sessions.write().await;
        sessions.insert(session_id.clone(), Arc::new(Mutex::new(session)));
        drop(sessions);

        tracing::info!("[SessionRegistry] Created session {}", session_id);
        session_id
    }

    /// Returns a snapshot of the session.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::SessionNotFound`] if the identifier was never issued
    /// by this registry or the session has been closed.
    pub async fn get_session(&self, session_id: &str) -> Result<Session> {
        let handle = self.handle(session_id).await?;
        let session = handle.lock().await;
        Ok(session.clone())
    }

    /// Appends a message to a session and returns the updated sequence.
    ///
    /// Appends to the same session are applied one at a time in the order
    /// they acquire the session lock.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::SessionNotFound`] for an unknown identifier.
    pub async fn append_message(&self, session_id: &str, message: Message) -> Result<Vec<Message>> {
        let handle = self.handle(session_id).await?;
        let mut session = handle.lock().await;
        let messages = session.append_message(message).to_vec();

        tracing::debug!(
            "[SessionRegistry] Session {} now holds {} messages",
            session_id,
            messages.len()
        );
        Ok(messages)
    }

    /// Removes a session. Returns `true` if it existed.
    pub async fn close_session(&self, session_id: &str) -> bool {
        let mut sessions = self.sessions.write().await;
        let removed = sessions.remove(session_id).is_some();
        drop(sessions);

        if removed {
            tracing::info!("[SessionRegistry] Closed session {}", session_id);
        }
        removed
    }

    /// Returns whether the registry knows this identifier.
    pub async fn contains(&self, session_id: &str) -> bool {
        self.sessions.read().await.contains_key(session_id)
    }

    /// Lists the identifiers of all live sessions.
    pub async fn session_ids(&self) -> Vec<String> {
        self.sessions.read().await.keys().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Drops every session.
    pub async fn clear(&self) {
        let mut sessions = self.sessions.write().await;
        let count = sessions.len();
        sessions.clear();
        tracing::info!("[SessionRegistry] Cleared {} sessions", count);
    }

    async fn handle(&self, session_id: &str) -> Result<Arc<Mutex<Session>>> {
        let sessions = self.sessions.read().await;
        sessions
            .get(session_id)
            .cloned()
            .ok_or_else(|| ChatError::session_not_found(session_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::model::WELCOME_MESSAGE;
    use std::collections::HashSet;

    #[tokio::test]
    async fn test_create_session_has_welcome_message() {
        let registry = SessionRegistry::new();
        let id = registry.create_session().await;

        let session = registry.get_session(&id).await.unwrap();
        assert_eq!(session.id, id);
        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.messages()[0].content, WELCOME_MESSAGE);
    }

    #[tokio::test]
    async fn test_created_ids_are_unique() {
        let registry = SessionRegistry::new();
        let mut ids = HashSet::new();
        for _ in 0..100 {
            assert!(ids.insert(registry.create_session().await));
        }
        assert_eq!(registry.len().await, 100);
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let registry = SessionRegistry::new();
        registry.create_session().await;

        let err = registry.get_session("never-issued").await.unwrap_err();
        assert_eq!(err, ChatError::session_not_found("never-issued"));

        let err = registry
            .append_message("never-issued", Message::user_text("hi"))
            .await
            .unwrap_err();
        assert!(err.is_session_not_found());
    }

    #[tokio::test]
    async fn test_append_order_matches_call_order() {
        let registry = SessionRegistry::new();
        let id = registry.create_session().await;

        let inputs = ["first", "second", "third", "fourth"];
        for text in inputs {
            registry.append_message(&id, Message::user_text(text)).await.unwrap();
        }

        let session = registry.get_session(&id).await.unwrap();
        let contents: Vec<&str> = session.messages()[1..].iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, inputs);
    }

    #[tokio::test]
    async fn test_snapshot_is_detached() {
        let registry = SessionRegistry::new();
        let id = registry.create_session().await;
        let before = registry.get_session(&id).await.unwrap();

        registry.append_message(&id, Message::user_text("later")).await.unwrap();
        assert_eq!(before.messages().len(), 1);
        assert_eq!(registry.get_session(&id).await.unwrap().messages().len(), 2);
    }

    #[tokio::test]
    async fn test_close_and_clear() {
        let registry = SessionRegistry::new();
        let a = registry.create_session().await;
        let b = registry.create_session().await;

        assert!(registry.close_session(&a).await);
        assert!(!registry.close_session(&a).await);
        assert!(!registry.contains(&a).await);
        assert!(registry.get_session(&a).await.unwrap_err().is_session_not_found());
        assert_eq!(registry.session_ids().await, vec![b.clone()]);

        registry.clear().await;
        assert!(registry.is_empty().await);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_appends_are_all_committed() {
        let registry = Arc::new(SessionRegistry::new());
        let id = registry.create_session().await;

        let mut handles = Vec::new();
        for n in 0..32 {
            let registry = registry.clone();
            let id = id.clone();
            handles.push(tokio::spawn(async move {
                registry
                    .append_message(&id, Message::user_text(format!("m{}", n)))
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let session = registry.get_session(&id).await.unwrap();
        assert_eq!(session.messages().len(), 33);
        let ids: HashSet<&str> = session.messages().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids.len(), 33);
    }
}
