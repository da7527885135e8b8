use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use manu_application::{CannedReplySource, ChatService, ChatView, ReplySource};
use manu_core::config::ChatConfig;
use manu_core::reply::{FALLBACK_RESPONSE, TopicTable};
use manu_core::session::{Message, SenderRole, Session, SessionRegistry, ViewState};

/// Reply source that takes a fixed amount of time.
struct SlowSource {
    delay: Duration,
    inner: CannedReplySource,
}

#[async_trait]
impl ReplySource for SlowSource {
    async fn generate(&self, session: &Session, user_text: &str) -> Message {
        tokio::time::sleep(self.delay).await;
        self.inner.generate(session, user_text).await
    }
}

#[tokio::test]
async fn test_full_conversation_keeps_order_and_hides_starters() {
    let service = ChatService::from_config(&ChatConfig::default()).unwrap();
    let view = service.open_view().await;

    let first = view.snapshot().await.unwrap();
    assert_eq!(first.messages.len(), 1);
    assert_eq!(first.conversation_starters, service_starters());

    let starter = first.conversation_starters[0].clone();
    let reply = view.send_starter(&starter).await.unwrap().unwrap();
    let followers = TopicTable::builtin().find("followers").unwrap();
    assert!(followers.responses.contains(&reply.content));

    view.send("asdkjalksjd").await.unwrap();
    view.send("Best time to post?").await.unwrap();

    let snapshot = view.snapshot().await.unwrap();
    assert!(snapshot.conversation_starters.is_empty());
    let roles: Vec<SenderRole> = snapshot.messages.iter().map(|m| m.sender_role).collect();
    assert_eq!(
        roles,
        vec![
            SenderRole::Assistant,
            SenderRole::User,
            SenderRole::Assistant,
            SenderRole::User,
            SenderRole::Assistant,
            SenderRole::User,
            SenderRole::Assistant,
        ]
    );
    assert_eq!(snapshot.messages[4].content, FALLBACK_RESPONSE);
    assert_eq!(snapshot.messages[5].content, "Best time to post?");
}

fn service_starters() -> Vec<String> {
    manu_core::reply::conversation_starters()
}

#[tokio::test(start_paused = true)]
async fn test_typing_indicator_tracks_slow_reply() {
    let view = Arc::new(
        ChatView::open(
            Arc::new(SessionRegistry::new()),
            Arc::new(SlowSource {
                delay: Duration::from_secs(2),
                inner: CannedReplySource::default(),
            }),
            Duration::from_secs(10),
        )
        .await,
    );
    let mut states = view.subscribe();

    let task = {
        let view = view.clone();
        tokio::spawn(async move { view.send("reels?").await })
    };

    states
        .wait_for(|s| *s == ViewState::AwaitingReply)
        .await
        .unwrap();
    let pending = view.snapshot().await.unwrap();
    assert!(pending.is_typing);
    assert_eq!(pending.display_messages().len(), pending.messages.len() + 1);

    let reply = task.await.unwrap().unwrap().unwrap();
    assert!(reply.is_from_ai);
    assert_eq!(view.state(), ViewState::Idle);
    assert!(!view.snapshot().await.unwrap().is_typing);
}

#[tokio::test(start_paused = true)]
async fn test_reply_slower_than_timeout_is_abandoned() {
    let view = ChatView::open(
        Arc::new(SessionRegistry::new()),
        Arc::new(SlowSource {
            delay: Duration::from_secs(60),
            inner: CannedReplySource::default(),
        }),
        Duration::from_secs(1),
    )
    .await;

    let err = view.send("followers").await.unwrap_err();
    assert!(err.is_timeout());
    assert_eq!(view.state(), ViewState::Idle);
    assert_eq!(view.snapshot().await.unwrap().messages.len(), 2);
}

#[tokio::test]
async fn test_sessions_are_independent() {
    let service = ChatService::from_config(&ChatConfig::default()).unwrap();
    let a = service.open_view().await;
    let b = service.open_view().await;
    assert_ne!(a.session_id().await, b.session_id().await);

    a.send("hashtags").await.unwrap();
    assert_eq!(a.snapshot().await.unwrap().messages.len(), 3);
    assert_eq!(b.snapshot().await.unwrap().messages.len(), 1);
    assert_eq!(service.registry().len().await, 2);
}
