use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// Who sent a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageOrigin {
    /// The person in front of this screen.
    Local,
    /// The agent or another participant.
    Remote,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    /// Epoch milliseconds.
    pub timestamp: i64,
    pub text: String,
    pub origin: MessageOrigin,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edited_at: Option<i64>,
}

/// What makes two observations of "the newest message" the same event.
///
/// An edit of the same message is a new identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageIdentity {
    pub id: String,
    pub edited_at: Option<i64>,
}

impl ChatMessage {
    pub fn is_local(&self) -> bool {
        self.origin == MessageOrigin::Local
    }

    pub fn identity(&self) -> MessageIdentity {
        MessageIdentity {
            id: self.id.clone(),
            edited_at: self.edited_at,
        }
    }
}

/// Message as the conferencing SDK delivers it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedRecord {
    pub id: String,
    pub timestamp: i64,
    #[serde(default)]
    pub from: FeedParticipant,
    pub message: String,
    #[serde(default)]
    pub edit_timestamp: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedParticipant {
    #[serde(default)]
    pub is_local: bool,
}

impl From<FeedRecord> for ChatMessage {
    fn from(record: FeedRecord) -> Self {
        Self {
            id: record.id,
            timestamp: record.timestamp,
            text: record.message,
            origin: if record.from.is_local {
                MessageOrigin::Local
            } else {
                MessageOrigin::Remote
            },
            edited_at: record.edit_timestamp,
        }
    }
}

/// Producer handle of the shared chat feed.
///
/// Held by whatever bridges the conferencing SDK. Messages are only ever
/// appended, or edited in place when the same id arrives again; nothing is
/// removed. Readers get a [`FeedObserver`], which cannot write.
#[derive(Debug, Clone)]
pub struct MessageFeed {
    tx: Arc<watch::Sender<Vec<ChatMessage>>>,
}

impl MessageFeed {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(Vec::new());
        Self { tx: Arc::new(tx) }
    }

    /// Append a message, or replace the stored copy if its id is known.
    pub fn push(&self, message: ChatMessage) {
        self.tx.send_modify(|messages| {
            match messages.iter_mut().find(|m| m.id == message.id) {
                Some(existing) => *existing = message,
                None => messages.push(message),
            }
        });
    }

    pub fn observe(&self) -> FeedObserver {
        FeedObserver {
            rx: self.tx.subscribe(),
        }
    }

    pub fn len(&self) -> usize {
        self.tx.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tx.borrow().is_empty()
    }

    pub fn latest(&self) -> Option<ChatMessage> {
        self.tx.borrow().last().cloned()
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        self.tx.borrow().clone()
    }
}

impl Default for MessageFeed {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only view of a [`MessageFeed`].
#[derive(Debug, Clone)]
pub struct FeedObserver {
    rx: watch::Receiver<Vec<ChatMessage>>,
}

impl FeedObserver {
    /// Wait for the feed to change. Returns `false` once every producer
    /// handle is gone.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }

    /// Run `f` over the current messages and mark them as seen.
    pub fn with_messages<R>(&mut self, f: impl FnOnce(&[ChatMessage]) -> R) -> R {
        f(&self.rx.borrow_and_update())
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        self.rx.borrow().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(id: &str, origin: MessageOrigin, text: &str) -> ChatMessage {
        ChatMessage {
            id: id.to_string(),
            timestamp: 1_700_000_000_000,
            text: text.to_string(),
            origin,
            edited_at: None,
        }
    }

    #[test]
    fn test_record_conversion() {
        let record: FeedRecord = serde_json::from_str(
            r#"{"id":"m1","timestamp":1700000000000,"from":{"isLocal":true},"message":"a large latte please","editTimestamp":1700000000500}"#,
        )
        .unwrap();
        let msg = ChatMessage::from(record);
        assert!(msg.is_local());
        assert_eq!(msg.text, "a large latte please");
        assert_eq!(msg.edited_at, Some(1_700_000_000_500));
    }

    #[test]
    fn test_record_without_sender_is_remote() {
        let record: FeedRecord =
            serde_json::from_str(r#"{"id":"m2","timestamp":1,"message":"Hi, I'm your barista"}"#)
                .unwrap();
        assert_eq!(ChatMessage::from(record).origin, MessageOrigin::Remote);
    }

    #[test]
    fn test_push_appends_and_edits_in_place() {
        let feed = MessageFeed::new();
        feed.push(message("m1", MessageOrigin::Local, "a lat"));
        feed.push(message("m2", MessageOrigin::Remote, "Sure!"));

        let mut edited = message("m1", MessageOrigin::Local, "a latte");
        edited.edited_at = Some(5);
        feed.push(edited);

        let messages = feed.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].text, "a latte");
        assert_eq!(feed.latest().unwrap().id, "m2");
    }

    #[tokio::test]
    async fn test_observer_wakes_on_push() {
        let feed = MessageFeed::new();
        let mut observer = feed.observe();

        feed.push(message("m1", MessageOrigin::Local, "hello"));
        assert!(observer.changed().await);
        let count = observer.with_messages(|messages| messages.len());
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_observer_sees_feed_closed() {
        let feed = MessageFeed::new();
        let mut observer = feed.observe();
        drop(feed);
        assert!(!observer.changed().await);
    }
}
