//! Projection of the chat feed into the live transcription bubble.
//!
//! The synchronizer never writes to the feed. Tearing it down and attaching
//! a new one to the same feed loses nothing and replays nothing: messages
//! already in the feed at attach time are treated as seen.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::sync::expiring::ExpiringValue;
use crate::sync::feed::{ChatMessage, FeedObserver, MessageIdentity};

/// Callback for a newly spoken local message.
///
/// Runs on the synchronizer task; must not register further handlers.
pub type LocalMessageHandler = Box<dyn Fn(&ChatMessage) + Send + Sync>;

/// Remembers the identity of the newest message already looked at.
#[derive(Debug, Default)]
pub struct NewestMessageTracker {
    last_seen: Option<MessageIdentity>,
}

impl NewestMessageTracker {
    /// Tracker that treats the current newest message as already seen.
    pub fn seeded(messages: &[ChatMessage]) -> Self {
        Self {
            last_seen: messages.last().map(ChatMessage::identity),
        }
    }

    /// The newest message, if it is local and has not been reported yet.
    ///
    /// Re-observing the same feed state returns `None`.
    pub fn observe<'a>(&mut self, messages: &'a [ChatMessage]) -> Option<&'a ChatMessage> {
        let newest = messages.last()?;
        let identity = newest.identity();
        if self.last_seen.as_ref() == Some(&identity) {
            return None;
        }
        self.last_seen = Some(identity);
        newest.is_local().then_some(newest)
    }
}

/// The line shown in the transcription bubble.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptLine {
    pub message_id: String,
    pub text: String,
}

struct RunningSync {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

pub struct TranscriptSynchronizer {
    transcript: Arc<ExpiringValue<TranscriptLine>>,
    handlers: Arc<Mutex<Vec<LocalMessageHandler>>>,
    running: Option<RunningSync>,
}

impl TranscriptSynchronizer {
    /// `clear_after` is how long a transcript line stays up.
    pub fn new(clear_after: Duration) -> Self {
        Self {
            transcript: Arc::new(ExpiringValue::new(clear_after)),
            handlers: Arc::new(Mutex::new(Vec::new())),
            running: None,
        }
    }

    /// Register a handler, called once per distinct newest local message.
    pub fn on_new_local_message(&self, handler: impl Fn(&ChatMessage) + Send + Sync + 'static) {
        self.handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Box::new(handler));
    }

    /// Start following `observer`. No-op returning `false` if already attached.
    pub fn attach(&mut self, mut observer: FeedObserver) -> bool {
        if self.running.is_some() {
            return false;
        }

        let tracker = observer.with_messages(NewestMessageTracker::seeded);
        let token = CancellationToken::new();
        let handle = tokio::spawn(run_sync_loop(
            observer,
            tracker,
            self.transcript.clone(),
            self.handlers.clone(),
            token.clone(),
        ));
        self.running = Some(RunningSync { token, handle });

        info!(event = "core.sync.attached");
        true
    }

    /// Stop following the feed and clear the transcript. Idempotent.
    pub fn detach(&mut self) -> bool {
        let Some(running) = self.running.take() else {
            return false;
        };
        running.token.cancel();
        drop(running.handle);
        self.transcript.clear();

        info!(event = "core.sync.detached");
        true
    }

    pub fn is_attached(&self) -> bool {
        self.running.is_some()
    }

    pub fn current(&self) -> Option<TranscriptLine> {
        self.transcript.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<TranscriptLine>> {
        self.transcript.subscribe()
    }
}

impl Drop for TranscriptSynchronizer {
    fn drop(&mut self) {
        if let Some(running) = self.running.take() {
            running.token.cancel();
        }
    }
}

async fn run_sync_loop(
    mut observer: FeedObserver,
    mut tracker: NewestMessageTracker,
    transcript: Arc<ExpiringValue<TranscriptLine>>,
    handlers: Arc<Mutex<Vec<LocalMessageHandler>>>,
    token: CancellationToken,
) {
    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            alive = observer.changed() => {
                if !alive {
                    debug!(event = "core.sync.feed_closed");
                    break;
                }
            }
        }

        let Some(message) = observer.with_messages(|messages| tracker.observe(messages).cloned())
        else {
            continue;
        };

        debug!(
            event = "core.sync.local_message_observed",
            message_id = %message.id,
            length = message.text.len(),
        );

        transcript.set(TranscriptLine {
            message_id: message.id.clone(),
            text: message.text.clone(),
        });

        let registered = handlers.lock().unwrap_or_else(PoisonError::into_inner);
        for handler in registered.iter() {
            handler(&message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::feed::{MessageFeed, MessageOrigin};
    use std::sync::atomic::{AtomicUsize, Ordering};

    const CLEAR_AFTER: Duration = Duration::from_millis(3000);

    fn message(id: &str, origin: MessageOrigin, text: &str) -> ChatMessage {
        ChatMessage {
            id: id.to_string(),
            timestamp: 0,
            text: text.to_string(),
            origin,
            edited_at: None,
        }
    }

    async fn settle() {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }

    #[test]
    fn test_tracker_reports_each_local_message_once() {
        let mut tracker = NewestMessageTracker::default();
        let feed = vec![message("m1", MessageOrigin::Local, "hi")];

        assert_eq!(tracker.observe(&feed).unwrap().id, "m1");
        assert!(tracker.observe(&feed).is_none());
    }

    #[test]
    fn test_tracker_ignores_remote_newest() {
        let mut tracker = NewestMessageTracker::default();
        let feed = vec![
            message("m1", MessageOrigin::Local, "hi"),
            message("m2", MessageOrigin::Remote, "hello!"),
        ];
        assert!(tracker.observe(&feed).is_none());
    }

    #[test]
    fn test_tracker_treats_edit_as_new() {
        let mut tracker = NewestMessageTracker::default();
        let mut feed = vec![message("m1", MessageOrigin::Local, "a lat")];
        tracker.observe(&feed);

        feed[0].text = "a latte".to_string();
        feed[0].edited_at = Some(10);
        assert_eq!(tracker.observe(&feed).unwrap().text, "a latte");
    }

    #[test]
    fn test_seeded_tracker_skips_existing_newest() {
        let feed = vec![message("m1", MessageOrigin::Local, "hi")];
        let mut tracker = NewestMessageTracker::seeded(&feed);
        assert!(tracker.observe(&feed).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_local_message_shows_then_clears() {
        let feed = MessageFeed::new();
        let mut sync = TranscriptSynchronizer::new(CLEAR_AFTER);
        sync.attach(feed.observe());

        feed.push(message("m1", MessageOrigin::Local, "one oat cappuccino"));
        settle().await;
        assert_eq!(sync.current().unwrap().text, "one oat cappuccino");

        tokio::time::sleep(CLEAR_AFTER).await;
        assert!(sync.current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_handler_runs_once_per_message() {
        let feed = MessageFeed::new();
        let mut sync = TranscriptSynchronizer::new(CLEAR_AFTER);
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        sync.on_new_local_message(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        sync.attach(feed.observe());

        feed.push(message("m1", MessageOrigin::Local, "hi"));
        settle().await;
        // Re-pushing the identical message is not a new message.
        feed.push(message("m1", MessageOrigin::Local, "hi"));
        settle().await;
        feed.push(message("m2", MessageOrigin::Remote, "hello!"));
        settle().await;
        feed.push(message("m3", MessageOrigin::Local, "a mocha"));
        settle().await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(feed.len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reattach_does_not_replay() {
        let feed = MessageFeed::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let mut first = TranscriptSynchronizer::new(CLEAR_AFTER);
        first.attach(feed.observe());
        feed.push(message("m1", MessageOrigin::Local, "hi"));
        settle().await;
        drop(first);

        let mut second = TranscriptSynchronizer::new(CLEAR_AFTER);
        let counter = calls.clone();
        second.on_new_local_message(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        second.attach(feed.observe());
        settle().await;

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(second.current().is_none());
        assert_eq!(feed.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_detach_is_idempotent_and_clears() {
        let feed = MessageFeed::new();
        let mut sync = TranscriptSynchronizer::new(CLEAR_AFTER);
        assert!(sync.attach(feed.observe()));
        assert!(!sync.attach(feed.observe()));

        feed.push(message("m1", MessageOrigin::Local, "hi"));
        settle().await;
        assert!(sync.current().is_some());

        assert!(sync.detach());
        assert!(!sync.detach());
        assert!(sync.current().is_none());

        feed.push(message("m2", MessageOrigin::Local, "still there?"));
        settle().await;
        assert!(sync.current().is_none());
    }
}
