//! Read-only projections of the shared chat feed.

pub mod expiring;
pub mod feed;
pub mod synchronizer;

pub use expiring::ExpiringValue;
pub use feed::{ChatMessage, FeedObserver, FeedRecord, MessageFeed, MessageOrigin};
pub use synchronizer::{NewestMessageTracker, TranscriptLine, TranscriptSynchronizer};
