//! Background refresh of remote lists.
//!
//! One parameterized [`RefreshSource`] replaces per-panel interval/fetch/catch
//! code, so every panel gets the same cap, stale-read and cancellation
//! behavior.

pub mod fetcher;
pub mod snapshot;
pub mod source;

pub use fetcher::{FetchFuture, Fetcher, SharedFetcher, fetch_with_timeout, map_items};
pub use snapshot::{ApplyOutcome, Snapshot};
pub use source::{RefreshOptions, RefreshSource};
