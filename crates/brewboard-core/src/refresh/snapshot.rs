use chrono::{DateTime, Utc};

use crate::orders::errors::FetchError;

/// What applying one fetch result did to a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Items were replaced with the (capped) fetched list.
    Replaced { count: usize },
    /// The fetch succeeded with nothing in it; previous items kept.
    KeptOnEmpty,
    /// The fetch failed; previous items kept and the error recorded.
    KeptOnError,
    /// A newer result was already applied; this one was dropped.
    Stale,
}

/// Latest successfully fetched list held by a refresh source.
///
/// Encapsulates:
/// - `items`: the capped list from the last non-empty successful fetch
/// - `last_error`: message of the most recent failure, cleared on success
/// - `last_refresh`: when `items` was last replaced
///
/// A failed or empty fetch never clears `items`.
#[derive(Debug, Clone)]
pub struct Snapshot<T> {
    items: Vec<T>,
    last_error: Option<String>,
    last_refresh: Option<DateTime<Utc>>,
    applied_seq: u64,
}

impl<T> Default for Snapshot<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            last_error: None,
            last_refresh: None,
            applied_seq: 0,
        }
    }
}

impl<T> Snapshot<T> {
    /// Apply the result of fetch number `seq`.
    ///
    /// Results with a sequence number at or below the last applied one are
    /// dropped, so a slow early response cannot overwrite a newer one.
    pub fn apply(
        &mut self,
        seq: u64,
        result: Result<Vec<T>, FetchError>,
        cap: Option<usize>,
    ) -> ApplyOutcome {
        if seq <= self.applied_seq {
            return ApplyOutcome::Stale;
        }
        self.applied_seq = seq;

        match result {
            Ok(mut items) if !items.is_empty() => {
                if let Some(cap) = cap {
                    items.truncate(cap);
                }
                let count = items.len();
                self.items = items;
                self.last_error = None;
                self.last_refresh = Some(Utc::now());
                ApplyOutcome::Replaced { count }
            }
            Ok(_) => {
                self.last_error = None;
                ApplyOutcome::KeptOnEmpty
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
                ApplyOutcome::KeptOnError
            }
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        self.last_refresh
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn network_error() -> FetchError {
        FetchError::Network {
            url: "http://localhost:3000/api/orders".to_string(),
            message: "connection refused".to_string(),
        }
    }

    #[test]
    fn test_success_replaces_and_caps() {
        let mut snap = Snapshot::default();
        let outcome = snap.apply(1, Ok(vec![5, 4, 3, 2, 1]), Some(3));
        assert_eq!(outcome, ApplyOutcome::Replaced { count: 3 });
        assert_eq!(snap.items(), &[5, 4, 3]);
        assert!(snap.last_refresh().is_some());
    }

    #[test]
    fn test_unbounded_cap_keeps_everything() {
        let mut snap = Snapshot::default();
        snap.apply(1, Ok(vec![1, 2, 3, 4, 5, 6]), None);
        assert_eq!(snap.len(), 6);
    }

    #[test]
    fn test_failure_keeps_previous_items() {
        let mut snap = Snapshot::default();
        snap.apply(1, Ok(vec!["a", "b"]), Some(3));

        let outcome = snap.apply(2, Err(network_error()), Some(3));
        assert_eq!(outcome, ApplyOutcome::KeptOnError);
        assert_eq!(snap.items(), &["a", "b"]);
        assert!(snap.last_error().unwrap().contains("connection refused"));
    }

    #[test]
    fn test_empty_result_keeps_previous_items() {
        let mut snap = Snapshot::default();
        snap.apply(1, Ok(vec!["a"]), Some(3));

        let outcome = snap.apply(2, Ok(vec![]), Some(3));
        assert_eq!(outcome, ApplyOutcome::KeptOnEmpty);
        assert_eq!(snap.items(), &["a"]);
    }

    #[test]
    fn test_success_clears_previous_error() {
        let mut snap = Snapshot::default();
        snap.apply(1, Err(network_error()), Some(3));
        assert!(snap.last_error().is_some());

        snap.apply(2, Ok(vec![1]), Some(3));
        assert!(snap.last_error().is_none());
    }

    #[test]
    fn test_older_sequence_is_dropped() {
        let mut snap = Snapshot::default();
        snap.apply(5, Ok(vec!["newer"]), None);

        let outcome = snap.apply(4, Ok(vec!["older"]), None);
        assert_eq!(outcome, ApplyOutcome::Stale);
        assert_eq!(snap.items(), &["newer"]);
    }
}
