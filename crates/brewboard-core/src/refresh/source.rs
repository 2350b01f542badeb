//! Timer-driven refresh source.
//!
//! A [`RefreshSource`] owns one background loop that fetches immediately,
//! then once per interval, and publishes a [`Snapshot`] through a watch
//! channel. The loop is a scoped resource: it is started by `start`,
//! `resume` or `set_visible(true)` and released by `stop`,
//! `set_visible(false)` or dropping the source.
//!
//! Must be started from within a tokio runtime.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::errors::BrewError;
use crate::refresh::fetcher::{SharedFetcher, fetch_with_timeout};
use crate::refresh::snapshot::{ApplyOutcome, Snapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshOptions {
    pub interval: Duration,
    /// Maximum number of items kept; `None` keeps everything.
    pub cap: Option<usize>,
    pub fetch_timeout: Duration,
}

struct RunningLoop {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

pub struct RefreshSource<T> {
    name: &'static str,
    options: RefreshOptions,
    fetcher: SharedFetcher<T>,
    snapshot: Arc<watch::Sender<Snapshot<T>>>,
    /// Bumped on every stop; a loop only applies results for its own generation.
    generation: Arc<AtomicU64>,
    /// Shared across restarts so sequence numbers never repeat.
    next_seq: Arc<AtomicU64>,
    running: Option<RunningLoop>,
}

impl<T> RefreshSource<T> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn options(&self) -> RefreshOptions {
        self.options
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Cancel the loop. Safe to call when nothing is running.
    ///
    /// Once this returns, no fetch issued before the stop can change the
    /// snapshot. Returns whether a loop was actually stopped.
    pub fn stop(&mut self) -> bool {
        let Some(running) = self.running.take() else {
            return false;
        };

        // Bump under the snapshot lock: an in-flight apply either lands
        // before this returns or sees the new generation and backs off.
        let generation = &self.generation;
        self.snapshot.send_if_modified(|_| {
            generation.fetch_add(1, Ordering::SeqCst);
            false
        });
        running.token.cancel();
        // The loop exits on its own at the next await; nothing to join.
        drop(running.handle);

        info!(event = "core.refresh.stopped", source = self.name);
        true
    }

    /// Subscribe to snapshot changes.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot<T>> {
        self.snapshot.subscribe()
    }
}

impl<T> RefreshSource<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create a stopped source. Nothing is fetched until it is started.
    pub fn new(name: &'static str, options: RefreshOptions, fetcher: SharedFetcher<T>) -> Self {
        let (tx, _) = watch::channel(Snapshot::default());
        Self {
            name,
            options,
            fetcher,
            snapshot: Arc::new(tx),
            generation: Arc::new(AtomicU64::new(0)),
            next_seq: Arc::new(AtomicU64::new(0)),
            running: None,
        }
    }

    /// Start polling `fetcher` every `interval`, fetching once right away.
    ///
    /// A no-op returning `false` while already running: parameters are not
    /// replaced and no second timer is created. Call [`stop`](Self::stop)
    /// first to change them. A zero interval is rejected the same way and
    /// leaves the source stopped.
    pub fn start(&mut self, interval: Duration, fetcher: SharedFetcher<T>) -> bool {
        if self.is_running() {
            debug!(
                event = "core.refresh.start_ignored",
                source = self.name,
                reason = "already running",
            );
            return false;
        }
        if interval.is_zero() {
            warn!(
                event = "core.refresh.start_rejected",
                source = self.name,
                reason = "zero interval",
            );
            return false;
        }
        self.options.interval = interval;
        self.fetcher = fetcher;
        self.spawn_loop();
        true
    }

    /// Start with the current interval and fetcher.
    ///
    /// No-op while running, and refused when the interval is zero.
    pub fn resume(&mut self) -> bool {
        if self.is_running() {
            return false;
        }
        if self.options.interval.is_zero() {
            warn!(
                event = "core.refresh.start_rejected",
                source = self.name,
                reason = "zero interval",
            );
            return false;
        }
        self.spawn_loop();
        true
    }

    /// Visible sources poll; hidden ones do not. Idempotent in both directions.
    ///
    /// Returns whether the source is polling afterwards.
    pub fn set_visible(&mut self, visible: bool) -> bool {
        if visible {
            self.resume();
        } else {
            self.stop();
        }
        self.is_running()
    }

    /// Copy of the current snapshot.
    pub fn snapshot(&self) -> Snapshot<T> {
        self.snapshot.borrow().clone()
    }

    fn spawn_loop(&mut self) {
        let token = CancellationToken::new();
        let ctx = LoopContext {
            name: self.name,
            options: self.options,
            fetcher: self.fetcher.clone(),
            snapshot: self.snapshot.clone(),
            generation: self.generation.clone(),
            my_generation: self.generation.load(Ordering::SeqCst),
            next_seq: self.next_seq.clone(),
            token: token.clone(),
        };

        info!(
            event = "core.refresh.started",
            source = self.name,
            interval_ms = self.options.interval.as_millis() as u64,
            cap = ?self.options.cap,
        );

        let handle = tokio::spawn(run_refresh_loop(ctx));
        self.running = Some(RunningLoop { token, handle });
    }
}

impl<T> Drop for RefreshSource<T> {
    fn drop(&mut self) {
        self.stop();
    }
}

struct LoopContext<T> {
    name: &'static str,
    options: RefreshOptions,
    fetcher: SharedFetcher<T>,
    snapshot: Arc<watch::Sender<Snapshot<T>>>,
    generation: Arc<AtomicU64>,
    my_generation: u64,
    next_seq: Arc<AtomicU64>,
    token: CancellationToken,
}

async fn run_refresh_loop<T>(ctx: LoopContext<T>)
where
    T: Send + Sync + 'static,
{
    let LoopContext {
        name,
        options,
        fetcher,
        snapshot,
        generation,
        my_generation,
        next_seq,
        token,
    } = ctx;

    let mut ticker = tokio::time::interval(options.interval);
    // A fetch slower than the interval pushes the schedule back instead of
    // firing a burst of catch-up ticks.
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let seq = next_seq.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(event = "core.refresh.fetch_started", source = name, seq = seq);

        let result = tokio::select! {
            biased;
            _ = token.cancelled() => {
                debug!(event = "core.refresh.fetch_abandoned", source = name, seq = seq);
                break;
            }
            result = fetch_with_timeout(fetcher.as_ref(), options.fetch_timeout) => result,
        };

        if let Err(ref e) = result {
            warn!(
                event = "core.refresh.fetch_failed",
                source = name,
                seq = seq,
                error = %e,
                error_code = e.error_code(),
            );
        }

        let mut outcome = ApplyOutcome::Stale;
        let mut discarded = false;
        snapshot.send_if_modified(|snap| {
            if generation.load(Ordering::SeqCst) != my_generation {
                discarded = true;
                return false;
            }
            outcome = snap.apply(seq, result, options.cap);
            outcome != ApplyOutcome::Stale
        });

        if discarded {
            debug!(event = "core.refresh.fetch_discarded", source = name, seq = seq);
            break;
        }

        debug!(
            event = "core.refresh.fetch_completed",
            source = name,
            seq = seq,
            outcome = ?outcome,
        );
    }

    debug!(event = "core.refresh.loop_exited", source = name);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::errors::FetchError;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::AtomicUsize;

    const INTERVAL: Duration = Duration::from_millis(5000);

    fn options(cap: Option<usize>) -> RefreshOptions {
        RefreshOptions {
            interval: INTERVAL,
            cap,
            fetch_timeout: Duration::from_secs(10),
        }
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    /// Fetcher that always returns `items` and counts its calls.
    fn counting_fetcher(items: &[&str]) -> (SharedFetcher<String>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let items = strings(items);
        let counter = calls.clone();
        let fetcher: SharedFetcher<String> = Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            let items = items.clone();
            async move { Ok::<_, FetchError>(items) }
        });
        (fetcher, calls)
    }

    /// Fetcher that replays `results` in order, then keeps returning errors.
    fn scripted_fetcher(results: Vec<Result<Vec<String>, FetchError>>) -> SharedFetcher<String> {
        let script = Arc::new(Mutex::new(VecDeque::from(results)));
        Arc::new(move || {
            let next = script.lock().unwrap().pop_front().unwrap_or_else(|| {
                Err(FetchError::Parse {
                    message: "script exhausted".to_string(),
                })
            });
            async move { next }
        })
    }

    /// Let the spawned loop run without reaching the next tick.
    async fn settle() {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_visible_fetches_immediately_then_every_interval() {
        let (fetcher, calls) = counting_fetcher(&["o4", "o3", "o2", "o1"]);
        let mut source = RefreshSource::new("orders", options(Some(3)), fetcher);

        source.set_visible(true);
        settle().await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(source.snapshot().items(), strings(&["o4", "o3", "o2"]));

        for n in 1..=3 {
            tokio::time::sleep(INTERVAL).await;
            assert_eq!(calls.load(Ordering::SeqCst), 1 + n);
        }

        source.set_visible(false);
        tokio::time::sleep(INTERVAL * 4).await;
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert!(!source.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_double_start_keeps_single_timer() {
        let (fetcher, calls) = counting_fetcher(&["o1"]);
        let mut source = RefreshSource::new("orders", options(Some(3)), fetcher.clone());

        assert!(source.start(INTERVAL, fetcher.clone()));
        assert!(!source.start(INTERVAL, fetcher));
        source.set_visible(true);
        settle().await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        tokio::time::sleep(INTERVAL).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_is_idempotent() {
        let (fetcher, _calls) = counting_fetcher(&["o1"]);
        let mut source = RefreshSource::new("orders", options(None), fetcher);

        assert!(!source.stop());
        source.resume();
        settle().await;
        assert!(source.stop());
        assert!(!source.stop());
        assert!(!source.is_running());
        assert_eq!(source.snapshot().items(), strings(&["o1"]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failures_keep_snapshot_and_schedule() {
        let fetcher = scripted_fetcher(vec![
            Ok(strings(&["a", "b"])),
            Err(FetchError::HttpStatus {
                url: "http://localhost:3000/api/orders".to_string(),
                status: 502,
            }),
            Ok(vec![]),
            Ok(strings(&["c"])),
        ]);
        let mut source = RefreshSource::new("orders", options(Some(3)), fetcher);
        source.set_visible(true);

        settle().await;
        assert_eq!(source.snapshot().items(), strings(&["a", "b"]));

        tokio::time::sleep(INTERVAL).await;
        let snap = source.snapshot();
        assert_eq!(snap.items(), strings(&["a", "b"]));
        assert!(snap.last_error().unwrap().contains("HTTP 502"));

        tokio::time::sleep(INTERVAL).await;
        assert_eq!(source.snapshot().items(), strings(&["a", "b"]));

        tokio::time::sleep(INTERVAL).await;
        let snap = source.snapshot();
        assert_eq!(snap.items(), strings(&["c"]));
        assert!(snap.last_error().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_counts_as_failure() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let fetcher: SharedFetcher<String> = Arc::new(move || {
            let call = counter.fetch_add(1, Ordering::SeqCst);
            async move {
                if call == 0 {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                }
                Ok::<_, FetchError>(vec!["fresh".to_string()])
            }
        });
        let mut source = RefreshSource::new(
            "orders",
            RefreshOptions {
                interval: Duration::from_secs(20),
                cap: Some(3),
                fetch_timeout: Duration::from_secs(10),
            },
            fetcher,
        );
        source.set_visible(true);

        tokio::time::sleep(Duration::from_millis(10_001)).await;
        let snap = source.snapshot();
        assert!(snap.is_empty());
        assert!(snap.last_error().unwrap().contains("timed out"));

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(source.snapshot().items(), strings(&["fresh"]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_result_resolving_after_stop_is_discarded() {
        let gate = Arc::new(tokio::sync::Notify::new());
        let waiter = gate.clone();
        let fetcher: SharedFetcher<String> = Arc::new(move || {
            let gate = waiter.clone();
            async move {
                gate.notified().await;
                Ok::<_, FetchError>(vec!["late".to_string()])
            }
        });
        let mut source = RefreshSource::new("orders", options(Some(3)), fetcher);
        let mut updates = source.subscribe();

        source.set_visible(true);
        settle().await;
        source.set_visible(false);
        gate.notify_waiters();
        settle().await;

        assert!(source.snapshot().is_empty());
        assert!(!updates.has_changed().unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribers_see_updates() {
        let (fetcher, _calls) = counting_fetcher(&["o1", "o2"]);
        let mut source = RefreshSource::new("receipts", options(None), fetcher);
        let mut updates = source.subscribe();

        source.set_visible(true);
        updates.changed().await.unwrap();
        assert_eq!(updates.borrow_and_update().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_interval_is_rejected() {
        let (fetcher, calls) = counting_fetcher(&["o1"]);
        let mut source = RefreshSource::new(
            "orders",
            RefreshOptions {
                interval: Duration::ZERO,
                cap: Some(3),
                fetch_timeout: Duration::from_secs(10),
            },
            fetcher.clone(),
        );

        assert!(!source.resume());
        assert!(!source.set_visible(true));
        assert!(!source.start(Duration::ZERO, fetcher.clone()));
        assert!(!source.is_running());
        settle().await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        // A valid interval still starts normally afterwards.
        assert!(source.start(INTERVAL, fetcher));
        settle().await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(source.snapshot().items(), strings(&["o1"]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_stops_polling() {
        let (fetcher, calls) = counting_fetcher(&["o1"]);
        let mut source = RefreshSource::new("orders", options(None), fetcher);
        source.set_visible(true);
        settle().await;
        drop(source);

        tokio::time::sleep(INTERVAL * 3).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
