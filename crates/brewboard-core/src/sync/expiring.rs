use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

/// A display value that clears itself a fixed time after it was last set.
///
/// Setting a new value cancels the pending clear of the previous one, so at
/// most one clear timer exists at a time. Must be used from within a tokio
/// runtime.
pub struct ExpiringValue<T> {
    ttl: Duration,
    tx: Arc<watch::Sender<Option<T>>>,
    generation: Arc<AtomicU64>,
    clear_task: Mutex<Option<JoinHandle<()>>>,
}

impl<T> ExpiringValue<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(ttl: Duration) -> Self {
        let (tx, _) = watch::channel(None);
        Self {
            ttl,
            tx: Arc::new(tx),
            generation: Arc::new(AtomicU64::new(0)),
            clear_task: Mutex::new(None),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Show `value` and schedule it to clear after the ttl.
    pub fn set(&self, value: T) {
        let mut clear_task = self
            .clear_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = clear_task.take() {
            previous.abort();
        }

        let my_generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.tx.send_replace(Some(value));

        let tx = self.tx.clone();
        let generation = self.generation.clone();
        let ttl = self.ttl;
        *clear_task = Some(tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            let cleared = tx.send_if_modified(|value| {
                if generation.load(Ordering::SeqCst) != my_generation || value.is_none() {
                    return false;
                }
                *value = None;
                true
            });
            if cleared {
                debug!(
                    event = "core.sync.value_expired",
                    ttl_ms = ttl.as_millis() as u64
                );
            }
        }));
    }

    /// Clear now and cancel any pending clear.
    pub fn clear(&self) {
        let mut clear_task = self
            .clear_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = clear_task.take() {
            previous.abort();
        }
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.tx.send_if_modified(|value| value.take().is_some());
    }

    pub fn get(&self) -> Option<T> {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<T>> {
        self.tx.subscribe()
    }
}

impl<T> Drop for ExpiringValue<T> {
    fn drop(&mut self) {
        let clear_task = self
            .clear_task
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(task) = clear_task.take() {
            task.abort();
        }
    }
}
