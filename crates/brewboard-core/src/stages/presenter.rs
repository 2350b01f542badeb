//! Time-driven processing indicator.
//!
//! The stage advances on a fixed tick whether or not the pipeline actually
//! progressed. The timing is illustrative only.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::stages::types::PipelineStage;

/// Pure stage counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageCycle {
    index: usize,
}

impl StageCycle {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn stage(&self) -> PipelineStage {
        PipelineStage::from_index(self.index)
    }

    /// Move to the next stage, wrapping after the last.
    pub fn advance(&mut self) -> PipelineStage {
        self.index = (self.index + 1) % PipelineStage::ALL.len();
        self.stage()
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }
}

struct RunningTicker {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

pub struct StagePresenter {
    tick: Duration,
    cycle: Arc<watch::Sender<StageCycle>>,
    running: Option<RunningTicker>,
}

impl StagePresenter {
    pub fn new(tick: Duration) -> Self {
        let (tx, _) = watch::channel(StageCycle::default());
        Self {
            tick,
            cycle: Arc::new(tx),
            running: None,
        }
    }

    pub fn tick(&self) -> Duration {
        self.tick
    }

    pub fn is_visible(&self) -> bool {
        self.running.is_some()
    }

    /// Show or hide the indicator.
    ///
    /// Showing starts at the first stage and advances once per tick. Hiding
    /// stops the ticker and resets to the first stage. Repeating the current
    /// state does nothing. A zero tick cannot be shown; the presenter stays
    /// hidden on the first stage.
    pub fn set_visible(&mut self, visible: bool) {
        match (visible, self.running.is_some()) {
            (true, false) => self.show(),
            (false, true) => self.hide(),
            _ => {}
        }
    }

    pub fn current(&self) -> PipelineStage {
        self.cycle.borrow().stage()
    }

    pub fn current_index(&self) -> usize {
        self.cycle.borrow().index()
    }

    pub fn subscribe(&self) -> watch::Receiver<StageCycle> {
        self.cycle.subscribe()
    }

    fn show(&mut self) {
        if self.tick.is_zero() {
            warn!(event = "core.stages.show_rejected", reason = "zero tick");
            return;
        }

        self.cycle.send_if_modified(|cycle| {
            let changed = cycle.index() != 0;
            cycle.reset();
            changed
        });

        let token = CancellationToken::new();
        let handle = tokio::spawn(run_stage_ticker(
            self.tick,
            self.cycle.clone(),
            token.clone(),
        ));
        self.running = Some(RunningTicker { token, handle });

        info!(
            event = "core.stages.shown",
            tick_ms = self.tick.as_millis() as u64
        );
    }

    fn hide(&mut self) {
        if let Some(running) = self.running.take() {
            running.token.cancel();
            drop(running.handle);
        }
        self.cycle.send_if_modified(|cycle| {
            let changed = cycle.index() != 0;
            cycle.reset();
            changed
        });

        info!(event = "core.stages.hidden");
    }
}

impl Drop for StagePresenter {
    fn drop(&mut self) {
        if let Some(running) = self.running.take() {
            running.token.cancel();
        }
    }
}

async fn run_stage_ticker(
    tick: Duration,
    cycle: Arc<watch::Sender<StageCycle>>,
    token: CancellationToken,
) {
    // First advance is one full tick after showing.
    let mut ticker = tokio::time::interval_at(Instant::now() + tick, tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = ticker.tick() => {}
        }

        cycle.send_modify(|cycle| {
            let stage = cycle.advance();
            debug!(event = "core.stages.advanced", stage = ?stage);
        });
    }
}
