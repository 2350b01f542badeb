use std::time::Duration;

use tokio::sync::watch;

use crate::config::BrewConfig;
use crate::events;
use crate::panels::errors::PanelError;
use crate::stages::{PipelineStage, StageCycle, StagePresenter};

/// Row in the indicator's stage list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageRow {
    pub stage: PipelineStage,
    pub active: bool,
    pub done: bool,
}

/// Cycling "what the voice pipeline is doing" card.
///
/// Progress shown here is simulated on a timer.
pub struct ProcessingIndicator {
    presenter: StagePresenter,
}

impl ProcessingIndicator {
    pub const NAME: &'static str = "processing_indicator";

    pub fn new(tick: Duration) -> Self {
        Self {
            presenter: StagePresenter::new(tick),
        }
    }

    pub fn from_config(config: &BrewConfig) -> Result<Self, PanelError> {
        config
            .validate()
            .map_err(PanelError::invalid_config(Self::NAME))?;
        Ok(Self::new(config.stages.tick()))
    }

    pub fn set_visible(&mut self, visible: bool) {
        if self.presenter.is_visible() == visible {
            return;
        }
        self.presenter.set_visible(visible);
        if self.presenter.is_visible() == visible {
            events::log_panel_visibility(Self::NAME, visible);
        }
    }

    pub fn is_visible(&self) -> bool {
        self.presenter.is_visible()
    }

    pub fn current(&self) -> PipelineStage {
        self.presenter.current()
    }

    /// Every stage, marking the active one and those before it as done.
    pub fn rows(&self) -> Vec<StageRow> {
        let current = self.presenter.current_index();
        PipelineStage::ALL
            .iter()
            .map(|&stage| StageRow {
                stage,
                active: stage.index() == current,
                done: stage.index() < current,
            })
            .collect()
    }

    pub fn subscribe(&self) -> watch::Receiver<StageCycle> {
        self.presenter.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_rows_track_current_stage() {
        let mut indicator = ProcessingIndicator::from_config(&BrewConfig::default()).unwrap();
        indicator.set_visible(true);
        tokio::time::sleep(Duration::from_millis(1500 * 2 + 10)).await;

        let rows = indicator.rows();
        assert_eq!(indicator.current(), PipelineStage::Thinking);
        assert!(rows[0].done && rows[1].done);
        assert!(rows[2].active && !rows[2].done);
        assert!(!rows[3].active && !rows[3].done);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_tick_is_never_shown() {
        let mut indicator = ProcessingIndicator::new(Duration::ZERO);
        indicator.set_visible(true);
        assert!(!indicator.is_visible());
        assert!(indicator.rows()[0].active);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hidden_indicator_rests_on_first_stage() {
        let mut indicator = ProcessingIndicator::new(Duration::from_millis(1500));
        indicator.set_visible(true);
        tokio::time::sleep(Duration::from_millis(1600)).await;
        indicator.set_visible(false);

        assert!(!indicator.is_visible());
        assert_eq!(indicator.current(), PipelineStage::Listening);
    }
}
