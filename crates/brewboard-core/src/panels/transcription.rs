use std::time::Duration;

use tokio::sync::watch;

use crate::config::BrewConfig;
use crate::events;
use crate::panels::errors::PanelError;
use crate::sync::{ChatMessage, MessageFeed, TranscriptLine, TranscriptSynchronizer};

const PLACEHOLDER: &str = "Listening for your voice...";

/// Render state of the transcription bubble.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptView {
    /// True while a freshly spoken line is on screen.
    pub is_listening: bool,
    pub text: String,
}

impl TranscriptView {
    pub fn status_label(&self) -> &'static str {
        if self.is_listening {
            "Processing..."
        } else {
            "Transcribing..."
        }
    }
}

/// Bubble echoing the user's latest spoken message for a few seconds.
pub struct LiveTranscription {
    feed: MessageFeed,
    sync: TranscriptSynchronizer,
    visible: bool,
}

impl LiveTranscription {
    pub const NAME: &'static str = "live_transcription";

    pub fn new(feed: MessageFeed, clear_after: Duration) -> Self {
        Self {
            feed,
            sync: TranscriptSynchronizer::new(clear_after),
            visible: false,
        }
    }

    pub fn from_config(config: &BrewConfig, feed: MessageFeed) -> Result<Self, PanelError> {
        config
            .validate()
            .map_err(PanelError::invalid_config(Self::NAME))?;
        Ok(Self::new(feed, config.transcript.clear_after()))
    }

    /// Register a handler for each new local message seen while visible.
    pub fn on_new_local_message(&self, handler: impl Fn(&ChatMessage) + Send + Sync + 'static) {
        self.sync.on_new_local_message(handler);
    }

    /// Showing follows the feed from its current end; hiding stops and clears.
    pub fn set_visible(&mut self, visible: bool) {
        if self.visible == visible {
            return;
        }
        self.visible = visible;
        if visible {
            self.sync.attach(self.feed.observe());
        } else {
            self.sync.detach();
        }
        events::log_panel_visibility(Self::NAME, visible);
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// `None` while hidden.
    pub fn view(&self) -> Option<TranscriptView> {
        if !self.visible {
            return None;
        }
        Some(match self.sync.current() {
            Some(line) => TranscriptView {
                is_listening: true,
                text: line.text,
            },
            None => TranscriptView {
                is_listening: false,
                text: PLACEHOLDER.to_string(),
            },
        })
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<TranscriptLine>> {
        self.sync.subscribe()
    }
}
