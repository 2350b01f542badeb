//! brewboard-core: Polling panels for a voice coffee-ordering front end
//!
//! This library keeps the view state of the barista dashboard in sync with
//! two upstreams: the orders endpoint, which is polled, and the chat feed,
//! which is pushed. It is used by the `brewboard` CLI and by any renderer
//! that embeds the panels.
//!
//! # Main Entry Points
//!
//! - [`panels`] - Order display, receipts, live transcription, processing indicator
//! - [`refresh`] - Timer-driven refresh source with stale-result protection
//! - [`sync`] - Chat feed and the transcript synchronizer
//! - [`stages`] - Time-driven pipeline stage presenter
//! - [`orders`] - Order model, order sources and pricing
//! - [`config`] - Configuration management

pub mod config;
pub mod errors;
pub mod events;
pub mod logging;
pub mod orders;
pub mod panels;
pub mod refresh;
pub mod stages;
pub mod sync;

// Re-export commonly used types at crate root for convenience
pub use config::BrewConfig;
pub use errors::{BrewError, ConfigError};
pub use orders::{
    DirectoryOrderSource, DrinkSize, FetchError, HttpOrderSource, Order, Receipt, price,
};
pub use panels::{
    LiveTranscription, OrderDisplay, PanelError, ProcessingIndicator, ReceiptsPanel,
};
pub use refresh::{Fetcher, RefreshOptions, RefreshSource, SharedFetcher, Snapshot};
pub use stages::{PipelineStage, StagePresenter};
pub use sync::{ChatMessage, FeedRecord, MessageFeed, MessageOrigin, TranscriptSynchronizer};

// Re-export logging initialization
pub use logging::init_logging;
