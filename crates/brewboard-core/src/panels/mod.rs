//! The four panels a renderer toggles.
//!
//! Each panel owns its background work and starts or stops it from
//! `set_visible`. Dropping a panel releases everything it started.

pub mod errors;
pub mod indicator;
pub mod order_display;
pub mod receipts;
pub mod transcription;

pub use errors::PanelError;
pub use indicator::{ProcessingIndicator, StageRow};
pub use order_display::OrderDisplay;
pub use receipts::{CloseHandler, ReceiptsPanel, ReceiptsView};
pub use transcription::{LiveTranscription, TranscriptView};
