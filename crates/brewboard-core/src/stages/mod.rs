pub mod presenter;
pub mod types;

pub use presenter::{StageCycle, StagePresenter};
pub use types::PipelineStage;
