pub mod engine;
pub mod limits;
pub mod model;
pub mod observability;

pub use engine::{CancelFlag, ComputationHandle, EngineError, LayoutEngine, LayoutResult};
pub use model::{Candidate, EventFrame, EventInterval, Hours, LayoutConfig, Rect};
