mod input;
mod metrics;
mod viewer;

pub use input::{action_for_key, InputCollector, PointerEvent, ViewerAction};
pub use metrics::FrameMetricsSnapshot;
pub use viewer::{run_viewer, ViewerConfig, ViewerError};
