pub mod monitor;
pub mod queue;

pub use monitor::{MonitorHandle, PipelineMonitor, POLL_INTERVAL};
pub use queue::{ReviewBackend, ReviewQueue};
