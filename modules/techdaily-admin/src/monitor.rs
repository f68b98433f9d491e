use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use techdaily_common::JobStatus;

use crate::queue::{ReviewBackend, ReviewQueue};

/// How often a running pipeline is polled.
pub const POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Shared cancel flag for a pipeline watch. Cloned out to whoever needs to
/// stop the watch; dropping the watch future itself also stops it.
#[derive(Clone)]
pub struct MonitorHandle {
    cancelled: Arc<AtomicBool>,
}

impl MonitorHandle {
    fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Polls a triggered pipeline run until it reaches a terminal status or the
/// handle is cancelled.
pub struct PipelineMonitor {
    interval: Duration,
    handle: MonitorHandle,
}

impl PipelineMonitor {
    pub fn new() -> Self {
        Self {
            interval: POLL_INTERVAL,
            handle: MonitorHandle::new(),
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn handle(&self) -> MonitorHandle {
        self.handle.clone()
    }

    /// Watch the queue's triggered run. Each cycle sleeps the interval,
    /// checks for cancellation, then polls; a successful poll replaces the
    /// queue's snapshot. A failed poll is logged and the next cycle carries
    /// on. Seeing `completed` re-fetches the candidate queue exactly once,
    /// then the watch ends; `failed` ends it without a re-fetch.
    pub async fn watch(&self, queue: &mut ReviewQueue, backend: &dyn ReviewBackend) {
        let Some(job_id) = queue.pipeline().map(|job| job.job_id.clone()) else {
            warn!("No pipeline run to watch");
            return;
        };

        loop {
            tokio::time::sleep(self.interval).await;
            if self.handle.is_cancelled() {
                info!(job_id = %job_id, "Pipeline watch cancelled");
                return;
            }

            match backend.pipeline_status(&job_id).await {
                Ok(job) => {
                    let status = job.status;
                    queue.set_pipeline(job);
                    match status {
                        JobStatus::Completed => {
                            info!(job_id = %job_id, "Pipeline completed, refreshing queue");
                            queue.refresh(backend).await;
                            return;
                        }
                        JobStatus::Failed => {
                            warn!(job_id = %job_id, "Pipeline failed");
                            return;
                        }
                        _ => {
                            debug!(job_id = %job_id, status = %status, "Pipeline still running")
                        }
                    }
                }
                Err(e) => warn!(job_id = %job_id, error = %e, "Pipeline status check failed"),
            }
        }
    }
}

impl Default for PipelineMonitor {
    fn default() -> Self {
        Self::new()
    }
}
