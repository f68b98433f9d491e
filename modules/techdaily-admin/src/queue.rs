use async_trait::async_trait;
use tracing::{info, warn};

use techdaily_client::ApiClient;
use techdaily_common::{Candidate, PipelineJob};

/// Backend operations the review console needs. The API client is the
/// production implementation; tests script their own.
#[async_trait]
pub trait ReviewBackend: Send + Sync {
    async fn pending_candidates(&self) -> techdaily_client::Result<Vec<Candidate>>;
    async fn approve_candidate(&self, id: &str) -> techdaily_client::Result<()>;
    async fn reject_candidate(&self, id: &str, reason: &str) -> techdaily_client::Result<()>;
    async fn run_pipeline(&self) -> techdaily_client::Result<String>;
    async fn pipeline_status(&self, job_id: &str) -> techdaily_client::Result<PipelineJob>;
}

#[async_trait]
impl ReviewBackend for ApiClient {
    async fn pending_candidates(&self) -> techdaily_client::Result<Vec<Candidate>> {
        ApiClient::pending_candidates(self).await
    }

    async fn approve_candidate(&self, id: &str) -> techdaily_client::Result<()> {
        ApiClient::approve_candidate(self, id).await
    }

    async fn reject_candidate(&self, id: &str, reason: &str) -> techdaily_client::Result<()> {
        ApiClient::reject_candidate(self, id, reason).await
    }

    async fn run_pipeline(&self) -> techdaily_client::Result<String> {
        ApiClient::run_pipeline(self).await
    }

    async fn pipeline_status(&self, job_id: &str) -> techdaily_client::Result<PipelineJob> {
        ApiClient::pipeline_status(self, job_id).await
    }
}

/// Local state of the moderation console: the pending list, the current
/// selection with its reject form, and the latest pipeline snapshot. All
/// mutations go through the backend first; the local list only changes once
/// the backend has accepted the action.
pub struct ReviewQueue {
    candidates: Vec<Candidate>,
    selected: Option<String>,
    rejecting: bool,
    pipeline: Option<PipelineJob>,
}

impl ReviewQueue {
    pub fn new() -> Self {
        Self {
            candidates: Vec::new(),
            selected: None,
            rejecting: false,
            pipeline: None,
        }
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// The selected candidate, if it is still in the list. A selection can
    /// go stale when a refresh drops the entry; it then shows nothing.
    pub fn selected_candidate(&self) -> Option<&Candidate> {
        let id = self.selected.as_deref()?;
        self.candidates.iter().find(|c| c.id == id)
    }

    pub fn is_rejecting(&self) -> bool {
        self.rejecting
    }

    pub fn pipeline(&self) -> Option<&PipelineJob> {
        self.pipeline.as_ref()
    }

    pub(crate) fn set_pipeline(&mut self, job: PipelineJob) {
        self.pipeline = Some(job);
    }

    /// Replace the list with the backend's pending set. A failed fetch is
    /// logged and leaves the current list untouched.
    pub async fn refresh(&mut self, backend: &dyn ReviewBackend) {
        match backend.pending_candidates().await {
            Ok(candidates) => {
                info!(count = candidates.len(), "Loaded pending candidates");
                self.candidates = candidates;
            }
            Err(e) => warn!(error = %e, "Could not refresh candidate queue"),
        }
    }

    /// Select a candidate for preview. Returns false when the id is not in
    /// the current list. Switching selection closes any open reject form.
    pub fn select(&mut self, id: &str) -> bool {
        if self.candidates.iter().any(|c| c.id == id) {
            self.selected = Some(id.to_string());
            self.rejecting = false;
            true
        } else {
            false
        }
    }

    /// Open the reject-reason form for the current selection.
    pub fn begin_reject(&mut self) {
        if self.selected.is_some() {
            self.rejecting = true;
        }
    }

    /// Close the reject form without sending anything.
    pub fn cancel_reject(&mut self) {
        self.rejecting = false;
    }

    /// Approve a candidate. Only a backend-accepted approval removes the
    /// entry locally; on error nothing changes and the error propagates for
    /// blocking display.
    pub async fn approve(
        &mut self,
        backend: &dyn ReviewBackend,
        id: &str,
    ) -> techdaily_client::Result<()> {
        backend.approve_candidate(id).await?;
        info!(candidate_id = %id, "Candidate approved");
        self.candidates.retain(|c| c.id != id);
        self.selected = None;
        self.rejecting = false;
        Ok(())
    }

    /// Reject a candidate with the moderator's reason. Same local rules as
    /// approve.
    pub async fn confirm_reject(
        &mut self,
        backend: &dyn ReviewBackend,
        id: &str,
        reason: &str,
    ) -> techdaily_client::Result<()> {
        backend.reject_candidate(id, reason).await?;
        info!(candidate_id = %id, "Candidate rejected");
        self.candidates.retain(|c| c.id != id);
        self.selected = None;
        self.rejecting = false;
        Ok(())
    }

    /// Start a pipeline run and seed the local snapshot as pending. On
    /// error the snapshot keeps whatever it held before.
    pub async fn trigger_pipeline(
        &mut self,
        backend: &dyn ReviewBackend,
    ) -> techdaily_client::Result<String> {
        let job_id = backend.run_pipeline().await?;
        info!(job_id = %job_id, "Pipeline run started");
        self.pipeline = Some(PipelineJob::pending(job_id.clone()));
        Ok(job_id)
    }
}

impl Default for ReviewQueue {
    fn default() -> Self {
        Self::new()
    }
}
