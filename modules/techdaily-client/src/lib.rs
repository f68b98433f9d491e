pub mod error;

pub use error::{ApiError, Result};

use serde::Deserialize;
use tracing::warn;

use techdaily_common::{Article, Candidate, PipelineJob, User};

/// Response of the Google token exchange.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub user: User,
}

#[derive(Debug, Deserialize)]
struct RunResponse {
    job_id: String,
}

/// Thin typed client for the TechDaily backend. One instance per bearer
/// identity; no timeouts beyond reqwest's defaults, no retries.
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str, token: Option<&str>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.map(String::from),
        }
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        let mut req = self.client.get(url);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        req
    }

    fn post(&self, url: &str) -> reqwest::RequestBuilder {
        let mut req = self.client.post(url);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        req
    }

    /// Fetch today's briefing.
    pub async fn today_article(&self) -> Result<Article> {
        let url = format!("{}/api/articles/today", self.base_url);
        let resp = self.get(&url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(resp.json().await?)
    }

    /// Fetch the pending moderation queue. A non-array body normalizes to an
    /// empty list; entries that fail to parse are skipped.
    pub async fn pending_candidates(&self) -> Result<Vec<Candidate>> {
        let url = format!("{}/api/admin/candidates/", self.base_url);
        let resp = self.get(&url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = resp.text().await?;
        let value: serde_json::Value = serde_json::from_str(&body)?;
        Ok(parse_candidates(value))
    }

    /// Approve a candidate. Success is any 2xx; the body is ignored.
    pub async fn approve_candidate(&self, id: &str) -> Result<()> {
        let url = format!("{}/api/admin/candidates/approve/{}/", self.base_url, id);
        let resp = self.post(&url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }

    /// Reject a candidate, carrying the moderator's free-text reason.
    pub async fn reject_candidate(&self, id: &str, reason: &str) -> Result<()> {
        let url = format!("{}/api/admin/candidates/reject/{}/", self.base_url, id);
        let body = serde_json::json!({ "reason": reason });
        let resp = self.post(&url).json(&body).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }

    /// Start a pipeline run server-side. Returns immediately with the job id.
    pub async fn run_pipeline(&self) -> Result<String> {
        let url = format!("{}/api/pipeline/run/", self.base_url);
        let resp = self.post(&url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let run: RunResponse = resp.json().await?;
        Ok(run.job_id)
    }

    /// Fetch the current snapshot of a pipeline job.
    pub async fn pipeline_status(&self, job_id: &str) -> Result<PipelineJob> {
        let url = format!("{}/api/pipeline/status/{}/", self.base_url, job_id);
        let resp = self.get(&url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(resp.json().await?)
    }

    /// Exchange a Google id_token for a backend bearer token.
    pub async fn google_login(&self, id_token: &str) -> Result<LoginResponse> {
        let url = format!("{}/api/auth/google", self.base_url);
        let body = serde_json::json!({ "id_token": id_token });
        let resp = self.client.post(&url).json(&body).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(resp.json().await?)
    }

    /// Browser redirect target for the alternate OAuth flow.
    pub fn google_redirect_url(&self) -> String {
        format!("{}/api/auth/google/login", self.base_url)
    }
}

/// Normalize the candidate-list payload: non-arrays become an empty queue,
/// unparseable entries are dropped.
fn parse_candidates(value: serde_json::Value) -> Vec<Candidate> {
    let serde_json::Value::Array(items) = value else {
        warn!("Candidate list response was not an array, treating as empty");
        return Vec::new();
    };

    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<Candidate>(item) {
            Ok(candidate) => Some(candidate),
            Err(e) => {
                warn!(error = %e, "Skipping malformed candidate entry");
                None
            }
        })
        .collect()
}

/// Human-facing message for a failed login exchange: the server body's
/// `message` field when present, else a fixed fallback.
pub fn login_failure_message(err: &ApiError) -> String {
    if let ApiError::Api { message, .. } = err {
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(message) {
            if let Some(detail) = value.get("message").and_then(|m| m.as_str()) {
                return detail.to_string();
            }
        }
    }
    "Google login failed".to_string()
}
