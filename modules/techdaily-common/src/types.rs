use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// --- Display theme ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}

// --- Users ---

/// The user record returned by the login exchange. `role` stays a raw wire
/// string here; the typed role enum lives with the token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub role: String,
    pub subscription: String,
}

// --- Articles ---

/// A published daily briefing. Fetched fresh per view, immutable for the
/// view's lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    pub title: String,
    pub slug: String,
    /// Markdown-subset body; see `techdaily-render` for the grammar.
    pub content: String,
    /// Mermaid diagram source, handed verbatim to the diagram collaborator.
    #[serde(default)]
    pub diagram: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

// --- Review candidates ---

/// A briefing produced by the pipeline, awaiting moderation. Same shape as
/// an Article plus the back-reference into the topic graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub article_md: String,
    #[serde(default)]
    pub diagram: Option<String>,
    pub created_at: DateTime<Utc>,
    pub topic_node_id: String,
}

// --- Pipeline jobs ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
    Failed,
    /// Anything the backend sends that we don't recognize. Non-terminal, so
    /// polling keeps going, matching the original string-comparison loop.
    #[serde(other)]
    Unknown,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Pending => write!(f, "pending"),
            JobStatus::Running => write!(f, "running"),
            JobStatus::Completed => write!(f, "completed"),
            JobStatus::Failed => write!(f, "failed"),
            JobStatus::Unknown => write!(f, "unknown"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChildTopic {
    pub child_node_id: String,
    pub child_topic: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineResult {
    #[serde(default)]
    pub topic_name: Option<String>,
    #[serde(default)]
    pub child_topic_added: Option<Vec<ChildTopic>>,
}

/// Snapshot of an asynchronous pipeline run, polled by job id until the
/// status reaches a terminal value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineJob {
    pub job_id: String,
    pub status: JobStatus,
    #[serde(default)]
    pub result: Option<PipelineResult>,
    #[serde(default)]
    pub error: Option<String>,
}

impl PipelineJob {
    /// The locally seeded snapshot used right after a trigger, before the
    /// first status poll comes back.
    pub fn pending(job_id: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            status: JobStatus::Pending,
            result: None,
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_job_status_is_not_terminal() {
        let job: PipelineJob = serde_json::from_str(
            r#"{"job_id":"j1","status":"queued","result":null,"error":null}"#,
        )
        .unwrap();
        assert_eq!(job.status, JobStatus::Unknown);
        assert!(!job.status.is_terminal());
    }

    #[test]
    fn terminal_statuses() {
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
        assert!(!JobStatus::Pending.is_terminal());
        assert!(!JobStatus::Running.is_terminal());
    }

    #[test]
    fn candidate_parses_wire_shape() {
        let c: Candidate = serde_json::from_str(
            r###"{
                "id": "c1",
                "title": "Rate Limiters",
                "slug": "rate-limiters",
                "article_md": "## Why\n- fairness",
                "diagram": "graph TD; A-->B",
                "created_at": "2026-08-20T07:00:00Z",
                "topic_node_id": "t42"
            }"###,
        )
        .unwrap();
        assert_eq!(c.id, "c1");
        assert_eq!(c.topic_node_id, "t42");
    }

    #[test]
    fn article_tolerates_missing_optionals() {
        let a: Article = serde_json::from_str(
            r#"{"id":"a1","title":"X","slug":"x","content":"body"}"#,
        )
        .unwrap();
        assert!(a.diagram.is_none());
        assert!(a.published_at.is_none());
    }
}
