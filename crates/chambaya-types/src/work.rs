//! Works (job postings), applications and the active-work snapshot.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::user::Role;

/// Status string the server uses for a work that is currently underway.
pub const STATUS_IN_PROGRESS: &str = "in_progress";

/// Per-role completion confirmation flags.
///
/// Each flag is tri-state: `None` means the server did not report it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker_confirmed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employer_confirmed: Option<bool>,
}

/// One in-flight engagement inside a [`WorkStatusSnapshot`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveWork {
    #[serde(default)]
    pub work_id: Option<String>,
    #[serde(default)]
    pub work_title: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub application_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employer_id: Option<String>,
}

impl ActiveWork {
    pub fn is_in_progress(&self) -> bool {
        self.status.as_deref() == Some(STATUS_IN_PROGRESS)
    }
}

/// Server-reported state of the current user's active work
/// (`GET /works/isWorkOpen`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkStatusSnapshot {
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub completion_status: Option<CompletionStatus>,
    #[serde(default)]
    pub works: Option<Vec<ActiveWork>>,
    #[serde(default)]
    pub worker_id: Option<String>,
    #[serde(default)]
    pub employer_id: Option<String>,
    #[serde(default)]
    pub work_id: Option<String>,
}

impl WorkStatusSnapshot {
    pub fn worker_confirmed(&self) -> Option<bool> {
        self.completion_status.and_then(|s| s.worker_confirmed)
    }

    pub fn employer_confirmed(&self) -> Option<bool> {
        self.completion_status.and_then(|s| s.employer_confirmed)
    }

    /// First listed work, if any.
    pub fn first_work(&self) -> Option<&ActiveWork> {
        self.works.as_ref().and_then(|works| works.first())
    }
}

/// A published job.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Work {
    #[serde(default, alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub salary: f64,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub image_work: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Fields this client does not model.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Fields for publishing a new work (sent as multipart).
#[derive(Debug, Clone, Default)]
pub struct NewWork {
    pub title: String,
    pub description: String,
    pub location: String,
    pub salary: f64,
    pub requirements: Vec<String>,
    /// Local image paths to upload.
    pub images: Vec<std::path::PathBuf>,
}

/// Body for applying to a work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyRequest {
    pub worker_id: String,
    pub work_id: String,
}
