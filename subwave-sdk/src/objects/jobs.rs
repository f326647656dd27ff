//! Background job types: translation jobs and library scans.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle of a server-side job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl JobStatus {
    /// Whether the job has reached a final state.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Failed | JobStatus::Cancelled
        )
    }
}

/// A server-side subtitle translation job.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationJob {
    pub id: Uuid,
    /// The subtitle being translated.
    pub subtitle_id: Uuid,
    /// Source language as a BCP-47 tag.
    pub source_language: String,
    /// Target language as a BCP-47 tag.
    pub target_language: String,
    pub status: JobStatus,
    /// Completion fraction in `0.0..=1.0`.
    pub progress: f32,
    /// Failure description when `status` is `failed`.
    pub error: Option<String>,
    /// Unix timestamp of job creation.
    pub created_at: i64,
    /// Unix timestamp of completion, once terminal.
    pub completed_at: Option<i64>,
}

/// State of the library scanner.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanStatus {
    /// Whether a scan is currently running.
    pub scanning: bool,
    /// Files examined so far in the running scan.
    pub scanned: u64,
    /// Unix timestamp of the last completed scan, if any.
    pub last_completed_at: Option<i64>,
}
