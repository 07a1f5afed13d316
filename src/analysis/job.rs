/// Analysis job records and status definitions
///
/// This module defines the job record held by the store, the status state
/// machine, and the partial update merged in when background work finishes.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A technology detected on a target site
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Technology {
    /// Product name, e.g. "React"
    pub name: String,

    /// Category label, e.g. "JavaScript Frameworks"
    pub category: String,

    /// Detected version, when the lookup reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Represents the current state of an analysis job
///
/// The state machine is forward-only: a job starts as `Analyzing` and moves
/// exactly once to either `Completed` or `Failed`. There is no transition
/// back to `Analyzing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Background work has been scheduled but has not finished
    Analyzing,

    /// Background work finished; technologies and link count are populated
    Completed,

    /// Background work failed; the error message is recorded on the job
    Failed,
}

impl JobStatus {
    /// Returns true if this is a terminal state (no further transitions)
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Analyzing)
    }

    /// Converts the status to its wire string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Analyzing => "analyzing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One requested analysis of a URL, tracked from submission to completion
///
/// The store owns the canonical record; everything handed to callers is a
/// clone. Serialized snapshots use camelCase keys and ISO-8601 timestamps;
/// `completedAt` and `error` are omitted until set, while `technologies`
/// and `linkCount` are always present (an in-flight job renders `[]`/`0`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisJob {
    /// Opaque unique identifier, immutable after creation
    pub id: String,

    /// Canonical absolute URL under analysis, immutable after creation
    pub url: String,

    /// Current state of the job
    pub status: JobStatus,

    /// Detected technologies; empty until the job completes
    pub technologies: Vec<Technology>,

    /// Number of anchor elements on the landing page; 0 until completed
    pub link_count: u32,

    /// Submission timestamp, immutable
    pub created_at: DateTime<Utc>,

    /// Set exactly once, when the job reaches a terminal state
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,

    /// Failure message; present only when status is `Failed`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnalysisJob {
    /// Creates a fresh job in the `Analyzing` state
    pub fn new(id: String, url: String) -> Self {
        Self {
            id,
            url,
            status: JobStatus::Analyzing,
            technologies: Vec::new(),
            link_count: 0,
            created_at: Utc::now(),
            completed_at: None,
            error: None,
        }
    }
}

/// A partial update merged into a stored job
///
/// Only fields that are `Some` are applied; everything else on the record
/// is left untouched. Constructed through [`JobUpdate::completed`] and
/// [`JobUpdate::failed`] for the two terminal transitions.
#[derive(Debug, Clone, Default)]
pub struct JobUpdate {
    pub status: Option<JobStatus>,
    pub technologies: Option<Vec<Technology>>,
    pub link_count: Option<u32>,
    pub completed_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

impl JobUpdate {
    /// Terminal update for a successful analysis
    pub fn completed(technologies: Vec<Technology>, link_count: u32) -> Self {
        Self {
            status: Some(JobStatus::Completed),
            technologies: Some(technologies),
            link_count: Some(link_count),
            completed_at: Some(Utc::now()),
            error: None,
        }
    }

    /// Terminal update for a failed analysis
    pub fn failed(message: String) -> Self {
        Self {
            status: Some(JobStatus::Failed),
            completed_at: Some(Utc::now()),
            error: Some(message),
            ..Self::default()
        }
    }
}
