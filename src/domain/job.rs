//! Export job domain model
//!
//! An [`ExportJob`] lives for one run: it is created when the extract job is
//! submitted, updated only by polling, and dropped once the outcome has been
//! reported.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fully qualified warehouse table reference (`project.dataset.table`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRef {
    pub project: String,
    pub dataset: String,
    pub table: String,
}

impl TableRef {
    pub fn new(
        project: impl Into<String>,
        dataset: impl Into<String>,
        table: impl Into<String>,
    ) -> Self {
        Self {
            project: project.into(),
            dataset: dataset.into(),
            table: table.into(),
        }
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.project, self.dataset, self.table)
    }
}

/// Remote job state
///
/// The warehouse reports `PENDING`, `RUNNING` and `DONE`; anything that is not
/// `DONE` is treated as still running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobState {
    Running,
    Done,
}

impl JobState {
    /// Parse the state string reported by the warehouse (case-insensitive)
    pub fn from_remote(state: &str) -> Self {
        if state.trim().eq_ignore_ascii_case("done") {
            JobState::Done
        } else {
            JobState::Running
        }
    }

    pub fn is_terminal(self) -> bool {
        self == JobState::Done
    }
}

/// One error attached to a job or produced while handling it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobError {
    pub reason: String,
    pub message: String,
}

impl JobError {
    pub fn new(reason: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            message: message.into(),
        }
    }
}

impl From<&crate::domain::BackupError> for JobError {
    fn from(err: &crate::domain::BackupError) -> Self {
        JobError::new(err.reason(), err.to_string())
    }
}

/// Snapshot of a job as returned by the warehouse on submit or refresh
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobStatus {
    pub job_id: String,
    pub location: Option<String>,
    pub state: JobState,
    pub errors: Vec<JobError>,
}

/// Parameters of an extract job submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractRequest {
    pub job_id: String,
    pub source: TableRef,
    pub destination_uri: String,
    pub destination_format: String,
    pub compression: String,
}

impl ExtractRequest {
    /// Newline-delimited JSON, gzip-compressed extract
    pub fn ndjson_gzip(
        job_id: impl Into<String>,
        source: TableRef,
        destination_uri: impl Into<String>,
    ) -> Self {
        Self {
            job_id: job_id.into(),
            source,
            destination_uri: destination_uri.into(),
            destination_format: "NEWLINE_DELIMITED_JSON".to_string(),
            compression: "GZIP".to_string(),
        }
    }
}

/// A submitted export job being tracked until it reaches a terminal state
#[derive(Debug, Clone)]
pub struct ExportJob {
    pub source_table: TableRef,
    pub destination_uri: String,
    pub submission_time: DateTime<Utc>,
    pub remote_job_id: String,
    pub location: Option<String>,
    pub state: JobState,
    pub errors: Vec<JobError>,
}

impl ExportJob {
    /// Build the tracked job from the submission request and first status
    pub fn submitted(
        request: &ExtractRequest,
        submission_time: DateTime<Utc>,
        status: JobStatus,
    ) -> Self {
        Self {
            source_table: request.source.clone(),
            destination_uri: request.destination_uri.clone(),
            submission_time,
            remote_job_id: status.job_id,
            location: status.location,
            state: status.state,
            errors: status.errors,
        }
    }

    /// Apply a refreshed status. Only polling mutates the job.
    pub fn apply_status(&mut self, status: JobStatus) {
        self.state = status.state;
        self.errors = status.errors;
        if status.location.is_some() {
            self.location = status.location;
        }
    }

    pub fn is_done(&self) -> bool {
        self.state.is_terminal()
    }

    /// Done and error-free
    pub fn succeeded(&self) -> bool {
        self.is_done() && self.errors.is_empty()
    }
}

/// Final classification of one dataset export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Success,
    Failure,
}

impl Outcome {
    pub fn is_success(self) -> bool {
        self == Outcome::Success
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success => write!(f, "success"),
            Outcome::Failure => write!(f, "failure"),
        }
    }
}

/// What one exporter run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub dataset: String,
    pub table: String,
    pub job_id: Option<String>,
    pub outcome: Outcome,
    pub errors: Vec<JobError>,
}
