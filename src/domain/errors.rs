//! Domain error types
//!
//! This module defines the error hierarchy for bq-backup. Configuration errors
//! are fatal and abort the run before any export starts; job errors are
//! contained to the dataset that produced them and become a failed outcome.
//! Third-party error types are converted to strings so they don't leak out of
//! the adapters.

use std::path::PathBuf;
use thiserror::Error;

/// Main bq-backup error type
#[derive(Debug, Error)]
pub enum BackupError {
    /// Configuration file does not exist
    #[error("Configuration file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    /// Configuration file could not be read, parsed or validated
    #[error("Configuration error: {0}")]
    ConfigParse(String),

    /// Extract job could not be submitted to the warehouse
    #[error("Job submission failed: {0}")]
    JobSubmission(String),

    /// Job status could not be fetched while polling
    #[error("Job status poll failed: {0}")]
    JobPoll(String),

    /// Job did not reach a terminal state within the wait budget
    #[error("Job {job_id} did not finish within {waited_secs}s")]
    JobTimeout { job_id: String, waited_secs: u64 },

    /// Job finished but reported errors
    #[error("Job {job_id} finished with {error_count} error(s)")]
    JobReportedFailure { job_id: String, error_count: usize },

    /// Notification could not be delivered
    #[error("Notification delivery failed: {0}")]
    NotificationDelivery(String),

    /// Access token could not be obtained
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Transport-level HTTP errors
    #[error("HTTP error: {0}")]
    Http(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

impl BackupError {
    /// Short machine-friendly reason used in notifications
    pub fn reason(&self) -> &'static str {
        match self {
            BackupError::ConfigNotFound(_) | BackupError::ConfigParse(_) => "configuration",
            BackupError::JobSubmission(_) => "submissionFailed",
            BackupError::JobPoll(_) => "pollFailed",
            BackupError::JobTimeout { .. } => "timeout",
            BackupError::JobReportedFailure { .. } => "jobFailed",
            BackupError::NotificationDelivery(_) => "notificationFailed",
            BackupError::Authentication(_) => "authentication",
            BackupError::Http(_) => "http",
            BackupError::Serialization(_) => "serialization",
            BackupError::Io(_) => "io",
        }
    }
}

impl From<std::io::Error> for BackupError {
    fn from(err: std::io::Error) -> Self {
        BackupError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BackupError {
    fn from(err: serde_json::Error) -> Self {
        BackupError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for BackupError {
    fn from(err: toml::de::Error) -> Self {
        BackupError::ConfigParse(format!("TOML parse error: {err}"))
    }
}

impl From<reqwest::Error> for BackupError {
    fn from(err: reqwest::Error) -> Self {
        BackupError::Http(err.to_string())
    }
}
