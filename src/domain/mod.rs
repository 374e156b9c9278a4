//! Domain models and types for bq-backup.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Job model** ([`ExportJob`], [`JobStatus`], [`JobError`], [`ExtractRequest`])
//! - **Outcomes** ([`Outcome`], [`ExportReport`])
//! - **Error types** ([`BackupError`])
//! - **Result type alias** ([`Result`])
//!
//! # Example
//!
//! ```rust
//! use bq_backup::domain::{ExtractRequest, TableRef};
//!
//! let request = ExtractRequest::ndjson_gzip(
//!     "bq_backup_analytics_events_20240101_1704153600",
//!     TableRef::new("my-project", "analytics", "events_20240101"),
//!     "gs://analytics-backup/events_20240101*",
//! );
//! assert_eq!(request.compression, "GZIP");
//! ```

pub mod errors;
pub mod job;
pub mod result;

pub use errors::BackupError;
pub use job::{
    ExportJob, ExportReport, ExtractRequest, JobError, JobState, JobStatus, Outcome, TableRef,
};
pub use result::Result;
