//! Configuration management for bq-backup.
//!
//! The configuration is a single TOML file, read once per run and shared
//! read-only by every export task.
//!
//! # Example Configuration
//!
//! ```toml
//! project = "my-project"
//! job_wait = 1800
//!
//! [slack]
//! channel = "#backups"
//! webhook = "${SLACK_WEBHOOK_URL}"
//!
//! [[datasets]]
//! name = "analytics"
//! prefix = "events_"
//! bucket = "analytics-backup"
//! ```
//!
//! `${VAR_NAME}` placeholders are substituted from the environment before
//! parsing, and `BQ_BACKUP_*` variables override individual keys afterwards.
//!
//! # Sections
//!
//! - [`BackupConfig`] - root: project, poll budget, datasets
//! - [`SlackConfig`] - optional notification target
//! - [`BigQueryConfig`] - API endpoint, location and credentials
//! - [`LoggingConfig`] - optional file logging

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::{load_config, DEFAULT_CONFIG_PATH};
pub use schema::{
    BackupConfig, BigQueryConfig, DatasetSpec, LoggingConfig, SlackConfig,
    DEFAULT_JOB_WAIT_SECS, DEFAULT_POLL_INTERVAL_SECS,
};
pub use secret::{secret_string, SecretString, SecretValue};
