//! Logging and observability
//!
//! Structured logging via `tracing`: human-readable console output plus an
//! optional rotating JSON file. Per-dataset outcomes are logged alongside
//! the Slack notification.
//!
//! Console logs are written to stdout. Only fatal setup errors, printed by the
//! binary before it exits with status 1, go to stderr.
//!
//! # Example
//!
//! ```no_run
//! use bq_backup::logging::init_logging;
//! use bq_backup::config::LoggingConfig;
//!
//! let _guard = init_logging("info", &LoggingConfig::default()).expect("Failed to initialize logging");
//! tracing::info!(dataset = "analytics", "Starting export");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};
