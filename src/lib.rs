// bq-backup - BigQuery daily table export to Cloud Storage
// Copyright (c) 2025 bq-backup Contributors
// Licensed under the MIT License

//! # bq-backup
//!
//! Exports yesterday's partition of BigQuery date-sharded tables to Google
//! Cloud Storage as gzip-compressed newline-delimited JSON, one extract job
//! per configured dataset, and reports each outcome to Slack.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface
//! - [`config`] - TOML configuration loading and validation
//! - [`adapters`] - BigQuery Jobs API and Slack webhook
//! - [`core`] - Export orchestration and the poll loop
//! - [`domain`] - Job model, outcomes and errors
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bq_backup::config::load_config;
//! use bq_backup::core::export::ExportCoordinator;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("/etc/bq-backup/config.toml")?;
//!     let coordinator = ExportCoordinator::new(config)?;
//!
//!     let summary = coordinator.run().await;
//!     println!("{} of {} exports succeeded", summary.succeeded(), summary.total());
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Configuration problems are returned as [`domain::BackupError`] and abort
//! the run. Everything that goes wrong with an individual export is captured
//! in its [`domain::ExportReport`] and never fails sibling exports.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
