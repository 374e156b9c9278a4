//! Core business logic for bq-backup.
//!
//! # Export Workflow
//!
//! For every configured dataset, concurrently:
//!
//! 1. **Name**: derive yesterday's table (`prefix` + `YYYYMMDD`)
//! 2. **Submit**: start an extract job to `gs://bucket/table*` (NDJSON, gzip)
//! 3. **Poll**: refresh the job at a fixed interval within the wait budget
//! 4. **Classify**: success only if the job is done without errors
//! 5. **Notify**: post the outcome to Slack when configured
//!
//! # Example
//!
//! ```rust,no_run
//! use bq_backup::config::load_config;
//! use bq_backup::core::export::ExportCoordinator;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("/etc/bq-backup/config.toml")?;
//! let coordinator = ExportCoordinator::new(config)?;
//! let summary = coordinator.run().await;
//!
//! println!("Succeeded: {}", summary.succeeded());
//! println!("Failed: {}", summary.failed());
//! # Ok(())
//! # }
//! ```

pub mod export;
