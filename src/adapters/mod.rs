//! External system integrations for bq-backup.
//!
//! - [`bigquery`] - BigQuery Jobs API (submit extract, poll status)
//! - [`slack`] - Slack incoming-webhook messages
//! - [`notifier`] - enabled/disabled notification dispatch
//!
//! The exporter depends on [`bigquery::WarehouseClient`] rather than the
//! concrete client, so the poll loop can be tested without a network.

pub mod bigquery;
pub mod notifier;
pub mod slack;

pub use bigquery::{BigQueryClient, WarehouseClient};
pub use notifier::Notifier;
