//! Export coordinator - fans out one export task per configured dataset
//!
//! The coordinator owns the configuration, the warehouse client and the
//! notifier, and hands each task an `Arc` handle to them. Tasks run
//! concurrently and independently; the coordinator waits for all of them and
//! never fails because a dataset did.

use super::exporter::Exporter;
use super::naming::table_name;
use super::summary::RunSummary;
use crate::adapters::{BigQueryClient, Notifier, WarehouseClient};
use crate::config::BackupConfig;
use crate::domain::{ExportReport, JobError, Outcome, Result};
use chrono::Local;
use std::sync::Arc;
use std::time::Instant;

/// Export coordinator
pub struct ExportCoordinator {
    config: Arc<BackupConfig>,
    client: Arc<dyn WarehouseClient>,
    notifier: Arc<Notifier>,
}

impl ExportCoordinator {
    /// Create a coordinator with a BigQuery client scoped to `config.project`
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP clients cannot be built.
    pub fn new(config: BackupConfig) -> Result<Self> {
        let client = BigQueryClient::new(config.project.clone(), &config.bigquery)?;
        Self::with_client(config, Arc::new(client))
    }

    /// Create a coordinator around an existing warehouse client
    pub fn with_client(config: BackupConfig, client: Arc<dyn WarehouseClient>) -> Result<Self> {
        let notifier = Notifier::from_config(config.slack.as_ref())?;
        Ok(Self {
            config: Arc::new(config),
            client,
            notifier: Arc::new(notifier),
        })
    }

    /// Run every configured dataset export and wait for all of them
    ///
    /// A task that panics still yields a failed report and a notification.
    pub async fn run(&self) -> RunSummary {
        let start_time = Instant::now();
        let exporter = Exporter::new(
            self.client.clone(),
            self.config.clone(),
            self.notifier.clone(),
        );

        tracing::info!(
            project = %self.config.project,
            datasets = self.config.datasets.len(),
            job_wait_secs = self.config.job_wait().as_secs(),
            poll_interval_secs = self.config.poll_interval().as_secs(),
            notifications = self.notifier.is_enabled(),
            "Starting backup run"
        );

        // Every dataset in a run targets the same date.
        let now = Local::now();

        let handles: Vec<_> = self
            .config
            .datasets
            .iter()
            .map(|dataset| {
                let exporter = exporter.clone();
                let task_dataset = dataset.clone();
                let handle =
                    tokio::spawn(async move { exporter.run_at(&task_dataset, now).await });
                (dataset, handle)
            })
            .collect();

        let mut summary = RunSummary::new();
        for (dataset, handle) in handles {
            match handle.await {
                Ok(report) => summary.add_report(report),
                Err(e) => {
                    tracing::error!(dataset = %dataset.name, error = %e, "Export task panicked");
                    let report = ExportReport {
                        dataset: dataset.name.clone(),
                        table: table_name(&dataset.prefix, &now),
                        job_id: None,
                        outcome: Outcome::Failure,
                        errors: vec![JobError::new("panicked", e.to_string())],
                    };
                    self.notifier
                        .notify(
                            report.outcome,
                            self.client.project(),
                            &report.table,
                            dataset,
                            &report.errors,
                        )
                        .await;
                    summary.add_report(report);
                }
            }
        }

        summary.with_duration(start_time.elapsed())
    }
}
