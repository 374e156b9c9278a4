//! Export of one dataset's daily table
//!
//! The exporter submits an extract job for yesterday's table, polls it at a
//! fixed interval until the job is done or the wait budget runs out, and
//! reports the outcome through the notifier. Every error is contained here:
//! the caller always gets an [`ExportReport`], never an `Err`.

use super::naming::{destination_uri, job_id, table_name};
use crate::adapters::{Notifier, WarehouseClient};
use crate::config::{BackupConfig, DatasetSpec};
use crate::domain::{
    BackupError, ExportJob, ExportReport, ExtractRequest, JobError, Outcome, Result, TableRef,
};
use chrono::{DateTime, Local, Utc};
use std::sync::Arc;
use tokio::time::Instant;

/// Runs exports for individual datasets against a shared client
#[derive(Clone)]
pub struct Exporter {
    client: Arc<dyn WarehouseClient>,
    config: Arc<BackupConfig>,
    notifier: Arc<Notifier>,
}

impl Exporter {
    pub fn new(
        client: Arc<dyn WarehouseClient>,
        config: Arc<BackupConfig>,
        notifier: Arc<Notifier>,
    ) -> Self {
        Self {
            client,
            config,
            notifier,
        }
    }

    /// Export yesterday's table of `dataset`
    pub async fn run(&self, dataset: &DatasetSpec) -> ExportReport {
        self.run_at(dataset, Local::now()).await
    }

    /// Export the table dated the day before `now`
    ///
    /// The table name is fixed here; a job that is still running after
    /// midnight keeps targeting the original date.
    pub async fn run_at(&self, dataset: &DatasetSpec, now: DateTime<Local>) -> ExportReport {
        let table = table_name(&dataset.prefix, &now);

        tracing::info!(
            project = %self.client.project(),
            dataset = %dataset.name,
            table = %table,
            bucket = %dataset.bucket,
            "Starting export"
        );

        let report = self.export_table(dataset, table).await;

        match report.outcome {
            Outcome::Success => tracing::info!(
                dataset = %report.dataset,
                table = %report.table,
                job_id = report.job_id.as_deref().unwrap_or_default(),
                "Export succeeded"
            ),
            Outcome::Failure => tracing::error!(
                dataset = %report.dataset,
                table = %report.table,
                job_id = report.job_id.as_deref().unwrap_or_default(),
                error_count = report.errors.len(),
                "Export failed"
            ),
        }

        self.notifier
            .notify(
                report.outcome,
                self.client.project(),
                &report.table,
                dataset,
                &report.errors,
            )
            .await;

        report
    }

    async fn export_table(&self, dataset: &DatasetSpec, table: String) -> ExportReport {
        let submitted_at = Utc::now();
        let request = ExtractRequest::ndjson_gzip(
            job_id(&dataset.name, &table, submitted_at.timestamp()),
            TableRef::new(self.client.project(), dataset.name.as_str(), table.as_str()),
            destination_uri(&dataset.bucket, &table),
        );

        let status = match self.client.submit_extract(&request).await {
            Ok(status) => status,
            Err(e) => {
                let e = as_submission_error(e);
                return failed_report(dataset, table, None, &e);
            }
        };

        let mut job = ExportJob::submitted(&request, submitted_at, status);
        tracing::debug!(
            job_id = %job.remote_job_id,
            location = job.location.as_deref().unwrap_or_default(),
            source = %job.source_table,
            destination = %job.destination_uri,
            "Extract job submitted"
        );

        if let Err(e) = self.wait_for_completion(&mut job).await {
            let job_id = Some(job.remote_job_id.clone());
            return failed_report(dataset, table, job_id, &e);
        }

        if job.succeeded() {
            return ExportReport {
                dataset: dataset.name.clone(),
                table,
                job_id: Some(job.remote_job_id),
                outcome: Outcome::Success,
                errors: Vec::new(),
            };
        }

        let reported = BackupError::JobReportedFailure {
            job_id: job.remote_job_id.clone(),
            error_count: job.errors.len(),
        };
        tracing::warn!(error = %reported, "Job finished with errors");
        for error in &job.errors {
            tracing::warn!(
                job_id = %job.remote_job_id,
                reason = %error.reason,
                message = %error.message,
                "Job error"
            );
        }

        ExportReport {
            dataset: dataset.name.clone(),
            table,
            job_id: Some(job.remote_job_id),
            outcome: Outcome::Failure,
            errors: job.errors,
        }
    }

    /// Sleep, refresh, repeat until the job is done or the budget is spent.
    /// A timed-out job is left running remotely.
    async fn wait_for_completion(&self, job: &mut ExportJob) -> Result<()> {
        let budget = self.config.job_wait();
        let interval = self.config.poll_interval();
        let started = Instant::now();
        let mut polls: u32 = 0;

        while !job.is_done() {
            let elapsed = started.elapsed();
            if elapsed >= budget {
                return Err(BackupError::JobTimeout {
                    job_id: job.remote_job_id.clone(),
                    waited_secs: budget.as_secs(),
                });
            }

            tokio::time::sleep(interval.min(budget - elapsed)).await;
            polls += 1;

            let status = self
                .client
                .job_status(&job.remote_job_id, job.location.as_deref())
                .await
                .map_err(as_poll_error)?;
            job.apply_status(status);

            tracing::debug!(
                job_id = %job.remote_job_id,
                state = ?job.state,
                poll = polls,
                elapsed_secs = started.elapsed().as_secs(),
                "Polled job status"
            );
        }

        Ok(())
    }
}

fn as_submission_error(err: BackupError) -> BackupError {
    match err {
        BackupError::JobSubmission(_) => err,
        other => BackupError::JobSubmission(other.to_string()),
    }
}

fn as_poll_error(err: BackupError) -> BackupError {
    match err {
        BackupError::JobPoll(_) => err,
        other => BackupError::JobPoll(other.to_string()),
    }
}

fn failed_report(
    dataset: &DatasetSpec,
    table: String,
    job_id: Option<String>,
    error: &BackupError,
) -> ExportReport {
    tracing::warn!(
        dataset = %dataset.name,
        table = %table,
        error = %error,
        "Export aborted"
    );
    ExportReport {
        dataset: dataset.name.clone(),
        table,
        job_id,
        outcome: Outcome::Failure,
        errors: vec![JobError::from(error)],
    }
}
