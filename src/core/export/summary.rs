//! Run summary
//!
//! Collects the per-dataset reports of one run for the final log line.

use crate::domain::ExportReport;
use std::time::Duration;

/// Reports of every dataset processed in one run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub reports: Vec<ExportReport>,
    pub duration: Duration,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn add_report(&mut self, report: ExportReport) {
        self.reports.push(report);
    }

    pub fn total(&self) -> usize {
        self.reports.len()
    }

    pub fn succeeded(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| r.outcome.is_success())
            .count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }

    pub fn is_successful(&self) -> bool {
        self.failed() == 0
    }

    /// Report for `dataset`, if it was processed
    pub fn report(&self, dataset: &str) -> Option<&ExportReport> {
        self.reports.iter().find(|r| r.dataset == dataset)
    }

    pub fn log_summary(&self) {
        tracing::info!(
            total = self.total(),
            succeeded = self.succeeded(),
            failed = self.failed(),
            duration_secs = self.duration.as_secs(),
            "Backup run completed"
        );

        for report in self.reports.iter().filter(|r| !r.outcome.is_success()) {
            tracing::warn!(
                dataset = %report.dataset,
                table = %report.table,
                reasons = ?report.errors.iter().map(|e| e.reason.as_str()).collect::<Vec<_>>(),
                "Dataset export failed"
            );
        }
    }
}
