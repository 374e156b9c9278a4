//! Shared test helpers: a scripted warehouse client and config builders

#![allow(dead_code)]

use async_trait::async_trait;
use bq_backup::adapters::WarehouseClient;
use bq_backup::config::{BackupConfig, BigQueryConfig, DatasetSpec, LoggingConfig, SlackConfig};
use bq_backup::domain::{BackupError, ExtractRequest, JobError, JobState, JobStatus, Result};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// One scripted response to a status poll
#[derive(Debug, Clone)]
pub enum Step {
    Running,
    Done(Vec<JobError>),
    Fail(String),
}

/// Warehouse client that replays a script instead of calling BigQuery
pub struct FakeWarehouse {
    project: String,
    /// Datasets whose submission fails
    failing_datasets: Vec<String>,
    /// Datasets whose submission panics
    panicking_datasets: Vec<String>,
    /// State returned by the submission itself
    initial: JobState,
    /// Poll responses in order; `Running` once exhausted
    steps: Mutex<VecDeque<Step>>,
    submissions: Mutex<Vec<ExtractRequest>>,
    polls: AtomicUsize,
}

impl FakeWarehouse {
    pub fn new(project: &str) -> Self {
        Self {
            project: project.to_string(),
            failing_datasets: Vec::new(),
            panicking_datasets: Vec::new(),
            initial: JobState::Running,
            steps: Mutex::new(VecDeque::new()),
            submissions: Mutex::new(Vec::new()),
            polls: AtomicUsize::new(0),
        }
    }

    pub fn with_steps(self, steps: Vec<Step>) -> Self {
        *self.steps.lock().unwrap() = steps.into();
        self
    }

    pub fn failing_submit(mut self, dataset: &str) -> Self {
        self.failing_datasets.push(dataset.to_string());
        self
    }

    pub fn panicking_submit(mut self, dataset: &str) -> Self {
        self.panicking_datasets.push(dataset.to_string());
        self
    }

    pub fn done_on_submit(mut self) -> Self {
        self.initial = JobState::Done;
        self
    }

    pub fn submissions(&self) -> Vec<ExtractRequest> {
        self.submissions.lock().unwrap().clone()
    }

    pub fn polls(&self) -> usize {
        self.polls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WarehouseClient for FakeWarehouse {
    fn project(&self) -> &str {
        &self.project
    }

    async fn submit_extract(&self, request: &ExtractRequest) -> Result<JobStatus> {
        if self.panicking_datasets.contains(&request.source.dataset) {
            panic!("scripted panic for {}", request.source.dataset);
        }
        if self.failing_datasets.contains(&request.source.dataset) {
            return Err(BackupError::JobSubmission(format!(
                "Not found: Dataset {}:{}",
                request.source.project, request.source.dataset
            )));
        }
        self.submissions.lock().unwrap().push(request.clone());
        Ok(JobStatus {
            job_id: request.job_id.clone(),
            location: Some("EU".to_string()),
            state: self.initial,
            errors: Vec::new(),
        })
    }

    async fn job_status(&self, job_id: &str, location: Option<&str>) -> Result<JobStatus> {
        self.polls.fetch_add(1, Ordering::SeqCst);
        let step = self.steps.lock().unwrap().pop_front().unwrap_or(Step::Running);
        let (state, errors) = match step {
            Step::Running => (JobState::Running, Vec::new()),
            Step::Done(errors) => (JobState::Done, errors),
            Step::Fail(message) => return Err(BackupError::JobPoll(message)),
        };
        Ok(JobStatus {
            job_id: job_id.to_string(),
            location: location.map(str::to_string),
            state,
            errors,
        })
    }
}

pub fn config(datasets: Vec<DatasetSpec>) -> BackupConfig {
    BackupConfig {
        project: "test-project".to_string(),
        job_wait: Some(60),
        poll_interval: Some(10),
        log_level: "info".to_string(),
        slack: None,
        bigquery: BigQueryConfig::default(),
        logging: LoggingConfig::default(),
        datasets,
    }
}

pub fn slack(webhook: String) -> SlackConfig {
    SlackConfig {
        channel: "#backups".to_string(),
        webhook: bq_backup::config::secret_string(webhook),
        username: None,
        success_color: "good".to_string(),
        failure_color: "danger".to_string(),
    }
}
