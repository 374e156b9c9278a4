//! BigQuery Jobs API client
//!
//! This module implements [`WarehouseClient`] against the BigQuery v2 REST
//! API. Only two calls are needed: `jobs.insert` to submit an extract job and
//! `jobs.get` to refresh its status.

use super::auth::TokenSource;
use super::models::{ApiErrorEnvelope, JobInsert, JobResource};
use crate::config::BigQueryConfig;
use crate::domain::{BackupError, ExtractRequest, JobStatus, Result};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, RequestBuilder, Response};
use secrecy::ExposeSecret;
use std::time::Duration;

/// Narrow interface to the warehouse export API
///
/// The exporter only depends on this trait, so tests can drive the poll loop
/// with a scripted implementation. Implementations must be safe to share
/// between concurrently running export tasks.
#[async_trait]
pub trait WarehouseClient: Send + Sync {
    /// Project the client is scoped to
    fn project(&self) -> &str;

    /// Submit an extract job and return its initial status
    async fn submit_extract(&self, request: &ExtractRequest) -> Result<JobStatus>;

    /// Fetch the current status of a previously submitted job
    async fn job_status(&self, job_id: &str, location: Option<&str>) -> Result<JobStatus>;
}

/// BigQuery REST client scoped to one project
pub struct BigQueryClient {
    project: String,
    endpoint: String,
    location: Option<String>,
    client: Client,
    tokens: TokenSource,
}

impl BigQueryClient {
    /// Create a client for `project`
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use bq_backup::adapters::bigquery::BigQueryClient;
    /// use bq_backup::config::BigQueryConfig;
    ///
    /// # fn example() -> bq_backup::domain::Result<()> {
    /// let client = BigQueryClient::new("my-project", &BigQueryConfig::default())?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(project: impl Into<String>, config: &BigQueryConfig) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("bq-backup/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| BackupError::Http(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            project: project.into(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            location: config.location.clone(),
            client,
            tokens: TokenSource::from_config(config),
        })
    }

    fn jobs_url(&self) -> String {
        format!("{}/projects/{}/jobs", self.endpoint, self.project)
    }

    async fn authorized(&self, request: RequestBuilder) -> Result<RequestBuilder> {
        let token = self.tokens.token(&self.client).await?;
        let bearer: &str = token.expose_secret().as_ref();
        Ok(request.bearer_auth(bearer))
    }

    /// Turn a non-2xx response into an error message, preferring the API's
    /// own error text when the body is a Google error envelope
    async fn error_message(resp: Response) -> String {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        match serde_json::from_str::<ApiErrorEnvelope>(&body) {
            Ok(envelope) => format!(
                "status {status}: {}",
                envelope.error.message.unwrap_or_default()
            ),
            Err(_) => format!("status {status}: {body}"),
        }
    }
}

#[async_trait]
impl WarehouseClient for BigQueryClient {
    fn project(&self) -> &str {
        &self.project
    }

    async fn submit_extract(&self, request: &ExtractRequest) -> Result<JobStatus> {
        let body = JobInsert::extract(request, self.location.as_deref());
        let url = self.jobs_url();

        tracing::debug!(
            url = %url,
            job_id = %request.job_id,
            source = %request.source,
            destination = %request.destination_uri,
            "Submitting extract job"
        );

        let http_request = self.authorized(self.client.post(&url).json(&body)).await?;
        let resp = http_request
            .send()
            .await
            .map_err(|e| BackupError::JobSubmission(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(BackupError::JobSubmission(Self::error_message(resp).await));
        }

        let resource = resp
            .json::<JobResource>()
            .await
            .map_err(|e| BackupError::JobSubmission(format!("invalid job response: {e}")))?;

        Ok(JobStatus::from(resource))
    }

    async fn job_status(&self, job_id: &str, location: Option<&str>) -> Result<JobStatus> {
        let url = format!("{}/{}", self.jobs_url(), job_id);
        let mut http_request = self.client.get(&url);
        if let Some(location) = location.or(self.location.as_deref()) {
            http_request = http_request.query(&[("location", location)]);
        }

        let resp = self
            .authorized(http_request)
            .await?
            .send()
            .await
            .map_err(|e| BackupError::JobPoll(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(BackupError::JobPoll(Self::error_message(resp).await));
        }

        let resource = resp
            .json::<JobResource>()
            .await
            .map_err(|e| BackupError::JobPoll(format!("invalid job response: {e}")))?;

        Ok(JobStatus::from(resource))
    }
}
