//! Configuration schema types
//!
//! This module defines the configuration structure that maps onto the TOML
//! file. Required keys (`project`, `datasets`) have no serde defaults.

use crate::config::SecretString;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Poll budget used when `job_wait` is not configured
pub const DEFAULT_JOB_WAIT_SECS: u64 = 1800;

/// Interval between job status polls when `poll_interval` is not configured
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;

/// Default BigQuery REST endpoint
pub const DEFAULT_BIGQUERY_ENDPOINT: &str = "https://bigquery.googleapis.com/bigquery/v2";

/// Main bq-backup configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupConfig {
    /// Warehouse project that owns the datasets
    pub project: String,

    /// Maximum time in seconds to wait for each export job
    #[serde(default, alias = "job_wait_seconds")]
    pub job_wait: Option<u64>,

    /// Seconds between job status polls
    #[serde(default)]
    pub poll_interval: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Slack notifications; absent means notifications are disabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slack: Option<SlackConfig>,

    /// BigQuery API settings
    #[serde(default)]
    pub bigquery: BigQueryConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Datasets to back up
    pub datasets: Vec<DatasetSpec>,
}

impl BackupConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid value
    pub fn validate(&self) -> Result<(), String> {
        if self.project.trim().is_empty() {
            return Err("project cannot be empty".to_string());
        }

        if self.job_wait == Some(0) {
            return Err("job_wait must be > 0".to_string());
        }

        if self.poll_interval == Some(0) {
            return Err("poll_interval must be > 0".to_string());
        }

        validate_log_level(&self.log_level)?;

        if self.datasets.is_empty() {
            return Err("at least one [[datasets]] entry is required".to_string());
        }

        for (index, dataset) in self.datasets.iter().enumerate() {
            dataset
                .validate()
                .map_err(|e| format!("datasets[{index}]: {e}"))?;
        }

        if let Some(ref slack) = self.slack {
            slack.validate()?;
        }

        self.bigquery.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    /// Poll budget for one export job
    pub fn job_wait(&self) -> Duration {
        Duration::from_secs(self.job_wait.unwrap_or(DEFAULT_JOB_WAIT_SECS))
    }

    /// Interval between status polls
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval.unwrap_or(DEFAULT_POLL_INTERVAL_SECS))
    }
}

/// One dataset to back up
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSpec {
    /// Dataset identifier in the warehouse
    pub name: String,

    /// Table name prefix; the date suffix is appended at run time
    pub prefix: String,

    /// Destination Cloud Storage bucket
    pub bucket: String,
}

impl DatasetSpec {
    pub fn new(
        name: impl Into<String>,
        prefix: impl Into<String>,
        bucket: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            prefix: prefix.into(),
            bucket: bucket.into(),
        }
    }

    fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name cannot be empty".to_string());
        }
        if self.prefix.trim().is_empty() {
            return Err(format!("prefix cannot be empty for dataset '{}'", self.name));
        }
        if self.bucket.trim().is_empty() {
            return Err(format!("bucket cannot be empty for dataset '{}'", self.name));
        }
        if self.bucket.starts_with("gs://") {
            return Err(format!(
                "bucket for dataset '{}' must be a bucket name, not a URI",
                self.name
            ));
        }
        Ok(())
    }
}

/// Slack incoming-webhook configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlackConfig {
    /// Channel the message is posted to
    pub channel: String,

    /// Incoming webhook URL
    /// Stored securely in memory and automatically zeroized on drop
    pub webhook: SecretString,

    /// Display name override for the message
    #[serde(default)]
    pub username: Option<String>,

    /// Attachment colour for successful exports
    #[serde(default = "default_success_color")]
    pub success_color: String,

    /// Attachment colour for failed exports
    #[serde(default = "default_failure_color")]
    pub failure_color: String,
}

impl SlackConfig {
    fn validate(&self) -> Result<(), String> {
        if self.channel.trim().is_empty() {
            return Err("slack.channel cannot be empty".to_string());
        }
        validate_http_url("slack.webhook", self.webhook.expose_secret().as_ref())
    }
}

/// BigQuery REST API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BigQueryConfig {
    /// Base URL of the BigQuery v2 REST API
    #[serde(default = "default_bigquery_endpoint")]
    pub endpoint: String,

    /// Job location (e.g. "EU", "US")
    #[serde(default)]
    pub location: Option<String>,

    /// Static OAuth access token; when absent the metadata server is used
    #[serde(default)]
    pub access_token: Option<SecretString>,

    /// Metadata server base URL used to fetch access tokens
    #[serde(default = "default_metadata_endpoint")]
    pub metadata_endpoint: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for BigQueryConfig {
    fn default() -> Self {
        Self {
            endpoint: default_bigquery_endpoint(),
            location: None,
            access_token: None,
            metadata_endpoint: default_metadata_endpoint(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

impl BigQueryConfig {
    fn validate(&self) -> Result<(), String> {
        validate_http_url("bigquery.endpoint", &self.endpoint)?;
        if self.access_token.is_none() {
            validate_http_url("bigquery.metadata_endpoint", &self.metadata_endpoint)?;
        }
        if self.request_timeout_seconds == 0 {
            return Err("bigquery.request_timeout_seconds must be > 0".to_string());
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable JSON file logging in addition to the console
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for log files
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local logging is enabled".to_string());
        }

        Ok(())
    }
}

fn validate_log_level(level: &str) -> Result<(), String> {
    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&level.to_lowercase().as_str()) {
        return Err(format!(
            "Invalid log_level '{}'. Must be one of: {}",
            level,
            valid_levels.join(", ")
        ));
    }
    Ok(())
}

fn validate_http_url(field: &str, value: &str) -> Result<(), String> {
    let parsed = url::Url::parse(value).map_err(|e| format!("{field} is not a valid URL: {e}"))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(format!("{field} must use http or https, got '{scheme}'")),
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_success_color() -> String {
    "good".to_string()
}

fn default_failure_color() -> String {
    "danger".to_string()
}

fn default_bigquery_endpoint() -> String {
    DEFAULT_BIGQUERY_ENDPOINT.to_string()
}

fn default_metadata_endpoint() -> String {
    "http://metadata.google.internal".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_local_path() -> String {
    "/var/log/bq-backup".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;

    fn base_config() -> BackupConfig {
        BackupConfig {
            project: "my-project".to_string(),
            job_wait: None,
            poll_interval: None,
            log_level: "info".to_string(),
            slack: None,
            bigquery: BigQueryConfig::default(),
            logging: LoggingConfig::default(),
            datasets: vec![DatasetSpec::new("analytics", "events_", "analytics-backup")],
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn test_default_durations() {
        let config = base_config();
        assert_eq!(config.job_wait(), Duration::from_secs(DEFAULT_JOB_WAIT_SECS));
        assert_eq!(
            config.poll_interval(),
            Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS)
        );
    }

    #[test]
    fn test_empty_project_rejected() {
        let mut config = base_config();
        config.project = "  ".to_string();
        assert!(config.validate().unwrap_err().contains("project"));
    }

    #[test]
    fn test_no_datasets_rejected() {
        let mut config = base_config();
        config.datasets.clear();
        assert!(config.validate().unwrap_err().contains("datasets"));
    }

    #[test]
    fn test_zero_job_wait_rejected() {
        let mut config = base_config();
        config.job_wait = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_dataset_missing_bucket_rejected() {
        let mut config = base_config();
        config.datasets.push(DatasetSpec::new("other", "t_", ""));
        let err = config.validate().unwrap_err();
        assert!(err.contains("datasets[1]"));
        assert!(err.contains("bucket"));
    }

    #[test]
    fn test_bucket_uri_rejected() {
        let mut config = base_config();
        config.datasets[0].bucket = "gs://analytics-backup".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_slack_webhook_must_be_url() {
        let mut config = base_config();
        config.slack = Some(SlackConfig {
            channel: "#backups".to_string(),
            webhook: secret_string("not a url".to_string()),
            username: None,
            success_color: default_success_color(),
            failure_color: default_failure_color(),
        });
        assert!(config.validate().unwrap_err().contains("slack.webhook"));
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let mut config = base_config();
        config.log_level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_rotation_rejected() {
        let mut config = base_config();
        config.logging.local_rotation = "weekly".to_string();
        assert!(config.validate().is_err());
    }
}
