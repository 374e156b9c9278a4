//! Slack incoming-webhook delivery

use super::payload::{ExportNotice, SlackPayload};
use crate::config::SlackConfig;
use crate::domain::{BackupError, Result};
use reqwest::Client;
use secrecy::ExposeSecret;
use std::time::Duration;

/// Posts export notifications to one Slack channel
pub struct SlackNotifier {
    config: SlackConfig,
    client: Client,
}

impl SlackNotifier {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: SlackConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| BackupError::Http(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { config, client })
    }

    pub fn channel(&self) -> &str {
        &self.config.channel
    }

    pub fn payload(&self, notice: &ExportNotice<'_>) -> SlackPayload {
        SlackPayload::build(&self.config, notice)
    }

    /// Post one message; exactly one HTTP request per call, no retries
    pub async fn send(&self, payload: &SlackPayload) -> Result<()> {
        let webhook: &str = self.config.webhook.expose_secret().as_ref();
        let resp = self
            .client
            .post(webhook)
            .json(payload)
            .send()
            .await
            .map_err(|e| BackupError::NotificationDelivery(e.without_url().to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(BackupError::NotificationDelivery(format!(
                "webhook returned {status}: {body}"
            )));
        }

        tracing::debug!(channel = %self.config.channel, %status, "Slack notification delivered");
        Ok(())
    }
}
