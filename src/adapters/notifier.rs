//! Export outcome notifications
//!
//! Whether notifications are enabled is decided once, when the notifier is
//! built from configuration. Delivery is best-effort: failures are logged and
//! never change the outcome of the export they describe.

use super::slack::{ExportNotice, SlackNotifier};
use crate::config::{DatasetSpec, SlackConfig};
use crate::domain::{JobError, Outcome, Result};

/// Notification channel for export outcomes
pub enum Notifier {
    /// No `[slack]` section configured; nothing is sent
    Disabled,
    Slack(SlackNotifier),
}

impl Notifier {
    /// # Errors
    ///
    /// Returns an error if the Slack HTTP client cannot be built.
    pub fn from_config(config: Option<&SlackConfig>) -> Result<Self> {
        match config {
            Some(slack) => Ok(Notifier::Slack(SlackNotifier::new(slack.clone())?)),
            None => Ok(Notifier::Disabled),
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, Notifier::Slack(_))
    }

    /// Report one export outcome
    pub async fn notify(
        &self,
        outcome: Outcome,
        project: &str,
        table: &str,
        dataset: &DatasetSpec,
        errors: &[JobError],
    ) {
        let slack = match self {
            Notifier::Disabled => {
                tracing::debug!(dataset = %dataset.name, "Notifications disabled, skipping");
                return;
            }
            Notifier::Slack(slack) => slack,
        };

        let payload = slack.payload(&ExportNotice {
            outcome,
            project,
            table,
            dataset,
            errors,
        });

        if let Err(e) = slack.send(&payload).await {
            tracing::warn!(
                channel = %slack.channel(),
                dataset = %dataset.name,
                table = %table,
                outcome = %outcome,
                error = %e,
                "Failed to deliver notification"
            );
        }
    }
}
