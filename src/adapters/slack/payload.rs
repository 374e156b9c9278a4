//! Slack incoming-webhook message body

use crate::config::{DatasetSpec, SlackConfig};
use crate::domain::{JobError, Outcome};
use serde::Serialize;

/// Message posted for one finished export
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SlackPayload {
    pub channel: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub text: String,
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Attachment {
    pub fallback: String,
    pub color: String,
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Field {
    pub title: String,
    pub value: String,
    pub short: bool,
}

impl Field {
    fn short(title: &str, value: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            value: value.into(),
            short: true,
        }
    }

    fn long(title: &str, value: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            value: value.into(),
            short: false,
        }
    }
}

/// Everything a notification describes about one export
#[derive(Debug, Clone, Copy)]
pub struct ExportNotice<'a> {
    pub outcome: Outcome,
    pub project: &'a str,
    pub table: &'a str,
    pub dataset: &'a DatasetSpec,
    pub errors: &'a [JobError],
}

impl SlackPayload {
    /// Build the message for one export outcome
    ///
    /// Fields are `Project`, `Table`, `Dataset`, `Bucket`, followed by a
    /// `Reason`/`Description` pair per error.
    pub fn build(config: &SlackConfig, notice: &ExportNotice<'_>) -> Self {
        let (text, color, verb) = match notice.outcome {
            Outcome::Success => (
                "BigQuery export succeeded",
                config.success_color.clone(),
                "succeeded",
            ),
            Outcome::Failure => (
                "BigQuery export failed",
                config.failure_color.clone(),
                "failed",
            ),
        };

        let fallback = format!(
            "Export of {}.{}.{} to gs://{} {}",
            notice.project, notice.dataset.name, notice.table, notice.dataset.bucket, verb
        );

        let mut fields = vec![
            Field::short("Project", notice.project),
            Field::short("Table", notice.table),
            Field::short("Dataset", notice.dataset.name.as_str()),
            Field::short("Bucket", notice.dataset.bucket.as_str()),
        ];
        for error in notice.errors {
            fields.push(Field::short("Reason", error.reason.as_str()));
            fields.push(Field::long("Description", error.message.as_str()));
        }

        Self {
            channel: config.channel.clone(),
            username: config.username.clone(),
            text: text.to_string(),
            attachments: vec![Attachment {
                fallback,
                color,
                fields,
            }],
        }
    }

    /// Value of the first field with `title`, if any
    pub fn field(&self, title: &str) -> Option<&str> {
        self.attachments
            .iter()
            .flat_map(|a| a.fields.iter())
            .find(|f| f.title == title)
            .map(|f| f.value.as_str())
    }
}
