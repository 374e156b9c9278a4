//! Slack notifications
//!
//! - [`payload`] - message body with per-export fields
//! - [`webhook`] - delivery to an incoming webhook

pub mod payload;
pub mod webhook;

pub use payload::{ExportNotice, SlackPayload};
pub use webhook::SlackNotifier;
