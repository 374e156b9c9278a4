//! BigQuery Jobs REST API models
//!
//! Only the fields bq-backup reads or writes are modelled; unknown fields in
//! responses are ignored.

use crate::domain::{ExtractRequest, JobError, JobState, JobStatus};
use serde::{Deserialize, Serialize};

/// `jobs.insert` request body
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobInsert {
    pub job_reference: JobReference,
    pub configuration: JobConfiguration,
}

impl JobInsert {
    /// Build an extract job body from a domain request
    pub fn extract(request: &ExtractRequest, location: Option<&str>) -> Self {
        Self {
            job_reference: JobReference {
                project_id: request.source.project.clone(),
                job_id: request.job_id.clone(),
                location: location.map(str::to_string),
            },
            configuration: JobConfiguration {
                extract: ExtractConfiguration {
                    source_table: TableReference {
                        project_id: request.source.project.clone(),
                        dataset_id: request.source.dataset.clone(),
                        table_id: request.source.table.clone(),
                    },
                    destination_uris: vec![request.destination_uri.clone()],
                    destination_format: request.destination_format.clone(),
                    compression: request.compression.clone(),
                },
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobReference {
    pub project_id: String,
    pub job_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobConfiguration {
    pub extract: ExtractConfiguration,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractConfiguration {
    pub source_table: TableReference,
    pub destination_uris: Vec<String>,
    pub destination_format: String,
    pub compression: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableReference {
    pub project_id: String,
    pub dataset_id: String,
    pub table_id: String,
}

/// Job resource returned by `jobs.insert` and `jobs.get`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobResource {
    pub job_reference: JobReference,
    #[serde(default)]
    pub status: Option<JobStatusResource>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatusResource {
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub error_result: Option<ErrorProto>,
    #[serde(default)]
    pub errors: Option<Vec<ErrorProto>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorProto {
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl From<ErrorProto> for JobError {
    fn from(proto: ErrorProto) -> Self {
        JobError::new(
            proto.reason.unwrap_or_else(|| "unknown".to_string()),
            proto.message.unwrap_or_default(),
        )
    }
}

impl From<JobResource> for JobStatus {
    fn from(resource: JobResource) -> Self {
        let status = resource.status.unwrap_or_default();
        let state = status
            .state
            .as_deref()
            .map(JobState::from_remote)
            .unwrap_or(JobState::Running);

        // `errors` lists every problem; `errorResult` is only the fatal one.
        let errors = match (status.errors, status.error_result) {
            (Some(errors), _) if !errors.is_empty() => {
                errors.into_iter().map(JobError::from).collect()
            }
            (_, Some(fatal)) => vec![JobError::from(fatal)],
            _ => Vec::new(),
        };

        JobStatus {
            job_id: resource.job_reference.job_id,
            location: resource.job_reference.location,
            state,
            errors,
        }
    }
}

/// Access token returned by the metadata server
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// Error envelope returned by Google APIs on non-2xx responses
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorEnvelope {
    pub error: ApiError,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TableRef;

    #[test]
    fn test_job_insert_serialization() {
        let request = ExtractRequest::ndjson_gzip(
            "bq_backup_ds_t_1",
            TableRef::new("proj", "ds", "t"),
            "gs://bucket/t*",
        );
        let body = serde_json::to_value(JobInsert::extract(&request, Some("EU"))).unwrap();

        assert_eq!(body["jobReference"]["jobId"], "bq_backup_ds_t_1");
        assert_eq!(body["jobReference"]["location"], "EU");
        let extract = &body["configuration"]["extract"];
        assert_eq!(extract["sourceTable"]["datasetId"], "ds");
        assert_eq!(extract["destinationUris"][0], "gs://bucket/t*");
        assert_eq!(extract["destinationFormat"], "NEWLINE_DELIMITED_JSON");
        assert_eq!(extract["compression"], "GZIP");
    }

    #[test]
    fn test_location_omitted_when_unset() {
        let request = ExtractRequest::ndjson_gzip(
            "id",
            TableRef::new("proj", "ds", "t"),
            "gs://bucket/t*",
        );
        let body = serde_json::to_value(JobInsert::extract(&request, None)).unwrap();
        assert!(body["jobReference"].get("location").is_none());
    }

    #[test]
    fn test_running_job_status() {
        let resource: JobResource = serde_json::from_value(serde_json::json!({
            "jobReference": {"projectId": "proj", "jobId": "j1", "location": "US"},
            "status": {"state": "RUNNING"}
        }))
        .unwrap();
        let status = JobStatus::from(resource);
        assert_eq!(status.state, JobState::Running);
        assert_eq!(status.location.as_deref(), Some("US"));
        assert!(status.errors.is_empty());
    }

    #[test]
    fn test_done_job_with_errors() {
        let resource: JobResource = serde_json::from_value(serde_json::json!({
            "jobReference": {"projectId": "proj", "jobId": "j1"},
            "status": {
                "state": "DONE",
                "errorResult": {"reason": "notFound", "message": "Not found: Table"},
                "errors": [
                    {"reason": "notFound", "message": "Not found: Table"},
                    {"reason": "invalid", "message": "Bad destination"}
                ]
            }
        }))
        .unwrap();
        let status = JobStatus::from(resource);
        assert_eq!(status.state, JobState::Done);
        assert_eq!(status.errors.len(), 2);
        assert_eq!(status.errors[1].reason, "invalid");
    }

    #[test]
    fn test_error_result_used_when_errors_absent() {
        let resource: JobResource = serde_json::from_value(serde_json::json!({
            "jobReference": {"projectId": "proj", "jobId": "j1"},
            "status": {
                "state": "DONE",
                "errorResult": {"reason": "accessDenied", "message": "Permission denied"}
            }
        }))
        .unwrap();
        let status = JobStatus::from(resource);
        assert_eq!(status.errors, vec![JobError::new("accessDenied", "Permission denied")]);
    }

    #[test]
    fn test_missing_status_is_running() {
        let resource: JobResource = serde_json::from_value(serde_json::json!({
            "jobReference": {"projectId": "proj", "jobId": "j1"}
        }))
        .unwrap();
        assert_eq!(JobStatus::from(resource).state, JobState::Running);
    }
}
