use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::job::{JobId, JobStatus};
use super::lenient;
use super::result::{ResultRecord, ResultStatus};

/// Message returned when the webhook accepted a job.
pub const ACCEPTED_MESSAGE: &str = "Logo generation request accepted.";

/// Response to a generation submission. Always carries the minted `job_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerateResponse {
    pub job_id: JobId,
    pub status: JobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl GenerateResponse {
    pub fn queued(job_id: JobId) -> Self {
        Self {
            job_id,
            status: JobStatus::Queued,
            message: Some(ACCEPTED_MESSAGE.to_string()),
        }
    }

    pub fn failed(job_id: JobId, message: String) -> Self {
        Self {
            job_id,
            status: JobStatus::Failed,
            message: Some(message),
        }
    }
}

/// Body posted by the automation system when a job finishes.
///
/// Only `job_id` is required. Everything else is taken as sent: `variants`
/// is stored without being decoded and an unrecognized `status` is kept as
/// text.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackRequest {
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub job_id: Option<String>,
    #[serde(default)]
    pub status: ResultStatus,
    #[serde(default = "lenient::empty_list", deserialize_with = "lenient::list_or_empty")]
    pub variants: Value,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub error: Option<String>,
}

impl CallbackRequest {
    /// Decode a callback body of any JSON shape. Bodies that are not objects
    /// carry no `job_id`.
    pub fn from_json(body: Value) -> Self {
        serde_json::from_value(body).unwrap_or_default()
    }

    /// Build the stored record; a missing status means the job completed.
    pub fn into_record(self, job_id: JobId) -> ResultRecord {
        ResultRecord {
            job_id,
            status: self.status,
            variants: self.variants,
            error: self.error,
            timestamp: chrono::Utc::now(),
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallbackAck {
    pub success: bool,
    pub job_id: JobId,
}

impl CallbackAck {
    pub fn new(job_id: JobId) -> Self {
        Self {
            success: true,
            job_id,
        }
    }
}

/// Query string of `GET /api/results`.
#[derive(Debug, Deserialize)]
pub struct ResultQuery {
    pub job_id: Option<String>,
}
