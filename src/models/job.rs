use std::fmt;

use chrono::{DateTime, Utc};
use garde::Validate;
use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

/// Style applied when a request omits one.
pub const DEFAULT_STYLE: &str = "minimal";

const MAX_JOB_ID_LEN: usize = 128;

/// Lifecycle status of a generation job.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, EnumString, Display, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum JobStatus {
    Queued,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// Identifier shared by a submission, its completion callback and every poll.
///
/// Minted ids are UUID v4 strings. Ids supplied by callers are accepted as long
/// as they are 1-128 characters of ASCII letters, digits, `-` or `_`, which
/// keeps them safe to use as file names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn parse(raw: &str) -> Result<Self, InvalidJobId> {
        let valid = !raw.is_empty()
            && raw.len() <= MAX_JOB_ID_LEN
            && raw
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');

        if valid {
            Ok(Self(raw.to_string()))
        } else {
            Err(InvalidJobId(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for JobId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        JobId::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid job_id {0:?}: expected 1-128 letters, digits, '-' or '_'")]
pub struct InvalidJobId(pub String);

/// A logo generation request as submitted by the form.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct JobRequest {
    #[garde(custom(required_text))]
    pub description: Option<String>,

    #[garde(skip)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,

    #[garde(skip)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<String>>,

    /// Reference images, usually base64 data URLs.
    #[garde(skip)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<String>>,
}

impl JobRequest {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            ..Self::default()
        }
    }
}

fn required_text(value: &Option<String>, _ctx: &()) -> garde::Result {
    match value.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => Ok(()),
        _ => Err(garde::Error::new("Description is required")),
    }
}

/// Normalized payload forwarded to the generation webhook.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobRecord {
    pub job_id: JobId,
    pub description: String,
    pub style: String,
    pub colors: Vec<String>,
    pub files: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

impl JobRecord {
    /// Apply defaults to a validated request and stamp it with the send time.
    pub fn from_request(job_id: JobId, request: JobRequest) -> Self {
        Self {
            job_id,
            description: request.description.unwrap_or_default(),
            style: request
                .style
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_STYLE.to_string()),
            colors: request.colors.unwrap_or_default(),
            files: request.files.unwrap_or_default(),
            timestamp: Utc::now(),
        }
    }
}
