use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Map, Value};

use super::job::{JobId, JobStatus};
use super::lenient;

/// Provenance of a generated image.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct VariantMetadata {
    #[serde(default, deserialize_with = "lenient::text")]
    pub model: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub prompt: String,
}

/// One generated logo candidate. The image itself lives wherever `url` points.
///
/// Decoding is forgiving: numeric ids become text, a missing or textual score
/// reads as a number (zero when unreadable), and odd metadata is dropped.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogoVariant {
    #[serde(default, deserialize_with = "lenient::text")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub url: String,
    #[serde(default, deserialize_with = "lenient::score")]
    pub score: f64,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub metadata: VariantMetadata,
}

impl From<&LogoVariant> for Value {
    fn from(variant: &LogoVariant) -> Self {
        json!({
            "id": variant.id,
            "url": variant.url,
            "score": variant.score,
            "metadata": {
                "model": variant.metadata.model,
                "prompt": variant.metadata.prompt,
            },
        })
    }
}

/// Status reported for a job. Values outside the known lifecycle are kept
/// exactly as the automation system sent them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultStatus {
    Known(JobStatus),
    Other(String),
}

impl ResultStatus {
    /// Blank text means the job completed.
    pub fn from_text(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::default();
        }
        match JobStatus::from_str(trimmed) {
            Ok(status) => Self::Known(status),
            Err(_) => Self::Other(raw.to_string()),
        }
    }

    pub fn job_status(&self) -> Option<JobStatus> {
        match self {
            Self::Known(status) => Some(*status),
            Self::Other(_) => None,
        }
    }
}

impl Default for ResultStatus {
    fn default() -> Self {
        Self::Known(JobStatus::Completed)
    }
}

impl From<JobStatus> for ResultStatus {
    fn from(status: JobStatus) -> Self {
        Self::Known(status)
    }
}

impl PartialEq<JobStatus> for ResultStatus {
    fn eq(&self, other: &JobStatus) -> bool {
        self.job_status() == Some(*other)
    }
}

impl fmt::Display for ResultStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(status) => fmt::Display::fmt(status, f),
            Self::Other(raw) => f.write_str(raw),
        }
    }
}

impl Serialize for ResultStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ResultStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match lenient::optional_text(deserializer)? {
            Some(raw) => Self::from_text(&raw),
            None => Self::default(),
        })
    }
}

/// Stored outcome of a job, keyed by `job_id`. A later write replaces it.
///
/// `variants` is kept as the automation system sent it; clients decode it
/// with [`ResultRecord::logo_variants`]. Fields this service does not know
/// about ride along in `extra` so reads hand them back unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResultRecord {
    pub job_id: JobId,
    #[serde(default)]
    pub status: ResultStatus,
    #[serde(default = "lenient::empty_list", deserialize_with = "lenient::list_or_empty")]
    pub variants: Value,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::optional_text"
    )]
    pub error: Option<String>,
    /// Last write time.
    #[serde(default = "Utc::now", deserialize_with = "lenient::timestamp")]
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ResultRecord {
    pub fn new(job_id: JobId, status: impl Into<ResultStatus>) -> Self {
        Self {
            job_id,
            status: status.into(),
            variants: lenient::empty_list(),
            error: None,
            timestamp: Utc::now(),
            extra: Map::new(),
        }
    }

    /// Placeholder written when a job id is reserved at submission.
    pub fn queued(job_id: JobId) -> Self {
        Self::new(job_id, JobStatus::Queued)
    }

    pub fn failed(job_id: JobId, error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::new(job_id, JobStatus::Failed)
        }
    }

    pub fn completed(job_id: JobId, variants: &[LogoVariant]) -> Self {
        Self {
            variants: Value::Array(variants.iter().map(Value::from).collect()),
            ..Self::new(job_id, JobStatus::Completed)
        }
    }

    /// Number of entries in `variants`, whatever their shape.
    pub fn variant_count(&self) -> usize {
        self.variants.as_array().map_or(0, Vec::len)
    }

    /// Entries of `variants` that can be shown as logos. Entries that are not
    /// JSON objects are skipped.
    pub fn logo_variants(&self) -> Vec<LogoVariant> {
        self.variants
            .as_array()
            .into_iter()
            .flatten()
            .filter(|entry| entry.is_object())
            .filter_map(|entry| LogoVariant::deserialize(entry).ok())
            .collect()
    }

    pub fn is_ready(&self) -> bool {
        self.status == JobStatus::Completed && !self.logo_variants().is_empty()
    }
}
