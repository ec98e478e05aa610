use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::models::api::GenerateResponse;
use crate::models::job::{JobId, JobRequest};
use crate::models::result::ResultRecord;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// What a single result poll observed.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultSnapshot {
    /// Nothing stored yet, or the lookup itself failed.
    Pending,
    Record(ResultRecord),
}

/// The two calls a generation session makes against the service.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    async fn submit(&self, request: &JobRequest) -> Result<GenerateResponse, ClientError>;

    /// Never fails: anything other than a stored record reads as pending.
    async fn fetch_result(&self, job_id: &JobId) -> ResultSnapshot;
}

/// HTTP client for the generation and result endpoints.
pub struct LogoApiClient {
    http: Client,
    base_url: String,
}

impl LogoApiClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl GenerationBackend for LogoApiClient {
    async fn submit(&self, request: &JobRequest) -> Result<GenerateResponse, ClientError> {
        let response = self
            .http
            .post(format!("{}/api/generate", self.base_url))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }

    async fn fetch_result(&self, job_id: &JobId) -> ResultSnapshot {
        let url = format!("{}/api/results/{}", self.base_url, job_id);

        let response = match self.http.get(&url).send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(job_id = %job_id, error = %e, "Result fetch failed");
                return ResultSnapshot::Pending;
            }
        };

        if !response.status().is_success() {
            tracing::debug!(job_id = %job_id, status = %response.status(), "Result not available yet");
            return ResultSnapshot::Pending;
        }

        match response.json::<ResultRecord>().await {
            Ok(record) => ResultSnapshot::Record(record),
            Err(e) => {
                tracing::warn!(job_id = %job_id, error = %e, "Result body unreadable");
                ResultSnapshot::Pending
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to trigger generation: {body}")]
    Rejected { status: u16, body: String },
}
