use std::time::{Duration, Instant};

use reqwest::Client;

use crate::models::job::JobRecord;

/// Asks ngrok tunnels in front of the automation host to skip their
/// interstitial page.
const SKIP_BROWSER_WARNING: &str = "ngrok-skip-browser-warning";

/// Client for the external automation webhook that performs generation.
pub struct WebhookClient {
    http: Client,
    url: String,
}

impl WebhookClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, ForwardError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Post a job record to the webhook. Any 2xx answer counts as accepted.
    ///
    /// The call is made exactly once; a failure is final for that job.
    pub async fn forward(&self, job: &JobRecord) -> Result<(), ForwardError> {
        let start = Instant::now();
        let result = self.send(job).await;
        metrics::histogram!("logo_webhook_forward_seconds").record(start.elapsed().as_secs_f64());
        result
    }

    async fn send(&self, job: &JobRecord) -> Result<(), ForwardError> {
        let response = self
            .http
            .post(&self.url)
            .header(SKIP_BROWSER_WARNING, "true")
            .json(job)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unable to read response body>".to_string());

        Err(ForwardError::Upstream {
            status: status.as_u16(),
            body,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ForwardError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Webhook answered {status}: {body}")]
    Upstream { status: u16, body: String },
}

impl ForwardError {
    /// Text reported back to the submitting client.
    pub fn client_message(&self) -> String {
        match self {
            ForwardError::Upstream { body, .. } => body.clone(),
            ForwardError::Http(e) => e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::job::{JobId, JobRequest};
    use mockito::Matcher;
    use serde_json::json;

    fn sample_job() -> JobRecord {
        JobRecord::from_request(JobId::generate(), JobRequest::new("a coffee shop logo"))
    }

    #[tokio::test]
    async fn test_forward_posts_normalized_payload() {
        let mut server = mockito::Server::new_async().await;
        let job = sample_job();
        let mock = server
            .mock("POST", "/webhook/generate")
            .match_header("content-type", "application/json")
            .match_header(SKIP_BROWSER_WARNING, "true")
            .match_body(Matcher::PartialJson(json!({
                "job_id": job.job_id.as_str(),
                "description": "a coffee shop logo",
                "style": "minimal",
                "colors": [],
                "files": [],
            })))
            .with_status(200)
            .with_body(r#"{"message":"Workflow was started"}"#)
            .create_async()
            .await;

        let client = WebhookClient::new(
            format!("{}/webhook/generate", server.url()),
            Duration::from_secs(5),
        )
        .unwrap();

        client.forward(&job).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_upstream_failure_carries_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/hook")
            .with_status(404)
            .with_body("webhook not registered")
            .create_async()
            .await;

        let client =
            WebhookClient::new(format!("{}/hook", server.url()), Duration::from_secs(5)).unwrap();

        let err = client.forward(&sample_job()).await.unwrap_err();
        assert!(matches!(err, ForwardError::Upstream { status: 404, .. }));
        assert_eq!(err.client_message(), "webhook not registered");
    }

    #[tokio::test]
    async fn test_unreachable_webhook() {
        // Port 9 (discard) on localhost is not expected to be listening.
        let client =
            WebhookClient::new("http://127.0.0.1:9/hook", Duration::from_secs(2)).unwrap();
        let err = client.forward(&sample_job()).await.unwrap_err();
        assert!(matches!(err, ForwardError::Http(_)));
        assert!(!err.client_message().is_empty());
    }
}
