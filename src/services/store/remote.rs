use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use super::{ResultSource, StoreError};
use crate::models::job::JobId;
use crate::models::result::ResultRecord;

/// Read-only tier that fetches `<base_url>/<job_id>.json` from a static
/// result host the automation system publishes to.
pub struct RemoteStore {
    http: Client,
    base_url: String,
}

impl RemoteStore {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, StoreError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url_for(&self, job_id: &JobId) -> String {
        format!("{}/{}.json", self.base_url, job_id)
    }
}

#[async_trait]
impl ResultSource for RemoteStore {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn get(&self, job_id: &JobId) -> Result<Option<ResultRecord>, StoreError> {
        let response = self.http.get(self.url_for(job_id)).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let mut body: serde_json::Value = response.error_for_status()?.json().await?;
        // Published files do not always repeat their own id.
        if let Some(obj) = body.as_object_mut() {
            obj.entry("job_id")
                .or_insert_with(|| serde_json::Value::String(job_id.to_string()));
        }
        Ok(Some(serde_json::from_value(body)?))
    }
}
