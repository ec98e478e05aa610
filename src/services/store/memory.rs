use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{ResultSource, ResultStore, StoreError};
use crate::models::job::JobId;
use crate::models::result::ResultRecord;

/// Process-local tier. Best effort: lost on restart and not shared between
/// instances.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<JobId, ResultRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl ResultSource for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, job_id: &JobId) -> Result<Option<ResultRecord>, StoreError> {
        Ok(self.records.read().await.get(job_id).cloned())
    }
}

#[async_trait]
impl ResultStore for MemoryStore {
    async fn put(&self, record: &ResultRecord) -> Result<(), StoreError> {
        self.records
            .write()
            .await
            .insert(record.job_id.clone(), record.clone());
        Ok(())
    }
}
