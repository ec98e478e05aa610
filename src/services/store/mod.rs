//! Layered result storage.
//!
//! Every tier implements [`ResultSource`]; tiers that accept writes also
//! implement [`ResultStore`]. [`ResultChain`] composes the configured tiers in
//! priority order: writes go to every writable tier and never fail as a
//! whole, reads return the first tier that has the record.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::config::AppConfig;
use crate::models::job::JobId;
use crate::models::result::ResultRecord;

pub mod file;
pub mod memory;
pub mod relational;
pub mod remote;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use relational::RelationalStore;
pub use remote::RemoteStore;

const REMOTE_TIMEOUT: Duration = Duration::from_secs(10);

/// A tier result records can be read from.
#[async_trait]
pub trait ResultSource: Send + Sync {
    /// Short label used in logs, metrics and health output.
    fn name(&self) -> &'static str;

    async fn get(&self, job_id: &JobId) -> Result<Option<ResultRecord>, StoreError>;

    async fn health(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// A tier that also accepts writes.
#[async_trait]
pub trait ResultStore: ResultSource {
    /// Insert or replace the record for `record.job_id`.
    async fn put(&self, record: &ResultRecord) -> Result<(), StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Which tiers accepted a write.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WriteReport {
    pub written: Vec<&'static str>,
    pub failed: Vec<&'static str>,
}

/// Prioritized composition of result tiers. Tiers are read in the order they
/// were added; writes go to every tier added with [`ResultChain::with_store`].
#[derive(Default)]
pub struct ResultChain {
    sources: Vec<Arc<dyn ResultSource>>,
    stores: Vec<Arc<dyn ResultStore>>,
}

impl ResultChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a tier that is both read and written.
    pub fn with_store<S: ResultStore + 'static>(mut self, store: Arc<S>) -> Self {
        self.sources.push(store.clone());
        self.stores.push(store);
        self
    }

    /// Append a read-only tier.
    pub fn with_source<S: ResultSource + 'static>(mut self, source: Arc<S>) -> Self {
        self.sources.push(source);
        self
    }

    /// Assemble the tiers enabled by configuration: memory, then file, then
    /// relational (when a pool is given), then the remote result host.
    pub fn from_config(config: &AppConfig, pool: Option<PgPool>) -> Result<Self, StoreError> {
        let mut chain = Self::new().with_store(Arc::new(MemoryStore::new()));

        if config.file_store_enabled {
            chain = chain.with_store(Arc::new(FileStore::new(&config.results_dir)));
        }
        if let Some(pool) = pool {
            chain = chain.with_store(Arc::new(RelationalStore::new(pool)));
        }
        if let Some(base_url) = &config.result_base_url {
            chain = chain.with_source(Arc::new(RemoteStore::new(base_url, REMOTE_TIMEOUT)?));
        }

        Ok(chain)
    }

    /// Every tier in read order.
    pub fn tiers(&self) -> &[Arc<dyn ResultSource>] {
        &self.sources
    }

    pub fn tier_names(&self) -> Vec<&'static str> {
        self.sources.iter().map(|t| t.name()).collect()
    }

    /// Write to every writable tier in order. Tier failures are logged and
    /// reported, never returned.
    pub async fn put(&self, record: &ResultRecord) -> WriteReport {
        let mut report = WriteReport::default();

        for tier in &self.stores {
            match tier.put(record).await {
                Ok(()) => report.written.push(tier.name()),
                Err(e) => {
                    tracing::warn!(
                        job_id = %record.job_id,
                        store = tier.name(),
                        error = %e,
                        "Result write failed"
                    );
                    metrics::counter!("logo_store_write_failures_total", "store" => tier.name())
                        .increment(1);
                    report.failed.push(tier.name());
                }
            }
        }

        report
    }

    /// Return the record from the first tier that has one.
    pub async fn get(&self, job_id: &JobId) -> Option<ResultRecord> {
        for tier in &self.sources {
            match tier.get(job_id).await {
                Ok(Some(record)) => {
                    tracing::debug!(job_id = %job_id, store = tier.name(), "Result found");
                    return Some(record);
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(
                        job_id = %job_id,
                        store = tier.name(),
                        error = %e,
                        "Result read failed, trying next store"
                    );
                }
            }
        }
        None
    }
}
