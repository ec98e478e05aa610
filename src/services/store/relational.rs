use std::future::Future;

use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::OnceCell;

use super::{ResultSource, ResultStore, StoreError};
use crate::db::{self, queries};
use crate::models::job::JobId;
use crate::models::result::ResultRecord;

/// PostgreSQL tier backed by the `logo_jobs` table.
///
/// The schema is applied on first use rather than at startup, and a failed
/// attempt is retried by the next operation, so a database that comes up
/// after the service still ends up with its table.
pub struct RelationalStore {
    pool: PgPool,
    schema: SchemaGuard,
}

impl RelationalStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            schema: SchemaGuard::default(),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run pending migrations unless a previous call already succeeded.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        self.schema
            .ensure(move || async move {
                db::run_migrations(&self.pool).await?;
                tracing::info!("Relational result schema ready");
                Ok(())
            })
            .await
    }
}

/// Remembers a successful schema setup. Failures leave it unset.
#[derive(Default)]
struct SchemaGuard {
    ready: OnceCell<()>,
}

impl SchemaGuard {
    async fn ensure<F, Fut>(&self, migrate: F) -> Result<(), StoreError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(), StoreError>>,
    {
        self.ready.get_or_try_init(migrate).await.map(|_| ())
    }

    #[cfg(test)]
    fn is_ready(&self) -> bool {
        self.ready.initialized()
    }
}

#[async_trait]
impl ResultSource for RelationalStore {
    fn name(&self) -> &'static str {
        "relational"
    }

    async fn get(&self, job_id: &JobId) -> Result<Option<ResultRecord>, StoreError> {
        self.ensure_schema().await?;
        Ok(queries::get_result(&self.pool, job_id).await?)
    }

    async fn health(&self) -> Result<(), StoreError> {
        self.ensure_schema().await?;
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl ResultStore for RelationalStore {
    async fn put(&self, record: &ResultRecord) -> Result<(), StoreError> {
        self.ensure_schema().await?;
        Ok(queries::upsert_result(&self.pool, record).await?)
    }
}
