use sqlx::{postgres::PgRow, PgPool, Row};

use crate::models::job::JobId;
use crate::models::result::{ResultRecord, ResultStatus};

/// Insert a result, replacing any earlier one for the same job.
///
/// `variants` is stored as sent; fields outside the table's columns are not
/// persisted here.
pub async fn upsert_result(pool: &PgPool, record: &ResultRecord) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO logo_jobs (job_id, status, variants, error, updated_at)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (job_id) DO UPDATE
        SET status = EXCLUDED.status,
            variants = EXCLUDED.variants,
            error = EXCLUDED.error,
            updated_at = EXCLUDED.updated_at
        "#,
    )
    .bind(record.job_id.as_str())
    .bind(record.status.to_string())
    .bind(&record.variants)
    .bind(record.error.as_deref())
    .bind(record.timestamp)
    .execute(pool)
    .await?;

    Ok(())
}

/// Get the result for a job, if one was written.
pub async fn get_result(pool: &PgPool, job_id: &JobId) -> Result<Option<ResultRecord>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT status, variants, error, updated_at
        FROM logo_jobs
        WHERE job_id = $1
        "#,
    )
    .bind(job_id.as_str())
    .fetch_optional(pool)
    .await?;

    row.map(|r| record_from_row(job_id, &r)).transpose()
}

fn record_from_row(job_id: &JobId, row: &PgRow) -> Result<ResultRecord, sqlx::Error> {
    // Rows from older writers may carry free-form statuses.
    let status: Option<String> = row.try_get("status")?;
    let variants: Option<serde_json::Value> = row.try_get("variants")?;

    Ok(ResultRecord {
        job_id: job_id.clone(),
        status: ResultStatus::from_text(status.as_deref().unwrap_or_default()),
        variants: variants
            .filter(|v| !v.is_null())
            .unwrap_or_else(|| serde_json::Value::Array(Vec::new())),
        error: row.try_get("error")?,
        timestamp: row.try_get("updated_at")?,
        extra: serde_json::Map::new(),
    })
}
