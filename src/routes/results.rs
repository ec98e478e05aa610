use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::Json;
use serde_json::Value;

use crate::app_state::AppState;
use crate::config::CallbackPolicy;
use crate::error::{AppError, AppResult};
use crate::models::api::{CallbackAck, CallbackRequest, ResultQuery};
use crate::models::job::JobId;
use crate::models::result::ResultRecord;

/// POST /api/results — completion callback from the automation system.
///
/// Acknowledges as soon as the id validates; store failures are logged by
/// the chain and never surface here.
pub async fn record_result(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<CallbackAck>> {
    let Json(body) = payload?;
    let callback = CallbackRequest::from_json(body);

    let raw_id = callback
        .job_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::Validation("job_id is required".to_string()))?;
    let job_id = JobId::parse(raw_id)?;

    if state.callback_policy == CallbackPolicy::Reserved && state.results.get(&job_id).await.is_none() {
        tracing::warn!(job_id = %job_id, "Callback for unreserved job rejected");
        return Err(AppError::UnknownJob {
            job_id: job_id.to_string(),
        });
    }

    let record = callback.into_record(job_id.clone());
    let report = state.results.put(&record).await;

    metrics::counter!("logo_callbacks_total").increment(1);
    tracing::info!(
        job_id = %job_id,
        status = %record.status,
        variants = record.variant_count(),
        written = ?report.written,
        failed = ?report.failed,
        "Result recorded"
    );

    Ok(Json(CallbackAck::new(job_id)))
}

/// GET /api/results/{job_id} — polled by clients.
pub async fn get_result_by_path(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> AppResult<Json<ResultRecord>> {
    lookup(&state, &job_id).await
}

/// GET /api/results?job_id=... — query-string form of the same lookup.
pub async fn get_result_by_query(
    State(state): State<AppState>,
    Query(query): Query<ResultQuery>,
) -> AppResult<Json<ResultRecord>> {
    let job_id = query
        .job_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing job_id parameter".to_string()))?;
    lookup(&state, &job_id).await
}

/// Ids outside the accepted charset can never have been stored, so they read
/// as not found like any other unknown id.
async fn lookup(state: &AppState, raw_id: &str) -> AppResult<Json<ResultRecord>> {
    let raw_id = raw_id.trim();
    let found = match JobId::parse(raw_id) {
        Ok(job_id) => state.results.get(&job_id).await,
        Err(e) => {
            tracing::debug!(error = %e, "Lookup for malformed job_id");
            None
        }
    };

    match found {
        Some(record) => {
            metrics::counter!("logo_result_reads_total", "outcome" => "hit").increment(1);
            Ok(Json(record))
        }
        None => {
            metrics::counter!("logo_result_reads_total", "outcome" => "miss").increment(1);
            Err(AppError::NotFound {
                job_id: raw_id.to_string(),
            })
        }
    }
}
