use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use garde::Validate;

use crate::app_state::AppState;
use crate::config::CallbackPolicy;
use crate::error::AppResult;
use crate::models::api::GenerateResponse;
use crate::models::job::{JobId, JobRecord, JobRequest};
use crate::models::result::ResultRecord;

/// POST /api/generate — validate a request and forward it to the webhook.
///
/// Once the description validates, the response always carries a fresh
/// `job_id`; a failed forward only downgrades `status` to `failed`.
pub async fn submit_generation(
    State(state): State<AppState>,
    payload: Result<Json<JobRequest>, JsonRejection>,
) -> AppResult<Json<GenerateResponse>> {
    let Json(request) = payload?;
    request.validate()?;

    let job_id = JobId::generate();
    let job = JobRecord::from_request(job_id.clone(), request);

    metrics::counter!("logo_jobs_submitted_total").increment(1);
    tracing::info!(
        job_id = %job_id,
        style = %job.style,
        colors = job.colors.len(),
        files = job.files.len(),
        "Generation request received"
    );

    let reserved = state.callback_policy == CallbackPolicy::Reserved;
    if reserved {
        state.results.put(&ResultRecord::queued(job_id.clone())).await;
    }

    let response = match state.webhook.forward(&job).await {
        Ok(()) => {
            tracing::info!(job_id = %job_id, "Job forwarded to webhook");
            GenerateResponse::queued(job_id)
        }
        Err(e) => {
            tracing::warn!(
                job_id = %job_id,
                webhook = %state.webhook.url(),
                error = %e,
                "Webhook forward failed"
            );
            metrics::counter!("logo_webhook_forward_failures_total").increment(1);

            let message = e.client_message();
            if reserved {
                state
                    .results
                    .put(&ResultRecord::failed(job_id.clone(), message.clone()))
                    .await;
            }
            GenerateResponse::failed(job_id, message)
        }
    };

    Ok(Json(response))
}
