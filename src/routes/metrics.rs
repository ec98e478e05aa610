use axum::extract::State;
use axum::response::IntoResponse;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use std::sync::Arc;

/// Install the global Prometheus recorder and describe the service metrics.
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    metrics::describe_counter!(
        "logo_jobs_submitted_total",
        "Generation requests that passed validation"
    );
    metrics::describe_counter!(
        "logo_webhook_forward_failures_total",
        "Generation requests the webhook did not accept"
    );
    metrics::describe_histogram!(
        "logo_webhook_forward_seconds",
        "Time spent forwarding a job to the webhook"
    );
    metrics::describe_counter!("logo_callbacks_total", "Completion callbacks recorded");
    metrics::describe_counter!(
        "logo_store_write_failures_total",
        "Result writes rejected by a store tier"
    );
    metrics::describe_counter!(
        "logo_result_reads_total",
        "Result lookups by outcome (hit or miss)"
    );

    Ok(handle)
}

/// GET /metrics — Prometheus text exposition format.
pub async fn prometheus_metrics(State(handle): State<Arc<PrometheusHandle>>) -> impl IntoResponse {
    handle.render()
}
