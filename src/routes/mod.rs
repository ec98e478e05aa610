use axum::extract::DefaultBodyLimit;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, StatusCode};
use axum::routing::{get, post};
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;

pub mod generate;
pub mod health;
pub mod metrics;
pub mod results;

/// Build the public API router with its middleware stack.
///
/// The Prometheus endpoint is attached separately by the server binary
/// because it needs the globally installed recorder.
pub fn api_router(state: AppState, body_limit: usize) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route(
            "/api/generate",
            post(generate::submit_generation).options(preflight),
        )
        .route(
            "/api/results",
            get(results::get_result_by_query)
                .post(results::record_result)
                .options(preflight),
        )
        .route(
            "/api/results/{job_id}",
            get(results::get_result_by_path).options(preflight),
        )
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors_layer())
        .layer(RequestBodyLimitLayer::new(body_limit))
}

/// Browser clients call from any origin.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            AUTHORIZATION,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
            CONTENT_TYPE,
        ])
}

/// Bare `OPTIONS` without preflight headers; real preflights are answered by
/// the CORS layer.
async fn preflight() -> StatusCode {
    StatusCode::OK
}
