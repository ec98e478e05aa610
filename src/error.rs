use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::models::job::InvalidJobId;

/// Error type for HTTP handlers, rendered as a JSON `{error}` body.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A required field is missing or malformed. Always user-correctable.
    #[error("{0}")]
    Validation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// No tier holds a result for this job yet.
    #[error("Result not found for job {job_id}")]
    NotFound { job_id: String },

    /// Callback for an id that was never reserved by a submission.
    #[error("Unknown job {job_id}")]
    UnknownJob { job_id: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Validation(msg) | AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, json!({ "error": msg }))
            }
            AppError::NotFound { job_id } => (
                StatusCode::NOT_FOUND,
                json!({ "error": "Result not found", "job_id": job_id }),
            ),
            AppError::UnknownJob { job_id } => (
                StatusCode::NOT_FOUND,
                json!({ "error": "Unknown job_id", "job_id": job_id }),
            ),
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal Server Error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<garde::Report> for AppError {
    fn from(report: garde::Report) -> Self {
        let message = report
            .iter()
            .next()
            .map(|(_, error)| error.message().to_string())
            .unwrap_or_else(|| report.to_string());
        AppError::Validation(message)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<InvalidJobId> for AppError {
    fn from(err: InvalidJobId) -> Self {
        AppError::Validation(err.to_string())
    }
}
