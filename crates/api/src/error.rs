use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use redraft_core::error::CoreError;
use redraft_llm::LlmError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors, [`LlmError`] for generation
/// failures, and adds HTTP-specific variants. Implements [`IntoResponse`]
/// to produce consistent `{error, code}` JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `redraft_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A generation client error.
    #[error(transparent)]
    Llm(#[from] LlmError),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, key } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} '{key}' not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::NotImplemented(msg) => (
                    StatusCode::NOT_IMPLEMENTED,
                    "NOT_IMPLEMENTED",
                    msg.clone(),
                ),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- Generation errors ---
            AppError::Llm(err) => match err {
                LlmError::Unreachable(msg) => {
                    tracing::warn!(error = %msg, "Generation service unreachable");
                    (
                        StatusCode::BAD_GATEWAY,
                        "UPSTREAM_UNREACHABLE",
                        "No response from the generation service".to_string(),
                    )
                }
                LlmError::Upstream { status, message } => {
                    tracing::warn!(upstream_status = status, error = %message, "Generation failed");
                    (
                        StatusCode::BAD_GATEWAY,
                        "GENERATION_ERROR",
                        message.clone(),
                    )
                }
                LlmError::InvalidResponse(msg) => {
                    tracing::warn!(error = %msg, "Invalid generation response");
                    (
                        StatusCode::BAD_GATEWAY,
                        "GENERATION_ERROR",
                        "The generation service returned an unusable response".to_string(),
                    )
                }
            },

            // --- HTTP-specific errors ---
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => (
            StatusCode::CONFLICT,
            "CONFLICT",
            "Duplicate value violates a unique constraint".to_string(),
        ),
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}
