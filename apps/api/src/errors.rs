use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::answer::composer::{NO_QUESTION, RESUME_UNAVAILABLE};

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    /// `/ask` without a usable question. Body keeps the `{"answer": ...}` shape.
    #[error("No question provided")]
    MissingQuestion,

    /// Resume mode requested but no text could be extracted.
    #[error("Resume text unavailable")]
    ResumeUnavailable,

    #[error("Validation error: {0}")]
    Validation(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::MissingQuestion => {
                return (StatusCode::BAD_REQUEST, Json(json!({ "answer": NO_QUESTION })))
                    .into_response();
            }
            AppError::ResumeUnavailable => {
                return (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(json!({ "answer": RESUME_UNAVAILABLE })),
                )
                    .into_response();
            }
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
