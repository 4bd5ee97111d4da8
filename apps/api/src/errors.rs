use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::embedding::EmbedError;
use crate::nlp::AnnotateError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Annotator error: {0}")]
    Annotator(#[from] AnnotateError),

    #[error("Embedder error: {0}")]
    Embedder(#[from] EmbedError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Annotator(e) => {
                tracing::error!("Annotator error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "ANNOTATOR_ERROR",
                    e.to_string(),
                )
            }
            AppError::Embedder(e) => {
                tracing::error!("Embedder error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "EMBEDDER_ERROR",
                    e.to_string(),
                )
            }
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
