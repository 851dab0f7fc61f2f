//! Branchline API — error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use branchline_core::error::{NarrativeError, SelectionError};
use serde::Serialize;
use thiserror::Error;

/// Startup and runtime errors for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
}

/// HTTP-layer wrapper around `NarrativeError` that implements `IntoResponse`.
#[derive(Debug)]
pub struct ApiError(pub NarrativeError);

impl From<NarrativeError> for ApiError {
    fn from(err: NarrativeError) -> Self {
        Self(err)
    }
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match &self.0 {
            NarrativeError::Content(_) => (StatusCode::SERVICE_UNAVAILABLE, "story_unavailable"),
            NarrativeError::Graph(_) => (StatusCode::SERVICE_UNAVAILABLE, "story_invalid"),
            NarrativeError::SceneNotFound(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "scene_not_found")
            }
            NarrativeError::Selection(selection) => match selection {
                SelectionError::NotReady => (StatusCode::SERVICE_UNAVAILABLE, "not_ready"),
                SelectionError::StoryEnded => (StatusCode::CONFLICT, "story_ended"),
                SelectionError::ChoiceOutOfRange { .. } => {
                    (StatusCode::BAD_REQUEST, "choice_out_of_range")
                }
                SelectionError::StaleSelection { .. } => (StatusCode::CONFLICT, "stale_selection"),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = self.status_and_code();

        let body = ErrorBody {
            error: error_code,
            message: self.0.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
