use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use randomavatars_core::AppError;
use serde::Serialize;

/// Body returned to clients when media cannot be served, regardless of the
/// underlying pool or transmission failure; detail stays in the server log.
pub const MEDIA_ERROR_MESSAGE: &str = "Failed to serve media file";

/// Body returned for any unexpected internal failure.
pub const GENERIC_ERROR_MESSAGE: &str = "Something broke!";

/// API error payload.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    error: String,
}

impl ErrorResponse {
    pub(crate) fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// HTTP API error wrapper around core application errors.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(value: AppError) -> Self {
        Self(value)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            AppError::Validation(message) => (StatusCode::BAD_REQUEST, message.clone()),
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message.clone()),
            AppError::EmptyPool(_) | AppError::UnreadablePool(_) | AppError::Transmission(_) => {
                tracing::error!(error = %self.0, "failed to serve media file");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    MEDIA_ERROR_MESSAGE.to_owned(),
                )
            }
            AppError::Internal(_) => {
                tracing::error!(error = %self.0, "unhandled internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    GENERIC_ERROR_MESSAGE.to_owned(),
                )
            }
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

/// Standard API result type.
pub type ApiResult<T> = Result<T, ApiError>;
