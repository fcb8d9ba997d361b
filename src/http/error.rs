use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::service::ServiceError;

/// JSON body of every error response
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Failure of a request, mapped to a status code and a short message
#[derive(Debug)]
pub enum ApiError {
    /// Malformed id, date or body
    BadRequest(String),
    /// A failure outside the service, such as a panicked store task
    Internal(String),
    Service(ServiceError),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        ApiError::Service(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Service(ServiceError::Validation(err)) => (StatusCode::BAD_REQUEST, err.to_string()),
            ApiError::Service(ServiceError::NotFound { .. }) => {
                (StatusCode::NOT_FOUND, "habit not found".to_string())
            }
            ApiError::Service(ServiceError::AlreadyCompleted { .. }) => (
                StatusCode::CONFLICT,
                "habit already completed for this date".to_string(),
            ),
            ApiError::Service(ServiceError::CompletionNotFound { .. }) => (
                StatusCode::NOT_FOUND,
                "completion not found for this date".to_string(),
            ),
            ApiError::Service(err @ ServiceError::Store(_)) => {
                // Detail stays in the server log
                tracing::error!(error = ?err, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_string())
            }
            ApiError::Internal(detail) => {
                tracing::error!(error = %detail, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_string())
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
