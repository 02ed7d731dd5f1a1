use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::types::ErrorResponse;
use models::errors::ModelError;
use service::auth::errors::AuthError;
use service::errors::ServiceError;
use tracing::error;

/// JSON error reply: `{"error": message}` with `status`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    /// Logs the detail; the client only sees a generic message.
    pub fn internal(detail: impl std::fmt::Display) -> Self {
        error!(error = %detail, "internal error");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorResponse { error: self.message })).into_response()
    }
}

impl From<ModelError> for ApiError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::Validation(m) => ApiError::bad_request(m),
            ModelError::NotFound(what) => ApiError::new(StatusCode::NOT_FOUND, format!("{what} not found")),
            ModelError::Db(m) => ApiError::internal(m),
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(m) | ServiceError::Conflict(m) => ApiError::bad_request(m),
            ServiceError::NotFound(m) => ApiError::new(StatusCode::NOT_FOUND, m),
            ServiceError::Forbidden(m) => ApiError::new(StatusCode::FORBIDDEN, m),
            ServiceError::Unauthorized(m) => ApiError::unauthorized(m),
            ServiceError::Db(m) | ServiceError::Media(m) => ApiError::internal(m),
            ServiceError::Model(m) => m.into(),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Validation(m) => ApiError::bad_request(m),
            AuthError::Conflict => ApiError::bad_request(e.to_string()),
            AuthError::NotFound => ApiError::new(StatusCode::NOT_FOUND, e.to_string()),
            AuthError::Unauthorized | AuthError::InvalidToken => ApiError::unauthorized(e.to_string()),
            AuthError::HashError(_) | AuthError::TokenError(_) | AuthError::Repository(_) => {
                error!(code = e.code(), "auth failure");
                ApiError::internal(e)
            }
        }
    }
}
