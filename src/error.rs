/*
 * Responsibility
 * - app-wide ApiError (AppError) definition
 * - IntoResponse implementation: status code + `{"error": "..."}` body
 * - ServiceError / TokenError conversion into one HTTP vocabulary
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::users::ServiceError;

/// Single-field error payload shared by every failure this layer produces.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    // Every token problem collapses into this one message.
    #[error("missing or invalid token")]
    Unauthorized,
    // Insufficient role and failed user lookup share this message.
    #[error("admin only")]
    Forbidden,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn invalid_input() -> Self {
        Self::bad_request("invalid input")
    }

    /// `invalid input` for a body that parsed but failed validation.
    /// The reason only goes to the debug log.
    pub fn rejected_input(reason: &'static str) -> Self {
        tracing::debug!(reason, "rejected request body");
        Self::invalid_input()
    }

    pub fn not_found(resource: &'static str) -> Self {
        Self::NotFound(resource)
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::NotFound(resource) => AppError::not_found(resource),
            ServiceError::AlreadyExists(what) => {
                AppError::bad_request(format!("{what} already exists"))
            }
            ServiceError::InvalidInput(message) => AppError::BadRequest(message),
            ServiceError::InvalidCredentials => AppError::Unauthorized,
            ServiceError::Backend(detail) => {
                // Detail stays in the log; the client only sees the generic message.
                tracing::error!(error = %detail, "user service failure");
                AppError::Internal
            }
        }
    }
}
