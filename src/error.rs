/*
 * Responsibility
 * - The error type every auth middleware rejection goes through (AppError)
 * - IntoResponse: HTTP status + {"message": ..., "extra_data": null}
 * - Conversions from TokenError / PermissionError, including the
 *   "only show the last ':' segment" rule for token failures
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::api::v1::dto::ApiResponse;
use crate::services::auth::TokenError;
use crate::services::permission::PermissionError;

pub const HEADER_MISSING_MESSAGE: &str = "Authorization header is missing";
pub const HEADER_MALFORMED_MESSAGE: &str = "Invalid Authorization header format";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{}", HEADER_MISSING_MESSAGE)]
    HeaderMissing,

    #[error("{}", HEADER_MALFORMED_MESSAGE)]
    HeaderMalformed,

    /// Token verification failed; carries the client-facing detail only.
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    PermissionSourceUnavailable(String),

    #[error("{0}")]
    PermissionDenied(String),

    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::HeaderMissing | AppError::HeaderMalformed | AppError::Unauthorized(_) => {
                StatusCode::UNAUTHORIZED
            }
            AppError::PermissionSourceUnavailable(_) => StatusCode::BAD_REQUEST,
            AppError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(ApiResponse::message(self.to_string()))).into_response()
    }
}

/// Last `:`-separated segment of an error message, trimmed.
///
/// "token has invalid claims: token is expired" -> "token is expired"
pub fn final_segment(message: &str) -> &str {
    message.rsplit(':').next().unwrap_or(message).trim()
}

impl From<TokenError> for AppError {
    fn from(e: TokenError) -> Self {
        match e {
            // Issuance-side failures never reach a client as a 401.
            TokenError::InvalidConfig(_)
            | TokenError::EmptyIdentifier(_)
            | TokenError::Signing(_) => AppError::Internal,
            _ => AppError::Unauthorized(final_segment(&e.to_string()).to_string()),
        }
    }
}

impl From<PermissionError> for AppError {
    fn from(e: PermissionError) -> Self {
        match e {
            PermissionError::Unavailable(message) => AppError::PermissionSourceUnavailable(message),
            PermissionError::Denied(message) => AppError::PermissionDenied(message),
        }
    }
}
