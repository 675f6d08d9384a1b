//! Application error types.
//!
//! Every handler returns [`AppError`]; its [`IntoResponse`] impl maps the
//! error onto an HTTP status and a client-safe message, and reports
//! server-side faults to Sentry. Internal detail never reaches the browser.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::backend::BackendError;

/// Top-level application error.
#[derive(Debug, Error)]
pub enum AppError {
    /// Backend API call failed.
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// Session store failure.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller is not signed in.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Request was malformed or failed validation.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience alias for handler results.
pub type Result<T> = std::result::Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Report faults on our side. Expected rejections (404s, validation
        // failures, backend "no" answers) stay out of Sentry.
        match &self {
            Self::Backend(
                BackendError::Http(_) | BackendError::Upstream(_) | BackendError::Parse(_),
            )
            | Self::Session(_)
            | Self::Internal(_) => {
                tracing::error!(error = %self, "Request failed");
                sentry::capture_error(&self);
            }
            _ => {
                tracing::debug!(error = %self, "Request rejected");
            }
        }

        let (status, message) = match self {
            Self::Backend(BackendError::Unauthorized) | Self::Unauthorized(_) => (
                StatusCode::UNAUTHORIZED,
                "Please log in to continue".to_string(),
            ),
            Self::Backend(BackendError::Forbidden) => (
                StatusCode::FORBIDDEN,
                "You don't have permission to do that".to_string(),
            ),
            Self::Backend(BackendError::NotFound(_)) => {
                (StatusCode::NOT_FOUND, "Not found".to_string())
            }
            Self::NotFound(what) => (StatusCode::NOT_FOUND, format!("Not found: {what}")),
            // The backend's rejection reason is written for end users, so
            // pass it through.
            Self::Backend(BackendError::Rejected(reason)) => (StatusCode::BAD_REQUEST, reason),
            Self::BadRequest(reason) => (StatusCode::BAD_REQUEST, reason),
            Self::Backend(
                BackendError::Http(_) | BackendError::Upstream(_) | BackendError::Parse(_),
            ) => (
                StatusCode::BAD_GATEWAY,
                "External service error, please try again".to_string(),
            ),
            Self::Session(_) | Self::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        (status, message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(error: AppError) -> StatusCode {
        error.into_response().status()
    }

    #[test]
    fn unauthorized_maps_to_401() {
        assert_eq!(
            get_status(AppError::Backend(BackendError::Unauthorized)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Unauthorized("no session".to_string())),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn forbidden_maps_to_403() {
        assert_eq!(
            get_status(AppError::Backend(BackendError::Forbidden)),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn not_found_maps_to_404() {
        assert_eq!(
            get_status(AppError::Backend(BackendError::NotFound(
                "order 7".to_string()
            ))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::NotFound("page".to_string())),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn backend_rejection_maps_to_400_with_reason() {
        let response =
            AppError::Backend(BackendError::Rejected("Insufficient stock".to_string()))
                .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn validation_failure_maps_to_400() {
        assert_eq!(
            get_status(AppError::BadRequest("Name is required".to_string())),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn upstream_faults_map_to_502() {
        assert_eq!(
            get_status(AppError::Backend(BackendError::Upstream(
                StatusCode::SERVICE_UNAVAILABLE
            ))),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn internal_maps_to_500() {
        assert_eq!(
            get_status(AppError::Internal("boom".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
