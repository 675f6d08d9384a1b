//! Error types for the backend API client.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when calling the backend API.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP transport failed (connect errors, timeouts, broken streams).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The caller identity was missing or rejected by the backend.
    #[error("Not authorized, please log in again")]
    Unauthorized,

    /// The caller lacks permission for the operation.
    #[error("Permission denied")]
    Forbidden,

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The backend rejected the request and provided a reason.
    #[error("{0}")]
    Rejected(String),

    /// The backend failed server-side.
    #[error("Backend error: HTTP {0}")]
    Upstream(StatusCode),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Error body shape used by the backend for non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

impl BackendError {
    /// Map a non-success response to an error, pulling the backend's
    /// `{"error": ...}` message out of the body when one is present.
    #[must_use]
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .map(|parsed| parsed.error);

        match status {
            StatusCode::UNAUTHORIZED => Self::Unauthorized,
            StatusCode::FORBIDDEN => Self::Forbidden,
            StatusCode::NOT_FOUND => {
                Self::NotFound(message.unwrap_or_else(|| "resource".to_string()))
            }
            status if status.is_client_error() => {
                Self::Rejected(message.unwrap_or_else(|| format!("Request failed (HTTP {status})")))
            }
            status => Self::Upstream(status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_display() {
        let err = BackendError::NotFound("product 7".to_string());
        assert_eq!(err.to_string(), "Not found: product 7");

        let err = BackendError::Rejected("Insufficient stock".to_string());
        assert_eq!(err.to_string(), "Insufficient stock");
    }

    #[test]
    fn test_from_status_maps_auth_statuses() {
        let err = BackendError::from_status(StatusCode::UNAUTHORIZED, "");
        assert!(matches!(err, BackendError::Unauthorized));

        let err = BackendError::from_status(StatusCode::FORBIDDEN, r#"{"error":"nope"}"#);
        assert!(matches!(err, BackendError::Forbidden));
    }

    #[test]
    fn test_from_status_extracts_backend_message() {
        let err = BackendError::from_status(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"error":"Cart is empty"}"#,
        );
        match err {
            BackendError::Rejected(message) => assert_eq!(message, "Cart is empty"),
            other => panic!("expected Rejected, got {other:?}"),
        }
    }

    #[test]
    fn test_from_status_falls_back_on_unparseable_body() {
        let err = BackendError::from_status(StatusCode::BAD_REQUEST, "<html>oops</html>");
        match err {
            BackendError::Rejected(message) => {
                assert!(message.contains("400"), "unexpected message: {message}");
            }
            other => panic!("expected Rejected, got {other:?}"),
        }
    }

    #[test]
    fn test_from_status_maps_server_errors_to_upstream() {
        let err = BackendError::from_status(StatusCode::INTERNAL_SERVER_ERROR, "");
        assert!(matches!(
            err,
            BackendError::Upstream(StatusCode::INTERNAL_SERVER_ERROR)
        ));

        let err = BackendError::from_status(StatusCode::BAD_GATEWAY, "");
        assert!(matches!(err, BackendError::Upstream(StatusCode::BAD_GATEWAY)));
    }

    #[test]
    fn test_from_status_maps_not_found_with_message() {
        let err = BackendError::from_status(StatusCode::NOT_FOUND, r#"{"error":"Order 42"}"#);
        assert_eq!(err.to_string(), "Not found: Order 42");
    }
}
