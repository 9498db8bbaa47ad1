//! Error mapping helpers for the HTTP gateway implementations.

use http::StatusCode;

use crate::erp::error::ApprovalError;

/// Checks if a backend status indicates an authentication failure.
pub(super) const fn is_auth_failure(status: StatusCode) -> bool {
    matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
}

/// Extracts the backend's human-readable `message` from a JSON error body.
pub(super) fn extract_backend_message(body: &str) -> Option<String> {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return None;
    };
    value
        .get("message")
        .and_then(serde_json::Value::as_str)
        .map(ToOwned::to_owned)
}

/// Maps a reqwest transport error onto the approval error taxonomy.
pub(super) fn map_transport_error(operation: &str, error: &reqwest::Error) -> ApprovalError {
    if error.is_connect() || error.is_timeout() || error.is_request() {
        return ApprovalError::Network {
            message: format!("{operation} failed: {error}"),
        };
    }

    ApprovalError::Api {
        message: format!("{operation} failed: {error}"),
    }
}

/// Maps a non-success HTTP status onto the approval error taxonomy.
pub(super) fn map_http_error(
    operation: &str,
    status: StatusCode,
    maybe_message: Option<String>,
) -> ApprovalError {
    let message = maybe_message.unwrap_or_else(|| "unknown error".to_owned());
    if is_auth_failure(status) {
        ApprovalError::Authentication {
            message: format!("{operation} failed: the backend returned {status} {message}"),
        }
    } else {
        ApprovalError::Api {
            message: format!("{operation} failed with status {status}: {message}"),
        }
    }
}

/// Resolves a response into either itself or a mapped error.
///
/// Non-success responses are drained for their body so the backend's own
/// message text can be surfaced to the user.
pub(super) async fn ensure_success(
    operation: &str,
    response: reqwest::Response,
) -> Result<reqwest::Response, ApprovalError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = extract_backend_message(&body).or({
        if body.trim().is_empty() {
            None
        } else {
            Some(body)
        }
    });
    Err(map_http_error(operation, status, message))
}
