//! Error mapping helpers for the reqwest GitHub gateway implementation.

use http::StatusCode;

use crate::github::error::GatewayError;

/// Maps a transport-level reqwest failure (timeout, connection error) to a
/// [`GatewayError::Network`].
pub(super) fn map_transport_error(operation: &str, error: &reqwest::Error) -> GatewayError {
    GatewayError::Network {
        message: format!("{operation} failed: {error}"),
    }
}

/// Maps a non-success upstream status to a [`GatewayError::UpstreamStatus`],
/// pulling GitHub's `message` field out of the body when one is present.
pub(super) fn map_status_error(
    operation: &'static str,
    status: StatusCode,
    body: &str,
) -> GatewayError {
    GatewayError::UpstreamStatus {
        operation,
        status: status.as_u16(),
        message: extract_github_message(body).unwrap_or_else(|| "unknown error".to_owned()),
    }
}

/// Maps a body deserialisation failure to a [`GatewayError::Decode`].
pub(super) fn map_decode_error(operation: &str, error: &reqwest::Error) -> GatewayError {
    GatewayError::Decode {
        message: format!("{operation} response: {error}"),
    }
}

fn extract_github_message(body: &str) -> Option<String> {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return None;
    };
    value
        .get("message")
        .and_then(serde_json::Value::as_str)
        .map(ToOwned::to_owned)
}
