use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Every transport failure collapses into one of these, each carrying a
/// message fit for display next to the login form.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The server answered with a non-success status. The message is taken
    /// from the response body when the server provided one.
    #[error("{message}")]
    Status { status: StatusCode, message: String },

    /// The request never produced a response (DNS, connect, timeout).
    #[error("Network request failed")]
    Network(#[source] reqwest::Error),

    /// The server answered 2xx but the body did not match the expected shape.
    #[error("Invalid response from server")]
    InvalidResponse(#[source] serde_json::Error),
}

/// Error payload shape the auth service uses. Some endpoints populate
/// `error`, older ones `message`; `error` wins when both are present.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

impl ApiError {
    /// Build a `Status` error from a non-success response body, preferring
    /// the server-supplied message over a generic status-coded one.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.error.or(b.message))
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()));
        ApiError::Status { status, message }
    }

    /// True when the server explicitly rejected the request (as opposed to
    /// the request never reaching it).
    pub fn is_rejection(&self) -> bool {
        matches!(self, ApiError::Status { .. })
    }
}
