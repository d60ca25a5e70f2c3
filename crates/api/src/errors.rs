use thiserror::Error;

use crate::decode::FieldIssue;

/// Errors raised at the REST boundary.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure (connect, timeout, TLS, ...).
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("api returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The body is not JSON of the expected overall shape.
    #[error("malformed json payload: {0}")]
    Json(#[from] serde_json::Error),

    /// Strict decoding found malformed fields.
    #[error("payload rejected: {}", join_issues(.issues))]
    InvalidPayload { issues: Vec<FieldIssue> },
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

fn join_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
