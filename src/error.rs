//! Client-side error model. The session/authorization core never lets these
//! escape into a consumer path; they are translated into data values
//! (`None` identity, default config, a `Failed` callback state) at the seam.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure: connection refused, DNS, timeout, TLS.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Backend answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Body arrived but did not match the expected shape.
    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The configured base URL (or a path joined onto it) is unusable.
    #[error("invalid url: {0}")]
    BadUrl(String),
}

impl ApiError {
    /// True for a definitive 401 from the backend, as opposed to a transport
    /// or decode failure. Consumers use this to tell "credential rejected"
    /// apart from "could not ask".
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Status { status: 401, .. })
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
