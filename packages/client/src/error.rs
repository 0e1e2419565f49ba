//! Failures surfaced by the API client.

use thiserror::Error;

/// The only error kind the API client produces.
///
/// It is `Clone` so cached query state can keep the last failure around.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    #[error("request to {url} failed: {message}")]
    Unreachable { url: String, message: String },
    #[error("{url} responded with HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("invalid response from {url}: {message}")]
    Decode { url: String, message: String },
    #[error("not found: {url}")]
    NotFound { url: String },
}

impl NetworkError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, NetworkError::NotFound { .. })
    }

    pub fn url(&self) -> &str {
        match self {
            NetworkError::Unreachable { url, .. }
            | NetworkError::Status { url, .. }
            | NetworkError::Decode { url, .. }
            | NetworkError::NotFound { url } => url,
        }
    }
}
