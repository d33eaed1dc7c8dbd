//! Backend client error types

use std::fmt;

/// Errors that can occur talking to the school backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// HTTP client could not be constructed
    Build(String),
    /// Transport failure (connection refused, TLS, timeout)
    Network(String),
    /// Backend answered with a non-2xx status
    Status { status: u16, body: String },
    /// Response body did not match the expected shape
    Decode(String),
}

impl ApiError {
    /// Whether the backend answered 404
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Build(msg) => write!(f, "Failed to create HTTP client: {}", msg),
            Self::Network(msg) => write!(f, "Network error: {}", msg),
            Self::Status { status, body } => {
                if body.is_empty() {
                    write!(f, "HTTP error {}", status)
                } else {
                    write!(f, "HTTP error {}: {}", status, body)
                }
            }
            Self::Decode(msg) => write!(f, "Unexpected response body: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::Network(e.to_string())
        }
    }
}
