//! Typed errors for research backend calls
//!
//! Every failure mode of the ask, upload and documents endpoints ends up in
//! one of these variants so the UI can recover locally and the logs keep the
//! detail.

use std::path::PathBuf;

use thiserror::Error;

/// Backend call errors with typed variants
#[derive(Debug, Error)]
pub enum BackendError {
    /// Connection refused, DNS failure, timeout and similar transport issues
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered with a non-success status code
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The body was not the JSON shape we expect
    #[error("Invalid response body: {0}")]
    Decode(String),

    /// A local file could not be read before uploading it
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An endpoint URL could not be built
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl BackendError {
    /// Convert an HTTP status code and response text into a typed error
    pub fn from_http_status(status: reqwest::StatusCode, body: String) -> Self {
        BackendError::Status {
            status: status.as_u16(),
            body,
        }
    }

    /// Convert a reqwest error into a typed error
    pub fn from_network_error(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            BackendError::Network(format!("Request timeout: {}", e))
        } else if e.is_connect() {
            BackendError::Network(format!("Connection failed: {}", e))
        } else if e.is_decode() {
            BackendError::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            Self::from_http_status(status, e.to_string())
        } else {
            BackendError::Network(e.to_string())
        }
    }

    /// True when the request never produced an HTTP response
    pub fn is_transport(&self) -> bool {
        matches!(self, BackendError::Network(_))
    }
}
