//! Client error types

use thiserror::Error;

/// Errors surfaced by the dashboard client
#[derive(Error, Debug)]
pub enum ClientError {
    /// Transport failure: connection refused, reset, bad URL
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// 401 from the backend; the session is no longer usable
    #[error("Unauthorized: {detail}")]
    Unauthorized { detail: String },

    /// Any other non-success response
    #[error("API error {status}: {detail}")]
    Api { status: u16, detail: String },

    /// A success response whose body did not match the expected shape
    #[error("Invalid response body: {0}")]
    Decode(String),

    /// The persisted session could not be read or written
    #[error("Session storage error: {0}")]
    Session(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Unauthorized { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Api { status: 404, .. })
    }

    /// Backend-provided message, when the server sent one
    pub fn detail(&self) -> Option<&str> {
        match self {
            ClientError::Unauthorized { detail } | ClientError::Api { detail, .. }
                if !detail.is_empty() =>
            {
                Some(detail.as_str())
            }
            _ => None,
        }
    }

    /// Text for a blocking notice: the backend's `detail`, else `fallback`
    pub fn user_message(&self, fallback: &str) -> String {
        self.detail().unwrap_or(fallback).to_string()
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
