//! Error types for IssueKit
//!
//! Only hard failures live here: a bad URL, a failed fetch, or a failed
//! completion call. Extraction and response parsing never fail; missing
//! fields degrade to empty values instead.

use thiserror::Error;

/// Errors that terminate an invocation
#[derive(Debug, Error)]
pub enum IssueError {
    /// URL is missing
    #[error("Missing required parameter: url")]
    MissingUrl,

    /// URL has invalid scheme
    #[error("Invalid URL: must start with http:// or https://")]
    InvalidUrlScheme,

    /// URL does not point at an issue page on an accepted host
    #[error("Invalid issue URL: {0}")]
    InvalidIssueUrl(String),

    /// Failed to build HTTP client
    #[error("Failed to create HTTP client")]
    ClientBuildError(#[source] reqwest::Error),

    /// Request did not complete within the configured timeout
    #[error("Failed to fetch issue page: request timed out")]
    Timeout,

    /// Failed to connect to server
    #[error("Failed to fetch issue page: could not connect to server")]
    ConnectError(#[source] reqwest::Error),

    /// Server answered with a non-success status
    #[error("Failed to fetch issue page: HTTP {0}")]
    HttpStatus(u16),

    /// Other request error
    #[error("Failed to fetch issue page: {0}")]
    RequestError(String),

    /// Analysis was requested but no completion provider is configured
    #[error("No completion provider configured")]
    NoCompletionProvider,

    /// The completion provider reported a failure
    #[error("Completion provider '{provider}' failed: {message}")]
    CompletionFailed {
        provider: &'static str,
        message: String,
    },

    /// The completion provider returned blank text
    #[error("Completion provider '{0}' returned an empty response")]
    EmptyCompletion(&'static str),
}

impl IssueError {
    /// Create an error from a reqwest error
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            IssueError::Timeout
        } else if err.is_connect() {
            IssueError::ConnectError(err)
        } else if let Some(status) = err.status() {
            IssueError::HttpStatus(status.as_u16())
        } else {
            IssueError::RequestError(err.to_string())
        }
    }

    /// True for failures raised at the network boundary
    pub fn is_fetch_error(&self) -> bool {
        matches!(
            self,
            IssueError::ClientBuildError(_)
                | IssueError::Timeout
                | IssueError::ConnectError(_)
                | IssueError::HttpStatus(_)
                | IssueError::RequestError(_)
        )
    }
}
