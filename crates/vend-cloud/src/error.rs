//! # Cloud Error Types
//!
//! Error types for catalog and authentication requests.

use thiserror::Error;

/// Errors from the cloud catalog and auth endpoints.
#[derive(Debug, Error)]
pub enum CloudError {
    /// Transport-level failure: DNS, connect, TLS, timeout.
    #[error("Connection to server failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server rejected our credential (HTTP 401/403).
    ///
    /// The operator has to log in again; the stale token is useless.
    #[error("Authorization failed, please log in again")]
    Unauthorized,

    /// Any other non-success HTTP status.
    #[error("API error: HTTP {0}")]
    Status(u16),

    /// The response body was not the JSON we expected.
    #[error("Could not read server response: {0}")]
    Decode(#[from] serde_json::Error),

    /// A redirect response carried no usable Location target.
    #[error("Server redirect without a target")]
    BadRedirect,

    /// The server kept redirecting past our follow limit.
    #[error("Too many redirects")]
    RedirectLoop,

    /// Base URL or joined endpoint failed to parse.
    #[error("Invalid API URL: {0}")]
    Url(#[from] url::ParseError),

    /// Reading or writing the local credential file failed.
    #[error("Credential store error: {0}")]
    CredentialStore(#[from] std::io::Error),
}

/// Result type for cloud operations.
pub type CloudResult<T> = Result<T, CloudError>;
