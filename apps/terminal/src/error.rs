//! # Application Error Type
//!
//! The single error the prompt loop reports to the operator.
//!
//! ## Error Handling Strategy
//! Every layer keeps its own typed error (`CoreError`, `DbError`,
//! `CloudError`); this enum is the boundary where they converge. Policy is
//! the same everywhere: show the message, abort the current operation,
//! leave the session as it was. Nothing here retries.

use thiserror::Error;
use vend_cloud::CloudError;
use vend_core::{CoreError, ValidationError};
use vend_db::DbError;

/// Application-level error shown at the prompt.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Db(#[from] DbError),

    #[error(transparent)]
    Cloud(#[from] CloudError),

    /// An operation needed a logged-in user.
    #[error("Not logged in")]
    NotLoggedIn,

    /// Cloud features were requested but no API URL is configured.
    #[error("No cloud API configured")]
    CloudNotConfigured,

    /// Startup configuration problem.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed prompt input.
    #[error("{0}")]
    BadInput(String),
}

/// Result type for application operations.
pub type AppResult<T> = Result<T, AppError>;
