//! Authentication error types.

use std::time::Duration;

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] vitrine_core::EmailError),

    /// Invalid credentials (wrong password or user not found).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Too many failed logins for this identifier.
    #[error("too many failed attempts, retry in {}s", retry_after.as_secs())]
    Throttled {
        /// Time left until the identifier may try again.
        retry_after: Duration,
    },

    /// Username or email already registered.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Password or other registration field rejected.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Repository error.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}
