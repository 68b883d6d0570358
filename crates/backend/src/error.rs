//! Unified error handling with Sentry integration.
//!
//! Every public operation of [`crate::state::AppState`] returns
//! `Result<T, AppError>`. Callers branch on [`AppError::kind`]; internal
//! failures are logged and captured to Sentry before they are returned.

use std::time::Duration;

use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::{AuthError, CatalogError, OrderError, RecoveryError};

/// Application-level error type for the backend.
#[derive(Debug, Error)]
pub enum AppError {
    /// Store operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Registration, login or password change failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Password recovery failed.
    #[error("Recovery error: {0}")]
    Recovery(#[from] RecoveryError),

    /// Order operation failed.
    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    /// Catalog operation failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

/// What went wrong, as far as a caller needs to know.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    InvalidCredential,
    Throttled,
    InvalidOrExpiredToken,
    MissingChannel,
    InvalidInput,
    Internal,
}

const fn repository_kind(err: &RepositoryError) -> ErrorKind {
    match err {
        RepositoryError::NotFound => ErrorKind::NotFound,
        RepositoryError::Conflict(_) => ErrorKind::Conflict,
        RepositoryError::DataCorruption(_) => ErrorKind::Internal,
    }
}

impl AppError {
    /// Classify the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Database(e)
            | Self::Auth(AuthError::Repository(e))
            | Self::Recovery(RecoveryError::Repository(e))
            | Self::Order(OrderError::Repository(e))
            | Self::Catalog(CatalogError::Repository(e)) => repository_kind(e),

            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => ErrorKind::InvalidCredential,
                AuthError::Throttled { .. } => ErrorKind::Throttled,
                AuthError::UserAlreadyExists => ErrorKind::Conflict,
                AuthError::InvalidEmail(_) | AuthError::Validation(_) => ErrorKind::InvalidInput,
                AuthError::Repository(_) | AuthError::PasswordHash => ErrorKind::Internal,
            },
            Self::Recovery(err) => match err {
                RecoveryError::UserNotFound | RecoveryError::OwnerMissing => ErrorKind::NotFound,
                RecoveryError::MissingPhone => ErrorKind::MissingChannel,
                RecoveryError::InvalidOrExpiredCode => ErrorKind::InvalidOrExpiredToken,
                RecoveryError::Validation(_) => ErrorKind::InvalidInput,
                RecoveryError::Repository(_) | RecoveryError::PasswordHash => ErrorKind::Internal,
            },
            Self::Order(err) => match err {
                OrderError::NotFound(_) => ErrorKind::NotFound,
                OrderError::Empty
                | OrderError::ZeroQuantity(_)
                | OrderError::NegativePrice(_)
                | OrderError::TotalOverflow => ErrorKind::InvalidInput,
                OrderError::Repository(_) => ErrorKind::Internal,
            },
            Self::Catalog(err) => match err {
                CatalogError::NotFound(_) => ErrorKind::NotFound,
                CatalogError::InvalidProduct(_) => ErrorKind::InvalidInput,
                CatalogError::Repository(_) => ErrorKind::Internal,
            },
        }
    }

    /// Remaining lockout for a throttled login.
    #[must_use]
    pub const fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::Auth(AuthError::Throttled { retry_after }) => Some(*retry_after),
            _ => None,
        }
    }

    /// Log the error; internal failures also go to Sentry.
    pub fn report(&self, operation: &'static str) {
        match self.kind() {
            ErrorKind::Internal => {
                let event_id = sentry::capture_error(self);
                tracing::error!(
                    operation,
                    error = %self,
                    sentry_event_id = %event_id,
                    "Operation failed"
                );
            }
            ErrorKind::Throttled | ErrorKind::InvalidCredential => {
                tracing::warn!(operation, error = %self, "Operation rejected");
            }
            _ => tracing::debug!(operation, error = %self, "Operation rejected"),
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, username: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            username: username.map(String::from),
            ..Default::default()
        }));
    });
}

/// Add a breadcrumb for a state change.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of actions
/// leading up to an error.
pub fn add_breadcrumb(category: &str, message: &str, data: &[(&str, &str)]) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    for (key, value) in data {
        breadcrumb.data.insert(
            (*key).to_string(),
            serde_json::Value::String((*value).to_string()),
        );
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use vitrine_core::{EmailError, OrderId};

    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::from(OrderError::NotFound(OrderId::new("ord_1")));
        assert_eq!(err.to_string(), "Order error: order not found: ord_1");
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            AppError::from(AuthError::InvalidCredentials).kind(),
            ErrorKind::InvalidCredential
        );
        assert_eq!(
            AppError::from(AuthError::UserAlreadyExists).kind(),
            ErrorKind::Conflict
        );
        assert_eq!(
            AppError::from(AuthError::InvalidEmail(EmailError::Empty)).kind(),
            ErrorKind::InvalidInput
        );
        assert_eq!(
            AppError::from(RecoveryError::MissingPhone).kind(),
            ErrorKind::MissingChannel
        );
        assert_eq!(
            AppError::from(RecoveryError::InvalidOrExpiredCode).kind(),
            ErrorKind::InvalidOrExpiredToken
        );
        assert_eq!(
            AppError::from(RecoveryError::OwnerMissing).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(AppError::from(OrderError::Empty).kind(), ErrorKind::InvalidInput);
        assert_eq!(
            AppError::from(RepositoryError::DataCorruption("x".to_owned())).kind(),
            ErrorKind::Internal
        );
        assert_eq!(
            AppError::from(CatalogError::Repository(RepositoryError::NotFound)).kind(),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn test_retry_after() {
        let err = AppError::from(AuthError::Throttled {
            retry_after: Duration::from_secs(42),
        });
        assert_eq!(err.kind(), ErrorKind::Throttled);
        assert_eq!(err.retry_after(), Some(Duration::from_secs(42)));
        assert_eq!(AppError::from(OrderError::Empty).retry_after(), None);
    }

    #[test]
    fn test_report_without_sentry_client() {
        AppError::from(RepositoryError::DataCorruption("bad row".to_owned())).report("test");
    }
}
