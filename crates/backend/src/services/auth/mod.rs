//! Authentication service.
//!
//! Provides registration, throttled password login and password change.

mod error;
pub(crate) mod password;
mod throttle;

pub use error::AuthError;
pub use throttle::LoginThrottle;

use vitrine_core::{Email, UserId, UserRole};

use crate::clock::Clock;
use crate::config::PasswordHashing;
use crate::db::{RepositoryError, UserRepository};
use crate::models::session::{LoginSuccess, SessionToken};
use crate::models::user::{NewUser, RegisterRequest};

use password::{hash_password, validate_password, verify_password};

/// Authentication service.
///
/// Borrowed from the application state for the duration of one operation.
pub struct AuthService<'a> {
    users: &'a dyn UserRepository,
    throttle: &'a LoginThrottle,
    clock: &'a dyn Clock,
    hashing: PasswordHashing,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub fn new(
        users: &'a dyn UserRepository,
        throttle: &'a LoginThrottle,
        clock: &'a dyn Clock,
        hashing: PasswordHashing,
    ) -> Self {
        Self {
            users,
            throttle,
            clock,
            hashing,
        }
    }

    /// Register a new customer account and sign it in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::Validation` if the username or password is empty.
    /// Returns `AuthError::UserAlreadyExists` if the username or email is taken.
    pub async fn register(
        &self,
        request: RegisterRequest,
        password: &str,
    ) -> Result<LoginSuccess, AuthError> {
        let email = Email::parse(&request.email)?;

        let username = request.username.trim();
        if username.is_empty() {
            return Err(AuthError::Validation("username cannot be empty".to_owned()));
        }

        validate_password(password)?;
        let password_hash = hash_password(password, self.hashing)?;

        let new_user = NewUser {
            username: username.to_owned(),
            email,
            name: request.name.trim().to_owned(),
            phone: request
                .phone
                .map(|phone| phone.trim().to_owned())
                .filter(|phone| !phone.is_empty()),
            role: UserRole::User,
        };

        let user = self
            .users
            .create(new_user, password_hash, self.clock.now())
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        tracing::info!(user_id = %user.id, username = %user.username, "Account registered");

        Ok(LoginSuccess {
            user,
            token: SessionToken::generate(),
        })
    }

    /// Login with username or email and password.
    ///
    /// The identifier must match exactly (case-sensitive).
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Throttled` while the identifier is locked out,
    /// without checking the password.
    /// Returns `AuthError::InvalidCredentials` if the identifier or password is wrong.
    pub async fn login(&self, identifier: &str, password: &str) -> Result<LoginSuccess, AuthError> {
        let now = self.clock.now();

        if let Err(retry_after) = self.throttle.check(identifier, now) {
            tracing::warn!(identifier, ?retry_after, "Login refused, identifier locked");
            return Err(AuthError::Throttled { retry_after });
        }

        let candidates = self.users.find_by_login_with_hash(identifier).await?;
        let verified = candidates
            .into_iter()
            .find(|(_, hash)| verify_password(password, hash).is_ok());
        let user = match verified {
            Some((user, _)) => user,
            None => {
                let failures = self.throttle.record_failure(identifier, now);
                tracing::debug!(identifier, failures, "Login failed");
                return Err(AuthError::InvalidCredentials);
            }
        };

        self.throttle.clear(identifier);

        Ok(LoginSuccess {
            user,
            token: SessionToken::generate(),
        })
    }

    /// Change a signed-in user's password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the user is unknown or the
    /// current password does not match.
    /// Returns `AuthError::Validation` if the new password is empty.
    pub async fn change_password(
        &self,
        user_id: UserId,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let (_, hash) = self
            .users
            .get_password_hash(user_id)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(current_password, &hash)?;
        validate_password(new_password)?;

        let new_hash = hash_password(new_password, self.hashing)?;
        self.users.update_password_hash(user_id, new_hash).await?;

        tracing::info!(%user_id, "Password changed");
        Ok(())
    }
}
