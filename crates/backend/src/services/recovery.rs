//! Password recovery.
//!
//! A user asks for a code on one of their contacts, then redeems it together
//! with a new password. Issuing a code discards every earlier code of that
//! user, so at most one code per user can be active.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use rand::Rng;
use thiserror::Error;
use uuid::Uuid;

use vitrine_core::{Channel, ResetTokenId};

use crate::clock::Clock;
use crate::config::PasswordHashing;
use crate::db::{PasswordResetRepository, RepositoryError, UserRepository};
use crate::models::password_reset::PasswordResetToken;
use crate::models::user::User;
use crate::services::auth::{AuthError, password};

/// Errors that can occur during password recovery.
#[derive(Debug, Error)]
pub enum RecoveryError {
    /// No account matches the identifier.
    #[error("no account matches this username or email")]
    UserNotFound,

    /// The chosen channel is phone but the account has none.
    #[error("account has no phone number registered")]
    MissingPhone,

    /// The code is unknown, already used or expired.
    #[error("invalid or expired recovery code")]
    InvalidOrExpiredCode,

    /// The code is valid but its owner no longer exists.
    #[error("associated user missing")]
    OwnerMissing,

    /// The new password was rejected.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Repository error.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}

impl From<AuthError> for RecoveryError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Validation(msg) => Self::Validation(msg),
            AuthError::Repository(e) => Self::Repository(e),
            _ => Self::PasswordHash,
        }
    }
}

/// A freshly issued code, ready to be delivered.
#[derive(Debug, Clone)]
pub struct IssuedCode {
    pub user: User,
    pub channel: Channel,
    pub code: String,
}

/// Password recovery service.
pub struct RecoveryService<'a> {
    users: &'a dyn UserRepository,
    resets: &'a dyn PasswordResetRepository,
    clock: &'a dyn Clock,
    hashing: PasswordHashing,
    ttl: Duration,
}

impl<'a> RecoveryService<'a> {
    /// Create a recovery service issuing codes valid for `ttl`.
    #[must_use]
    pub fn new(
        users: &'a dyn UserRepository,
        resets: &'a dyn PasswordResetRepository,
        clock: &'a dyn Clock,
        hashing: PasswordHashing,
        ttl: Duration,
    ) -> Self {
        Self {
            users,
            resets,
            clock,
            hashing,
            ttl,
        }
    }

    /// Issue a new recovery code for the account matching `identifier`.
    ///
    /// The identifier is matched case-insensitively against username and
    /// email. Delivery is left to the caller.
    ///
    /// # Errors
    ///
    /// Returns `RecoveryError::UserNotFound` if no account matches.
    /// Returns `RecoveryError::MissingPhone` if `channel` is phone and the
    /// account has no phone; no code is issued in that case.
    pub async fn request(
        &self,
        identifier: &str,
        channel: Channel,
    ) -> Result<IssuedCode, RecoveryError> {
        let user = self
            .users
            .find_by_identifier_ignore_case(identifier)
            .await?
            .ok_or(RecoveryError::UserNotFound)?;

        if channel == Channel::Phone && user.phone.is_none() {
            return Err(RecoveryError::MissingPhone);
        }

        let discarded = self.resets.delete_for_user(user.id).await?;

        let now = self.clock.now();
        let ttl = TimeDelta::from_std(self.ttl).unwrap_or(TimeDelta::MAX);
        let expires_at = now
            .checked_add_signed(ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        let code = generate_code();
        self.resets
            .insert(PasswordResetToken {
                id: ResetTokenId::new(format!("reset_{}", Uuid::new_v4().simple())),
                user_id: user.id,
                code: code.clone(),
                created_at: now,
                expires_at,
                used: false,
            })
            .await?;

        tracing::info!(user_id = %user.id, %channel, discarded, "Recovery code issued");

        Ok(IssuedCode {
            user,
            channel,
            code,
        })
    }

    /// Redeem a code and set a new password for its owner.
    ///
    /// The code is looked up on its own, not scoped to a user.
    ///
    /// # Errors
    ///
    /// Returns `RecoveryError::InvalidOrExpiredCode` unless an unused,
    /// unexpired token carries this code.
    /// Returns `RecoveryError::OwnerMissing` if the token's user is gone.
    pub async fn redeem(&self, code: &str, new_password: &str) -> Result<User, RecoveryError> {
        let now = self.clock.now();
        let token = self
            .resets
            .find_active_by_code(code.trim(), now)
            .await?
            .ok_or(RecoveryError::InvalidOrExpiredCode)?;

        password::validate_password(new_password)?;

        let user = self
            .users
            .get_by_id(token.user_id)
            .await?
            .ok_or(RecoveryError::OwnerMissing)?;

        let hash = password::hash_password(new_password, self.hashing)?;
        self.users
            .update_password_hash(user.id, hash)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => RecoveryError::OwnerMissing,
                other => RecoveryError::Repository(other),
            })?;
        self.resets.mark_used(&token.id).await?;

        tracing::info!(user_id = %user.id, "Password reset with recovery code");
        Ok(user)
    }

    /// Drop used and expired tokens. Returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns `RecoveryError::Repository` if the store fails.
    pub async fn purge_expired(&self) -> Result<usize, RecoveryError> {
        let removed = self.resets.purge_inactive(self.clock.now()).await?;
        tracing::debug!(removed, "Purged inactive recovery tokens");
        Ok(removed)
    }
}

/// Uniformly random six-digit code, zero-padded.
fn generate_code() -> String {
    let code: u32 = rand::rng().random_range(0..1_000_000);
    format!("{code:06}")
}
