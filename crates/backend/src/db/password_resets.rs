//! Password recovery token repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use vitrine_core::{ResetTokenId, UserId};

use super::RepositoryError;
use crate::models::password_reset::PasswordResetToken;

/// Storage for recovery codes.
#[async_trait]
pub trait PasswordResetRepository: Send + Sync {
    /// Store a freshly issued token.
    async fn insert(&self, token: PasswordResetToken) -> Result<(), RepositoryError>;

    /// Drop every token belonging to `user_id`. Returns how many were removed.
    async fn delete_for_user(&self, user_id: UserId) -> Result<usize, RepositoryError>;

    /// Find an unused, unexpired token by code alone (not scoped per user).
    async fn find_active_by_code(
        &self,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<PasswordResetToken>, RepositoryError>;

    /// Mark a token as redeemed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the token does not exist.
    async fn mark_used(&self, id: &ResetTokenId) -> Result<(), RepositoryError>;

    /// Drop used and expired tokens. Returns how many were removed.
    async fn purge_inactive(&self, now: DateTime<Utc>) -> Result<usize, RepositoryError>;

    /// Tokens belonging to one user, active or not.
    async fn list_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<PasswordResetToken>, RepositoryError>;
}

/// In-memory token store.
#[derive(Debug, Default)]
pub struct MemoryPasswordResetRepository {
    rows: RwLock<Vec<PasswordResetToken>>,
}

impl MemoryPasswordResetRepository {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PasswordResetRepository for MemoryPasswordResetRepository {
    async fn insert(&self, token: PasswordResetToken) -> Result<(), RepositoryError> {
        self.rows.write().await.push(token);
        Ok(())
    }

    async fn delete_for_user(&self, user_id: UserId) -> Result<usize, RepositoryError> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|t| t.user_id != user_id);
        Ok(before - rows.len())
    }

    async fn find_active_by_code(
        &self,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<PasswordResetToken>, RepositoryError> {
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .find(|t| t.code == code && t.is_active(now))
            .cloned())
    }

    async fn mark_used(&self, id: &ResetTokenId) -> Result<(), RepositoryError> {
        let mut rows = self.rows.write().await;
        let token = rows
            .iter_mut()
            .find(|t| &t.id == id)
            .ok_or(RepositoryError::NotFound)?;
        token.used = true;
        Ok(())
    }

    async fn purge_inactive(&self, now: DateTime<Utc>) -> Result<usize, RepositoryError> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|t| t.is_active(now));
        Ok(before - rows.len())
    }

    async fn list_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<PasswordResetToken>, RepositoryError> {
        let rows = self.rows.read().await;
        Ok(rows.iter().filter(|t| t.user_id == user_id).cloned().collect())
    }
}
