//! Password recovery token.

use chrono::{DateTime, Utc};

use vitrine_core::{ResetTokenId, UserId};

/// A six-digit recovery code issued to one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordResetToken {
    pub id: ResetTokenId,
    pub user_id: UserId,
    /// Zero-padded six-digit numeric code.
    pub code: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub used: bool,
}

impl PasswordResetToken {
    /// Unused and not yet expired at `now`.
    #[must_use]
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        !self.used && self.expires_at > now
    }
}
