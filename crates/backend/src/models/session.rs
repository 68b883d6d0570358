//! Session artifacts handed back on login and registration.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::User;

/// Opaque session marker. It carries no claims and is not verified anywhere;
/// the UI only stores it to know someone is signed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    /// Mint a fresh random token.
    #[must_use]
    pub fn generate() -> Self {
        Self(format!("sess_{}", Uuid::new_v4().simple()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Result of a successful login or registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginSuccess {
    /// The signed-in account, without its secret.
    pub user: User,
    pub token: SessionToken,
}
