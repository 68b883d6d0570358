//! User domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vitrine_core::{Email, UserId, UserRole};

/// A storefront account as seen by callers (no secret).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Unique login name.
    pub username: String,
    /// Unique email address (also accepted as login).
    pub email: Email,
    /// Display name.
    pub name: String,
    /// Phone/WhatsApp number, if the user gave one.
    pub phone: Option<String>,
    /// Permission level.
    pub role: UserRole,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Whether this account may use the admin panel.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Case-insensitive match on username or email, as used by recovery.
    #[must_use]
    pub fn matches_identifier_ignore_case(&self, identifier: &str) -> bool {
        self.username.eq_ignore_ascii_case(identifier.trim())
            || self.email.matches_ignore_case(identifier)
    }

    /// Exact match on username or email, as used by login.
    #[must_use]
    pub fn matches_login(&self, login: &str) -> bool {
        self.username == login || self.email.as_str() == login
    }
}

/// Sign-up form as submitted by a visitor. The password travels separately.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    /// Unparsed; validated at registration.
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Fields needed to create an account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: Email,
    pub name: String,
    pub phone: Option<String>,
    pub role: UserRole,
}
