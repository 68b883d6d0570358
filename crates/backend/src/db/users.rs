//! User repository.
//!
//! Password hashes never leave this module except through
//! [`UserRepository::get_password_hash`] and
//! [`UserRepository::find_by_login_with_hash`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use vitrine_core::UserId;

use super::RepositoryError;
use crate::models::user::{NewUser, User};

/// Storage for accounts.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Get a user by ID.
    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError>;

    /// Every account whose username or email matches `login` exactly
    /// (case-sensitive), each with its stored password hash, oldest first.
    ///
    /// One account's username may equal another account's email, so more
    /// than one row can match.
    async fn find_by_login_with_hash(
        &self,
        login: &str,
    ) -> Result<Vec<(User, String)>, RepositoryError>;

    /// Case-insensitive match of `identifier` against username or email.
    async fn find_by_identifier_ignore_case(
        &self,
        identifier: &str,
    ) -> Result<Option<User>, RepositoryError>;

    /// Get a user together with the stored password hash.
    async fn get_password_hash(&self, id: UserId)
    -> Result<Option<(User, String)>, RepositoryError>;

    /// Create a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the username or email is taken
    /// (compared case-insensitively).
    async fn create(
        &self,
        new_user: NewUser,
        password_hash: String,
        created_at: DateTime<Utc>,
    ) -> Result<User, RepositoryError>;

    /// Replace a user's password hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    async fn update_password_hash(
        &self,
        id: UserId,
        password_hash: String,
    ) -> Result<(), RepositoryError>;

    /// Number of accounts.
    async fn count(&self) -> Result<usize, RepositoryError>;
}

#[derive(Debug)]
struct UserRow {
    user: User,
    password_hash: String,
}

#[derive(Debug, Default)]
struct UserTable {
    rows: Vec<UserRow>,
    last_id: i64,
}

/// In-memory user store.
#[derive(Debug, Default)]
pub struct MemoryUserRepository {
    table: RwLock<UserTable>,
}

impl MemoryUserRepository {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .iter()
            .find(|row| row.user.id == id)
            .map(|row| row.user.clone()))
    }

    async fn find_by_login_with_hash(
        &self,
        login: &str,
    ) -> Result<Vec<(User, String)>, RepositoryError> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .iter()
            .filter(|row| row.user.matches_login(login))
            .map(|row| (row.user.clone(), row.password_hash.clone()))
            .collect())
    }

    async fn find_by_identifier_ignore_case(
        &self,
        identifier: &str,
    ) -> Result<Option<User>, RepositoryError> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .iter()
            .find(|row| row.user.matches_identifier_ignore_case(identifier))
            .map(|row| row.user.clone()))
    }

    async fn get_password_hash(
        &self,
        id: UserId,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .iter()
            .find(|row| row.user.id == id)
            .map(|row| (row.user.clone(), row.password_hash.clone())))
    }

    async fn create(
        &self,
        new_user: NewUser,
        password_hash: String,
        created_at: DateTime<Utc>,
    ) -> Result<User, RepositoryError> {
        let mut table = self.table.write().await;

        if table
            .rows
            .iter()
            .any(|row| row.user.username.eq_ignore_ascii_case(&new_user.username))
        {
            return Err(RepositoryError::Conflict("username already exists".to_owned()));
        }
        if table
            .rows
            .iter()
            .any(|row| row.user.email.matches_ignore_case(new_user.email.as_str()))
        {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }

        table.last_id += 1;
        let user = User {
            id: UserId::new(table.last_id),
            username: new_user.username,
            email: new_user.email,
            name: new_user.name,
            phone: new_user.phone,
            role: new_user.role,
            created_at,
        };
        table.rows.push(UserRow {
            user: user.clone(),
            password_hash,
        });

        Ok(user)
    }

    async fn update_password_hash(
        &self,
        id: UserId,
        password_hash: String,
    ) -> Result<(), RepositoryError> {
        let mut table = self.table.write().await;
        let row = table
            .rows
            .iter_mut()
            .find(|row| row.user.id == id)
            .ok_or(RepositoryError::NotFound)?;
        row.password_hash = password_hash;
        Ok(())
    }

    async fn count(&self) -> Result<usize, RepositoryError> {
        Ok(self.table.read().await.rows.len())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use vitrine_core::{Email, UserRole};

    use super::*;

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            username: username.to_owned(),
            email: Email::parse(email).unwrap(),
            name: username.to_owned(),
            phone: None,
            role: UserRole::User,
        }
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let repo = MemoryUserRepository::new();
        let a = repo
            .create(new_user("ana", "ana@x.com"), "h1".to_owned(), Utc::now())
            .await
            .unwrap();
        let b = repo
            .create(new_user("bia", "bia@x.com"), "h2".to_owned(), Utc::now())
            .await
            .unwrap();
        assert_eq!(a.id, UserId::new(1));
        assert_eq!(b.id, UserId::new(2));
        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_create_rejects_duplicates_ignoring_case() {
        let repo = MemoryUserRepository::new();
        repo.create(new_user("ana", "ana@x.com"), "h".to_owned(), Utc::now())
            .await
            .unwrap();

        let by_name = repo
            .create(new_user("ANA", "other@x.com"), "h".to_owned(), Utc::now())
            .await;
        assert!(matches!(by_name, Err(RepositoryError::Conflict(_))));

        let by_email = repo
            .create(new_user("other", "Ana@X.com"), "h".to_owned(), Utc::now())
            .await;
        assert!(matches!(by_email, Err(RepositoryError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_login_lookup_returns_username_and_email_matches() {
        let repo = MemoryUserRepository::new();
        repo.create(new_user("bob@x.com", "eve@x.com"), "h1".to_owned(), Utc::now())
            .await
            .unwrap();
        repo.create(new_user("bob", "bob@x.com"), "h2".to_owned(), Utc::now())
            .await
            .unwrap();

        let found = repo.find_by_login_with_hash("bob@x.com").await.unwrap();
        let hashes: Vec<&str> = found.iter().map(|(_, h)| h.as_str()).collect();
        assert_eq!(hashes, ["h1", "h2"]);
    }

    #[tokio::test]
    async fn test_login_lookup_is_case_sensitive() {
        let repo = MemoryUserRepository::new();
        repo.create(new_user("ana", "ana@x.com"), "hash".to_owned(), Utc::now())
            .await
            .unwrap();

        let found = repo.find_by_login_with_hash("ana@x.com").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].0.username, "ana");
        assert_eq!(found[0].1, "hash");
        assert!(repo.find_by_login_with_hash("ANA").await.unwrap().is_empty());
        assert!(
            repo.find_by_identifier_ignore_case("ANA")
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn test_update_password_hash_missing_user() {
        let repo = MemoryUserRepository::new();
        let result = repo.update_password_hash(UserId::new(9), "h".to_owned()).await;
        assert!(matches!(result, Err(RepositoryError::NotFound)));
    }
}
