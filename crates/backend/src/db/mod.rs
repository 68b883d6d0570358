//! Entity store.
//!
//! Each entity has a repository trait and an in-memory implementation:
//!
//! - `users` - Accounts and their password hashes
//! - `products` - Catalog
//! - `orders` - Placed orders (never deleted)
//! - `password_resets` - Recovery codes
//! - `settings` - Site settings singleton
//!
//! The in-memory stores live for the lifetime of the process. Services only
//! see the traits, so a persistent store can replace any of them.

pub mod orders;
pub mod password_resets;
pub mod products;
pub mod settings;
pub mod users;

use thiserror::Error;

pub use orders::{MemoryOrderRepository, OrderRepository};
pub use password_resets::{MemoryPasswordResetRepository, PasswordResetRepository};
pub use products::{MemoryProductRepository, ProductRepository};
pub use settings::{MemorySettingsRepository, SettingsRepository};
pub use users::{MemoryUserRepository, UserRepository};

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Data in the store is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}
