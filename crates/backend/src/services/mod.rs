//! Business logic.
//!
//! Services borrow their repositories from the application state for the
//! duration of one call. They never sleep and never send notifications;
//! both happen in [`crate::state::AppState`].

pub mod admin;
pub mod auth;
pub mod catalog;
pub mod orders;
pub mod recovery;

pub use admin::AdminService;
pub use auth::{AuthError, AuthService, LoginThrottle};
pub use catalog::{CatalogError, CatalogService};
pub use orders::{OrderError, OrderService};
pub use recovery::{IssuedCode, RecoveryError, RecoveryService};
