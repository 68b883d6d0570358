//! Vitrine Backend - in-process storefront backend.
//!
//! The storefront UI calls into this crate instead of a remote API. It keeps
//! accounts, the catalog, orders, recovery codes and site settings in memory
//! and owns the state transitions the storefront depends on:
//!
//! - throttled password login and registration
//! - password recovery with single-use, expiring six-digit codes
//! - order creation and status changes, with customer and admin notifications
//! - catalog CRUD, site settings and dashboard stats
//!
//! # Modules
//!
//! - [`state`] - [`AppState`], the entry point for every operation
//! - [`services`] - Business logic over the repositories
//! - [`db`] - Repository traits and in-memory stores
//! - [`models`] - Domain models
//! - [`notifications`] - Gateway trait, transports and message composition
//! - [`seed`] - Initial data loading
//! - [`config`] - Environment-based configuration
//! - [`clock`] - Injectable time source
//! - [`error`] - [`AppError`] and Sentry helpers

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod clock;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod notifications;
pub mod seed;
pub mod services;
pub mod state;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::BackendConfig;
pub use error::{AppError, ErrorKind};
pub use seed::{SeedData, SeedSummary};
pub use state::{AppState, Repositories};
