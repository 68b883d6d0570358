//! Initial data loading.
//!
//! A seed brings the store to a known starting point: site settings, a
//! catalog, accounts and historical orders. Seeded orders keep their ids,
//! statuses and timestamps and trigger no notifications.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};
use thiserror::Error;

use vitrine_core::{Email, Money, OrderId, UserRole};

use crate::db::RepositoryError;
use crate::models::{NewUser, Order, Product, SiteSettings};
use crate::services::orders::order_total;
use crate::services::{AuthError, OrderError};
use crate::services::auth::password::hash_password;
use crate::state::AppState;

/// Errors that can occur while applying a seed.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("seed user {username}: {source}")]
    User {
        username: String,
        #[source]
        source: AuthError,
    },

    #[error("seed order {id}: {source}")]
    Order {
        id: OrderId,
        #[source]
        source: OrderError,
    },

    #[error("seed order {id}: total {stated} does not match its lines ({computed})")]
    TotalMismatch {
        id: OrderId,
        stated: Money,
        computed: Money,
    },
}

/// An account to create, with its clear-text password.
#[derive(Debug, Deserialize)]
pub struct SeedUser {
    pub username: String,
    pub email: Email,
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: UserRole,
    #[serde(deserialize_with = "deserialize_secret")]
    pub password: SecretString,
}

fn deserialize_secret<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SecretString, D::Error> {
    String::deserialize(deserializer).map(SecretString::from)
}

/// Everything a seed may contain. Missing sections are left untouched.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SeedData {
    pub settings: Option<SiteSettings>,
    pub products: Vec<Product>,
    /// Created in order, so the first user gets id 1.
    pub users: Vec<SeedUser>,
    /// Newest first, the order `list_orders` returns them in.
    pub orders: Vec<Order>,
}

/// What a seed added.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub settings: bool,
    pub products: usize,
    pub users: usize,
    pub orders: usize,
}

impl AppState {
    /// Load seed data into the stores.
    ///
    /// Orders and passwords are checked before anything is written, so a bad
    /// order or password leaves the stores untouched.
    ///
    /// # Errors
    ///
    /// Returns `SeedError::Order` or `SeedError::TotalMismatch` for an order
    /// whose lines are invalid or do not add up to its total.
    /// Returns `SeedError::User` if a password cannot be hashed.
    /// Returns `SeedError::Repository` on an id, username or email that is
    /// already taken. Data applied before that failure stays applied.
    pub async fn apply_seed(&self, seed: SeedData) -> Result<SeedSummary, SeedError> {
        for order in &seed.orders {
            check_order_total(order)?;
        }

        let hashing = self.config().password_hashing;
        let users = seed
            .users
            .into_iter()
            .map(|user| {
                let hash = hash_password(user.password.expose_secret(), hashing).map_err(
                    |source| SeedError::User {
                        username: user.username.clone(),
                        source,
                    },
                )?;
                let new_user = NewUser {
                    username: user.username,
                    email: user.email,
                    name: user.name,
                    phone: user.phone,
                    role: user.role,
                };
                Ok((new_user, hash))
            })
            .collect::<Result<Vec<_>, SeedError>>()?;

        let _guard = self.lock().await;
        let repos = self.repositories();
        let mut summary = SeedSummary::default();

        if let Some(settings) = seed.settings {
            repos.settings.save(settings).await?;
            summary.settings = true;
        }

        for product in seed.products {
            repos.products.insert(product).await?;
            summary.products += 1;
        }

        for (new_user, hash) in users {
            let created = repos
                .users
                .create(new_user, hash, self.clock().now())
                .await?;
            tracing::debug!(user_id = %created.id, username = %created.username, "Seeded user");
            summary.users += 1;
        }

        // Inserting puts an order first, so walk the list backwards.
        for order in seed.orders.into_iter().rev() {
            repos.orders.insert(order).await?;
            summary.orders += 1;
        }

        tracing::info!(
            settings = summary.settings,
            products = summary.products,
            users = summary.users,
            orders = summary.orders,
            "Seed applied"
        );
        Ok(summary)
    }
}

fn check_order_total(order: &Order) -> Result<(), SeedError> {
    let computed = order_total(&order.items).map_err(|source| SeedError::Order {
        id: order.id.clone(),
        source,
    })?;
    if computed != order.total {
        return Err(SeedError::TotalMismatch {
            id: order.id.clone(),
            stated: order.total,
            computed,
        });
    }
    Ok(())
}
