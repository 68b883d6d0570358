//! Order repository.

use async_trait::async_trait;
use tokio::sync::RwLock;

use vitrine_core::{OrderId, UserId};

use super::RepositoryError;
use crate::models::order::Order;

/// Storage for orders. Orders are never deleted; listing is newest first.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Store a new order at the head of the listing.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the order ID is taken.
    async fn insert(&self, order: Order) -> Result<(), RepositoryError>;

    /// Get an order by ID.
    async fn get_by_id(&self, id: &OrderId) -> Result<Option<Order>, RepositoryError>;

    /// Every order, newest first.
    async fn list(&self) -> Result<Vec<Order>, RepositoryError>;

    /// Orders placed by one user, newest first.
    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError>;

    /// Replace an existing order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no order has this ID.
    async fn update(&self, order: Order) -> Result<(), RepositoryError>;

    /// Number of orders.
    async fn count(&self) -> Result<usize, RepositoryError>;
}

/// In-memory order store.
#[derive(Debug, Default)]
pub struct MemoryOrderRepository {
    rows: RwLock<Vec<Order>>,
}

impl MemoryOrderRepository {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderRepository for MemoryOrderRepository {
    async fn insert(&self, order: Order) -> Result<(), RepositoryError> {
        let mut rows = self.rows.write().await;
        if rows.iter().any(|o| o.id == order.id) {
            return Err(RepositoryError::Conflict(format!(
                "order {} already exists",
                order.id
            )));
        }
        rows.insert(0, order);
        Ok(())
    }

    async fn get_by_id(&self, id: &OrderId) -> Result<Option<Order>, RepositoryError> {
        let rows = self.rows.read().await;
        Ok(rows.iter().find(|o| &o.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<Order>, RepositoryError> {
        Ok(self.rows.read().await.clone())
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let rows = self.rows.read().await;
        Ok(rows.iter().filter(|o| o.user_id == user_id).cloned().collect())
    }

    async fn update(&self, order: Order) -> Result<(), RepositoryError> {
        let mut rows = self.rows.write().await;
        let slot = rows
            .iter_mut()
            .find(|o| o.id == order.id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = order;
        Ok(())
    }

    async fn count(&self) -> Result<usize, RepositoryError> {
        Ok(self.rows.read().await.len())
    }
}
