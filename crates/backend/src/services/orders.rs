//! Order lifecycle.
//!
//! Orders are created from a checkout request and afterwards only change
//! through status updates. Any status may follow any other.

use thiserror::Error;

use vitrine_core::{Money, OrderId, OrderStatus, ProductId, UserId};

use crate::clock::Clock;
use crate::db::{OrderRepository, RepositoryError};
use crate::models::order::{NewOrder, Order, OrderItem};

/// Errors that can occur during order operations.
#[derive(Debug, Error)]
pub enum OrderError {
    /// No order with this id.
    #[error("order not found: {0}")]
    NotFound(OrderId),

    /// Checkout with an empty cart.
    #[error("order must contain at least one item")]
    Empty,

    /// A line with quantity zero.
    #[error("quantity must be positive for product {0}")]
    ZeroQuantity(ProductId),

    /// A line priced below zero.
    #[error("unit price must not be negative for product {0}")]
    NegativePrice(ProductId),

    /// The order total does not fit in the money range.
    #[error("order total overflows")]
    TotalOverflow,

    /// Repository error.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Sum of `unit_price × quantity` over all lines.
///
/// # Errors
///
/// Returns an error for an empty list, a zero quantity, a negative unit price
/// or an overflow.
pub fn order_total(items: &[OrderItem]) -> Result<Money, OrderError> {
    if items.is_empty() {
        return Err(OrderError::Empty);
    }

    items.iter().try_fold(Money::ZERO, |total, item| {
        if item.quantity == 0 {
            return Err(OrderError::ZeroQuantity(item.product_id));
        }
        if item.unit_price < Money::ZERO {
            return Err(OrderError::NegativePrice(item.product_id));
        }
        item.line_total()
            .and_then(|line| total.checked_add(line))
            .ok_or(OrderError::TotalOverflow)
    })
}

/// Order service.
pub struct OrderService<'a> {
    orders: &'a dyn OrderRepository,
    clock: &'a dyn Clock,
}

impl<'a> OrderService<'a> {
    #[must_use]
    pub fn new(orders: &'a dyn OrderRepository, clock: &'a dyn Clock) -> Self {
        Self { orders, clock }
    }

    /// Place an order in `PENDING` status.
    ///
    /// Item names and prices are kept as given; the total is computed here.
    /// The owning user is not checked.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Empty`, `OrderError::ZeroQuantity`,
    /// `OrderError::NegativePrice` or `OrderError::TotalOverflow` for an
    /// invalid cart.
    pub async fn create(&self, new_order: NewOrder) -> Result<Order, OrderError> {
        let total = order_total(&new_order.items)?;
        let now = self.clock.now();

        // Millisecond timestamps collide under fast callers; the sequence
        // suffix keeps ids unique within the process.
        let sequence = self.orders.count().await?.saturating_add(1);
        let id = OrderId::new(format!("ord_{}_{sequence}", now.timestamp_millis()));

        let order = Order {
            id,
            user_id: new_order.user_id,
            customer: new_order.customer,
            address: new_order.address,
            items: new_order.items,
            total,
            status: OrderStatus::Pending,
            payment_method: new_order.payment_method,
            tracking_code: None,
            created_at: now,
        };
        self.orders.insert(order.clone()).await?;

        tracing::info!(
            order_id = %order.id,
            user_id = %order.user_id,
            total = order.total.minor(),
            items = order.items.len(),
            "Order created"
        );
        Ok(order)
    }

    /// Set an order's status.
    ///
    /// A provided tracking code replaces the stored one; `None` keeps it.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotFound` for an unknown id.
    pub async fn update_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
        tracking_code: Option<String>,
    ) -> Result<Order, OrderError> {
        let mut order = self
            .orders
            .get_by_id(id)
            .await?
            .ok_or_else(|| OrderError::NotFound(id.clone()))?;

        let previous = order.status;
        order.status = status;
        if let Some(code) = tracking_code.map(|c| c.trim().to_owned()).filter(|c| !c.is_empty()) {
            order.tracking_code = Some(code);
        }

        self.orders.update(order.clone()).await.map_err(|e| match e {
            RepositoryError::NotFound => OrderError::NotFound(id.clone()),
            other => OrderError::Repository(other),
        })?;

        tracing::info!(order_id = %order.id, %previous, %status, "Order status updated");
        Ok(order)
    }

    /// All orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Repository` if the store fails.
    pub async fn list_all(&self) -> Result<Vec<Order>, OrderError> {
        Ok(self.orders.list().await?)
    }

    /// A user's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Repository` if the store fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, OrderError> {
        Ok(self.orders.list_for_user(user_id).await?)
    }

    /// One order, if it exists.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Repository` if the store fails.
    pub async fn get(&self, id: &OrderId) -> Result<Option<Order>, OrderError> {
        Ok(self.orders.get_by_id(id).await?)
    }
}
