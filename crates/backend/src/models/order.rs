//! Order domain types.
//!
//! An order is a snapshot: customer contact details, item names and unit
//! prices are copied at checkout and never follow later edits to the user
//! or the catalog.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vitrine_core::{Email, Money, OrderId, OrderStatus, PaymentMethod, ProductId, UserId};

/// Customer contact details captured at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSnapshot {
    pub name: String,
    pub email: Option<Email>,
    pub phone: Option<String>,
}

/// Shipping address.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

/// One order line, priced at checkout time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: u32,
    /// Unit price in minor units.
    pub unit_price: Money,
}

impl OrderItem {
    /// `unit_price × quantity`, or `None` on overflow.
    #[must_use]
    pub fn line_total(&self) -> Option<Money> {
        self.unit_price.checked_mul(self.quantity)
    }
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub customer: CustomerSnapshot,
    #[serde(default)]
    pub address: Address,
    pub items: Vec<OrderItem>,
    /// Sum of the line totals at creation. Never recomputed.
    pub total: Money,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub tracking_code: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Checkout request from the cart page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub user_id: UserId,
    pub customer: CustomerSnapshot,
    #[serde(default)]
    pub address: Address,
    pub items: Vec<OrderItem>,
    pub payment_method: PaymentMethod,
}
