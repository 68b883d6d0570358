//! Admin dashboard aggregate.

use serde::{Deserialize, Serialize};

use vitrine_core::Money;

use super::order::Order;

/// Totals shown on the admin dashboard. Recomputed on every request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_users: usize,
    pub total_orders: usize,
    /// Sum of every order total.
    pub total_revenue: Money,
    /// Most recent orders, newest first.
    pub recent_orders: Vec<Order>,
}
