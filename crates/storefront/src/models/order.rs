//! Order read model.
//!
//! Orders are created through checkout and read back through tracking; the
//! client never mutates one. Status history is appended server-side.

use aurelle_core::{Email, Money, OrderId, OrderStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An order as served by the commerce backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    /// Human-facing order number (e.g. "AUR-1042").
    pub order_number: String,
    pub customer_name: String,
    pub customer_email: Email,
    pub status: OrderStatus,
    pub total: Money,
    pub items: Vec<OrderItem>,
    /// Append-only status history, oldest first.
    #[serde(default)]
    pub status_history: Vec<StatusEntry>,
    pub created_at: DateTime<Utc>,
}

/// A line on an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_name: String,
    pub quantity: u32,
    /// Unit price at order time.
    pub price: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

/// One recorded status transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusEntry {
    pub status: OrderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub changed_at: DateTime<Utc>,
}
