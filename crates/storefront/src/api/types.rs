//! Typed request/response contracts for the commerce backend.
//!
//! Every body that crosses the wire has an explicit shape here; responses
//! are deserialized at the boundary rather than trusted as loose JSON.

use aurelle_core::{AddressId, Email, Money, OrderId, OrderStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Address, Order, Product};
use crate::store::CartItem;

// =============================================================================
// Order Creation
// =============================================================================

/// Raw address fields for manual entry at checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressFields {
    pub line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

impl AddressFields {
    /// Whether every required field is filled in.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        ![
            &self.line1,
            &self.city,
            &self.state,
            &self.postal_code,
            &self.country,
        ]
        .iter()
        .any(|field| field.trim().is_empty())
    }
}

/// One line of the order-creation payload: product snapshot plus quantity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemPayload {
    pub product: Product,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

impl From<&CartItem> for OrderItemPayload {
    fn from(item: &CartItem) -> Self {
        Self {
            product: item.product.clone(),
            quantity: item.quantity,
            size: item.size.clone(),
        }
    }
}

/// Body for `POST /orders`.
///
/// Exactly one of `address_id` (saved address) and `shipping_address`
/// (manual entry) is set; checkout validation enforces this before the
/// request is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub customer_name: String,
    pub customer_email: Email,
    pub customer_phone: String,
    pub items: Vec<OrderItemPayload>,
    pub subtotal: Money,
    pub total: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_id: Option<AddressId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<AddressFields>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Success body of `POST /orders`.
#[derive(Debug, Deserialize)]
pub(crate) struct CreateOrderResponse {
    pub order: OrderSummary,
}

/// The created order, as echoed back by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderSummary {
    pub id: OrderId,
    pub order_number: String,
    pub status: OrderStatus,
    pub total: Money,
}

// =============================================================================
// Payments
// =============================================================================

/// Body for `POST /payments/initialize`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitializePaymentRequest {
    pub order_id: OrderId,
    pub email: Email,
    pub amount: Money,
    /// Where the gateway sends the shopper after payment.
    pub callback_url: String,
}

/// Success body of `POST /payments/initialize`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentSession {
    /// The gateway's hosted checkout page.
    pub authorization_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

/// Body for `POST /payments/verify`.
#[derive(Debug, Serialize)]
pub(crate) struct VerifyPaymentRequest<'a> {
    pub reference: &'a str,
}

/// Success body of `POST /payments/verify`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentConfirmation {
    pub reference: String,
    pub amount: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Lookups
// =============================================================================

/// Success body of `GET /orders/email/:email`.
#[derive(Debug, Deserialize)]
pub(crate) struct OrdersByEmailResponse {
    pub orders: Vec<Order>,
}

/// Success body of `GET /addresses`.
#[derive(Debug, Deserialize)]
pub(crate) struct AddressesResponse {
    pub addresses: Vec<Address>,
}

/// Error body shared by all endpoints.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiMessage {
    pub message: String,
}
