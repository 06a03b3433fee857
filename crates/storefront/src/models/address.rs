//! Saved address model.

use aurelle_core::AddressId;
use serde::{Deserialize, Serialize};

/// A shipping address saved against a customer account.
///
/// Served by the bearer-authenticated addresses endpoint and used to
/// pre-populate checkout for signed-in shoppers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub id: AddressId,
    /// Display label (e.g. "Home", "Office").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub recipient: String,
    pub line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}
