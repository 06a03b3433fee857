//! Product snapshot model.

use aurelle_core::{Money, ProductId};
use serde::{Deserialize, Serialize};

/// A denormalized product snapshot.
///
/// This is the shape embedded in cart items, wishlist entries, and order
/// payloads. The backend owns the canonical catalog record; a snapshot is
/// frozen at the moment the shopper acts on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// URL slug for product pages.
    pub slug: String,
    pub price: Money,
    pub image_url: Option<String>,
}
