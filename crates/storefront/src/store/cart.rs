//! Cart state container.
//!
//! The cart is modeled as an owned state value, a pure transition function
//! per action, and a store wrapper that persists the full snapshot after
//! every accepted transition. IDs and timestamps are minted by the wrapper
//! and carried in the action, so transitions stay deterministic.

use aurelle_core::{CartItemId, CurrencyCode, Money, ProductId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::storage::{CART_KEY, StorageAdapter, StorageError};
use crate::models::Product;

/// A line in the cart.
///
/// One line exists per distinct `(product id, size)` pair; re-adding the
/// pair grows the quantity instead of appending a duplicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: CartItemId,
    pub product: Product,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    pub added_at: DateTime<Utc>,
}

impl CartItem {
    /// Line total: unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Money {
        self.product.price.times(self.quantity)
    }
}

/// The serialized cart snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartState {
    items: Vec<CartItem>,
}

/// A cart mutation.
#[derive(Debug, Clone)]
pub enum CartAction {
    /// Add `quantity` of a product; merges into an existing line on the same
    /// `(product id, size)` pair, otherwise appends a line under `id`.
    Add {
        id: CartItemId,
        product: Product,
        quantity: u32,
        size: Option<String>,
        added_at: DateTime<Utc>,
    },
    /// Remove a line; no-op if absent.
    Remove { item_id: CartItemId },
    /// Set a line's quantity; zero removes the line.
    SetQuantity { item_id: CartItemId, quantity: u32 },
    /// Empty the cart unconditionally.
    Clear,
}

impl CartState {
    /// Apply one action to the state. Pure transition - no I/O, no clock.
    fn apply(&mut self, action: CartAction) {
        match action {
            CartAction::Add {
                id,
                product,
                quantity,
                size,
                added_at,
            } => {
                if let Some(existing) = self
                    .items
                    .iter_mut()
                    .find(|item| item.product.id == product.id && item.size == size)
                {
                    existing.quantity += quantity;
                } else {
                    self.items.push(CartItem {
                        id,
                        product,
                        quantity,
                        size,
                        added_at,
                    });
                }
            }
            CartAction::Remove { item_id } => {
                self.items.retain(|item| item.id != item_id);
            }
            CartAction::SetQuantity { item_id, quantity } => {
                if quantity == 0 {
                    self.items.retain(|item| item.id != item_id);
                } else if let Some(item) = self.items.iter_mut().find(|item| item.id == item_id) {
                    item.quantity = quantity;
                }
            }
            CartAction::Clear => self.items.clear(),
        }
    }

    fn find(&self, product_id: &ProductId, size: Option<&str>) -> Option<&CartItem> {
        self.items
            .iter()
            .find(|item| &item.product.id == product_id && item.size.as_deref() == size)
    }
}

/// The persisted cart store.
///
/// Every accepted mutation synchronously writes the full snapshot through
/// the storage adapter; [`CartStore::load`] reconstructs identical state
/// from it.
#[derive(Debug)]
pub struct CartStore<S> {
    state: CartState,
    storage: S,
}

impl<S: StorageAdapter> CartStore<S> {
    /// Load the cart from storage.
    ///
    /// A missing or unreadable snapshot yields an empty cart; unreadable
    /// snapshots are logged and discarded rather than treated as fatal.
    pub fn load(storage: S) -> Self {
        let state = match storage.load(CART_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "discarding unreadable cart snapshot");
                CartState::default()
            }),
            Ok(None) => CartState::default(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to load cart snapshot");
                CartState::default()
            }
        };
        Self { state, storage }
    }

    fn dispatch(&mut self, action: CartAction) -> Result<(), StorageError> {
        self.state.apply(action);
        let snapshot = serde_json::to_string(&self.state)?;
        self.storage.persist(CART_KEY, &snapshot)
    }

    /// Add `quantity` of a product (a zero quantity is treated as one).
    ///
    /// Returns the ID of the affected line - the existing one when the
    /// `(product id, size)` pair is already in the cart.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the snapshot cannot be persisted.
    pub fn add_item(
        &mut self,
        product: Product,
        quantity: u32,
        size: Option<String>,
    ) -> Result<CartItemId, StorageError> {
        let quantity = quantity.max(1);
        let id = self
            .state
            .find(&product.id, size.as_deref())
            .map_or_else(CartItemId::generate, |item| item.id);
        self.dispatch(CartAction::Add {
            id,
            product,
            quantity,
            size,
            added_at: Utc::now(),
        })?;
        Ok(id)
    }

    /// Remove a line; no-op if absent.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the snapshot cannot be persisted.
    pub fn remove_item(&mut self, item_id: CartItemId) -> Result<(), StorageError> {
        self.dispatch(CartAction::Remove { item_id })
    }

    /// Set a line's quantity; zero removes the line. No clamping otherwise.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the snapshot cannot be persisted.
    pub fn update_quantity(
        &mut self,
        item_id: CartItemId,
        quantity: u32,
    ) -> Result<(), StorageError> {
        self.dispatch(CartAction::SetQuantity { item_id, quantity })
    }

    /// Empty the cart unconditionally. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the snapshot cannot be persisted.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.dispatch(CartAction::Clear)
    }

    /// The cart lines, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.state.items
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.items.is_empty()
    }

    /// Sum of quantities across all lines (not the line count).
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.state.items.iter().map(|item| item.quantity).sum()
    }

    /// Σ(price × quantity) over all lines.
    ///
    /// The catalog carries a single currency; an empty cart reports zero in
    /// the default currency.
    #[must_use]
    pub fn subtotal(&self) -> Money {
        let currency = self
            .state
            .items
            .first()
            .map_or_else(CurrencyCode::default, |item| {
                item.product.price.currency_code
            });
        let amount = self
            .state
            .items
            .iter()
            .map(|item| item.line_total().amount)
            .sum();
        Money::new(amount, currency)
    }

    /// The amount charged at checkout.
    ///
    /// Defined equal to [`CartStore::subtotal`]: shipping and tax are
    /// presentation concerns applied outside the store and never flow into
    /// the amount sent to payment initialization.
    #[must_use]
    pub fn total(&self) -> Money {
        self.subtotal()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::storage::MemoryStorage;
    use rust_decimal::Decimal;

    fn product(id: &str, price: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            slug: format!("product-{id}"),
            price: Money::new(Decimal::from(price), CurrencyCode::USD),
            image_url: None,
        }
    }

    fn store() -> CartStore<MemoryStorage> {
        CartStore::load(MemoryStorage::new())
    }

    #[test]
    fn test_add_merges_same_product_and_size() {
        let mut cart = store();
        let first = cart.add_item(product("a", 100), 1, Some("M".into())).unwrap();
        let second = cart.add_item(product("a", 100), 2, Some("M".into())).unwrap();

        assert_eq!(first, second);
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity, 3);
    }

    #[test]
    fn test_add_distinct_sizes_are_separate_lines() {
        let mut cart = store();
        cart.add_item(product("a", 100), 1, Some("M".into())).unwrap();
        cart.add_item(product("a", 100), 1, Some("L".into())).unwrap();
        cart.add_item(product("a", 100), 1, None).unwrap();

        assert_eq!(cart.items().len(), 3);
    }

    #[test]
    fn test_update_quantity_sets_not_adds() {
        let mut cart = store();
        let id = cart.add_item(product("a", 100), 2, None).unwrap();
        cart.update_quantity(id, 3).unwrap();

        assert_eq!(cart.items()[0].quantity, 3);
    }

    #[test]
    fn test_update_quantity_zero_removes() {
        let mut cart = store();
        let id = cart.add_item(product("a", 100), 2, None).unwrap();
        cart.update_quantity(id, 0).unwrap();

        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut cart = store();
        cart.add_item(product("a", 100), 1, None).unwrap();
        cart.remove_item(CartItemId::generate()).unwrap();

        assert_eq!(cart.items().len(), 1);
    }

    #[test]
    fn test_total_items_sums_quantities() {
        let mut cart = store();
        cart.add_item(product("a", 100), 2, None).unwrap();
        cart.add_item(product("b", 50), 3, None).unwrap();

        assert_eq!(cart.total_items(), 5);
        assert_eq!(cart.items().len(), 2);
    }

    #[test]
    fn test_subtotal_scenario() {
        // Product A (850, qty 1) and Product B (120, qty 2) => 1090
        let mut cart = store();
        cart.add_item(product("a", 850), 1, None).unwrap();
        cart.add_item(product("b", 120), 2, None).unwrap();

        assert_eq!(cart.subtotal().amount, Decimal::from(1090));

        cart.clear().unwrap();
        assert_eq!(cart.total_items(), 0);
        assert_eq!(cart.subtotal().amount, Decimal::ZERO);
    }

    #[test]
    fn test_total_equals_subtotal() {
        let mut cart = store();
        cart.add_item(product("a", 850), 1, None).unwrap();
        cart.add_item(product("b", 120), 2, None).unwrap();

        assert_eq!(cart.total(), cart.subtotal());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut cart = store();
        cart.clear().unwrap();
        cart.clear().unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_reload_reconstructs_identical_state() {
        let storage = MemoryStorage::new();
        let mut cart = CartStore::load(&storage);
        cart.add_item(product("a", 850), 1, Some("M".into())).unwrap();
        cart.add_item(product("b", 120), 2, None).unwrap();
        let before = cart.items().to_vec();

        let reloaded = CartStore::load(&storage);
        assert_eq!(reloaded.items(), before.as_slice());
    }

    #[test]
    fn test_corrupt_snapshot_loads_empty() {
        let storage = MemoryStorage::new();
        storage.persist(CART_KEY, "not json").unwrap();

        let cart = CartStore::load(&storage);
        assert!(cart.is_empty());
    }
}
