//! Wishlist state container.
//!
//! Same shape as the cart store - pure transitions plus persistence after
//! every accepted one - but with set semantics: full product records
//! deduplicated by product ID, one entry each.

use aurelle_core::ProductId;
use serde::{Deserialize, Serialize};

use super::cart::CartStore;
use super::storage::{StorageAdapter, StorageError, WISHLIST_KEY};
use crate::models::Product;

/// The serialized wishlist snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WishlistState {
    products: Vec<Product>,
}

/// A wishlist mutation.
#[derive(Debug, Clone)]
pub enum WishlistAction {
    /// Add a product; no-op if its ID is already present.
    Add(Product),
    /// Remove by product ID; no-op if absent.
    Remove(ProductId),
    /// Empty the wishlist.
    Clear,
}

impl WishlistState {
    /// Apply one action to the state. Pure transition - no I/O.
    fn apply(&mut self, action: WishlistAction) {
        match action {
            WishlistAction::Add(product) => {
                if !self.products.iter().any(|p| p.id == product.id) {
                    self.products.push(product);
                }
            }
            WishlistAction::Remove(product_id) => {
                self.products.retain(|p| p.id != product_id);
            }
            WishlistAction::Clear => self.products.clear(),
        }
    }
}

/// The persisted wishlist store.
#[derive(Debug)]
pub struct WishlistStore<S> {
    state: WishlistState,
    storage: S,
}

impl<S: StorageAdapter> WishlistStore<S> {
    /// Load the wishlist from storage; missing or unreadable snapshots yield
    /// an empty wishlist.
    pub fn load(storage: S) -> Self {
        let state = match storage.load(WISHLIST_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "discarding unreadable wishlist snapshot");
                WishlistState::default()
            }),
            Ok(None) => WishlistState::default(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to load wishlist snapshot");
                WishlistState::default()
            }
        };
        Self { state, storage }
    }

    fn dispatch(&mut self, action: WishlistAction) -> Result<(), StorageError> {
        self.state.apply(action);
        let snapshot = serde_json::to_string(&self.state)?;
        self.storage.persist(WISHLIST_KEY, &snapshot)
    }

    /// Add a product. Idempotent on product ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the snapshot cannot be persisted.
    pub fn add(&mut self, product: Product) -> Result<(), StorageError> {
        self.dispatch(WishlistAction::Add(product))
    }

    /// Remove a product by ID; no-op if absent.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the snapshot cannot be persisted.
    pub fn remove(&mut self, product_id: ProductId) -> Result<(), StorageError> {
        self.dispatch(WishlistAction::Remove(product_id))
    }

    /// Empty the wishlist.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the snapshot cannot be persisted.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.dispatch(WishlistAction::Clear)
    }

    /// Move a product into the cart (quantity 1, no size).
    ///
    /// Returns `false` without touching either store when the ID is not on
    /// the wishlist. The product lands in the cart before it leaves the
    /// wishlist, so a persistence failure cannot lose it.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if either snapshot cannot be persisted.
    pub fn move_to_cart<C: StorageAdapter>(
        &mut self,
        product_id: &ProductId,
        cart: &mut CartStore<C>,
    ) -> Result<bool, StorageError> {
        let Some(product) = self.state.products.iter().find(|p| &p.id == product_id).cloned()
        else {
            return Ok(false);
        };

        cart.add_item(product, 1, None)?;
        self.remove(product_id.clone())?;
        Ok(true)
    }

    /// Whether a product ID is on the wishlist.
    #[must_use]
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.state.products.iter().any(|p| &p.id == product_id)
    }

    /// The wishlisted products, in insertion order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.state.products
    }

    /// Distinct product count.
    #[must_use]
    pub fn total_items(&self) -> usize {
        self.state.products.len()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::storage::MemoryStorage;
    use aurelle_core::{CurrencyCode, Money};
    use rust_decimal::Decimal;

    fn product(id: &str) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            slug: format!("product-{id}"),
            price: Money::new(Decimal::from(100), CurrencyCode::USD),
            image_url: None,
        }
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut wishlist = WishlistStore::load(MemoryStorage::new());
        wishlist.add(product("a")).unwrap();
        wishlist.add(product("a")).unwrap();

        assert_eq!(wishlist.total_items(), 1);
        assert!(wishlist.contains(&ProductId::new("a")));
    }

    #[test]
    fn test_remove_and_clear() {
        let mut wishlist = WishlistStore::load(MemoryStorage::new());
        wishlist.add(product("a")).unwrap();
        wishlist.add(product("b")).unwrap();

        wishlist.remove(ProductId::new("a")).unwrap();
        assert!(!wishlist.contains(&ProductId::new("a")));
        assert_eq!(wishlist.total_items(), 1);

        wishlist.clear().unwrap();
        assert_eq!(wishlist.total_items(), 0);
    }

    #[test]
    fn test_move_to_cart() {
        let mut wishlist = WishlistStore::load(MemoryStorage::new());
        let mut cart = CartStore::load(MemoryStorage::new());
        wishlist.add(product("a")).unwrap();

        let moved = wishlist.move_to_cart(&ProductId::new("a"), &mut cart).unwrap();
        assert!(moved);
        assert!(!wishlist.contains(&ProductId::new("a")));
        assert_eq!(cart.total_items(), 1);

        let moved = wishlist.move_to_cart(&ProductId::new("a"), &mut cart).unwrap();
        assert!(!moved);
        assert_eq!(cart.total_items(), 1);
    }

    #[test]
    fn test_reload_reconstructs_state() {
        let storage = MemoryStorage::new();
        let mut wishlist = WishlistStore::load(&storage);
        wishlist.add(product("a")).unwrap();
        wishlist.add(product("b")).unwrap();

        let reloaded = WishlistStore::load(&storage);
        assert_eq!(reloaded.products(), wishlist.products());
    }
}
