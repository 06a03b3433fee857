//! Persisted client-side state.
//!
//! Each store owns a state value, applies pure actions to it, and persists
//! the full snapshot through a [`storage::StorageAdapter`] after every
//! accepted transition. The session store is the deliberate exception - it
//! is memory-only and vanishes on reload.

pub mod cart;
pub mod session;
pub mod storage;
pub mod wishlist;

pub use cart::{CartItem, CartStore};
pub use session::SessionStore;
pub use storage::{FileStorage, MemoryStorage, StorageAdapter, StorageError};
pub use wishlist::WishlistStore;
