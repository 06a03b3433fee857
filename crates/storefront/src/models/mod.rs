//! Domain models for the storefront.
//!
//! Products and orders mirror what the commerce backend serves; the session
//! model is client-only and never persisted.

pub mod address;
pub mod order;
pub mod product;
pub mod session;

pub use address::Address;
pub use order::{Order, OrderItem, StatusEntry};
pub use product::Product;
pub use session::{AccountUser, UserSession};
