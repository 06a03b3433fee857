//! Aurelle Storefront - Client-side commerce core.
//!
//! This library holds everything between the browser-equivalent UI and the
//! commerce backend:
//!
//! - A locally persisted cart/wishlist store with a pure transition function
//!   per action and a swappable storage adapter
//! - A typed [`api::CommerceClient`] for the backend's order, payment, and
//!   address endpoints
//! - The checkout submission, payment verification, and order tracking flows
//!   built on top of them
//!
//! # Architecture
//!
//! The backend (order persistence, gateway session creation, transaction
//! verification) is an external collaborator consumed through the typed
//! contracts in [`api::types`] - nothing here implements it. The store is the
//! only persistent client-side state; every flow is a request/response
//! orchestration around it.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod checkout;
pub mod config;
pub mod models;
pub mod payment;
pub mod store;
pub mod tracking;

pub use api::{ApiError, CommerceClient};
pub use checkout::{CheckoutError, CheckoutFlow, CheckoutForm, CheckoutPhase, ShippingChoice};
pub use config::{ConfigError, StorefrontConfig};
pub use payment::{VerificationOutcome, verify_return};
pub use store::{CartStore, FileStorage, MemoryStorage, SessionStore, WishlistStore};
pub use tracking::{TrackingOutcome, track_orders};
