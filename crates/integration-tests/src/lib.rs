//! Integration test support for Aurelle.
//!
//! Provides [`MockBackend`], an in-process stand-in for the commerce
//! backend. Each test spawns one on an ephemeral port and points a
//! `CommerceClient` at it, so the full checkout → verify → track pipeline
//! runs through real HTTP without any external service.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p aurelle-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use url::Url;

/// Recorded and scripted behavior of the mock backend.
#[derive(Debug, Default)]
struct BackendState {
    /// Order-creation bodies received, in arrival order.
    orders_received: Vec<Value>,
    /// Authorization headers seen on order creation (None for guests).
    order_auth_headers: Vec<Option<String>>,
    /// Payment-initialization bodies received.
    payment_inits: Vec<Value>,
    /// References received for verification.
    verifications: Vec<String>,
    /// Total requests across all endpoints.
    request_count: usize,
    /// When set, order creation is rejected with this message.
    reject_orders: Option<String>,
    /// When set, payment initialization is rejected with this message.
    reject_payments: Option<String>,
    /// When set, verification is rejected with this message.
    reject_verification: Option<String>,
    /// When set, the tracking endpoint returns a server error.
    fail_tracking: bool,
    /// Orders served by the tracking endpoint.
    seeded_orders: Vec<Value>,
    /// Addresses served by the addresses endpoint.
    seeded_addresses: Vec<Value>,
}

type SharedState = Arc<Mutex<BackendState>>;

/// An in-process mock of the commerce backend.
#[derive(Clone)]
pub struct MockBackend {
    addr: SocketAddr,
    state: SharedState,
}

impl MockBackend {
    /// Bind an ephemeral port and serve the mock in a background task.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn spawn() -> Self {
        let state: SharedState = Arc::new(Mutex::new(BackendState::default()));

        let app = Router::new()
            .route("/orders", post(create_order))
            .route("/payments/initialize", post(initialize_payment))
            .route("/payments/verify", post(verify_payment))
            .route("/orders/email/{email}", get(orders_by_email))
            .route("/addresses", get(list_addresses))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock backend");
        let addr = listener.local_addr().expect("Failed to read local addr");

        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Mock backend server error");
        });

        Self { addr, state }
    }

    /// Base URL for pointing a `CommerceClient` at this backend.
    ///
    /// # Panics
    ///
    /// Panics if the bound address does not form a valid URL.
    #[must_use]
    pub fn base_url(&self) -> Url {
        Url::parse(&format!("http://{}", self.addr)).expect("Invalid mock backend URL")
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BackendState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Reject subsequent order creations with `message`.
    pub fn reject_orders(&self, message: &str) {
        self.lock().reject_orders = Some(message.to_owned());
    }

    /// Reject subsequent payment initializations with `message`.
    pub fn reject_payments(&self, message: &str) {
        self.lock().reject_payments = Some(message.to_owned());
    }

    /// Reject subsequent verifications with `message`.
    pub fn reject_verification(&self, message: &str) {
        self.lock().reject_verification = Some(message.to_owned());
    }

    /// Make the tracking endpoint return a server error.
    pub fn fail_tracking(&self) {
        self.lock().fail_tracking = true;
    }

    /// Serve `order` from the tracking endpoint.
    pub fn seed_order(&self, order: Value) {
        self.lock().seeded_orders.push(order);
    }

    /// Serve `address` from the addresses endpoint.
    pub fn seed_address(&self, address: Value) {
        self.lock().seeded_addresses.push(address);
    }

    /// Total requests received across all endpoints.
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.lock().request_count
    }

    /// Order-creation bodies received so far.
    #[must_use]
    pub fn orders_received(&self) -> Vec<Value> {
        self.lock().orders_received.clone()
    }

    /// Authorization headers seen on order creation.
    #[must_use]
    pub fn order_auth_headers(&self) -> Vec<Option<String>> {
        self.lock().order_auth_headers.clone()
    }

    /// Payment-initialization bodies received so far.
    #[must_use]
    pub fn payment_inits(&self) -> Vec<Value> {
        self.lock().payment_inits.clone()
    }

    /// References received for verification so far.
    #[must_use]
    pub fn verifications(&self) -> Vec<String> {
        self.lock().verifications.clone()
    }
}

fn lock(state: &SharedState) -> std::sync::MutexGuard<'_, BackendState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

async fn create_order(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let mut guard = lock(&state);
    guard.request_count += 1;

    if let Some(message) = guard.reject_orders.clone() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "message": message })),
        );
    }

    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(ToOwned::to_owned);
    guard.order_auth_headers.push(auth);

    let order_number = format!("AUR-{}", 1000 + guard.orders_received.len() + 1);
    let id = format!("ord_{}", guard.orders_received.len() + 1);
    let total = body.get("total").cloned().unwrap_or(Value::Null);
    guard.orders_received.push(body);

    (
        StatusCode::CREATED,
        Json(json!({
            "order": {
                "id": id,
                "order_number": order_number,
                "status": "pending",
                "total": total,
            }
        })),
    )
}

async fn initialize_payment(
    State(state): State<SharedState>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let mut guard = lock(&state);
    guard.request_count += 1;

    if let Some(message) = guard.reject_payments.clone() {
        return (StatusCode::BAD_REQUEST, Json(json!({ "message": message })));
    }

    let order_id = body
        .get("order_id")
        .and_then(Value::as_str)
        .unwrap_or("unknown")
        .to_owned();
    guard.payment_inits.push(body);

    let reference = format!("ref_{order_id}");
    (
        StatusCode::OK,
        Json(json!({
            "authorization_url": format!("https://checkout.gateway.test/redirect/{reference}"),
            "reference": reference,
        })),
    )
}

async fn verify_payment(
    State(state): State<SharedState>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let mut guard = lock(&state);
    guard.request_count += 1;

    if let Some(message) = guard.reject_verification.clone() {
        return (StatusCode::NOT_FOUND, Json(json!({ "message": message })));
    }

    let reference = body
        .get("reference")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned();
    guard.verifications.push(reference.clone());

    // Idempotent per reference: the same confirmation comes back every time
    (
        StatusCode::OK,
        Json(json!({
            "reference": reference,
            "amount": { "amount": "1090", "currency_code": "USD" },
            "order_number": "AUR-1001",
            "paid_at": "2026-08-01T10:00:00Z",
        })),
    )
}

async fn orders_by_email(
    State(state): State<SharedState>,
    Path(email): Path<String>,
) -> (StatusCode, Json<Value>) {
    let mut guard = lock(&state);
    guard.request_count += 1;

    if guard.fail_tracking {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "message": "Order lookup is temporarily unavailable." })),
        );
    }

    let orders: Vec<Value> = guard
        .seeded_orders
        .iter()
        .filter(|order| {
            order
                .get("customer_email")
                .and_then(Value::as_str)
                .is_some_and(|e| e == email)
        })
        .cloned()
        .collect();

    (StatusCode::OK, Json(json!({ "orders": orders })))
}

async fn list_addresses(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    let mut guard = lock(&state);
    guard.request_count += 1;

    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("Bearer "));
    if !authorized {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Authentication required." })),
        );
    }

    let addresses = guard.seeded_addresses.clone();
    (StatusCode::OK, Json(json!({ "addresses": addresses })))
}
