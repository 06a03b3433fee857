//! Commerce backend API client.
//!
//! Wraps `reqwest` behind typed methods for the backend's order, payment,
//! and address endpoints. Responses are read as text first so rejection
//! bodies and parse failures can be diagnosed, then deserialized into the
//! contracts in [`types`].

pub mod types;

use std::sync::Arc;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::instrument;
use url::Url;

use aurelle_core::Email;

use crate::models::{Address, Order};
use types::{
    AddressesResponse, ApiMessage, CreateOrderRequest, CreateOrderResponse,
    InitializePaymentRequest, OrderSummary, OrdersByEmailResponse, PaymentConfirmation,
    PaymentSession, VerifyPaymentRequest,
};

/// Message shown when a request never made it to the backend.
pub const GENERIC_NETWORK_MESSAGE: &str =
    "Something went wrong. Please check your connection and try again.";

/// Errors that can occur when calling the commerce backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure (connection refused, timeout, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend rejected the request; `message` is surfaced verbatim.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// A success response had an unexpected shape.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ApiError {
    /// Whether this is a transport failure rather than a server rejection.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Http(_))
    }
}

/// Client for the commerce backend API.
///
/// Cheaply cloneable via `Arc`. Calls carry no retry logic - every method
/// issues exactly one request.
#[derive(Clone)]
pub struct CommerceClient {
    inner: Arc<CommerceClientInner>,
}

struct CommerceClientInner {
    client: reqwest::Client,
    /// Base URL without a trailing slash.
    base: String,
}

impl CommerceClient {
    /// Create a client for the backend at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the HTTP client fails to build.
    pub fn new(base_url: &Url, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let base = base_url.as_str().trim_end_matches('/').to_string();

        Ok(Self {
            inner: Arc::new(CommerceClientInner { client, base }),
        })
    }

    /// Send a request and deserialize its success body.
    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            // Error bodies carry `{ "message": ... }`; anything else falls
            // back to the status line
            let message = serde_json::from_str::<ApiMessage>(&body)
                .map_or_else(|_| format!("HTTP {status}"), |m| m.message);
            tracing::warn!(status = %status, message = %message, "commerce API rejected request");
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "failed to parse commerce API response"
            );
            ApiError::Parse(e)
        })
    }

    /// Create an order from the checkout payload.
    ///
    /// The bearer token is attached when present; guest orders go out
    /// unauthenticated.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self, request, token), fields(items = request.items.len()))]
    pub async fn create_order(
        &self,
        request: &CreateOrderRequest,
        token: Option<&SecretString>,
    ) -> Result<OrderSummary, ApiError> {
        let mut builder = self
            .inner
            .client
            .post(format!("{}/orders", self.inner.base))
            .json(request);

        if let Some(token) = token {
            builder = builder.bearer_auth(token.expose_secret());
        }

        let response: CreateOrderResponse = self.execute(builder).await?;
        Ok(response.order)
    }

    /// Open a gateway payment session for a created order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self, request), fields(order_id = %request.order_id))]
    pub async fn initialize_payment(
        &self,
        request: &InitializePaymentRequest,
    ) -> Result<PaymentSession, ApiError> {
        let builder = self
            .inner
            .client
            .post(format!("{}/payments/initialize", self.inner.base))
            .json(request);

        self.execute(builder).await
    }

    /// Verify a gateway transaction reference.
    ///
    /// The backend is required to be idempotent per reference: re-verifying
    /// a confirmed transaction returns the same success outcome.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the reference does not
    /// correspond to a successful transaction.
    #[instrument(skip(self), fields(reference = %reference))]
    pub async fn verify_payment(&self, reference: &str) -> Result<PaymentConfirmation, ApiError> {
        let builder = self
            .inner
            .client
            .post(format!("{}/payments/verify", self.inner.base))
            .json(&VerifyPaymentRequest { reference });

        self.execute(builder).await
    }

    /// Fetch all orders recorded against an email address.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails. An email with no orders is an
    /// empty list, not an error.
    #[instrument(skip(self, email))]
    pub async fn orders_by_email(&self, email: &Email) -> Result<Vec<Order>, ApiError> {
        let url = format!(
            "{}/orders/email/{}",
            self.inner.base,
            urlencoding::encode(email.as_str())
        );

        let response: OrdersByEmailResponse = self.execute(self.inner.client.get(url)).await?;
        Ok(response.orders)
    }

    /// Fetch the saved addresses for the authenticated user.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the token is rejected.
    #[instrument(skip(self, token))]
    pub async fn list_addresses(&self, token: &SecretString) -> Result<Vec<Address>, ApiError> {
        let builder = self
            .inner
            .client
            .get(format!("{}/addresses", self.inner.base))
            .bearer_auth(token.expose_secret());

        let response: AddressesResponse = self.execute(builder).await?;
        Ok(response.addresses)
    }
}
