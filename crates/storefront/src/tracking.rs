//! Order tracking flow.
//!
//! Given a free-text email, fetch every order recorded against it and hand
//! back the status history for rendering. The trust boundary is knowledge
//! of the email address; there is no authentication and no pagination.

use thiserror::Error;
use tracing::instrument;

use aurelle_core::{Email, EmailError};

use crate::api::{ApiError, CommerceClient};
use crate::models::Order;

/// Result of a tracking lookup. An empty result is not an error - the two
/// render differently.
#[derive(Debug, Clone)]
pub enum TrackingOutcome {
    /// Orders found, newest-first as served by the backend.
    Found(Vec<Order>),
    /// The email has no orders.
    NoOrders,
}

/// Errors from a tracking lookup.
#[derive(Debug, Error)]
pub enum TrackingError {
    #[error("Please enter a valid email address.")]
    InvalidEmail(#[from] EmailError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Look up all orders for an email address.
///
/// # Errors
///
/// Returns [`TrackingError::InvalidEmail`] for malformed input (no request
/// is made) and [`TrackingError::Api`] when the lookup itself fails.
#[instrument(skip_all)]
pub async fn track_orders(
    client: &CommerceClient,
    email: &str,
) -> Result<TrackingOutcome, TrackingError> {
    let email = Email::parse(email)?;
    let orders = client.orders_by_email(&email).await?;

    if orders.is_empty() {
        Ok(TrackingOutcome::NoOrders)
    } else {
        Ok(TrackingOutcome::Found(orders))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::time::Duration;
    use url::Url;

    #[tokio::test]
    async fn test_invalid_email_fails_without_request() {
        // Dead-end backend: a request would produce an Api error instead
        let client = CommerceClient::new(
            &Url::parse("http://127.0.0.1:9").unwrap(),
            Duration::from_millis(100),
        )
        .unwrap();

        let err = track_orders(&client, "not-an-email").await.unwrap_err();
        assert!(matches!(err, TrackingError::InvalidEmail(_)));
    }
}
