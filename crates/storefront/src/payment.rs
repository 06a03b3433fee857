//! Payment verification flow.
//!
//! Runs when the gateway redirects the shopper back to the storefront.
//! Exactly one verification attempt per entry - no polling, no retries; a
//! page refresh simply re-runs it with the same reference, which is why the
//! backend must be idempotent per reference.

use tracing::instrument;
use url::Url;

use crate::api::types::PaymentConfirmation;
use crate::api::{ApiError, CommerceClient, GENERIC_NETWORK_MESSAGE};
use crate::store::CartStore;
use crate::store::storage::StorageAdapter;

const MISSING_REFERENCE_MESSAGE: &str = "No transaction reference was found in the return URL.";

/// Terminal state of a verification attempt.
#[derive(Debug, Clone)]
pub enum VerificationOutcome {
    /// The transaction was confirmed; the cart has been cleared.
    Success(PaymentConfirmation),
    /// The transaction could not be confirmed.
    Failed { message: String },
}

impl VerificationOutcome {
    /// Whether the payment was confirmed.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Extract the transaction reference from a gateway return URL.
///
/// The gateway is inconsistent about the parameter name - some flows send
/// `reference`, others `trxref` - so either is accepted, preferring
/// `reference` when both are present. Empty values count as absent.
#[must_use]
pub fn extract_reference(return_url: &Url) -> Option<String> {
    let mut reference = None;
    let mut trxref = None;

    for (key, value) in return_url.query_pairs() {
        match key.as_ref() {
            "reference" => reference = Some(value.into_owned()),
            "trxref" => trxref = Some(value.into_owned()),
            _ => {}
        }
    }

    reference.or(trxref).filter(|r| !r.is_empty())
}

/// Verify a gateway return and clear the cart on success.
///
/// With no reference in the URL the outcome is `Failed` and no request is
/// made. Server rejections surface their message verbatim; transport
/// failures collapse to a generic connection message. Clearing an
/// already-empty cart is a no-op, so re-verification after a refresh is
/// harmless.
#[instrument(skip_all, fields(url = %return_url))]
pub async fn verify_return<S: StorageAdapter>(
    client: &CommerceClient,
    cart: &mut CartStore<S>,
    return_url: &Url,
) -> VerificationOutcome {
    let Some(reference) = extract_reference(return_url) else {
        return VerificationOutcome::Failed {
            message: MISSING_REFERENCE_MESSAGE.to_string(),
        };
    };

    match client.verify_payment(&reference).await {
        Ok(confirmation) => {
            tracing::info!(reference = %confirmation.reference, "payment confirmed");
            if let Err(e) = cart.clear() {
                // The payment went through; a stale cart snapshot is
                // recoverable on the next mutation
                tracing::warn!(error = %e, "failed to clear cart after confirmed payment");
            }
            VerificationOutcome::Success(confirmation)
        }
        Err(ApiError::Api { message, .. }) => VerificationOutcome::Failed { message },
        Err(e) => {
            tracing::error!(error = %e, "payment verification request failed");
            VerificationOutcome::Failed {
                message: GENERIC_NETWORK_MESSAGE.to_string(),
            }
        }
    }
}
