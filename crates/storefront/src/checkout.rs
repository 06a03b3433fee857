//! Checkout submission flow.
//!
//! Drives a cart through order creation and payment initialization, ending
//! in a full-page redirect to the gateway's hosted checkout. The flow is a
//! small state machine; any failure returns it to `Idle` with no side
//! effects (a pending order left behind on the backend is the backend's
//! reconciliation problem, not compensated here).

use thiserror::Error;
use tracing::instrument;
use url::Url;

use aurelle_core::{AddressId, Email};

use crate::api::types::{
    AddressFields, CreateOrderRequest, InitializePaymentRequest, OrderItemPayload,
};
use crate::api::{ApiError, CommerceClient, GENERIC_NETWORK_MESSAGE};
use crate::models::UserSession;
use crate::store::storage::StorageAdapter;
use crate::store::CartStore;

/// Where the flow currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckoutPhase {
    #[default]
    Idle,
    Validating,
    CreatingOrder,
    InitializingPayment,
    /// Payment session opened; control is leaving the application.
    Redirecting,
}

/// A missing or invalid field group, reported without attempting submission.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Your cart is empty.")]
    EmptyCart,
    #[error("Please fill in your name, email, and phone number.")]
    MissingContact,
    #[error("Please enter a valid email address.")]
    InvalidEmail,
    #[error("Please complete your shipping address.")]
    MissingShippingAddress,
}

/// Errors from checkout submission.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// A submission is already in flight (or has redirected).
    #[error("a checkout is already in progress")]
    InFlight,

    /// The honeypot field was populated.
    #[error("bot submission detected")]
    BotDetected,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Api(#[from] ApiError),

    /// The gateway handed back something that is not a URL.
    #[error("gateway returned an invalid authorization URL: {0}")]
    InvalidAuthorizationUrl(url::ParseError),
}

impl CheckoutError {
    /// The message shown to the shopper.
    ///
    /// Server rejections are surfaced verbatim; transport and parse
    /// failures collapse to a generic connection message.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::InFlight => "Your order is already being submitted.".to_string(),
            Self::BotDetected => "Your submission could not be processed.".to_string(),
            Self::Validation(e) => e.to_string(),
            Self::Api(ApiError::Api { message, .. }) => message.clone(),
            Self::Api(_) | Self::InvalidAuthorizationUrl(_) => GENERIC_NETWORK_MESSAGE.to_string(),
        }
    }
}

/// How the shopper chose their shipping address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShippingChoice {
    /// A saved address on the signed-in account.
    Saved(AddressId),
    /// Manually entered fields.
    Manual(AddressFields),
}

impl Default for ShippingChoice {
    fn default() -> Self {
        Self::Manual(AddressFields::default())
    }
}

/// The checkout form as submitted by the page.
#[derive(Debug, Clone, Default)]
pub struct CheckoutForm {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub shipping: ShippingChoice,
    pub notes: Option<String>,
    /// Honeypot. Hidden in the UI; any content means a bot filled the form.
    pub website: String,
}

/// Validated checkout data, ready to become an order request.
struct ValidatedCheckout {
    name: String,
    email: Email,
    phone: String,
    address_id: Option<AddressId>,
    shipping_address: Option<AddressFields>,
    notes: Option<String>,
}

/// Validate a form against the shopper's identity.
///
/// Guests must supply full contact details and a complete manual address;
/// signed-in shoppers may pick a saved address and inherit blank contact
/// fields from their account.
fn validate(
    form: CheckoutForm,
    session: Option<&UserSession>,
    cart_is_empty: bool,
) -> Result<ValidatedCheckout, ValidationError> {
    if cart_is_empty {
        return Err(ValidationError::EmptyCart);
    }

    let name = form.customer_name.trim().to_string();
    let raw_email = form.customer_email.trim().to_string();
    let phone = form.customer_phone.trim().to_string();

    let (name, email, phone) = match session {
        Some(session) => {
            let name = if name.is_empty() {
                session.user.name.clone()
            } else {
                name
            };
            let email = if raw_email.is_empty() {
                session.user.email.clone()
            } else {
                Email::parse(&raw_email).map_err(|_| ValidationError::InvalidEmail)?
            };
            (name, email, phone)
        }
        None => {
            if name.is_empty() || raw_email.is_empty() || phone.is_empty() {
                return Err(ValidationError::MissingContact);
            }
            let email = Email::parse(&raw_email).map_err(|_| ValidationError::InvalidEmail)?;
            (name, email, phone)
        }
    };

    let (address_id, shipping_address) = match form.shipping {
        ShippingChoice::Saved(id) => {
            if session.is_none() {
                // Saved addresses only exist on accounts
                return Err(ValidationError::MissingShippingAddress);
            }
            (Some(id), None)
        }
        ShippingChoice::Manual(fields) => {
            if !fields.is_complete() {
                return Err(ValidationError::MissingShippingAddress);
            }
            (None, Some(fields))
        }
    };

    let notes = form
        .notes
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());

    Ok(ValidatedCheckout {
        name,
        email,
        phone,
        address_id,
        shipping_address,
        notes,
    })
}

/// The checkout submission state machine.
#[derive(Debug, Default)]
pub struct CheckoutFlow {
    phase: CheckoutPhase,
}

impl CheckoutFlow {
    /// A fresh flow in `Idle`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current phase.
    #[must_use]
    pub const fn phase(&self) -> CheckoutPhase {
        self.phase
    }

    /// Return the flow to `Idle` (e.g. the shopper navigated back from the
    /// gateway without paying).
    pub fn reset(&mut self) {
        self.phase = CheckoutPhase::Idle;
    }

    /// Submit the cart for checkout.
    ///
    /// On success the flow is left in `Redirecting` and the returned URL is
    /// the gateway's hosted checkout page; the caller performs a full-page
    /// redirect and control leaves the application. On any error the flow
    /// returns to `Idle` and nothing was persisted client-side.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::InFlight`] if the flow is not `Idle`
    /// - [`CheckoutError::BotDetected`] if the honeypot is populated
    ///   (no request is made)
    /// - [`CheckoutError::Validation`] for missing field groups
    ///   (no request is made)
    /// - [`CheckoutError::Api`] when either backend step fails
    #[instrument(skip_all)]
    pub async fn submit<S: StorageAdapter>(
        &mut self,
        client: &CommerceClient,
        cart: &CartStore<S>,
        session: Option<&UserSession>,
        callback_url: &Url,
        form: CheckoutForm,
    ) -> Result<Url, CheckoutError> {
        if self.phase != CheckoutPhase::Idle {
            return Err(CheckoutError::InFlight);
        }

        let result = self.run(client, cart, session, callback_url, form).await;
        if result.is_err() {
            self.phase = CheckoutPhase::Idle;
        }
        result
    }

    async fn run<S: StorageAdapter>(
        &mut self,
        client: &CommerceClient,
        cart: &CartStore<S>,
        session: Option<&UserSession>,
        callback_url: &Url,
        form: CheckoutForm,
    ) -> Result<Url, CheckoutError> {
        self.phase = CheckoutPhase::Validating;

        if !form.website.trim().is_empty() {
            tracing::warn!("honeypot field populated, dropping submission");
            return Err(CheckoutError::BotDetected);
        }

        let validated = validate(form, session, cart.is_empty())?;

        self.phase = CheckoutPhase::CreatingOrder;
        let request = CreateOrderRequest {
            customer_name: validated.name,
            customer_email: validated.email.clone(),
            customer_phone: validated.phone,
            items: cart.items().iter().map(OrderItemPayload::from).collect(),
            subtotal: cart.subtotal(),
            total: cart.total(),
            address_id: validated.address_id,
            shipping_address: validated.shipping_address,
            notes: validated.notes,
        };
        let token = session.map(|s| &s.token);
        let order = client.create_order(&request, token).await?;
        tracing::info!(order_id = %order.id, order_number = %order.order_number, "order created");

        self.phase = CheckoutPhase::InitializingPayment;
        let payment = client
            .initialize_payment(&InitializePaymentRequest {
                order_id: order.id,
                email: validated.email,
                amount: cart.total(),
                callback_url: callback_url.to_string(),
            })
            .await?;

        let authorization_url = Url::parse(&payment.authorization_url)
            .map_err(CheckoutError::InvalidAuthorizationUrl)?;

        self.phase = CheckoutPhase::Redirecting;
        Ok(authorization_url)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::{AccountUser, Product};
    use crate::store::storage::MemoryStorage;
    use aurelle_core::{CurrencyCode, Money, ProductId};
    use rust_decimal::Decimal;
    use secrecy::SecretString;
    use std::time::Duration;

    fn product(id: &str, price: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            slug: format!("product-{id}"),
            price: Money::new(Decimal::from(price), CurrencyCode::USD),
            image_url: None,
        }
    }

    fn cart_with_items() -> CartStore<MemoryStorage> {
        let mut cart = CartStore::load(MemoryStorage::new());
        cart.add_item(product("a", 850), 1, None).unwrap();
        cart.add_item(product("b", 120), 2, None).unwrap();
        cart
    }

    /// A client pointed at a dead address: any attempted request would fail
    /// with a transport error, so tests asserting validation-class errors
    /// also prove no request was issued.
    fn dead_end_client() -> CommerceClient {
        CommerceClient::new(
            &Url::parse("http://127.0.0.1:9").unwrap(),
            Duration::from_millis(100),
        )
        .unwrap()
    }

    fn manual_address() -> ShippingChoice {
        ShippingChoice::Manual(AddressFields {
            line1: "12 Rue de la Paix".to_string(),
            line2: None,
            city: "Paris".to_string(),
            state: "Île-de-France".to_string(),
            postal_code: "75002".to_string(),
            country: "FR".to_string(),
        })
    }

    fn guest_form() -> CheckoutForm {
        CheckoutForm {
            customer_name: "Guest Shopper".to_string(),
            customer_email: "guest@example.com".to_string(),
            customer_phone: "+33123456789".to_string(),
            shipping: manual_address(),
            notes: None,
            website: String::new(),
        }
    }

    fn account_session() -> UserSession {
        UserSession::new(
            AccountUser {
                name: "Ada".to_string(),
                email: Email::parse("ada@example.com").unwrap(),
            },
            SecretString::from("tok_123"),
        )
    }

    fn callback() -> Url {
        Url::parse("https://aurelle.shop/checkout/verify").unwrap()
    }

    #[tokio::test]
    async fn test_guest_missing_contact_fails_without_request() {
        let cart = cart_with_items();
        let mut flow = CheckoutFlow::new();
        let form = CheckoutForm {
            customer_name: String::new(),
            customer_email: String::new(),
            ..guest_form()
        };

        let err = flow
            .submit(&dead_end_client(), &cart, None, &callback(), form)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CheckoutError::Validation(ValidationError::MissingContact)
        ));
        assert_eq!(flow.phase(), CheckoutPhase::Idle);
    }

    #[tokio::test]
    async fn test_honeypot_fails_without_request() {
        let cart = cart_with_items();
        let mut flow = CheckoutFlow::new();
        let form = CheckoutForm {
            website: "https://spam.example".to_string(),
            ..guest_form()
        };

        let err = flow
            .submit(&dead_end_client(), &cart, None, &callback(), form)
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::BotDetected));
        assert_eq!(flow.phase(), CheckoutPhase::Idle);
    }

    #[tokio::test]
    async fn test_empty_cart_is_rejected() {
        let cart = CartStore::load(MemoryStorage::new());
        let mut flow = CheckoutFlow::new();

        let err = flow
            .submit(&dead_end_client(), &cart, None, &callback(), guest_form())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CheckoutError::Validation(ValidationError::EmptyCart)
        ));
    }

    #[test]
    fn test_guest_cannot_use_saved_address() {
        let form = CheckoutForm {
            shipping: ShippingChoice::Saved(AddressId::new("addr_1")),
            ..guest_form()
        };

        let err = validate(form, None, false).unwrap_err();
        assert_eq!(err, ValidationError::MissingShippingAddress);
    }

    #[test]
    fn test_guest_invalid_email() {
        let form = CheckoutForm {
            customer_email: "not-an-email".to_string(),
            ..guest_form()
        };

        let err = validate(form, None, false).unwrap_err();
        assert_eq!(err, ValidationError::InvalidEmail);
    }

    #[test]
    fn test_incomplete_manual_address() {
        let form = CheckoutForm {
            shipping: ShippingChoice::Manual(AddressFields {
                line1: "12 Rue de la Paix".to_string(),
                ..AddressFields::default()
            }),
            ..guest_form()
        };

        let err = validate(form, None, false).unwrap_err();
        assert_eq!(err, ValidationError::MissingShippingAddress);
    }

    #[test]
    fn test_account_inherits_blank_contact_fields() {
        let session = account_session();
        let form = CheckoutForm {
            customer_name: String::new(),
            customer_email: String::new(),
            customer_phone: String::new(),
            shipping: ShippingChoice::Saved(AddressId::new("addr_1")),
            notes: Some("  ".to_string()),
            website: String::new(),
        };

        let validated = validate(form, Some(&session), false).unwrap();
        assert_eq!(validated.name, "Ada");
        assert_eq!(validated.email.as_str(), "ada@example.com");
        assert_eq!(validated.address_id, Some(AddressId::new("addr_1")));
        assert!(validated.shipping_address.is_none());
        assert!(validated.notes.is_none());
    }

    #[tokio::test]
    async fn test_submit_twice_is_rejected() {
        let cart = cart_with_items();
        let mut flow = CheckoutFlow::new();
        // First submission hits the dead-end backend and resets to Idle
        let _ = flow
            .submit(&dead_end_client(), &cart, None, &callback(), guest_form())
            .await;
        assert_eq!(flow.phase(), CheckoutPhase::Idle);

        // Simulate an in-flight submission
        flow.phase = CheckoutPhase::CreatingOrder;
        let err = flow
            .submit(&dead_end_client(), &cart, None, &callback(), guest_form())
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::InFlight));

        // Navigating back from the gateway resets the flow
        flow.reset();
        assert_eq!(flow.phase(), CheckoutPhase::Idle);
    }
}
