//! Integration tests for the payment verification flow.

use std::time::Duration;

use rust_decimal::Decimal;
use url::Url;

use aurelle_core::{CurrencyCode, Money, ProductId};
use aurelle_integration_tests::MockBackend;
use aurelle_storefront::models::Product;
use aurelle_storefront::store::MemoryStorage;
use aurelle_storefront::{CartStore, CommerceClient, VerificationOutcome, verify_return};

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
    cart.add_item(product("a", 850), 1, None).expect("add item");
    cart
}

fn client_for(backend: &MockBackend) -> CommerceClient {
    CommerceClient::new(&backend.base_url(), Duration::from_secs(5)).expect("build client")
}

fn return_url(query: &str) -> Url {
    Url::parse(&format!("https://aurelle.shop/checkout/verify{query}")).expect("return url")
}

#[tokio::test]
async fn test_success_clears_cart() {
    let backend = MockBackend::spawn().await;
    let client = client_for(&backend);
    let mut cart = cart_with_items();
    assert!(!cart.is_empty());

    let outcome = verify_return(&client, &mut cart, &return_url("?reference=ref_123")).await;

    match outcome {
        VerificationOutcome::Success(confirmation) => {
            assert_eq!(confirmation.reference, "ref_123");
            assert_eq!(confirmation.amount.amount, Decimal::from(1090));
        }
        VerificationOutcome::Failed { message } => panic!("expected success, got: {message}"),
    }
    assert!(cart.is_empty());
    assert_eq!(backend.verifications(), vec!["ref_123".to_string()]);
}

#[tokio::test]
async fn test_trxref_parameter_is_accepted() {
    let backend = MockBackend::spawn().await;
    let client = client_for(&backend);
    let mut cart = cart_with_items();

    let outcome = verify_return(&client, &mut cart, &return_url("?trxref=ref_456")).await;

    assert!(outcome.is_success());
    assert_eq!(backend.verifications(), vec!["ref_456".to_string()]);
}

#[tokio::test]
async fn test_missing_reference_makes_no_request() {
    let backend = MockBackend::spawn().await;
    let client = client_for(&backend);
    let mut cart = cart_with_items();

    let outcome = verify_return(&client, &mut cart, &return_url("")).await;

    assert!(!outcome.is_success());
    assert_eq!(backend.request_count(), 0);
    // The cart is untouched on failure
    assert!(!cart.is_empty());
}

#[tokio::test]
async fn test_rejection_surfaces_message_and_keeps_cart() {
    let backend = MockBackend::spawn().await;
    backend.reject_verification("Transaction not found");
    let client = client_for(&backend);
    let mut cart = cart_with_items();

    let outcome = verify_return(&client, &mut cart, &return_url("?reference=ref_999")).await;

    match outcome {
        VerificationOutcome::Failed { message } => {
            assert_eq!(message, "Transaction not found");
        }
        VerificationOutcome::Success(_) => panic!("expected failure"),
    }
    assert!(!cart.is_empty());
}

#[tokio::test]
async fn test_reentry_is_idempotent() {
    let backend = MockBackend::spawn().await;
    let client = client_for(&backend);
    let mut cart = cart_with_items();
    let url = return_url("?reference=ref_123");

    // First pass confirms and clears; a page refresh re-runs verification
    // with the same reference and must land on the same outcome
    let first = verify_return(&client, &mut cart, &url).await;
    let second = verify_return(&client, &mut cart, &url).await;

    assert!(first.is_success());
    assert!(second.is_success());
    assert!(cart.is_empty());
    assert_eq!(backend.verifications().len(), 2);
}
