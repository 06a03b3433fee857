//! Payment verification and order tracking commands.

use url::Url;

use aurelle_storefront::{
    CartStore, CommerceClient, FileStorage, StorefrontConfig, TrackingOutcome,
    VerificationOutcome, track_orders, verify_return,
};

pub async fn verify(
    return_url: &str,
    config: &StorefrontConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let return_url = Url::parse(return_url)?;
    let storage = FileStorage::open(&config.storage_dir)?;
    let mut cart = CartStore::load(&storage);
    let client = CommerceClient::new(&config.api_url, config.http_timeout)?;

    match verify_return(&client, &mut cart, &return_url).await {
        VerificationOutcome::Success(confirmation) => {
            tracing::info!(
                "Payment confirmed: reference {} for {}",
                confirmation.reference,
                confirmation.amount
            );
            if let Some(order_number) = confirmation.order_number {
                tracing::info!("Order {order_number} is paid");
            }
            tracing::info!("Cart cleared");
            Ok(())
        }
        VerificationOutcome::Failed { message } => {
            tracing::error!("Verification failed: {message}");
            Err(message.into())
        }
    }
}

pub async fn track(
    email: &str,
    config: &StorefrontConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = CommerceClient::new(&config.api_url, config.http_timeout)?;

    match track_orders(&client, email).await? {
        TrackingOutcome::NoOrders => {
            tracing::info!("No orders found for {email}");
        }
        TrackingOutcome::Found(orders) => {
            for order in orders {
                tracing::info!(
                    "{}  {}  {}  ({})",
                    order.order_number,
                    order.created_at.format("%Y-%m-%d"),
                    order.total,
                    order.status.label()
                );
                for entry in &order.status_history {
                    tracing::info!(
                        "    {}  {}",
                        entry.changed_at.format("%Y-%m-%d %H:%M"),
                        entry.status.label()
                    );
                }
            }
        }
    }
    Ok(())
}
