//! Checkout submission command.

use clap::Args;

use aurelle_storefront::api::types::AddressFields;
use aurelle_storefront::{
    CartStore, CheckoutFlow, CheckoutForm, CommerceClient, FileStorage, ShippingChoice,
    StorefrontConfig,
};

/// Guest checkout arguments. The cart comes from the persisted store.
#[derive(Args)]
pub struct CheckoutArgs {
    /// Full name
    #[arg(long)]
    pub name: String,

    /// Email address
    #[arg(long)]
    pub email: String,

    /// Phone number
    #[arg(long)]
    pub phone: String,

    /// Address line 1
    #[arg(long)]
    pub line1: String,

    /// Address line 2
    #[arg(long)]
    pub line2: Option<String>,

    /// City
    #[arg(long)]
    pub city: String,

    /// State or region
    #[arg(long)]
    pub state: String,

    /// Postal code
    #[arg(long)]
    pub postal_code: String,

    /// ISO country code
    #[arg(long)]
    pub country: String,

    /// Order notes
    #[arg(long)]
    pub notes: Option<String>,
}

pub async fn run(
    args: CheckoutArgs,
    config: &StorefrontConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let storage = FileStorage::open(&config.storage_dir)?;
    let cart = CartStore::load(&storage);
    let client = CommerceClient::new(&config.api_url, config.http_timeout)?;

    let form = CheckoutForm {
        customer_name: args.name,
        customer_email: args.email,
        customer_phone: args.phone,
        shipping: ShippingChoice::Manual(AddressFields {
            line1: args.line1,
            line2: args.line2,
            city: args.city,
            state: args.state,
            postal_code: args.postal_code,
            country: args.country,
        }),
        notes: args.notes,
        website: String::new(),
    };

    let mut flow = CheckoutFlow::new();
    match flow
        .submit(&client, &cart, None, &config.callback_url, form)
        .await
    {
        Ok(authorization_url) => {
            tracing::info!("Order created; complete payment at the gateway:");
            print_redirect(&authorization_url);
            Ok(())
        }
        Err(e) => {
            tracing::error!("{}", e.user_message());
            Err(e.into())
        }
    }
}

/// The redirect URL is the command's machine-consumable output.
#[allow(clippy::print_stdout)]
fn print_redirect(url: &url::Url) {
    println!("{url}");
}
