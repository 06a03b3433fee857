//! Aurelle CLI - Drive the storefront library from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Cart management (persisted under AURELLE_STORAGE_DIR)
//! aurelle cart add --id prod_1 --name "Silk Scarf" --price 850 --qty 2 --size M
//! aurelle cart list
//! aurelle cart set-qty <ITEM_ID> 3
//! aurelle cart clear
//!
//! # Wishlist management
//! aurelle wishlist add --id prod_2 --name "Cashmere Throw" --price 320
//! aurelle wishlist move prod_2
//!
//! # Flows against the commerce backend (AURELLE_API_URL)
//! aurelle checkout --name "Guest" --email guest@example.com --phone "+33123456789" \
//!     --line1 "12 Rue de la Paix" --city Paris --state "Île-de-France" \
//!     --postal-code 75002 --country FR
//! aurelle verify "https://aurelle.shop/checkout/verify?reference=ref_123"
//! aurelle track guest@example.com
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

use aurelle_storefront::StorefrontConfig;

mod commands;

#[derive(Parser)]
#[command(name = "aurelle")]
#[command(author, version, about = "Aurelle storefront CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the persisted cart
    Cart {
        #[command(subcommand)]
        action: commands::cart::CartCommand,
    },
    /// Manage the persisted wishlist
    Wishlist {
        #[command(subcommand)]
        action: commands::cart::WishlistCommand,
    },
    /// Submit the cart for checkout and print the gateway redirect URL
    Checkout(commands::checkout::CheckoutArgs),
    /// Verify a payment return URL and clear the cart on success
    Verify {
        /// The full return URL the gateway redirected to
        return_url: String,
    },
    /// Look up all orders for an email address
    Track {
        /// Email the orders were placed under
        email: String,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

#[tokio::main]
async fn main() {
    // Initialize tracing with EnvFilter; defaults to info if RUST_LOG is unset
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "aurelle=info,aurelle_storefront=info".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    let _sentry_guard = init_sentry(&config);

    if let Err(e) = run(cli, &config).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: &StorefrontConfig) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Cart { action } => commands::cart::run_cart(action, config)?,
        Commands::Wishlist { action } => commands::cart::run_wishlist(action, config)?,
        Commands::Checkout(args) => commands::checkout::run(args, config).await?,
        Commands::Verify { return_url } => commands::orders::verify(&return_url, config).await?,
        Commands::Track { email } => commands::orders::track(&email, config).await?,
    }
    Ok(())
}
