//! Cart and wishlist management commands.

use clap::{Args, Subcommand};
use rust_decimal::Decimal;

use aurelle_core::{CartItemId, CurrencyCode, Money, ProductId};
use aurelle_storefront::models::Product;
use aurelle_storefront::{CartStore, FileStorage, StorefrontConfig, WishlistStore};

/// Product fields shared by `cart add` and `wishlist add`.
#[derive(Args)]
pub struct ProductArgs {
    /// Product ID from the catalog
    #[arg(long)]
    pub id: String,

    /// Product name
    #[arg(long)]
    pub name: String,

    /// Unit price in the store currency
    #[arg(long)]
    pub price: Decimal,

    /// URL slug (defaults to the product ID)
    #[arg(long)]
    pub slug: Option<String>,

    /// Product image URL
    #[arg(long)]
    pub image: Option<String>,
}

impl From<ProductArgs> for Product {
    fn from(args: ProductArgs) -> Self {
        let slug = args.slug.unwrap_or_else(|| args.id.clone());
        Self {
            id: ProductId::new(args.id),
            name: args.name,
            slug,
            price: Money::new(args.price, CurrencyCode::default()),
            image_url: args.image,
        }
    }
}

#[derive(Subcommand)]
pub enum CartCommand {
    /// Add a product to the cart
    Add {
        #[command(flatten)]
        product: ProductArgs,

        /// Quantity to add
        #[arg(long, default_value_t = 1)]
        qty: u32,

        /// Size variant
        #[arg(long)]
        size: Option<String>,
    },
    /// List cart lines with the subtotal
    List,
    /// Remove a line by its item ID
    Remove { item_id: CartItemId },
    /// Set a line's quantity (zero removes it)
    SetQty { item_id: CartItemId, qty: u32 },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
pub enum WishlistCommand {
    /// Add a product to the wishlist
    Add {
        #[command(flatten)]
        product: ProductArgs,
    },
    /// List wishlisted products
    List,
    /// Remove a product by its ID
    Remove { product_id: String },
    /// Move a wishlisted product into the cart
    Move { product_id: String },
    /// Empty the wishlist
    Clear,
}

pub fn run_cart(
    command: CartCommand,
    config: &StorefrontConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let storage = FileStorage::open(&config.storage_dir)?;
    let mut cart = CartStore::load(&storage);

    match command {
        CartCommand::Add { product, qty, size } => {
            let id = cart.add_item(product.into(), qty, size)?;
            tracing::info!("Added to cart (line {id})");
        }
        CartCommand::List => {
            if cart.is_empty() {
                tracing::info!("Cart is empty");
            }
            for item in cart.items() {
                let size = item.size.as_deref().unwrap_or("-");
                tracing::info!(
                    "{}  {} x{} (size {size}) = {}",
                    item.id,
                    item.product.name,
                    item.quantity,
                    item.line_total()
                );
            }
            tracing::info!(
                "{} item(s), subtotal {}",
                cart.total_items(),
                cart.subtotal()
            );
        }
        CartCommand::Remove { item_id } => {
            cart.remove_item(item_id)?;
            tracing::info!("Removed line {item_id}");
        }
        CartCommand::SetQty { item_id, qty } => {
            cart.update_quantity(item_id, qty)?;
            tracing::info!("Updated line {item_id} to quantity {qty}");
        }
        CartCommand::Clear => {
            cart.clear()?;
            tracing::info!("Cart cleared");
        }
    }
    Ok(())
}

pub fn run_wishlist(
    command: WishlistCommand,
    config: &StorefrontConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let storage = FileStorage::open(&config.storage_dir)?;
    let mut wishlist = WishlistStore::load(&storage);

    match command {
        WishlistCommand::Add { product } => {
            wishlist.add(product.into())?;
            tracing::info!("Added to wishlist ({} item(s))", wishlist.total_items());
        }
        WishlistCommand::List => {
            if wishlist.total_items() == 0 {
                tracing::info!("Wishlist is empty");
            }
            for product in wishlist.products() {
                tracing::info!("{}  {} ({})", product.id, product.name, product.price);
            }
        }
        WishlistCommand::Remove { product_id } => {
            wishlist.remove(ProductId::new(product_id))?;
            tracing::info!("Removed from wishlist");
        }
        WishlistCommand::Move { product_id } => {
            let mut cart = CartStore::load(&storage);
            let moved = wishlist.move_to_cart(&ProductId::new(product_id), &mut cart)?;
            if moved {
                tracing::info!("Moved to cart ({} item(s) in cart)", cart.total_items());
            } else {
                tracing::warn!("Product is not on the wishlist");
            }
        }
        WishlistCommand::Clear => {
            wishlist.clear()?;
            tracing::info!("Wishlist cleared");
        }
    }
    Ok(())
}
