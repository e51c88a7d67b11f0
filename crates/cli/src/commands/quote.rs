//! Quote a product's price from the command line.
//!
//! Uses the same configuration and quote path as the storefront, so the
//! `PRICING_*` variables apply here too.

use tracing::info;

use fairprice_core::ProductId;
use fairprice_storefront::config::StorefrontConfig;
use fairprice_storefront::db;
use fairprice_storefront::services::{ProductQuote, QuoteService};

/// Quote `product_id` for a shopper in `zip`.
///
/// # Errors
///
/// Returns an error if configuration is invalid, the product does not exist,
/// the zip is malformed or unknown, or a database operation fails.
pub async fn product(product_id: i32, zip: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let config = StorefrontConfig::from_env()?;
    let pool = db::create_pool(&config.database_url).await?;

    let service = QuoteService::new(&pool, config.pricing);
    let ProductQuote { product, quote } = service.quote(ProductId::new(product_id), zip).await?;

    info!("{} ({})", product.name, product.id);
    info!("  Base price:     {}", quote.base_price);
    info!("  Adjusted price: {}", quote.adjusted_price);

    match &quote.matched_competitor {
        Some(matched) => info!(
            "  Discount x{} applied: {} is {:.2} miles away",
            quote.rate, matched.name, matched.distance_miles
        ),
        None => info!("  No competitor within {} miles", config.pricing.radius_miles()),
    }

    Ok(())
}
