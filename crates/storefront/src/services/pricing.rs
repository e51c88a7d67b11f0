//! Price quotes backed by `PostgreSQL`.
//!
//! Loads the rows the proximity rule needs and hands them to
//! [`fairprice_core::PricingService`]. Every quote with a shopper zip scans
//! the full competitor table; there is no spatial index.

use sqlx::PgPool;
use thiserror::Error;

use fairprice_core::{
    InMemoryZipDirectory, PricingError, PricingService, Product, ProductId, ProximityRule, Quote,
    ZipCode, ZipCodeError,
};

use crate::db::{CompetitorRepository, ProductRepository, RepositoryError, ZipCodeRepository};

/// Errors that can occur while quoting a price.
#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("product {0} not found")]
    ProductNotFound(ProductId),

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<ZipCodeError> for QuoteError {
    fn from(err: ZipCodeError) -> Self {
        Self::Pricing(PricingError::InvalidZip(err))
    }
}

/// A product together with the price quoted for it.
#[derive(Debug, Clone)]
pub struct ProductQuote {
    pub product: Product,
    pub quote: Quote,
}

/// Quotes product prices for shoppers.
pub struct QuoteService<'a> {
    pool: &'a PgPool,
    rule: ProximityRule,
}

impl<'a> QuoteService<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool, rule: ProximityRule) -> Self {
        Self { pool, rule }
    }

    /// Quote `product_id` for a shopper in `shopper_zip`.
    ///
    /// The zip is validated before any query runs.
    ///
    /// # Errors
    ///
    /// Returns `QuoteError::Pricing` for a malformed or unknown shopper zip,
    /// `QuoteError::ProductNotFound` if the product does not exist, and
    /// `QuoteError::Repository` if a query fails.
    pub async fn quote(
        &self,
        product_id: ProductId,
        shopper_zip: Option<&str>,
    ) -> Result<ProductQuote, QuoteError> {
        let zip = ZipCode::parse_optional(shopper_zip)?;

        let product = ProductRepository::new(self.pool)
            .get_by_id(product_id)
            .await?
            .ok_or(QuoteError::ProductNotFound(product_id))?;

        let Some(zip) = zip else {
            let pricing = PricingService::new(InMemoryZipDirectory::new(), &[], self.rule);
            let quote = pricing.quote(&product, None)?;
            return Ok(ProductQuote { product, quote });
        };

        let competitors = CompetitorRepository::new(self.pool).list_all().await?;

        let mut zips: Vec<ZipCode> = competitors.iter().map(|c| c.zip.clone()).collect();
        zips.push(zip.clone());
        zips.sort();
        zips.dedup();

        let directory: InMemoryZipDirectory = ZipCodeRepository::new(self.pool)
            .find_many(&zips)
            .await?
            .into_iter()
            .collect();

        tracing::debug!(
            product_id = %product_id,
            competitors = competitors.len(),
            zips_resolved = directory.len(),
            "pricing product for shopper zip"
        );

        let pricing = PricingService::new(&directory, &competitors, self.rule);
        let quote = pricing.quote(&product, Some(zip.as_str()))?;
        Ok(ProductQuote { product, quote })
    }
}
