//! Product route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use fairprice_core::{CompetitorId, CurrencyCode, Product, ProductId, Quote};

use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::services::ProductQuote;
use crate::state::AppState;

/// Product display data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductView {
    pub id: ProductId,
    pub name: String,
    pub base_price: Decimal,
    pub currency: CurrencyCode,
}

impl From<Product> for ProductView {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            base_price: product.base_price.amount,
            currency: product.base_price.currency_code,
        }
    }
}

/// Competitor that triggered a discount.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchedCompetitorView {
    pub id: CompetitorId,
    pub name: String,
    pub distance_miles: f64,
}

/// Price quote display data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteView {
    pub product_id: ProductId,
    pub name: String,
    pub base_price: Decimal,
    pub adjusted_price: Decimal,
    pub currency: CurrencyCode,
    pub discount_applied: bool,
    pub discount_rate: Decimal,
    pub matched_competitor: Option<MatchedCompetitorView>,
}

impl QuoteView {
    #[must_use]
    pub fn new(name: String, quote: Quote) -> Self {
        Self {
            product_id: quote.product_id,
            name,
            base_price: quote.base_price.amount,
            adjusted_price: quote.adjusted_price.amount,
            currency: quote.adjusted_price.currency_code,
            discount_applied: quote.discount_applied(),
            discount_rate: quote.rate,
            matched_competitor: quote.matched_competitor.map(|m| MatchedCompetitorView {
                id: m.id,
                name: m.name,
                distance_miles: m.distance_miles,
            }),
        }
    }
}

/// Price query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct PriceQuery {
    /// Shopper postal code. Missing or blank means no proximity adjustment.
    pub zip: Option<String>,
}

/// List all products.
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<ProductView>>> {
    let products = ProductRepository::new(state.pool()).list().await?;
    Ok(Json(products.into_iter().map(ProductView::from).collect()))
}

/// Show one product at its base price.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ProductView>> {
    let id = ProductId::new(id);
    let product = ProductRepository::new(state.pool())
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;
    Ok(Json(product.into()))
}

/// Quote a product's price for the shopper's zip code.
pub async fn price(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<PriceQuery>,
) -> Result<Json<QuoteView>> {
    let id = ProductId::new(id);
    let ProductQuote { product, quote } = state.quotes().quote(id, query.zip.as_deref()).await?;

    if let Some(matched) = &quote.matched_competitor {
        tracing::info!(
            product_id = %id,
            competitor_id = %matched.id,
            distance_miles = matched.distance_miles,
            "proximity discount quoted"
        );
    }

    Ok(Json(QuoteView::new(product.name, quote)))
}
