//! Proximity-based price adjustment.
//!
//! A product is discounted when any competitor sits within a fixed radius of
//! the shopper's zip code. The scan walks competitors in the order given and
//! stops at the first one that qualifies; it does not look for the nearest.
//!
//! ```
//! use fairprice_core::{
//!     Competitor, CompetitorId, Coordinate, InMemoryZipDirectory, Price, PricingService,
//!     Product, ProductId, ProximityRule, ZipCode, ZipCodeId, ZipCodeRecord,
//! };
//! use rust_decimal::Decimal;
//!
//! let zip = |id, code: &str, lat, lon| ZipCodeRecord {
//!     id: ZipCodeId::new(id),
//!     zip: ZipCode::parse(code).unwrap(),
//!     city: String::new(),
//!     state: String::new(),
//!     coordinate: Coordinate::new(lat, lon).unwrap(),
//! };
//! let directory: InMemoryZipDirectory =
//!     [zip(1, "94103", 37.77, -122.41), zip(2, "94109", 37.78, -122.42)]
//!         .into_iter()
//!         .collect();
//! let competitors = [Competitor {
//!     id: CompetitorId::new(1),
//!     name: "Corner Shop".into(),
//!     address: "1 Polk St".into(),
//!     zip: ZipCode::parse("94109").unwrap(),
//! }];
//! let product = Product {
//!     id: ProductId::new(1),
//!     name: "Kettle".into(),
//!     base_price: Price::usd(Decimal::new(10_000, 2)).unwrap(),
//! };
//!
//! let pricing = PricingService::new(&directory, &competitors, ProximityRule::default());
//! let price = pricing.adjusted_price(&product, Some("94103")).unwrap();
//! assert_eq!(price.amount, Decimal::new(8_000, 2));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{Competitor, Product};
use crate::directory::ZipDirectory;
use crate::types::{CompetitorId, Coordinate, Price, ProductId, ZipCode, ZipCodeError};

/// Default proximity radius in statute miles.
pub const DEFAULT_RADIUS_MILES: f64 = 5.0;

/// Default multiplier applied to the base price when a competitor is near (0.8).
pub const DEFAULT_DISCOUNT_RATE: Decimal = Decimal::from_parts(8, 0, 0, false, 1);

/// Errors from constructing a [`ProximityRule`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuleError {
    #[error("radius must be a positive number of miles (got {0})")]
    InvalidRadius(f64),
    #[error("discount rate must be greater than 0 and at most 1 (got {0})")]
    InvalidRate(Decimal),
}

/// Errors from pricing a product for a shopper.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    /// The shopper-supplied zip is malformed.
    #[error("invalid zip code: {0}")]
    InvalidZip(#[from] ZipCodeError),

    /// The shopper-supplied zip is well formed but not in the geocoding table.
    #[error("unknown zip code: {0}")]
    UnknownShopperZip(ZipCode),
}

/// The discount rule: which radius counts as "near" and how much to take off.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityRule {
    radius_miles: f64,
    discount_rate: Decimal,
}

impl ProximityRule {
    /// Create a rule.
    ///
    /// # Errors
    ///
    /// Returns an error if `radius_miles` is not a positive finite number or
    /// `discount_rate` is outside `(0, 1]`.
    pub fn new(radius_miles: f64, discount_rate: Decimal) -> Result<Self, RuleError> {
        if !radius_miles.is_finite() || radius_miles <= 0.0 {
            return Err(RuleError::InvalidRadius(radius_miles));
        }
        if discount_rate <= Decimal::ZERO || discount_rate > Decimal::ONE {
            return Err(RuleError::InvalidRate(discount_rate));
        }
        Ok(Self {
            radius_miles,
            discount_rate,
        })
    }

    #[must_use]
    pub const fn radius_miles(&self) -> f64 {
        self.radius_miles
    }

    #[must_use]
    pub const fn discount_rate(&self) -> Decimal {
        self.discount_rate
    }

    /// Whether a competitor `distance_miles` away triggers the discount.
    ///
    /// The comparison is strict: a competitor exactly on the radius does not
    /// qualify.
    #[must_use]
    pub fn qualifies(&self, distance_miles: f64) -> bool {
        distance_miles < self.radius_miles
    }
}

impl Default for ProximityRule {
    fn default() -> Self {
        Self {
            radius_miles: DEFAULT_RADIUS_MILES,
            discount_rate: DEFAULT_DISCOUNT_RATE,
        }
    }
}

/// The competitor that triggered a discount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitorMatch {
    pub id: CompetitorId,
    pub name: String,
    pub distance_miles: f64,
}

/// The outcome of pricing one product for one shopper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub product_id: ProductId,
    pub base_price: Price,
    pub adjusted_price: Price,
    /// Multiplier applied to the base price (1 when no discount).
    pub rate: Decimal,
    /// Set when a competitor within the radius was found.
    pub matched_competitor: Option<CompetitorMatch>,
}

impl Quote {
    fn undiscounted(product: &Product) -> Self {
        Self {
            product_id: product.id,
            base_price: product.base_price,
            adjusted_price: product.base_price,
            rate: Decimal::ONE,
            matched_competitor: None,
        }
    }

    /// Whether the proximity discount was applied.
    #[must_use]
    pub const fn discount_applied(&self) -> bool {
        self.matched_competitor.is_some()
    }
}

/// Computes the price a shopper is shown for a product.
///
/// Borrows the geocoding directory and the full competitor list; pricing is
/// read-only and safe to run from many threads at once.
#[derive(Debug, Clone)]
pub struct PricingService<'a, D> {
    directory: D,
    competitors: &'a [Competitor],
    rule: ProximityRule,
}

impl<'a, D: ZipDirectory> PricingService<'a, D> {
    /// Create a pricing service over `competitors`, scanned in slice order.
    #[must_use]
    pub const fn new(directory: D, competitors: &'a [Competitor], rule: ProximityRule) -> Self {
        Self {
            directory,
            competitors,
            rule,
        }
    }

    #[must_use]
    pub const fn rule(&self) -> &ProximityRule {
        &self.rule
    }

    /// Price `product` for a shopper in `shopper_zip`.
    ///
    /// A missing or blank zip returns the base price unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::InvalidZip`] if the zip is malformed and
    /// [`PricingError::UnknownShopperZip`] if it is not in the directory.
    pub fn quote(&self, product: &Product, shopper_zip: Option<&str>) -> Result<Quote, PricingError> {
        let Some(zip) = ZipCode::parse_optional(shopper_zip)? else {
            return Ok(Quote::undiscounted(product));
        };

        let origin = self
            .directory
            .locate(&zip)
            .ok_or_else(|| PricingError::UnknownShopperZip(zip))?;

        let Some(matched) = self.first_competitor_near(origin) else {
            return Ok(Quote::undiscounted(product));
        };

        tracing::debug!(
            product_id = %product.id,
            competitor_id = %matched.id,
            distance_miles = matched.distance_miles,
            "proximity discount applied"
        );

        let rate = self.rule.discount_rate;
        Ok(Quote {
            product_id: product.id,
            base_price: product.base_price,
            adjusted_price: product.base_price.scaled(rate),
            rate,
            matched_competitor: Some(matched),
        })
    }

    /// Price `product` for a shopper in `shopper_zip`, returning only the amount.
    ///
    /// # Errors
    ///
    /// Same as [`PricingService::quote`].
    pub fn adjusted_price(
        &self,
        product: &Product,
        shopper_zip: Option<&str>,
    ) -> Result<Price, PricingError> {
        self.quote(product, shopper_zip).map(|q| q.adjusted_price)
    }

    /// The first competitor, in scan order, strictly inside the radius.
    ///
    /// Competitors whose zip is not in the directory are skipped.
    #[must_use]
    pub fn first_competitor_near(&self, origin: Coordinate) -> Option<CompetitorMatch> {
        self.competitors.iter().find_map(|competitor| {
            let Some(location) = self.directory.locate(&competitor.zip) else {
                tracing::debug!(
                    competitor_id = %competitor.id,
                    zip = %competitor.zip,
                    "competitor zip not in directory, skipping"
                );
                return None;
            };

            let distance_miles = origin.distance_miles(&location);
            self.rule.qualifies(distance_miles).then(|| CompetitorMatch {
                id: competitor.id,
                name: competitor.name.clone(),
                distance_miles,
            })
        })
    }
}
