//! Catalog domain types.
//!
//! These types represent validated domain objects separate from database row
//! types. None of them store derived pricing state; adjusted prices are
//! always computed on demand by [`crate::pricing::PricingService`].

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{CompetitorId, Coordinate, Price, ProductId, ZipCode, ZipCodeId};

/// A product sold online.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Surrogate key.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Undiscounted price, subject to proximity adjustment.
    pub base_price: Price,
}

impl Product {
    /// The undiscounted price.
    #[must_use]
    pub const fn base_price(&self) -> Price {
        self.base_price
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A rival seller's physical location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Competitor {
    /// Surrogate key.
    pub id: CompetitorId,
    /// Business name.
    pub name: String,
    /// Free-form street address.
    pub address: String,
    /// Postal code, resolved against the geocoding table by value.
    pub zip: ZipCode,
}

impl fmt::Display for Competitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.name, self.address)
    }
}

/// One row of the zip code geocoding table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZipCodeRecord {
    /// Surrogate key. Lower IDs win when a zip appears more than once.
    pub id: ZipCodeId,
    /// Postal code.
    pub zip: ZipCode,
    /// City served by the postal code.
    pub city: String,
    /// State or province abbreviation.
    pub state: String,
    /// Representative point for the postal code.
    pub coordinate: Coordinate,
}

impl ZipCodeRecord {
    /// The representative point for this postal code.
    #[must_use]
    pub const fn coordinate(&self) -> Coordinate {
        self.coordinate
    }
}

impl fmt::Display for ZipCodeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {} {}", self.city, self.state, self.zip)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_product_display_and_base_price() {
        let product = Product {
            id: ProductId::new(1),
            name: "Espresso Machine".to_string(),
            base_price: Price::usd(Decimal::new(24_999, 2)).unwrap(),
        };
        assert_eq!(product.to_string(), "Espresso Machine");
        assert_eq!(product.base_price().amount, Decimal::new(24_999, 2));
    }

    #[test]
    fn test_competitor_display() {
        let competitor = Competitor {
            id: CompetitorId::new(1),
            name: "Bean There".to_string(),
            address: "12 Valencia St".to_string(),
            zip: ZipCode::parse("94103").unwrap(),
        };
        assert_eq!(competitor.to_string(), "Bean There, 12 Valencia St");
    }

    #[test]
    fn test_zip_code_record_display() {
        let record = ZipCodeRecord {
            id: ZipCodeId::new(1),
            zip: ZipCode::parse("94103").unwrap(),
            city: "San Francisco".to_string(),
            state: "CA".to_string(),
            coordinate: Coordinate::new(37.77, -122.41).unwrap(),
        };
        assert_eq!(record.to_string(), "San Francisco, CA 94103");
        assert!((record.coordinate().latitude() - 37.77).abs() < f64::EPSILON);
    }
}
