//! Core types for Fairprice.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod coordinate;
pub mod id;
pub mod price;
pub mod zip;

pub use coordinate::{Coordinate, CoordinateError, METERS_PER_MILE};
pub use id::*;
pub use price::{CurrencyCode, Price, PriceError};
pub use zip::{ZipCode, ZipCodeError};
