//! Fairprice Core - Shared types and the proximity pricing rule.
//!
//! This crate provides the domain used across all Fairprice components:
//! - `storefront` - Public HTTP API that quotes prices
//! - `cli` - Command-line tools for migrations, seeding and quoting
//!
//! # Architecture
//!
//! The core crate contains only types, traits and pure computation - no I/O,
//! no database access, no HTTP. Callers load products, competitors and zip
//! code rows however they like and hand them to [`PricingService`].
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, zip codes and coordinates
//! - [`catalog`] - Products, competitors and zip code records
//! - [`directory`] - Zip code to coordinate lookup
//! - [`pricing`] - The competitor-proximity discount

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod directory;
pub mod pricing;
pub mod types;

pub use catalog::{Competitor, Product, ZipCodeRecord};
pub use directory::{InMemoryZipDirectory, ZipDirectory};
pub use pricing::{
    CompetitorMatch, DEFAULT_DISCOUNT_RATE, DEFAULT_RADIUS_MILES, PricingError, PricingService,
    ProximityRule, Quote, RuleError,
};
pub use types::*;
