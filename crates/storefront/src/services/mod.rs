//! Business logic services for storefront.
//!
//! # Services
//!
//! - `pricing` - Competitor-proximity price quotes

pub mod pricing;

pub use pricing::{ProductQuote, QuoteError, QuoteService};
