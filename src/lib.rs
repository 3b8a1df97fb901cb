//! Protection Engine - rate resolution and classification for a term-life product
//!
//! This library provides:
//! - Premium resolution from the multi-dimensional rate sheet
//!   (nearest-age-at-or-above with clamp-to-maximum fallback)
//! - Daily-cost banding for sales comparisons
//! - Injury payout catalog with free-text search
//!
//! All queries are pure functions over immutable reference data: identical
//! inputs always produce identical results, and no lookup ever fails.
//! Combinations the product does not offer resolve to an explicit
//! unavailable state.

pub mod banding;
pub mod catalog;
pub mod quote;
pub mod tariff;

// Re-export commonly used types
pub use banding::{DailyCostBand, DailyCostScale};
pub use catalog::{InjuryCatalog, InjuryRecord};
pub use quote::{Quote, QuoteEngine};
pub use tariff::{RateTable, SmokerStatus, Tariff, TariffError};
