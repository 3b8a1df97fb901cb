//! Injury payout catalog: reference data and free-text search

mod data;
mod search;

pub use data::{CatalogError, InjuryCatalog, InjuryRecord};
