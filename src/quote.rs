//! Quote facade over the tariff and injury catalog
//!
//! Holds the immutable reference data once and answers pure, reentrant
//! queries. Callers re-invoke `quote` whenever a parameter changes; identical
//! inputs always produce identical quotes, so callers may memoize externally
//! if they want to.

use std::path::Path;

use serde::Serialize;
use thiserror::Error;

use crate::catalog::{CatalogError, InjuryCatalog, InjuryRecord};
use crate::tariff::{SmokerStatus, Tariff, TariffError};

/// Errors raised while assembling an engine from CSV reference data
#[derive(Debug, Error)]
pub enum EngineLoadError {
    #[error(transparent)]
    Tariff(#[from] TariffError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// A resolved quote for one parameter combination.
///
/// `annual_premium` is `None` when the combination is not offered; the
/// derived daily cost and band label are absent in that case too.
#[derive(Debug, Clone, Serialize)]
pub struct Quote {
    pub age: u8,
    pub smoker: SmokerStatus,
    pub capital: u32,
    pub duration: u16,
    pub annual_premium: Option<f64>,
    pub daily_cost: Option<f64>,
    pub daily_band: Option<String>,
}

impl Quote {
    pub fn is_available(&self) -> bool {
        self.annual_premium.is_some()
    }
}

/// Pre-loaded engine answering quote and catalog queries
#[derive(Debug, Clone)]
pub struct QuoteEngine {
    tariff: Tariff,
    catalog: InjuryCatalog,
}

impl QuoteEngine {
    /// Engine backed by the built-in reference data
    pub fn new() -> Self {
        Self {
            tariff: Tariff::default_product(),
            catalog: InjuryCatalog::builtin(),
        }
    }

    /// Engine backed by specific reference data
    pub fn with_parts(tariff: Tariff, catalog: InjuryCatalog) -> Self {
        Self { tariff, catalog }
    }

    /// Engine backed by CSV reference data in the given directory
    pub fn from_csv_path(path: &Path) -> Result<Self, EngineLoadError> {
        Ok(Self {
            tariff: Tariff::from_csv_path(path)?,
            catalog: InjuryCatalog::from_csv_path(path)?,
        })
    }

    /// Resolve a quote for one parameter combination.
    ///
    /// Never fails: combinations the rate sheet does not offer come back as
    /// an unavailable quote, not an error.
    pub fn quote(&self, age: u8, smoker: bool, capital: u32, duration: u16) -> Quote {
        let smoker = SmokerStatus::from_flag(smoker);
        let annual_premium = self.tariff.rates.resolve(capital, smoker, age, duration);

        let (daily_cost, daily_band) = match annual_premium {
            Some(premium) => {
                let (daily, band) = self.tariff.daily_scale.classify_annual(premium);
                (Some(daily), Some(band.label.clone()))
            }
            None => {
                log::debug!(
                    "no rate for capital {capital}, {smoker:?}, age {age}, duration {duration}"
                );
                (None, None)
            }
        };

        Quote {
            age,
            smoker,
            capital,
            duration,
            annual_premium,
            daily_cost,
            daily_band,
        }
    }

    /// Filter the injury catalog; blank queries return everything
    pub fn search_injuries(&self, query: &str) -> Vec<&InjuryRecord> {
        self.catalog.search(query)
    }

    pub fn tariff(&self) -> &Tariff {
        &self.tariff
    }

    pub fn catalog(&self) -> &InjuryCatalog {
        &self.catalog
    }
}

impl Default for QuoteEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Format a EUR amount with Italian-style thousands grouping, e.g. "1.234 €"
pub fn format_eur(amount: f64) -> String {
    let whole = amount.round() as i64;
    let digits = whole.abs().to_string();
    let mut grouped = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    if whole < 0 {
        format!("-{grouped} €")
    } else {
        format!("{grouped} €")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_quote_available_combination() {
        let engine = QuoteEngine::new();

        let quote = engine.quote(42, false, 100_000, 10);
        assert!(quote.is_available());
        assert_eq!(quote.annual_premium, Some(120.0));
        assert_relative_eq!(quote.daily_cost.unwrap(), 120.0 / 365.0, epsilon = 1e-12);
        assert_eq!(quote.daily_band.as_deref(), Some("Meno di una bottiglietta d'acqua"));
    }

    #[test]
    fn test_quote_unavailable_combination() {
        let engine = QuoteEngine::new();

        let quote = engine.quote(42, false, 120_000, 10);
        assert!(!quote.is_available());
        assert_eq!(quote.annual_premium, None);
        assert_eq!(quote.daily_cost, None);
        assert_eq!(quote.daily_band, None);
    }

    #[test]
    fn test_quote_serializes_to_json() {
        let engine = QuoteEngine::new();

        let quote = engine.quote(45, true, 200_000, 15);
        let json = serde_json::to_value(&quote).unwrap();
        assert_eq!(json["capital"], 200_000);
        assert_eq!(json["annual_premium"], 524.0);
        assert_eq!(json["smoker"], "Smoker");
    }

    #[test]
    fn test_engine_search_delegates_to_catalog() {
        let engine = QuoteEngine::new();

        assert_eq!(engine.search_injuries("").len(), engine.catalog().len());
        assert!(engine.search_injuries("ustione").len() >= 2);
    }

    #[test]
    fn test_format_eur_grouping() {
        assert_eq!(format_eur(650.0), "650 €");
        assert_eq!(format_eur(1234.0), "1.234 €");
        assert_eq!(format_eur(1_234_567.0), "1.234.567 €");
        assert_eq!(format_eur(-4257.0), "-4.257 €");
    }
}
