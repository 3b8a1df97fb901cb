//! Daily-cost banding for sales framing
//!
//! An annual premium divided by 365 lands in one of an ordered list of
//! comparison bands ("less than a coffee", "like a bus ticket", ...). Bands
//! carry an inclusive upper threshold and are scanned in ascending order;
//! the terminal band is unbounded so every non-negative daily cost lands
//! somewhere.

use serde::Serialize;
use thiserror::Error;

/// Days used to derive the daily cost from an annual premium
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Errors raised while building a [`DailyCostScale`]
#[derive(Debug, Error)]
pub enum BandScaleError {
    #[error("band scale must contain at least one band")]
    Empty,

    #[error("band thresholds must be strictly ascending: {previous} then {next}")]
    UnsortedThresholds { previous: f64, next: f64 },

    #[error("band scale must end with an unbounded catch-all band")]
    MissingTerminalBand,
}

/// One comparison tier: daily costs up to `max_daily` (inclusive) read as `label`
#[derive(Debug, Clone, Serialize)]
pub struct DailyCostBand {
    /// Inclusive upper bound on the daily cost, `f64::INFINITY` for the terminal band
    pub max_daily: f64,
    /// Comparison label shown to the advisor
    pub label: String,
}

impl DailyCostBand {
    pub fn new(max_daily: f64, label: impl Into<String>) -> Self {
        Self {
            max_daily,
            label: label.into(),
        }
    }
}

/// Ordered list of comparison bands, validated at construction
#[derive(Debug, Clone)]
pub struct DailyCostScale {
    bands: Vec<DailyCostBand>,
}

impl DailyCostScale {
    /// Build a scale, rejecting empty, unsorted or unterminated band lists
    pub fn new(bands: Vec<DailyCostBand>) -> Result<Self, BandScaleError> {
        let last = bands.last().ok_or(BandScaleError::Empty)?;
        if last.max_daily != f64::INFINITY {
            return Err(BandScaleError::MissingTerminalBand);
        }
        for pair in bands.windows(2) {
            if pair[1].max_daily <= pair[0].max_daily {
                return Err(BandScaleError::UnsortedThresholds {
                    previous: pair[0].max_daily,
                    next: pair[1].max_daily,
                });
            }
        }
        Ok(Self { bands })
    }

    /// The retail comparison scale shipped with the Smart Protection product
    pub fn default_retail() -> Self {
        Self::new(vec![
            DailyCostBand::new(0.60, "Meno di una bottiglietta d'acqua"),
            DailyCostBand::new(1.20, "Meno di un caffè a Napoli"),
            DailyCostBand::new(1.80, "Come un quotidiano"),
            DailyCostBand::new(2.50, "Come un biglietto del bus"),
            DailyCostBand::new(5.00, "Come una colazione al bar"),
            DailyCostBand::new(f64::INFINITY, "Come un panino veloce"),
        ])
        .expect("built-in band scale must pass validation")
    }

    /// Classify a daily cost: first band whose threshold is at or above it.
    /// The terminal band makes the scan total.
    pub fn classify(&self, daily_cost: f64) -> &DailyCostBand {
        self.bands
            .iter()
            .find(|band| daily_cost <= band.max_daily)
            .unwrap_or_else(|| &self.bands[self.bands.len() - 1])
    }

    /// Derive the daily cost from an annual premium and classify it
    pub fn classify_annual(&self, annual_premium: f64) -> (f64, &DailyCostBand) {
        let daily = annual_premium / DAYS_PER_YEAR;
        (daily, self.classify(daily))
    }

    /// Index of the band a daily cost lands in (ascending with cost)
    pub fn band_index(&self, daily_cost: f64) -> usize {
        self.bands
            .iter()
            .position(|band| daily_cost <= band.max_daily)
            .unwrap_or(self.bands.len() - 1)
    }

    pub fn bands(&self) -> &[DailyCostBand] {
        &self.bands
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_classify_annual_premium() {
        let scale = DailyCostScale::default_retail();

        // 120 EUR/year is about 0.33 EUR/day: the bottom band
        let (daily, band) = scale.classify_annual(120.0);
        assert_relative_eq!(daily, 120.0 / 365.0, epsilon = 1e-12);
        assert_eq!(band.label, "Meno di una bottiglietta d'acqua");

        let (_, band) = scale.classify_annual(650.0); // ~1.78/day
        assert_eq!(band.label, "Come un quotidiano");

        let (_, band) = scale.classify_annual(4257.0); // ~11.66/day
        assert_eq!(band.label, "Come un panino veloce");
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let scale = DailyCostScale::default_retail();

        // A tie at a threshold resolves to that threshold's band
        assert_eq!(scale.band_index(0.60), 0);
        assert_eq!(scale.band_index(0.6000001), 1);
        assert_eq!(scale.band_index(2.50), 3);
    }

    #[test]
    fn test_band_index_is_monotone_in_premium() {
        let scale = DailyCostScale::default_retail();

        let premiums = [0.0, 28.0, 120.0, 325.0, 650.0, 900.0, 1800.0, 4257.0];
        let mut last_index = 0;
        for &premium in &premiums {
            let index = scale.band_index(premium / DAYS_PER_YEAR);
            assert!(
                index >= last_index,
                "band index regressed at premium {premium}: {index} < {last_index}"
            );
            last_index = index;
        }
    }

    #[test]
    fn test_rejects_unsorted_thresholds() {
        let err = DailyCostScale::new(vec![
            DailyCostBand::new(1.20, "a"),
            DailyCostBand::new(0.60, "b"),
            DailyCostBand::new(f64::INFINITY, "c"),
        ])
        .unwrap_err();
        assert!(matches!(err, BandScaleError::UnsortedThresholds { .. }));
    }

    #[test]
    fn test_rejects_missing_terminal_band() {
        let err = DailyCostScale::new(vec![
            DailyCostBand::new(0.60, "a"),
            DailyCostBand::new(1.20, "b"),
        ])
        .unwrap_err();
        assert!(matches!(err, BandScaleError::MissingTerminalBand));

        assert!(matches!(DailyCostScale::new(vec![]), Err(BandScaleError::Empty)));
    }
}
