//! Product tariff: the rate sheet and the daily-cost comparison scale

mod table;
pub mod loader;

pub use table::{AgeBracket, RateRow, RateTable, SmokerStatus, DEFAULT_DURATIONS};

use std::path::Path;

use thiserror::Error;

use crate::banding::DailyCostScale;

/// Errors raised while building or loading the tariff.
///
/// These only occur at load time; once a [`Tariff`] exists, lookups never
/// fail and unavailable combinations resolve to `None`.
#[derive(Debug, Error)]
pub enum TariffError {
    #[error("negative premium {premium} for capital {capital}, age {age}, duration {duration}")]
    NegativePremium {
        capital: u32,
        age: u8,
        duration: u16,
        premium: f64,
    },

    #[error("duration {duration} is not in the declared duration set {durations:?}")]
    UnknownDuration { duration: u16, durations: Vec<u16> },

    #[error("duplicate rate entry for capital {capital}, {smoker:?}, age {age}, duration {duration}")]
    DuplicateEntry {
        capital: u32,
        smoker: SmokerStatus,
        age: u8,
        duration: u16,
    },

    #[error("unknown smoker code '{0}' (expected F or NF)")]
    UnknownSmokerCode(String),

    #[error("failed to read {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed rate sheet row in {path}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },
}

/// Container for the product's pricing reference data
#[derive(Debug, Clone)]
pub struct Tariff {
    pub rates: RateTable,
    pub daily_scale: DailyCostScale,
}

impl Tariff {
    /// Built-in tariff matching the published Smart Protection rate sheet
    pub fn default_product() -> Self {
        Self {
            rates: RateTable::default_rate_sheet(),
            daily_scale: DailyCostScale::default_retail(),
        }
    }

    /// Load the rate sheet from CSV files in the default location (data/)
    pub fn from_csv() -> Result<Self, TariffError> {
        Self::from_csv_path(Path::new(loader::DEFAULT_DATA_PATH))
    }

    /// Load the rate sheet from CSV files in a specific directory.
    /// The daily-cost scale is product configuration, not tabular data,
    /// so the built-in scale is used either way.
    pub fn from_csv_path(path: &Path) -> Result<Self, TariffError> {
        Ok(Self {
            rates: loader::load_rate_table(path)?,
            daily_scale: DailyCostScale::default_retail(),
        })
    }
}
