//! CSV-based rate sheet loader
//!
//! Loads the rate sheet from data/rates.csv. The file carries one row per
//! quoted (capital, smoker, age, duration) combination and mirrors the
//! built-in default sheet.

use std::fs::File;
use std::path::Path;

use super::table::{RateRow, RateTable, SmokerStatus, DEFAULT_DURATIONS};
use super::TariffError;

/// Default path to the reference data directory
pub const DEFAULT_DATA_PATH: &str = "data";

/// Raw CSV row matching the rates.csv columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    capital: u32,
    smoker: String,
    age: u8,
    duration: u16,
    annual_premium: f64,
}

impl CsvRow {
    fn into_rate_row(self) -> Result<RateRow, TariffError> {
        Ok(RateRow {
            capital: self.capital,
            smoker: SmokerStatus::from_code(&self.smoker)?,
            age: self.age,
            duration: self.duration,
            annual_premium: self.annual_premium,
        })
    }
}

/// Load and validate the rate sheet from `<path>/rates.csv`
pub fn load_rate_table(path: &Path) -> Result<RateTable, TariffError> {
    let file_path = path.join("rates.csv");
    let file = File::open(&file_path).map_err(|source| TariffError::Io {
        path: file_path.display().to_string(),
        source,
    })?;
    let mut reader = csv::Reader::from_reader(file);

    let mut rows = Vec::new();
    for result in reader.deserialize::<CsvRow>() {
        let row = result.map_err(|source| TariffError::Csv {
            path: file_path.display().to_string(),
            source,
        })?;
        rows.push(row.into_rate_row()?);
    }

    log::debug!("loaded {} rate rows from {}", rows.len(), file_path.display());
    RateTable::from_rows(&DEFAULT_DURATIONS, rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_default_rate_sheet() {
        let result = load_rate_table(Path::new(DEFAULT_DATA_PATH));
        assert!(result.is_ok(), "Failed to load rate sheet: {:?}", result.err());

        let table = result.unwrap();

        // The CSV mirrors the built-in sheet
        let builtin = RateTable::default_rate_sheet();
        assert_eq!(table.entry_count(), builtin.entry_count());
        assert_eq!(table.capitals(), builtin.capitals());
        assert_eq!(
            table.resolve(100_000, SmokerStatus::NonSmoker, 45, 10),
            builtin.resolve(100_000, SmokerStatus::NonSmoker, 45, 10),
        );
        assert_eq!(
            table.resolve(300_000, SmokerStatus::Smoker, 65, 15),
            builtin.resolve(300_000, SmokerStatus::Smoker, 65, 15),
        );
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let err = load_rate_table(Path::new("no/such/dir")).unwrap_err();
        assert!(matches!(err, TariffError::Io { .. }));
    }
}
