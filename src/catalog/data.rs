//! Injury payout reference data
//!
//! The catalog lists the injuries covered by the product with their lump-sum
//! payout and a 1-4 severity level. Insertion order is significant: it is
//! the display order, both unfiltered and filtered.

use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading the injury catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed injury row in {path}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },
}

/// A single compensable injury entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InjuryRecord {
    pub id: u32,
    /// Grouping tag, e.g. "Frattura" or "Trauma cranico"
    pub category: String,
    pub description: String,
    /// Lump-sum payout in EUR
    pub amount: f64,
    /// Severity level, 1 (minor) to 4 (severe)
    pub level: u8,
}

/// Immutable, ordered list of covered injuries
#[derive(Debug, Clone)]
pub struct InjuryCatalog {
    records: Vec<InjuryRecord>,
}

impl InjuryCatalog {
    pub fn new(records: Vec<InjuryRecord>) -> Self {
        Self { records }
    }

    /// The catalog shipped with the product, mirroring data/injuries.csv
    pub fn builtin() -> Self {
        let records = BUILTIN_INJURIES
            .iter()
            .map(|&(id, category, description, amount, level)| InjuryRecord {
                id,
                category: category.to_string(),
                description: description.to_string(),
                amount,
                level,
            })
            .collect();
        Self::new(records)
    }

    /// Load the catalog from `<path>/injuries.csv`
    pub fn from_csv_path(path: &Path) -> Result<Self, CatalogError> {
        let file_path = path.join("injuries.csv");
        let file = File::open(&file_path).map_err(|source| CatalogError::Io {
            path: file_path.display().to_string(),
            source,
        })?;
        let mut reader = csv::Reader::from_reader(file);

        let mut records = Vec::new();
        for result in reader.deserialize::<InjuryRecord>() {
            records.push(result.map_err(|source| CatalogError::Csv {
                path: file_path.display().to_string(),
                source,
            })?);
        }

        log::debug!("loaded {} injury records from {}", records.len(), file_path.display());
        Ok(Self::new(records))
    }

    pub fn records(&self) -> &[InjuryRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Built-in injury catalog: (id, category, description, payout EUR, level)
#[rustfmt::skip]
static BUILTIN_INJURIES: &[(u32, &str, &str, f64, u8)] = &[
    (1, "Frattura", "Frattura composta del femore", 4000.0, 2),
    (2, "Frattura", "Frattura del bacino", 6000.0, 3),
    (3, "Frattura", "Frattura composta di tibia o perone", 2500.0, 2),
    (4, "Frattura", "Frattura del polso (radio o ulna)", 1500.0, 1),
    (5, "Frattura", "Frattura di una costola", 800.0, 1),
    (6, "Frattura", "Frattura vertebrale senza danno midollare", 5000.0, 3),
    (7, "Trauma cranico", "Trauma cranico commotivo con ricovero", 3000.0, 2),
    (8, "Trauma cranico", "Frattura della volta cranica", 7000.0, 3),
    (9, "Trauma cranico", "Trauma cranico con coma superiore a 48 ore", 15000.0, 4),
    (10, "Lussazione", "Lussazione della spalla ridotta chirurgicamente", 2000.0, 1),
    (11, "Lussazione", "Lussazione dell'anca", 4500.0, 2),
    (12, "Ustione", "Ustione di secondo grado oltre il 9% della superficie corporea", 5000.0, 3),
    (13, "Ustione", "Ustione di terzo grado oltre il 4% della superficie corporea", 10000.0, 4),
    (14, "Lesione interna", "Rottura della milza con asportazione", 8000.0, 3),
    (15, "Lesione interna", "Pneumotorace traumatico", 4000.0, 2),
    (16, "Lesione interna", "Perforazione intestinale da trauma", 9000.0, 3),
    (17, "Amputazione", "Amputazione di una falange della mano", 2500.0, 2),
    (18, "Amputazione", "Amputazione di un dito della mano", 5000.0, 3),
    (19, "Amputazione", "Amputazione della mano o dell'avambraccio", 20000.0, 4),
    (20, "Lesione oculare", "Distacco traumatico della retina", 6000.0, 3),
    (21, "Lesione oculare", "Perdita anatomica di un occhio", 18000.0, 4),
    (22, "Lesione uditiva", "Rottura traumatica del timpano", 1200.0, 1),
    (23, "Tendini e legamenti", "Rottura del tendine d'Achille", 3500.0, 2),
    (24, "Tendini e legamenti", "Rottura del legamento crociato anteriore", 3000.0, 2),
];
