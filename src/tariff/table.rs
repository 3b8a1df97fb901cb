//! Term-life rate table indexed by capital, smoker status, age bracket and duration
//!
//! The rate sheet is reference data: loaded once (built-in literal or CSV),
//! validated at construction, never mutated afterwards. Lookups apply the
//! nearest-age-at-or-above rule with a clamp-to-maximum fallback for ages
//! beyond the top bracket. Clamping above the top bracket is deliberate
//! product policy, not a data gap.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::TariffError;

/// Smoker classification used by the rate sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SmokerStatus {
    NonSmoker,
    Smoker,
}

impl SmokerStatus {
    /// Parse the `F`/`NF` codes used by the source rate sheets
    pub fn from_code(code: &str) -> Result<Self, TariffError> {
        match code {
            "F" => Ok(SmokerStatus::Smoker),
            "NF" => Ok(SmokerStatus::NonSmoker),
            other => Err(TariffError::UnknownSmokerCode(other.to_string())),
        }
    }

    /// Code used in the CSV rate sheet
    pub fn as_code(&self) -> &'static str {
        match self {
            SmokerStatus::Smoker => "F",
            SmokerStatus::NonSmoker => "NF",
        }
    }

    pub fn from_flag(smoker: bool) -> Self {
        if smoker {
            SmokerStatus::Smoker
        } else {
            SmokerStatus::NonSmoker
        }
    }
}

/// One (capital, smoker, age, duration) -> premium entry of the rate sheet
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateRow {
    pub capital: u32,
    pub smoker: SmokerStatus,
    pub age: u8,
    pub duration: u16,
    pub annual_premium: f64,
}

/// Premiums quoted at a single age bracket, keyed by duration in years
#[derive(Debug, Clone)]
pub struct AgeBracket {
    age: u8,
    premiums: BTreeMap<u16, f64>,
}

impl AgeBracket {
    pub fn age(&self) -> u8 {
        self.age
    }

    /// Premium for a duration, if this bracket quotes it
    pub fn premium(&self, duration: u16) -> Option<f64> {
        self.premiums.get(&duration).copied()
    }

    /// Quoted (duration, premium) pairs in ascending duration order
    pub fn premiums(&self) -> impl Iterator<Item = (u16, f64)> + '_ {
        self.premiums.iter().map(|(&d, &p)| (d, p))
    }
}

/// Immutable rate sheet: capital and smoker status select a branch of
/// ascending age brackets, each quoting premiums for a subset of the
/// declared duration set.
#[derive(Debug, Clone)]
pub struct RateTable {
    /// Branches keyed by (capital, smoker status); brackets sorted by age
    branches: BTreeMap<(u32, SmokerStatus), Vec<AgeBracket>>,

    /// The declared duration set; every quoted duration must belong to it
    durations: Vec<u16>,
}

impl RateTable {
    /// Build a table from individual rate rows, validating every entry.
    ///
    /// Rejects negative premiums, durations outside the declared set and
    /// duplicate (capital, smoker, age, duration) entries. Ages within a
    /// branch end up strictly ascending by construction.
    pub fn from_rows(
        durations: &[u16],
        rows: impl IntoIterator<Item = RateRow>,
    ) -> Result<Self, TariffError> {
        let mut branches: BTreeMap<(u32, SmokerStatus), BTreeMap<u8, BTreeMap<u16, f64>>> =
            BTreeMap::new();

        for row in rows {
            if row.annual_premium < 0.0 {
                return Err(TariffError::NegativePremium {
                    capital: row.capital,
                    age: row.age,
                    duration: row.duration,
                    premium: row.annual_premium,
                });
            }
            if !durations.contains(&row.duration) {
                return Err(TariffError::UnknownDuration {
                    duration: row.duration,
                    durations: durations.to_vec(),
                });
            }

            let bracket = branches
                .entry((row.capital, row.smoker))
                .or_default()
                .entry(row.age)
                .or_default();
            if bracket.insert(row.duration, row.annual_premium).is_some() {
                return Err(TariffError::DuplicateEntry {
                    capital: row.capital,
                    smoker: row.smoker,
                    age: row.age,
                    duration: row.duration,
                });
            }
        }

        let branches = branches
            .into_iter()
            .map(|(key, by_age)| {
                let brackets = by_age
                    .into_iter()
                    .map(|(age, premiums)| AgeBracket { age, premiums })
                    .collect();
                (key, brackets)
            })
            .collect();

        Ok(Self {
            branches,
            durations: durations.to_vec(),
        })
    }

    /// Built-in rate sheet for the Smart Protection product.
    ///
    /// Mirrors `data/rates.csv`. Durations are quoted only while the policy
    /// expires by age 80, so the 60 bracket stops at 20 years and the 65
    /// bracket at 15.
    pub fn default_rate_sheet() -> Self {
        let rows = DEFAULT_RATE_SHEET.iter().flat_map(|&(capital, smoker, brackets)| {
            brackets.iter().flat_map(move |&(age, cells)| {
                cells.iter().map(move |&(duration, annual_premium)| RateRow {
                    capital,
                    smoker,
                    age,
                    duration,
                    annual_premium,
                })
            })
        });
        Self::from_rows(&DEFAULT_DURATIONS, rows)
            .expect("built-in rate sheet must pass validation")
    }

    /// Resolve the annual premium for a combination, or `None` when the
    /// combination is not offered.
    ///
    /// Age selection: smallest bracket at or above the requested age
    /// (binary search); requests above the top bracket clamp to the top
    /// bracket. Unknown capital or a duration the chosen bracket does not
    /// quote yield `None`. The stored premium is returned unchanged.
    pub fn resolve(
        &self,
        capital: u32,
        smoker: SmokerStatus,
        age: u8,
        duration: u16,
    ) -> Option<f64> {
        let brackets = self.branches.get(&(capital, smoker))?;
        let idx = brackets.partition_point(|b| b.age < age);
        let bracket = brackets.get(idx).or_else(|| brackets.last())?;
        bracket.premium(duration)
    }

    /// Capitals offered by the sheet, ascending and deduplicated
    pub fn capitals(&self) -> Vec<u32> {
        let mut capitals: Vec<u32> = self.branches.keys().map(|&(c, _)| c).collect();
        capitals.dedup();
        capitals
    }

    /// The declared duration set, ascending
    pub fn durations(&self) -> &[u16] {
        &self.durations
    }

    /// Age brackets of a branch, ascending by age
    pub fn brackets(&self, capital: u32, smoker: SmokerStatus) -> Option<&[AgeBracket]> {
        self.branches.get(&(capital, smoker)).map(Vec::as_slice)
    }

    /// Total number of quoted (capital, smoker, age, duration) entries
    pub fn entry_count(&self) -> usize {
        self.branches
            .values()
            .flat_map(|brackets| brackets.iter())
            .map(|b| b.premiums.len())
            .sum()
    }
}

/// Duration set quoted by the built-in sheet (policy term in years)
pub const DEFAULT_DURATIONS: [u16; 4] = [10, 15, 20, 25];

type BracketRows = &'static [(u8, &'static [(u16, f64)])];

/// Built-in Smart Protection rate sheet in EUR per annum
///
/// Layout: (capital, smoker status, [(age bracket, [(duration, premium)])])
#[rustfmt::skip]
static DEFAULT_RATE_SHEET: &[(u32, SmokerStatus, BracketRows)] = &[
    // 50k EUR, NonSmoker
    (50000, SmokerStatus::NonSmoker, &[
        (30, &[(10, 28.0), (15, 32.0), (20, 38.0), (25, 45.0)]),
        (35, &[(10, 32.0), (15, 38.0), (20, 45.0), (25, 53.0)]),
        (40, &[(10, 42.0), (15, 50.0), (20, 59.0), (25, 69.0)]),
        (45, &[(10, 60.0), (15, 71.0), (20, 83.0), (25, 97.0)]),
        (50, &[(10, 90.0), (15, 106.0), (20, 124.0), (25, 146.0)]),
        (55, &[(10, 138.0), (15, 162.0), (20, 190.0), (25, 223.0)]),
        (60, &[(10, 210.0), (15, 248.0), (20, 290.0)]),
        (65, &[(10, 325.0), (15, 384.0)]),
    ]),
    // 50k EUR, Smoker
    (50000, SmokerStatus::Smoker, &[
        (30, &[(10, 51.0), (15, 60.0), (20, 70.0), (25, 82.0)]),
        (35, &[(10, 60.0), (15, 71.0), (20, 83.0), (25, 97.0)]),
        (40, &[(10, 79.0), (15, 93.0), (20, 109.0), (25, 127.0)]),
        (45, &[(10, 111.0), (15, 131.0), (20, 153.0), (25, 180.0)]),
        (50, &[(10, 166.0), (15, 196.0), (20, 230.0), (25, 270.0)]),
        (55, &[(10, 254.0), (15, 300.0), (20, 351.0), (25, 412.0)]),
        (60, &[(10, 388.0), (15, 458.0), (20, 536.0)]),
        (65, &[(10, 601.0), (15, 709.0)]),
    ]),
    // 100k EUR, NonSmoker
    (100000, SmokerStatus::NonSmoker, &[
        (30, &[(10, 55.0), (15, 65.0), (20, 76.0), (25, 89.0)]),
        (35, &[(10, 65.0), (15, 77.0), (20, 90.0), (25, 105.0)]),
        (40, &[(10, 85.0), (15, 100.0), (20, 117.0), (25, 138.0)]),
        (45, &[(10, 120.0), (15, 142.0), (20, 166.0), (25, 194.0)]),
        (50, &[(10, 180.0), (15, 212.0), (20, 248.0), (25, 292.0)]),
        (55, &[(10, 275.0), (15, 324.0), (20, 379.0), (25, 446.0)]),
        (60, &[(10, 420.0), (15, 496.0), (20, 580.0)]),
        (65, &[(10, 650.0), (15, 767.0)]),
    ]),
    // 100k EUR, Smoker
    (100000, SmokerStatus::Smoker, &[
        (30, &[(10, 102.0), (15, 120.0), (20, 140.0), (25, 165.0)]),
        (35, &[(10, 120.0), (15, 142.0), (20, 166.0), (25, 195.0)]),
        (40, &[(10, 157.0), (15, 186.0), (20, 217.0), (25, 255.0)]),
        (45, &[(10, 222.0), (15, 262.0), (20, 306.0), (25, 360.0)]),
        (50, &[(10, 333.0), (15, 393.0), (20, 460.0), (25, 539.0)]),
        (55, &[(10, 509.0), (15, 600.0), (20, 702.0), (25, 824.0)]),
        (60, &[(10, 777.0), (15, 917.0), (20, 1072.0)]),
        (65, &[(10, 1202.0), (15, 1419.0)]),
    ]),
    // 150k EUR, NonSmoker
    (150000, SmokerStatus::NonSmoker, &[
        (30, &[(10, 82.0), (15, 97.0), (20, 114.0), (25, 134.0)]),
        (35, &[(10, 98.0), (15, 115.0), (20, 135.0), (25, 158.0)]),
        (40, &[(10, 128.0), (15, 150.0), (20, 176.0), (25, 207.0)]),
        (45, &[(10, 180.0), (15, 212.0), (20, 248.0), (25, 292.0)]),
        (50, &[(10, 270.0), (15, 319.0), (20, 373.0), (25, 437.0)]),
        (55, &[(10, 412.0), (15, 487.0), (20, 569.0), (25, 668.0)]),
        (60, &[(10, 630.0), (15, 743.0), (20, 869.0)]),
        (65, &[(10, 975.0), (15, 1150.0)]),
    ]),
    // 150k EUR, Smoker
    (150000, SmokerStatus::Smoker, &[
        (30, &[(10, 153.0), (15, 180.0), (20, 211.0), (25, 247.0)]),
        (35, &[(10, 180.0), (15, 213.0), (20, 249.0), (25, 292.0)]),
        (40, &[(10, 236.0), (15, 278.0), (20, 326.0), (25, 382.0)]),
        (45, &[(10, 333.0), (15, 393.0), (20, 460.0), (25, 539.0)]),
        (50, &[(10, 500.0), (15, 589.0), (20, 689.0), (25, 809.0)]),
        (55, &[(10, 763.0), (15, 900.0), (20, 1053.0), (25, 1236.0)]),
        (60, &[(10, 1166.0), (15, 1375.0), (20, 1608.0)]),
        (65, &[(10, 1804.0), (15, 2128.0)]),
    ]),
    // 200k EUR, NonSmoker
    (200000, SmokerStatus::NonSmoker, &[
        (30, &[(10, 110.0), (15, 130.0), (20, 152.0), (25, 178.0)]),
        (35, &[(10, 130.0), (15, 153.0), (20, 179.0), (25, 211.0)]),
        (40, &[(10, 170.0), (15, 201.0), (20, 235.0), (25, 275.0)]),
        (45, &[(10, 240.0), (15, 283.0), (20, 331.0), (25, 389.0)]),
        (50, &[(10, 360.0), (15, 425.0), (20, 497.0), (25, 583.0)]),
        (55, &[(10, 550.0), (15, 649.0), (20, 759.0), (25, 891.0)]),
        (60, &[(10, 840.0), (15, 991.0), (20, 1159.0)]),
        (65, &[(10, 1300.0), (15, 1534.0)]),
    ]),
    // 200k EUR, Smoker
    (200000, SmokerStatus::Smoker, &[
        (30, &[(10, 204.0), (15, 240.0), (20, 281.0), (25, 330.0)]),
        (35, &[(10, 240.0), (15, 284.0), (20, 332.0), (25, 390.0)]),
        (40, &[(10, 314.0), (15, 371.0), (20, 434.0), (25, 509.0)]),
        (45, &[(10, 444.0), (15, 524.0), (20, 613.0), (25, 719.0)]),
        (50, &[(10, 666.0), (15, 786.0), (20, 919.0), (25, 1079.0)]),
        (55, &[(10, 1018.0), (15, 1201.0), (20, 1404.0), (25, 1648.0)]),
        (60, &[(10, 1554.0), (15, 1834.0), (20, 2145.0)]),
        (65, &[(10, 2405.0), (15, 2838.0)]),
    ]),
    // 250k EUR, NonSmoker
    (250000, SmokerStatus::NonSmoker, &[
        (30, &[(10, 138.0), (15, 162.0), (20, 190.0), (25, 223.0)]),
        (35, &[(10, 162.0), (15, 192.0), (20, 224.0), (25, 263.0)]),
        (40, &[(10, 212.0), (15, 251.0), (20, 293.0), (25, 344.0)]),
        (45, &[(10, 300.0), (15, 354.0), (20, 414.0), (25, 486.0)]),
        (50, &[(10, 450.0), (15, 531.0), (20, 621.0), (25, 729.0)]),
        (55, &[(10, 688.0), (15, 811.0), (20, 949.0), (25, 1114.0)]),
        (60, &[(10, 1050.0), (15, 1239.0), (20, 1449.0)]),
        (65, &[(10, 1625.0), (15, 1918.0)]),
    ]),
    // 250k EUR, Smoker
    (250000, SmokerStatus::Smoker, &[
        (30, &[(10, 254.0), (15, 300.0), (20, 351.0), (25, 412.0)]),
        (35, &[(10, 301.0), (15, 355.0), (20, 415.0), (25, 487.0)]),
        (40, &[(10, 393.0), (15, 464.0), (20, 543.0), (25, 637.0)]),
        (45, &[(10, 555.0), (15, 655.0), (20, 766.0), (25, 899.0)]),
        (50, &[(10, 832.0), (15, 982.0), (20, 1149.0), (25, 1349.0)]),
        (55, &[(10, 1272.0), (15, 1501.0), (20, 1755.0), (25, 2060.0)]),
        (60, &[(10, 1942.0), (15, 2292.0), (20, 2681.0)]),
        (65, &[(10, 3006.0), (15, 3547.0)]),
    ]),
    // 300k EUR, NonSmoker
    (300000, SmokerStatus::NonSmoker, &[
        (30, &[(10, 165.0), (15, 195.0), (20, 228.0), (25, 267.0)]),
        (35, &[(10, 195.0), (15, 230.0), (20, 269.0), (25, 316.0)]),
        (40, &[(10, 255.0), (15, 301.0), (20, 352.0), (25, 413.0)]),
        (45, &[(10, 360.0), (15, 425.0), (20, 497.0), (25, 583.0)]),
        (50, &[(10, 540.0), (15, 637.0), (20, 745.0), (25, 875.0)]),
        (55, &[(10, 825.0), (15, 974.0), (20, 1138.0), (25, 1336.0)]),
        (60, &[(10, 1260.0), (15, 1487.0), (20, 1739.0)]),
        (65, &[(10, 1950.0), (15, 2301.0)]),
    ]),
    // 300k EUR, Smoker
    (300000, SmokerStatus::Smoker, &[
        (30, &[(10, 305.0), (15, 360.0), (20, 421.0), (25, 495.0)]),
        (35, &[(10, 361.0), (15, 426.0), (20, 498.0), (25, 584.0)]),
        (40, &[(10, 472.0), (15, 557.0), (20, 651.0), (25, 764.0)]),
        (45, &[(10, 666.0), (15, 786.0), (20, 919.0), (25, 1079.0)]),
        (50, &[(10, 999.0), (15, 1179.0), (20, 1379.0), (25, 1618.0)]),
        (55, &[(10, 1526.0), (15, 1801.0), (20, 2106.0), (25, 2473.0)]),
        (60, &[(10, 2331.0), (15, 2751.0), (20, 3217.0)]),
        (65, &[(10, 3608.0), (15, 4257.0)]),
    ]),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_bracket_match() {
        let table = RateTable::default_rate_sheet();

        // Stored values come back unchanged
        assert_eq!(table.resolve(100_000, SmokerStatus::NonSmoker, 45, 10), Some(120.0));
        assert_eq!(table.resolve(100_000, SmokerStatus::Smoker, 45, 10), Some(222.0));
        assert_eq!(table.resolve(50_000, SmokerStatus::NonSmoker, 30, 25), Some(45.0));
        assert_eq!(table.resolve(300_000, SmokerStatus::Smoker, 65, 15), Some(4257.0));
    }

    #[test]
    fn test_ceiling_rule_between_brackets() {
        let table = RateTable::default_rate_sheet();

        // 42 sits between brackets 40 and 45: the bracket above applies
        assert_eq!(table.resolve(100_000, SmokerStatus::NonSmoker, 42, 10), Some(120.0));
        // 31 rounds up to 35, never down to 30
        assert_eq!(table.resolve(100_000, SmokerStatus::NonSmoker, 31, 10), Some(65.0));
        // Below the bottom bracket resolves at the bottom bracket
        assert_eq!(table.resolve(100_000, SmokerStatus::NonSmoker, 18, 10), Some(55.0));
    }

    #[test]
    fn test_clamp_above_top_bracket() {
        let table = RateTable::default_rate_sheet();

        let at_top = table.resolve(100_000, SmokerStatus::NonSmoker, 65, 10);
        assert_eq!(at_top, Some(650.0));
        // 70 and beyond clamp to the 65 bracket instead of being rejected
        assert_eq!(table.resolve(100_000, SmokerStatus::NonSmoker, 70, 10), at_top);
        assert_eq!(table.resolve(100_000, SmokerStatus::NonSmoker, 80, 10), at_top);
    }

    #[test]
    fn test_unavailable_combinations() {
        let table = RateTable::default_rate_sheet();

        // Capital outside the offered set
        assert_eq!(table.resolve(120_000, SmokerStatus::NonSmoker, 45, 10), None);
        // Duration outside the declared set
        assert_eq!(table.resolve(100_000, SmokerStatus::NonSmoker, 45, 12), None);
        // Duration not quoted at the chosen bracket (65 + 25 would run past 80)
        assert_eq!(table.resolve(100_000, SmokerStatus::NonSmoker, 65, 25), None);
        assert_eq!(table.resolve(100_000, SmokerStatus::NonSmoker, 62, 25), None);
    }

    #[test]
    fn test_resolve_is_deterministic() {
        let table = RateTable::default_rate_sheet();

        let first = table.resolve(150_000, SmokerStatus::Smoker, 52, 20);
        for _ in 0..10 {
            assert_eq!(table.resolve(150_000, SmokerStatus::Smoker, 52, 20), first);
        }
    }

    #[test]
    fn test_default_sheet_shape() {
        let table = RateTable::default_rate_sheet();

        assert_eq!(
            table.capitals(),
            vec![50_000, 100_000, 150_000, 200_000, 250_000, 300_000]
        );
        assert_eq!(table.durations(), &[10, 15, 20, 25]);

        let brackets = table.brackets(100_000, SmokerStatus::NonSmoker).unwrap();
        let ages: Vec<u8> = brackets.iter().map(|b| b.age()).collect();
        assert_eq!(ages, vec![30, 35, 40, 45, 50, 55, 60, 65]);

        // 12 branches * 8 brackets, minus the shortened 60/65 brackets
        assert_eq!(table.entry_count(), 348);
    }

    #[test]
    fn test_rejects_negative_premium() {
        let row = RateRow {
            capital: 50_000,
            smoker: SmokerStatus::NonSmoker,
            age: 30,
            duration: 10,
            annual_premium: -1.0,
        };
        let err = RateTable::from_rows(&[10], [row]).unwrap_err();
        assert!(matches!(err, TariffError::NegativePremium { .. }));
    }

    #[test]
    fn test_rejects_undeclared_duration() {
        let row = RateRow {
            capital: 50_000,
            smoker: SmokerStatus::NonSmoker,
            age: 30,
            duration: 12,
            annual_premium: 40.0,
        };
        let err = RateTable::from_rows(&[10, 15], [row]).unwrap_err();
        assert!(matches!(err, TariffError::UnknownDuration { .. }));
    }

    #[test]
    fn test_rejects_duplicate_entry() {
        let row = RateRow {
            capital: 50_000,
            smoker: SmokerStatus::NonSmoker,
            age: 30,
            duration: 10,
            annual_premium: 40.0,
        };
        let err = RateTable::from_rows(&[10], [row, row]).unwrap_err();
        assert!(matches!(err, TariffError::DuplicateEntry { .. }));
    }

    #[test]
    fn test_smoker_codes() {
        assert_eq!(SmokerStatus::from_code("F").unwrap(), SmokerStatus::Smoker);
        assert_eq!(SmokerStatus::from_code("NF").unwrap(), SmokerStatus::NonSmoker);
        assert!(SmokerStatus::from_code("X").is_err());
        assert_eq!(SmokerStatus::from_flag(true).as_code(), "F");
    }
}
