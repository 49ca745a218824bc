//! Tax-year limits and IRS tables passed to every calculator

mod tax_year;
mod tables;
pub mod loader;

pub use tax_year::{TaxYearLimits, LimitsTable};
pub use tables::{RmdTable, LifeExpectancyTable};
pub use loader::LoadedLimits;

use std::path::Path;

use crate::error::Result;

/// Container for all year-dependent figures and lookup tables
#[derive(Debug, Clone, Default)]
pub struct Limits {
    pub tax_years: LimitsTable,
    pub rmd: RmdTable,
    pub life_expectancy: LifeExpectancyTable,
}

impl Limits {
    /// Built-in figures
    pub fn builtin() -> Self {
        Self::default()
    }

    /// Load limits from CSV files in the default location (data/limits/)
    pub fn from_csv() -> Result<Self> {
        Self::from_csv_path(Path::new(loader::DEFAULT_LIMITS_PATH))
    }

    /// Load limits from CSV files in a specific directory
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        let loaded = LoadedLimits::load_from(path)?;

        Ok(Self {
            tax_years: LimitsTable::new(loaded.tax_years),
            rmd: RmdTable::from_loaded(&loaded.uniform_lifetime),
            life_expectancy: LifeExpectancyTable::from_loaded(&loaded.single_life),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_matches_builtin() {
        let from_csv = Limits::from_csv().unwrap();
        let builtin = Limits::builtin();

        assert_eq!(from_csv.tax_years.years(), builtin.tax_years.years());
        for age in 70..=125 {
            assert_eq!(from_csv.rmd.divisor(age), builtin.rmd.divisor(age));
        }
        for age in [25, 32, 40, 62, 67, 81, 100] {
            assert_eq!(
                from_csv.life_expectancy.years_remaining(age),
                builtin.life_expectancy.years_remaining(age)
            );
        }
    }
}
