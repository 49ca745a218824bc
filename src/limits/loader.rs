//! CSV-based limits loader
//!
//! Loads tax-year limits and IRS tables from CSV files in data/limits/

use std::fs::File;
use std::path::Path;

use super::tax_year::TaxYearLimits;
use crate::error::{CalcError, Result};

/// Default path to the limits directory
pub const DEFAULT_LIMITS_PATH: &str = "data/limits";

/// Load per-year limits from tax_year_limits.csv
///
/// Columns are named after the fields of [`TaxYearLimits`].
pub fn load_tax_year_limits(path: &Path) -> Result<Vec<TaxYearLimits>> {
    let file = File::open(path.join("tax_year_limits.csv"))?;
    let mut reader = csv::Reader::from_reader(file);

    let mut years = Vec::new();
    for result in reader.deserialize() {
        let row: TaxYearLimits = result?;
        years.push(row);
    }

    Ok(years)
}

/// Load an (age, value) table such as uniform_lifetime.csv
pub fn load_age_table(path: &Path, file_name: &str) -> Result<Vec<(u32, f64)>> {
    let file = File::open(path.join(file_name))?;
    let mut reader = csv::Reader::from_reader(file);

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let age: u32 = parse_field(&record, 0, file_name)?;
        let value: f64 = parse_field(&record, 1, file_name)?;
        rows.push((age, value));
    }

    Ok(rows)
}

/// Reject a table whose ages skip a year; a gap would otherwise be looked up
/// as some neighbouring age's value
pub fn check_consecutive_ages(rows: &[(u32, f64)], table: &str) -> Result<()> {
    let mut ages: Vec<u32> = rows.iter().map(|(age, _)| *age).collect();
    ages.sort_unstable();
    for pair in ages.windows(2) {
        if pair[1] != pair[0] + 1 {
            return Err(CalcError::Parse {
                table: table.to_string(),
                message: format!("ages jump from {} to {}", pair[0], pair[1]),
            });
        }
    }
    Ok(())
}

fn parse_field<T: std::str::FromStr>(
    record: &csv::StringRecord,
    index: usize,
    table: &str,
) -> Result<T> {
    let raw = record.get(index).ok_or_else(|| CalcError::Parse {
        table: table.to_string(),
        message: format!("missing column {}", index),
    })?;
    raw.trim().parse().map_err(|_| CalcError::Parse {
        table: table.to_string(),
        message: format!("cannot parse {:?}", raw),
    })
}

/// All limit tables loaded from one directory
pub struct LoadedLimits {
    pub tax_years: Vec<TaxYearLimits>,
    pub uniform_lifetime: Vec<(u32, f64)>,
    pub single_life: Vec<(u32, f64)>,
}

impl LoadedLimits {
    /// Load all tables from the default path
    pub fn load_default() -> Result<Self> {
        Self::load_from(Path::new(DEFAULT_LIMITS_PATH))
    }

    /// Load all tables from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        log::info!("loading limit tables from {}", path.display());
        let uniform_lifetime = load_age_table(path, "uniform_lifetime.csv")?;
        check_consecutive_ages(&uniform_lifetime, "uniform_lifetime.csv")?;

        Ok(Self {
            tax_years: load_tax_year_limits(path)?,
            uniform_lifetime,
            single_life: load_age_table(path, "single_life.csv")?,
        })
    }
}
