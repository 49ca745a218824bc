//! Error type shared by the calculators and the table loaders

use thiserror::Error;

/// Errors raised while validating input or loading limit tables
#[derive(Debug, Error)]
pub enum CalcError {
    #[error("{field} = {value} is outside the valid range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("no tax-year limits available for {0}")]
    UnknownTaxYear(i32),

    #[error("unknown calculator: {0}")]
    UnknownCalculator(String),

    #[error("invalid value in {table}: {message}")]
    Parse { table: String, message: String },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CalcError>;

/// Reject non-finite values and values outside `[min, max]`
pub fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<()> {
    if !value.is_finite() || value < min || value > max {
        return Err(CalcError::OutOfRange { field, value, min, max });
    }
    Ok(())
}
