//! Retirement Calculators - deterministic retirement planning calculators
//!
//! This library provides:
//! - Coast FIRE, savings growth, withdrawal, inflation and Roth conversion math
//! - Pension benefits: FERS, CalPERS, CalSTRS and Railroad Retirement
//! - Required minimum distributions and Social Security claiming
//! - Solo 401(k), charitable remainder trust and precious metals IRA planning
//! - Versioned tax-year limits and IRS tables, loadable from CSV
//! - Parallel batch evaluation

pub mod error;
pub mod finance;
pub mod limits;
pub mod calculators;
pub mod runner;
pub mod report;

// Re-export commonly used types
pub use error::{CalcError, Result};
pub use limits::{Limits, LimitsTable, TaxYearLimits, RmdTable, LifeExpectancyTable};
pub use calculators::{evaluate, CalculatorKind, CalculatorRequest, CalculatorResponse};
pub use runner::CalculatorRunner;
