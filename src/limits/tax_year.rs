//! Dollar limits that change with the tax year
//!
//! Contribution limits, the Social Security wage base and PIA bend points
//! are indexed every year. They are kept here as data so a new year is a
//! new row, not a code change.

use serde::{Deserialize, Serialize};

use crate::error::{CalcError, Result};

/// Indexed limits for one tax year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxYearLimits {
    pub year: i32,

    /// 402(g) elective deferral limit
    pub elective_deferral: f64,

    /// Catch-up contribution at age 50+
    pub catch_up_50: f64,

    /// Enhanced catch-up at ages 60-63 (0 when the year predates it)
    pub catch_up_60_63: f64,

    /// 415(c) annual additions limit, excluding catch-up
    pub annual_additions: f64,

    /// 401(a)(17) compensation limit
    pub compensation_limit: f64,

    /// Social Security taxable maximum
    pub ss_wage_base: f64,

    /// First PIA bend point (monthly AIME)
    pub pia_bend_point_1: f64,

    /// Second PIA bend point (monthly AIME)
    pub pia_bend_point_2: f64,

    /// IRA contribution limit
    pub ira_contribution: f64,

    /// IRA catch-up at 50+
    pub ira_catch_up: f64,

    /// California PEPRA pensionable compensation cap (non-Social Security members)
    pub pepra_compensation_cap: f64,
}

impl TaxYearLimits {
    /// Catch-up available at `age` under this year's rules
    pub fn catch_up_for_age(&self, age: u32) -> f64 {
        if (60..=63).contains(&age) && self.catch_up_60_63 > 0.0 {
            self.catch_up_60_63
        } else if age >= 50 {
            self.catch_up_50
        } else {
            0.0
        }
    }

    /// IRA contribution limit at `age`, including the 50+ catch-up
    pub fn ira_limit_for_age(&self, age: u32) -> f64 {
        if age >= 50 {
            self.ira_contribution + self.ira_catch_up
        } else {
            self.ira_contribution
        }
    }
}

/// All known tax years, sorted ascending
#[derive(Debug, Clone)]
pub struct LimitsTable {
    years: Vec<TaxYearLimits>,
}

impl LimitsTable {
    pub fn new(mut years: Vec<TaxYearLimits>) -> Self {
        years.sort_by_key(|y| y.year);
        Self { years }
    }

    /// Built-in limits for 2024 through 2026
    pub fn builtin() -> Self {
        Self::new(vec![
            TaxYearLimits {
                year: 2024,
                elective_deferral: 23_000.0,
                catch_up_50: 7_500.0,
                catch_up_60_63: 0.0,
                annual_additions: 69_000.0,
                compensation_limit: 345_000.0,
                ss_wage_base: 168_600.0,
                pia_bend_point_1: 1_174.0,
                pia_bend_point_2: 7_078.0,
                ira_contribution: 7_000.0,
                ira_catch_up: 1_000.0,
                pepra_compensation_cap: 151_446.0,
            },
            TaxYearLimits {
                year: 2025,
                elective_deferral: 23_500.0,
                catch_up_50: 7_500.0,
                catch_up_60_63: 11_250.0,
                annual_additions: 70_000.0,
                compensation_limit: 350_000.0,
                ss_wage_base: 176_100.0,
                pia_bend_point_1: 1_226.0,
                pia_bend_point_2: 7_391.0,
                ira_contribution: 7_000.0,
                ira_catch_up: 1_000.0,
                pepra_compensation_cap: 155_081.0,
            },
            TaxYearLimits {
                year: 2026,
                elective_deferral: 24_500.0,
                catch_up_50: 8_000.0,
                catch_up_60_63: 11_250.0,
                annual_additions: 72_000.0,
                compensation_limit: 360_000.0,
                ss_wage_base: 184_500.0,
                pia_bend_point_1: 1_286.0,
                pia_bend_point_2: 7_749.0,
                ira_contribution: 7_500.0,
                ira_catch_up: 1_100.0,
                pepra_compensation_cap: 159_733.0,
            },
        ])
    }

    /// Limits for `year`, falling back to the latest earlier year
    pub fn for_year(&self, year: i32) -> Result<&TaxYearLimits> {
        if let Some(limits) = self.years.iter().find(|y| y.year == year) {
            return Ok(limits);
        }

        match self.years.iter().rev().find(|y| y.year < year) {
            Some(limits) => {
                log::warn!(
                    "no limits for tax year {}, using {} figures",
                    year,
                    limits.year
                );
                Ok(limits)
            }
            None => Err(CalcError::UnknownTaxYear(year)),
        }
    }

    pub fn years(&self) -> &[TaxYearLimits] {
        &self.years
    }
}

impl Default for LimitsTable {
    fn default() -> Self {
        Self::builtin()
    }
}
