//! Required Minimum Distribution calculator
//!
//! RMD = prior year-end balance / Uniform Lifetime distribution period for the
//! age attained in the distribution year. The first RMD age depends on birth
//! year (72, 73 or 75).

use serde::{Deserialize, Serialize};

use crate::error::{check_range, Result};
use crate::finance::pct;
use crate::limits::RmdTable;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RmdInput {
    pub birth_year: i32,
    pub distribution_year: i32,
    /// Balance on December 31 of the prior year
    pub account_balance: f64,
    /// Expected annual return, percent
    pub expected_return: f64,
    pub projection_years: u32,
}

impl Default for RmdInput {
    fn default() -> Self {
        Self {
            birth_year: 1952,
            distribution_year: 2026,
            account_balance: 500_000.0,
            expected_return: 5.0,
            projection_years: 20,
        }
    }
}

impl RmdInput {
    pub fn validate(&self) -> Result<()> {
        check_range("birth_year", self.birth_year as f64, 1920.0, 2010.0)?;
        check_range("distribution_year", self.distribution_year as f64, 2020.0, 2100.0)?;
        check_range("account_balance", self.account_balance, 0.0, 100_000_000.0)?;
        check_range("expected_return", self.expected_return, 0.0, 15.0)?;
        check_range("projection_years", self.projection_years as f64, 1.0, 50.0)?;
        check_range(
            "age",
            (self.distribution_year - self.birth_year) as f64,
            0.0,
            120.0,
        )?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RmdStatus {
    Required,
    NotYetRequired { years_until: u32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RmdRow {
    pub year: i32,
    pub age: u32,
    pub starting_balance: f64,
    pub divisor: Option<f64>,
    pub distribution: f64,
    pub growth: f64,
    pub ending_balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RmdResult {
    pub age: u32,
    pub rmd_start_age: u32,
    pub first_rmd_year: i32,
    pub status: RmdStatus,
    pub divisor: Option<f64>,
    pub rmd_amount: f64,
    pub monthly_amount: f64,
    pub percent_of_balance: f64,
    pub total_projected_distributions: f64,
    pub projection: Vec<RmdRow>,
}

/// First RMD age under SECURE 2.0
pub fn rmd_start_age(birth_year: i32) -> u32 {
    if birth_year <= 1950 {
        72
    } else if birth_year <= 1959 {
        73
    } else {
        75
    }
}

fn distribution_for(table: &RmdTable, age: u32, start_age: u32, balance: f64) -> (Option<f64>, f64) {
    if age < start_age {
        return (None, 0.0);
    }
    match table.divisor(age) {
        Some(divisor) if divisor > 0.0 => (Some(divisor), balance / divisor),
        _ => (None, 0.0),
    }
}

pub fn calculate(input: &RmdInput, table: &RmdTable) -> Result<RmdResult> {
    input.validate()?;

    let age = (input.distribution_year - input.birth_year) as u32;
    let rmd_start_age = rmd_start_age(input.birth_year);
    let first_rmd_year = input.birth_year + rmd_start_age as i32;

    let (divisor, rmd_amount) = distribution_for(table, age, rmd_start_age, input.account_balance);

    let status = if divisor.is_some() {
        RmdStatus::Required
    } else {
        RmdStatus::NotYetRequired {
            years_until: rmd_start_age.saturating_sub(age),
        }
    };

    let percent_of_balance = if input.account_balance > 0.0 {
        rmd_amount / input.account_balance * 100.0
    } else {
        0.0
    };

    let projection = project(input, table, rmd_start_age);
    let total_projected_distributions = projection.iter().map(|row| row.distribution).sum();

    log::debug!("RMD at age {}: divisor {:?}, amount {:.2}", age, divisor, rmd_amount);

    Ok(RmdResult {
        age,
        rmd_start_age,
        first_rmd_year,
        status,
        divisor,
        rmd_amount,
        monthly_amount: rmd_amount / 12.0,
        percent_of_balance,
        total_projected_distributions,
        projection,
    })
}

/// Withdraw the RMD at the start of each year, grow the rest
fn project(input: &RmdInput, table: &RmdTable, start_age: u32) -> Vec<RmdRow> {
    let rate = pct(input.expected_return);
    let mut balance = input.account_balance;

    (0..input.projection_years)
        .map(|offset| {
            let year = input.distribution_year + offset as i32;
            let age = (year - input.birth_year) as u32;
            let starting_balance = balance;
            let (divisor, distribution) = distribution_for(table, age, start_age, starting_balance);
            let growth = (starting_balance - distribution) * rate;
            balance = (starting_balance - distribution + growth).max(0.0);
            RmdRow {
                year,
                age,
                starting_balance,
                divisor,
                distribution,
                growth,
                ending_balance: balance,
            }
        })
        .collect()
}
