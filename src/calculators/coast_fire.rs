//! Coast FIRE calculator
//!
//! Coast FIRE is reached once current savings, left to compound with no
//! further contributions, will grow into the full FIRE number by retirement.
//!
//! - FIRE number = annual expenses / withdrawal rate (25x at 4%)
//! - Coast FIRE number = FIRE number / (1 + r)^(retirement age - coast age)

use serde::{Deserialize, Serialize};

use crate::error::{check_range, Result};
use crate::finance::{future_value, pct, payment_to_reach};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoastFireInput {
    pub current_age: u32,
    /// Age at which contributions stop
    pub coast_age: u32,
    pub retirement_age: u32,
    pub current_savings: f64,
    /// Annual spending in retirement, today's dollars
    pub annual_expenses: f64,
    /// Expected annual return, percent
    pub expected_return: f64,
    /// Safe withdrawal rate, percent
    pub withdrawal_rate: f64,
}

impl Default for CoastFireInput {
    fn default() -> Self {
        Self {
            current_age: 30,
            coast_age: 45,
            retirement_age: 65,
            current_savings: 50_000.0,
            annual_expenses: 50_000.0,
            expected_return: 7.0,
            withdrawal_rate: 4.0,
        }
    }
}

impl CoastFireInput {
    pub fn validate(&self) -> Result<()> {
        check_range("current_age", self.current_age as f64, 18.0, 70.0)?;
        check_range("coast_age", self.coast_age as f64, 18.0, 80.0)?;
        check_range("retirement_age", self.retirement_age as f64, 30.0, 80.0)?;
        check_range("current_savings", self.current_savings, 0.0, 100_000_000.0)?;
        check_range("annual_expenses", self.annual_expenses, 1_000.0, 10_000_000.0)?;
        check_range("expected_return", self.expected_return, 1.0, 15.0)?;
        check_range("withdrawal_rate", self.withdrawal_rate, 2.0, 10.0)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoastStatus {
    /// Savings already compound into the FIRE number
    Reached,
    /// More contributions are needed before the coast age
    Shortfall,
}

/// One year of the savings projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoastFireRow {
    /// Age at the end of the year
    pub age: u32,
    pub contribution: f64,
    pub growth: f64,
    pub balance: f64,
    pub coasting: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoastFireResult {
    pub fire_number: f64,
    pub coast_fire_number: f64,
    pub years_to_coast: u32,
    pub years_coasting: u32,
    /// Current savings grown to the coast age with no contributions
    pub projected_at_coast_age: f64,
    /// Current savings grown to retirement with no contributions
    pub projected_at_retirement: f64,
    /// Shortfall against the Coast FIRE number at the coast age
    pub amount_needed: f64,
    pub progress_percent: f64,
    pub annual_savings_needed: f64,
    pub monthly_savings_needed: f64,
    pub status: CoastStatus,
    pub projection: Vec<CoastFireRow>,
}

pub fn calculate(input: &CoastFireInput) -> Result<CoastFireResult> {
    input.validate()?;

    let rate = pct(input.expected_return);
    let years_to_coast = input.coast_age.saturating_sub(input.current_age);
    let years_coasting = input.retirement_age.saturating_sub(input.coast_age);
    let years_to_retirement = input.retirement_age.saturating_sub(input.current_age);

    let fire_number = input.annual_expenses * 100.0 / input.withdrawal_rate;
    let coast_fire_number = fire_number / (1.0 + rate).powi(years_coasting as i32);

    let projected_at_coast_age = future_value(input.current_savings, rate, years_to_coast as f64);
    let projected_at_retirement =
        future_value(input.current_savings, rate, years_to_retirement as f64);

    let amount_needed = (coast_fire_number - projected_at_coast_age).max(0.0);
    let progress_percent = (projected_at_coast_age / coast_fire_number * 100.0).min(100.0);

    let annual_savings_needed = payment_to_reach(
        coast_fire_number,
        input.current_savings,
        rate,
        years_to_coast as f64,
    );

    let status = if amount_needed > 0.0 {
        CoastStatus::Shortfall
    } else {
        CoastStatus::Reached
    };

    let projection = project(input, rate, years_to_coast, annual_savings_needed);

    Ok(CoastFireResult {
        fire_number,
        coast_fire_number,
        years_to_coast,
        years_coasting,
        projected_at_coast_age,
        projected_at_retirement,
        amount_needed,
        progress_percent,
        annual_savings_needed,
        monthly_savings_needed: annual_savings_needed / 12.0,
        status,
        projection,
    })
}

/// Contribute until the coast age, then let the balance compound
fn project(
    input: &CoastFireInput,
    rate: f64,
    years_to_coast: u32,
    annual_contribution: f64,
) -> Vec<CoastFireRow> {
    let years = input.retirement_age.saturating_sub(input.current_age);
    let mut balance = input.current_savings;

    (0..years)
        .map(|year| {
            let coasting = year >= years_to_coast;
            let contribution = if coasting { 0.0 } else { annual_contribution };
            let growth = balance * rate;
            balance += growth + contribution;
            CoastFireRow {
                age: input.current_age + year + 1,
                contribution,
                growth,
                balance,
                coasting,
            }
        })
        .collect()
}
