//! Retirement savings growth projection

use serde::{Deserialize, Serialize};

use crate::error::{check_range, Result};
use crate::finance::pct;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SavingsGrowthInput {
    pub current_balance: f64,
    pub annual_contribution: f64,
    /// Yearly raise in contributions, percent
    pub contribution_growth: f64,
    pub expected_return: f64,
    pub inflation: f64,
    pub years: u32,
}

impl Default for SavingsGrowthInput {
    fn default() -> Self {
        Self {
            current_balance: 100_000.0,
            annual_contribution: 12_000.0,
            contribution_growth: 2.0,
            expected_return: 7.0,
            inflation: 3.0,
            years: 25,
        }
    }
}

impl SavingsGrowthInput {
    pub fn validate(&self) -> Result<()> {
        check_range("current_balance", self.current_balance, 0.0, 100_000_000.0)?;
        check_range("annual_contribution", self.annual_contribution, 0.0, 1_000_000.0)?;
        check_range("contribution_growth", self.contribution_growth, 0.0, 10.0)?;
        check_range("expected_return", self.expected_return, 0.0, 15.0)?;
        check_range("inflation", self.inflation, 0.0, 10.0)?;
        check_range("years", self.years as f64, 1.0, 60.0)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsRow {
    pub year: u32,
    pub contribution: f64,
    pub growth: f64,
    pub balance: f64,
    /// Balance in today's dollars
    pub real_balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsGrowthResult {
    pub future_value: f64,
    pub real_future_value: f64,
    pub total_contributions: f64,
    pub total_growth: f64,
    pub projection: Vec<SavingsRow>,
}

pub fn calculate(input: &SavingsGrowthInput) -> Result<SavingsGrowthResult> {
    input.validate()?;

    let rate = pct(input.expected_return);
    let raise = pct(input.contribution_growth);
    let inflation = 1.0 + pct(input.inflation);

    let mut balance = input.current_balance;
    let mut contribution = input.annual_contribution;
    let mut total_contributions = 0.0;
    let mut projection = Vec::with_capacity(input.years as usize);

    for year in 1..=input.years {
        let growth = balance * rate;
        balance += growth + contribution;
        total_contributions += contribution;
        projection.push(SavingsRow {
            year,
            contribution,
            growth,
            balance,
            real_balance: balance / inflation.powi(year as i32),
        });
        contribution *= 1.0 + raise;
    }

    let real_future_value = projection.last().map(|r| r.real_balance).unwrap_or(balance);

    Ok(SavingsGrowthResult {
        future_value: balance,
        real_future_value,
        total_contributions,
        total_growth: (balance - input.current_balance - total_contributions).max(0.0),
        projection,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finance::{future_value, future_value_of_series};
    use approx::assert_relative_eq;

    #[test]
    fn test_level_contributions_match_closed_form() {
        let input = SavingsGrowthInput {
            contribution_growth: 0.0,
            ..Default::default()
        };
        let result = calculate(&input).unwrap();

        let expected = future_value(100_000.0, 0.07, 25.0) + future_value_of_series(12_000.0, 0.07, 25.0);
        assert_relative_eq!(result.future_value, expected, max_relative = 1e-9);
        assert_relative_eq!(result.total_contributions, 300_000.0, max_relative = 1e-12);
    }

    #[test]
    fn test_real_value_below_nominal() {
        let result = calculate(&SavingsGrowthInput::default()).unwrap();
        assert!(result.real_future_value < result.future_value);
        assert_eq!(result.projection.len(), 25);
        assert!(result.total_growth > 0.0);
    }

    #[test]
    fn test_zero_everything() {
        let input = SavingsGrowthInput {
            current_balance: 0.0,
            annual_contribution: 0.0,
            expected_return: 0.0,
            ..Default::default()
        };
        let result = calculate(&input).unwrap();
        assert_eq!(result.future_value, 0.0);
        assert_eq!(result.total_growth, 0.0);
    }
}
