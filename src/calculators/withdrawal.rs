//! How long will retirement savings last
//!
//! Withdrawals are taken at the start of each year and rise with inflation;
//! the remainder earns the expected return.

use serde::{Deserialize, Serialize};

use crate::error::{check_range, Result};
use crate::finance::pct;

const SAFE_WITHDRAWAL_RATE: f64 = 0.04;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WithdrawalInput {
    pub balance: f64,
    /// First-year withdrawal
    pub annual_withdrawal: f64,
    /// Yearly increase in withdrawals, percent
    pub withdrawal_inflation: f64,
    pub expected_return: f64,
    pub max_years: u32,
}

impl Default for WithdrawalInput {
    fn default() -> Self {
        Self {
            balance: 1_000_000.0,
            annual_withdrawal: 50_000.0,
            withdrawal_inflation: 3.0,
            expected_return: 5.0,
            max_years: 40,
        }
    }
}

impl WithdrawalInput {
    pub fn validate(&self) -> Result<()> {
        check_range("balance", self.balance, 0.0, 100_000_000.0)?;
        check_range("annual_withdrawal", self.annual_withdrawal, 0.0, 10_000_000.0)?;
        check_range("withdrawal_inflation", self.withdrawal_inflation, 0.0, 10.0)?;
        check_range("expected_return", self.expected_return, 0.0, 15.0)?;
        check_range("max_years", self.max_years as f64, 1.0, 100.0)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WithdrawalStatus {
    /// Money outlasts the projection horizon
    Sustainable,
    /// The balance runs out during this year
    Depleted { year: u32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithdrawalRow {
    pub year: u32,
    pub starting_balance: f64,
    pub withdrawal: f64,
    pub growth: f64,
    pub ending_balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithdrawalResult {
    pub status: WithdrawalStatus,
    /// Years of withdrawals paid in full
    pub years_lasting: u32,
    pub initial_withdrawal_rate: f64,
    pub four_percent_rule_amount: f64,
    pub total_withdrawn: f64,
    pub ending_balance: f64,
    pub projection: Vec<WithdrawalRow>,
}

pub fn calculate(input: &WithdrawalInput) -> Result<WithdrawalResult> {
    input.validate()?;

    let rate = pct(input.expected_return);
    let raise = pct(input.withdrawal_inflation);

    let mut balance = input.balance;
    let mut due = input.annual_withdrawal;
    let mut years_lasting = 0;
    let mut status = WithdrawalStatus::Sustainable;
    let mut projection = Vec::new();

    for year in 1..=input.max_years {
        let starting_balance = balance;
        let withdrawal = due.min(starting_balance);
        let growth = (starting_balance - withdrawal) * rate;
        balance = starting_balance - withdrawal + growth;

        projection.push(WithdrawalRow {
            year,
            starting_balance,
            withdrawal,
            growth,
            ending_balance: balance,
        });

        if withdrawal < due {
            status = WithdrawalStatus::Depleted { year };
            break;
        }
        years_lasting = year;
        if balance <= 0.0 && due > 0.0 {
            status = WithdrawalStatus::Depleted { year: year + 1 };
            break;
        }
        due *= 1.0 + raise;
    }

    let initial_withdrawal_rate = if input.balance > 0.0 {
        input.annual_withdrawal / input.balance * 100.0
    } else {
        0.0
    };

    Ok(WithdrawalResult {
        status,
        years_lasting,
        initial_withdrawal_rate,
        four_percent_rule_amount: input.balance * SAFE_WITHDRAWAL_RATE,
        total_withdrawn: projection.iter().map(|row| row.withdrawal).sum(),
        ending_balance: balance,
        projection,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sustainable_at_low_rate() {
        let input = WithdrawalInput {
            annual_withdrawal: 30_000.0,
            withdrawal_inflation: 0.0,
            ..Default::default()
        };
        let result = calculate(&input).unwrap();
        assert_eq!(result.status, WithdrawalStatus::Sustainable);
        assert_eq!(result.years_lasting, 40);
        assert!(result.ending_balance > input.balance);
    }

    #[test]
    fn test_depletes_without_growth() {
        let input = WithdrawalInput {
            balance: 100_000.0,
            annual_withdrawal: 30_000.0,
            withdrawal_inflation: 0.0,
            expected_return: 0.0,
            ..Default::default()
        };
        let result = calculate(&input).unwrap();
        // Three full years, partial fourth
        assert_eq!(result.years_lasting, 3);
        assert_eq!(result.status, WithdrawalStatus::Depleted { year: 4 });
        assert_eq!(result.total_withdrawn, 100_000.0);
        assert_eq!(result.ending_balance, 0.0);
    }

    #[test]
    fn test_exact_depletion() {
        let input = WithdrawalInput {
            balance: 90_000.0,
            annual_withdrawal: 30_000.0,
            withdrawal_inflation: 0.0,
            expected_return: 0.0,
            ..Default::default()
        };
        let result = calculate(&input).unwrap();
        assert_eq!(result.years_lasting, 3);
        assert_eq!(result.status, WithdrawalStatus::Depleted { year: 4 });
    }

    #[test]
    fn test_zero_balance() {
        let input = WithdrawalInput {
            balance: 0.0,
            ..Default::default()
        };
        let result = calculate(&input).unwrap();
        assert_eq!(result.initial_withdrawal_rate, 0.0);
        assert_eq!(result.years_lasting, 0);
        assert_eq!(result.status, WithdrawalStatus::Depleted { year: 1 });
    }

    #[test]
    fn test_four_percent_rule() {
        let result = calculate(&WithdrawalInput::default()).unwrap();
        assert_eq!(result.four_percent_rule_amount, 40_000.0);
        assert_eq!(result.initial_withdrawal_rate, 5.0);
    }
}
