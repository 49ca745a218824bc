//! Charitable remainder trust payout and deduction estimator
//!
//! An annuity trust (CRAT) pays a fixed dollar amount set at funding; a
//! unitrust (CRUT) pays a fixed percentage of each year's balance. The
//! charitable deduction is the present value of what is left for charity and
//! must be at least 10% of the funding amount.

use serde::{Deserialize, Serialize};

use crate::error::{check_range, Result};
use crate::finance::{pct, pv_annuity};
use crate::limits::LifeExpectancyTable;

const MINIMUM_REMAINDER_PERCENT: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrustType {
    Unitrust,
    AnnuityTrust,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TrustTerm {
    /// Fixed term of 1 to 20 years
    Years { years: u32 },
    /// Life of a single beneficiary of this age
    Lifetime { age: u32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrtInput {
    pub trust_type: TrustType,
    pub funding_amount: f64,
    /// Annual payout rate, percent
    pub payout_rate: f64,
    pub term: TrustTerm,
    /// IRS Section 7520 rate, percent
    pub section_7520_rate: f64,
    /// Expected annual return of trust assets, percent
    pub expected_return: f64,
}

impl Default for CrtInput {
    fn default() -> Self {
        Self {
            trust_type: TrustType::Unitrust,
            funding_amount: 1_000_000.0,
            payout_rate: 5.0,
            term: TrustTerm::Years { years: 20 },
            section_7520_rate: 5.0,
            expected_return: 6.0,
        }
    }
}

impl CrtInput {
    pub fn validate(&self) -> Result<()> {
        check_range("funding_amount", self.funding_amount, 10_000.0, 100_000_000.0)?;
        check_range("payout_rate", self.payout_rate, 5.0, 50.0)?;
        check_range("section_7520_rate", self.section_7520_rate, 0.2, 20.0)?;
        check_range("expected_return", self.expected_return, 0.0, 15.0)?;
        match self.term {
            TrustTerm::Years { years } => check_range("term_years", years as f64, 1.0, 20.0),
            TrustTerm::Lifetime { age } => check_range("beneficiary_age", age as f64, 25.0, 100.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrtRow {
    pub year: u32,
    pub starting_balance: f64,
    pub growth: f64,
    pub payout: f64,
    pub ending_balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrtResult {
    pub term_years: f64,
    pub first_year_payout: f64,
    pub charitable_deduction: f64,
    pub remainder_percent: f64,
    pub passes_ten_percent_test: bool,
    pub total_projected_payouts: f64,
    pub projected_remainder: f64,
    pub projection: Vec<CrtRow>,
}

pub fn calculate(input: &CrtInput, life_table: &LifeExpectancyTable) -> Result<CrtResult> {
    input.validate()?;

    let term_years = match input.term {
        TrustTerm::Years { years } => years as f64,
        TrustTerm::Lifetime { age } => life_table.years_remaining(age),
    };
    let payout = pct(input.payout_rate);
    let fmv = input.funding_amount;
    let first_year_payout = fmv * payout;

    let charitable_deduction = match input.trust_type {
        TrustType::AnnuityTrust => {
            let pv_payments =
                pv_annuity(first_year_payout, pct(input.section_7520_rate), term_years);
            (fmv - pv_payments).max(0.0)
        }
        TrustType::Unitrust => fmv * (1.0 - payout).powf(term_years),
    };

    let remainder_percent = charitable_deduction / fmv * 100.0;
    let projection = project(input, term_years.ceil() as u32, first_year_payout);
    let total_projected_payouts = projection.iter().map(|row| row.payout).sum();
    let projected_remainder = projection.last().map(|row| row.ending_balance).unwrap_or(fmv);

    Ok(CrtResult {
        term_years,
        first_year_payout,
        charitable_deduction,
        remainder_percent,
        passes_ten_percent_test: remainder_percent >= MINIMUM_REMAINDER_PERCENT,
        total_projected_payouts,
        projected_remainder,
        projection,
    })
}

/// Growth is earned through the year and the payout is taken at year end
fn project(input: &CrtInput, years: u32, annuity_amount: f64) -> Vec<CrtRow> {
    let growth_rate = pct(input.expected_return);
    let payout_rate = pct(input.payout_rate);
    let mut balance = input.funding_amount;

    (0..years)
        .map(|year| {
            let starting_balance = balance;
            let growth = starting_balance * growth_rate;
            let due = match input.trust_type {
                TrustType::AnnuityTrust => annuity_amount,
                TrustType::Unitrust => starting_balance * payout_rate,
            };
            let payout = due.min(starting_balance + growth);
            balance = starting_balance + growth - payout;
            CrtRow {
                year: year + 1,
                starting_balance,
                growth,
                payout,
                ending_balance: balance,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_unitrust_deduction() {
        let result = calculate(&CrtInput::default(), &LifeExpectancyTable::default()).unwrap();

        let expected = 1_000_000.0 * 0.95_f64.powf(20.0);
        assert_relative_eq!(result.charitable_deduction, expected, max_relative = 1e-12);
        assert!(result.passes_ten_percent_test);
        assert_eq!(result.projection.len(), 20);
        assert_relative_eq!(result.first_year_payout, 50_000.0, max_relative = 1e-12);
    }

    #[test]
    fn test_annuity_trust_deduction() {
        let input = CrtInput {
            trust_type: TrustType::AnnuityTrust,
            term: TrustTerm::Years { years: 10 },
            ..Default::default()
        };
        let result = calculate(&input, &LifeExpectancyTable::default()).unwrap();

        let pv = 50_000.0 * (1.0 - 1.05_f64.powf(-10.0)) / 0.05;
        assert_relative_eq!(result.charitable_deduction, 1_000_000.0 - pv, max_relative = 1e-9);
        // Fixed payments every year
        assert!(result.projection.iter().all(|row| (row.payout - 50_000.0).abs() < 1e-9));
    }

    #[test]
    fn test_ten_percent_test_fails_for_high_payout() {
        let input = CrtInput {
            trust_type: TrustType::AnnuityTrust,
            payout_rate: 20.0,
            term: TrustTerm::Years { years: 20 },
            ..Default::default()
        };
        let result = calculate(&input, &LifeExpectancyTable::default()).unwrap();
        assert_eq!(result.charitable_deduction, 0.0);
        assert!(!result.passes_ten_percent_test);
        assert!(result.projection.iter().all(|row| row.ending_balance >= 0.0));
    }

    #[test]
    fn test_lifetime_term() {
        let input = CrtInput {
            term: TrustTerm::Lifetime { age: 65 },
            ..Default::default()
        };
        let result = calculate(&input, &LifeExpectancyTable::default()).unwrap();
        assert_relative_eq!(result.term_years, 22.9);
        assert_eq!(result.projection.len(), 23);
    }

    #[test]
    fn test_young_beneficiary_gets_longer_term() {
        let table = LifeExpectancyTable::default();
        let at_age = |age| {
            let input = CrtInput {
                term: TrustTerm::Lifetime { age },
                ..Default::default()
            };
            calculate(&input, &table).unwrap()
        };

        let young = at_age(25);
        let older = at_age(40);
        assert_relative_eq!(young.term_years, 60.2);
        assert_relative_eq!(older.term_years, 45.7);
        assert!(young.charitable_deduction < older.charitable_deduction);
        assert!(at_age(30).term_years > at_age(35).term_years);
    }

    #[test]
    fn test_term_out_of_range() {
        let input = CrtInput {
            term: TrustTerm::Years { years: 25 },
            ..Default::default()
        };
        assert!(calculate(&input, &LifeExpectancyTable::default()).is_err());
    }
}
