//! Precious metals IRA allocation calculator
//!
//! Splits a portfolio allocation between gold and silver, converts dollars to
//! ounces at spot plus dealer premium, and totals custodian and storage fees.

use serde::{Deserialize, Serialize};

use crate::error::{check_range, Result};
use crate::finance::pct;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetalsAllocationInput {
    pub portfolio_value: f64,
    /// Share of the portfolio in precious metals, percent
    pub metals_allocation: f64,
    /// Share of the metals allocation in gold, percent; the rest is silver
    pub gold_share: f64,
    pub gold_price: f64,
    pub silver_price: f64,
    /// Dealer premium over spot, percent
    pub dealer_premium: f64,
    pub setup_fee: f64,
    /// Custodian plus storage fees per year
    pub annual_fees: f64,
    /// Expected annual appreciation of the metals, percent
    pub expected_return: f64,
    pub years: u32,
}

impl Default for MetalsAllocationInput {
    fn default() -> Self {
        Self {
            portfolio_value: 500_000.0,
            metals_allocation: 10.0,
            gold_share: 75.0,
            gold_price: 2_600.0,
            silver_price: 30.0,
            dealer_premium: 5.0,
            setup_fee: 50.0,
            annual_fees: 250.0,
            expected_return: 4.0,
            years: 10,
        }
    }
}

impl MetalsAllocationInput {
    pub fn validate(&self) -> Result<()> {
        check_range("portfolio_value", self.portfolio_value, 0.0, 100_000_000.0)?;
        check_range("metals_allocation", self.metals_allocation, 0.0, 100.0)?;
        check_range("gold_share", self.gold_share, 0.0, 100.0)?;
        check_range("gold_price", self.gold_price, 100.0, 20_000.0)?;
        check_range("silver_price", self.silver_price, 1.0, 1_000.0)?;
        check_range("dealer_premium", self.dealer_premium, 0.0, 30.0)?;
        check_range("setup_fee", self.setup_fee, 0.0, 5_000.0)?;
        check_range("annual_fees", self.annual_fees, 0.0, 10_000.0)?;
        check_range("expected_return", self.expected_return, 0.0, 15.0)?;
        check_range("years", self.years as f64, 1.0, 40.0)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetalsRow {
    pub year: u32,
    pub metals_value: f64,
    pub cumulative_fees: f64,
    pub net_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetalsAllocationResult {
    pub metals_dollars: f64,
    pub gold_dollars: f64,
    pub silver_dollars: f64,
    pub gold_ounces: f64,
    pub silver_ounces: f64,
    /// Premium paid to the dealer at purchase
    pub premium_paid: f64,
    pub total_fees: f64,
    /// Fees over the holding period as a percent of the allocation
    pub fee_drag_percent: f64,
    pub projection: Vec<MetalsRow>,
}

pub fn calculate(input: &MetalsAllocationInput) -> Result<MetalsAllocationResult> {
    input.validate()?;

    let metals_dollars = input.portfolio_value * pct(input.metals_allocation);
    let gold_dollars = metals_dollars * pct(input.gold_share);
    let silver_dollars = metals_dollars - gold_dollars;

    let premium = 1.0 + pct(input.dealer_premium);
    let gold_ounces = gold_dollars / (input.gold_price * premium);
    let silver_ounces = silver_dollars / (input.silver_price * premium);
    let premium_paid = metals_dollars - metals_dollars / premium;

    let total_fees = if metals_dollars > 0.0 {
        input.setup_fee + input.annual_fees * input.years as f64
    } else {
        0.0
    };
    let fee_drag_percent = if metals_dollars > 0.0 {
        total_fees / metals_dollars * 100.0
    } else {
        0.0
    };

    // Metal is carried at spot, so the premium is sunk on day one
    let spot_value = metals_dollars / premium;
    let rate = pct(input.expected_return);
    let projection = (1..=input.years)
        .map(|year| {
            let metals_value = spot_value * (1.0 + rate).powi(year as i32);
            let cumulative_fees = if metals_dollars > 0.0 {
                input.setup_fee + input.annual_fees * year as f64
            } else {
                0.0
            };
            MetalsRow {
                year,
                metals_value,
                cumulative_fees,
                net_value: (metals_value - cumulative_fees).max(0.0),
            }
        })
        .collect();

    Ok(MetalsAllocationResult {
        metals_dollars,
        gold_dollars,
        silver_dollars,
        gold_ounces,
        silver_ounces,
        premium_paid,
        total_fees,
        fee_drag_percent,
        projection,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_allocation_split() {
        let result = calculate(&MetalsAllocationInput::default()).unwrap();

        assert_relative_eq!(result.metals_dollars, 50_000.0, max_relative = 1e-12);
        assert_relative_eq!(result.gold_dollars, 37_500.0, max_relative = 1e-12);
        assert_relative_eq!(result.silver_dollars, 12_500.0, max_relative = 1e-12);
        assert_relative_eq!(result.gold_ounces, 37_500.0 / (2_600.0 * 1.05), max_relative = 1e-12);
        assert_relative_eq!(result.total_fees, 2_550.0, max_relative = 1e-12);
        assert_relative_eq!(result.fee_drag_percent, 5.1, max_relative = 1e-12);
    }

    #[test]
    fn test_zero_allocation() {
        let input = MetalsAllocationInput {
            metals_allocation: 0.0,
            ..Default::default()
        };
        let result = calculate(&input).unwrap();
        assert_eq!(result.total_fees, 0.0);
        assert_eq!(result.fee_drag_percent, 0.0);
        assert_eq!(result.gold_ounces, 0.0);
    }

    #[test]
    fn test_fees_can_exceed_small_allocation() {
        let input = MetalsAllocationInput {
            portfolio_value: 10_000.0,
            metals_allocation: 5.0,
            years: 20,
            expected_return: 0.0,
            ..Default::default()
        };
        let result = calculate(&input).unwrap();
        assert!(result.fee_drag_percent > 100.0);
        assert!(result.projection.iter().all(|row| row.net_value >= 0.0));
    }
}
