//! Roth conversion comparison
//!
//! Compares converting now (paying tax at today's rate) with leaving the money
//! in a traditional account and paying tax at withdrawal. When the tax is paid
//! from outside funds, the traditional side also invests that tax money.

use serde::{Deserialize, Serialize};

use crate::error::{check_range, Result};
use crate::finance::{future_value, pct};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RothConversionInput {
    pub conversion_amount: f64,
    pub current_tax_rate: f64,
    pub retirement_tax_rate: f64,
    pub expected_return: f64,
    pub years: u32,
    /// Pay the conversion tax from a taxable account instead of the IRA
    pub pay_tax_from_outside: bool,
}

impl Default for RothConversionInput {
    fn default() -> Self {
        Self {
            conversion_amount: 100_000.0,
            current_tax_rate: 22.0,
            retirement_tax_rate: 24.0,
            expected_return: 6.0,
            years: 20,
            pay_tax_from_outside: true,
        }
    }
}

impl RothConversionInput {
    pub fn validate(&self) -> Result<()> {
        check_range("conversion_amount", self.conversion_amount, 0.0, 10_000_000.0)?;
        check_range("current_tax_rate", self.current_tax_rate, 0.0, 50.0)?;
        check_range("retirement_tax_rate", self.retirement_tax_rate, 0.0, 50.0)?;
        check_range("expected_return", self.expected_return, 0.0, 15.0)?;
        check_range("years", self.years as f64, 1.0, 50.0)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionVerdict {
    Convert,
    KeepTraditional,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RothConversionResult {
    pub tax_due_now: f64,
    pub roth_value: f64,
    /// Traditional balance after retirement tax, plus any invested side fund
    pub traditional_after_tax: f64,
    pub advantage: f64,
    pub verdict: ConversionVerdict,
    /// Retirement tax rate at which both paths end equal, percent
    pub break_even_tax_rate: f64,
}

pub fn calculate(input: &RothConversionInput) -> Result<RothConversionResult> {
    input.validate()?;

    let amount = input.conversion_amount;
    let rate = pct(input.expected_return);
    let years = input.years as f64;
    let current = pct(input.current_tax_rate);
    let retirement = pct(input.retirement_tax_rate);

    let tax_due_now = amount * current;
    let grown = future_value(amount, rate, years);

    let (roth_value, traditional_after_tax) = if input.pay_tax_from_outside {
        (
            grown,
            grown * (1.0 - retirement) + future_value(tax_due_now, rate, years),
        )
    } else {
        (grown * (1.0 - current), grown * (1.0 - retirement))
    };

    let difference = roth_value - traditional_after_tax;
    let verdict = if difference.abs() < 0.005 {
        ConversionVerdict::Neutral
    } else if difference > 0.0 {
        ConversionVerdict::Convert
    } else {
        ConversionVerdict::KeepTraditional
    };

    Ok(RothConversionResult {
        tax_due_now,
        roth_value,
        traditional_after_tax,
        advantage: difference.abs(),
        verdict,
        break_even_tax_rate: input.current_tax_rate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_higher_future_rate_favors_conversion() {
        let result = calculate(&RothConversionInput::default()).unwrap();
        assert_eq!(result.verdict, ConversionVerdict::Convert);
        assert_relative_eq!(result.tax_due_now, 22_000.0, max_relative = 1e-12);

        let grown = 100_000.0 * 1.06_f64.powf(20.0);
        assert_relative_eq!(result.advantage, grown * 0.02, max_relative = 1e-9);
    }

    #[test]
    fn test_lower_future_rate_keeps_traditional() {
        let input = RothConversionInput {
            retirement_tax_rate: 12.0,
            pay_tax_from_outside: false,
            ..Default::default()
        };
        let result = calculate(&input).unwrap();
        assert_eq!(result.verdict, ConversionVerdict::KeepTraditional);
        assert!(result.advantage > 0.0);
    }

    #[test]
    fn test_equal_rates_are_neutral() {
        let input = RothConversionInput {
            retirement_tax_rate: 22.0,
            ..Default::default()
        };
        let result = calculate(&input).unwrap();
        assert_eq!(result.verdict, ConversionVerdict::Neutral);
    }
}
