//! Social Security claiming-age calculator
//!
//! Adjusts the primary insurance amount (PIA) for claiming before or after
//! full retirement age and finds the break-even age against claiming at FRA.

use serde::{Deserialize, Serialize};

use crate::error::{check_range, Result};

/// Latest claiming age that still earns delayed credits, in months
const MAX_CLAIM_MONTHS: u32 = 70 * 12;

/// Full retirement age in months for a birth year
pub fn full_retirement_age_months(birth_year: i32) -> u32 {
    if birth_year <= 1937 {
        65 * 12
    } else if birth_year <= 1942 {
        65 * 12 + 2 * (birth_year - 1937) as u32
    } else if birth_year <= 1954 {
        66 * 12
    } else if birth_year <= 1959 {
        66 * 12 + 2 * (birth_year - 1954) as u32
    } else {
        67 * 12
    }
}

/// Early-claiming reduction as a fraction of PIA
///
/// 5/9 of 1% for each of the first 36 months, 5/12 of 1% beyond that.
pub fn early_reduction(months_early: u32) -> f64 {
    let first = months_early.min(36) as f64;
    let beyond = months_early.saturating_sub(36) as f64;
    (first * 5.0 / 9.0 + beyond * 5.0 / 12.0) / 100.0
}

/// Delayed retirement credit, 2/3 of 1% per month (8% a year)
pub fn delayed_credit(months_late: u32) -> f64 {
    months_late as f64 * 2.0 / 3.0 / 100.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialSecurityInput {
    pub birth_year: i32,
    /// Monthly benefit at full retirement age
    pub primary_insurance_amount: f64,
    pub claim_age: u32,
    pub claim_age_months: u32,
    /// Age used for the lifetime benefit totals
    pub life_expectancy: u32,
}

impl Default for SocialSecurityInput {
    fn default() -> Self {
        Self {
            birth_year: 1962,
            primary_insurance_amount: 2_200.0,
            claim_age: 62,
            claim_age_months: 0,
            life_expectancy: 85,
        }
    }
}

impl SocialSecurityInput {
    pub fn validate(&self) -> Result<()> {
        check_range("birth_year", self.birth_year as f64, 1943.0, 2010.0)?;
        check_range("primary_insurance_amount", self.primary_insurance_amount, 0.0, 6_000.0)?;
        check_range("claim_age", self.claim_age as f64, 62.0, 70.0)?;
        check_range("claim_age_months", self.claim_age_months as f64, 0.0, 11.0)?;
        check_range("claim_months", self.claim_months() as f64, 744.0, MAX_CLAIM_MONTHS as f64)?;
        check_range("life_expectancy", self.life_expectancy as f64, 62.0, 110.0)?;
        Ok(())
    }

    fn claim_months(&self) -> u32 {
        self.claim_age * 12 + self.claim_age_months
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialSecurityResult {
    pub full_retirement_age_months: u32,
    pub claim_age_months: u32,
    pub reduction_percent: f64,
    pub delayed_credit_percent: f64,
    pub monthly_benefit: f64,
    pub annual_benefit: f64,
    /// Age at which cumulative benefits match claiming at FRA
    pub break_even_age: Option<f64>,
    pub lifetime_benefits: f64,
    pub lifetime_benefits_at_fra: f64,
}

fn lifetime_total(monthly: f64, start_months: u32, end_months: u32) -> f64 {
    monthly * end_months.saturating_sub(start_months) as f64
}

pub fn calculate(input: &SocialSecurityInput) -> Result<SocialSecurityResult> {
    input.validate()?;

    let fra = full_retirement_age_months(input.birth_year);
    let claim = input.claim_months();
    let pia = input.primary_insurance_amount;

    let reduction = early_reduction(fra.saturating_sub(claim));
    let credit = delayed_credit(claim.saturating_sub(fra));
    let monthly_benefit = pia * (1.0 - reduction + credit);

    let break_even_age = if claim == fra || (monthly_benefit - pia).abs() < f64::EPSILON {
        None
    } else {
        // benefit * (t - claim) == pia * (t - fra)
        let months = (monthly_benefit * claim as f64 - pia * fra as f64) / (monthly_benefit - pia);
        Some(months / 12.0)
    };

    let end = input.life_expectancy * 12;

    Ok(SocialSecurityResult {
        full_retirement_age_months: fra,
        claim_age_months: claim,
        reduction_percent: reduction * 100.0,
        delayed_credit_percent: credit * 100.0,
        monthly_benefit,
        annual_benefit: monthly_benefit * 12.0,
        break_even_age,
        lifetime_benefits: lifetime_total(monthly_benefit, claim, end),
        lifetime_benefits_at_fra: lifetime_total(pia, fra, end),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_full_retirement_age() {
        assert_eq!(full_retirement_age_months(1950), 792);
        assert_eq!(full_retirement_age_months(1957), 798);
        assert_eq!(full_retirement_age_months(1960), 804);
    }

    #[test]
    fn test_claim_at_62_born_1962() {
        let result = calculate(&SocialSecurityInput::default()).unwrap();
        // 60 months early: 20% + 10% = 30% reduction
        assert_relative_eq!(result.reduction_percent, 30.0, max_relative = 1e-12);
        assert_relative_eq!(result.monthly_benefit, 1_540.0, max_relative = 1e-12);
        // Break-even: 1540 (t - 744) = 2200 (t - 804) -> t = 944 months
        assert_relative_eq!(result.break_even_age.unwrap(), 944.0 / 12.0, max_relative = 1e-12);
    }

    #[test]
    fn test_delay_to_70() {
        let input = SocialSecurityInput {
            claim_age: 70,
            ..Default::default()
        };
        let result = calculate(&input).unwrap();
        assert_relative_eq!(result.delayed_credit_percent, 24.0, max_relative = 1e-12);
        assert_relative_eq!(result.monthly_benefit, 2_728.0, max_relative = 1e-12);
        assert!(result.break_even_age.unwrap() > 70.0);
    }

    #[test]
    fn test_claim_at_fra() {
        let input = SocialSecurityInput {
            claim_age: 67,
            ..Default::default()
        };
        let result = calculate(&input).unwrap();
        assert_eq!(result.monthly_benefit, 2_200.0);
        assert_eq!(result.break_even_age, None);
        assert_eq!(result.lifetime_benefits, result.lifetime_benefits_at_fra);
    }

    #[test]
    fn test_zero_pia() {
        let input = SocialSecurityInput {
            primary_insurance_amount: 0.0,
            ..Default::default()
        };
        let result = calculate(&input).unwrap();
        assert_eq!(result.monthly_benefit, 0.0);
        assert_eq!(result.break_even_age, None);
    }

    #[test]
    fn test_rejects_past_70() {
        let input = SocialSecurityInput {
            claim_age: 70,
            claim_age_months: 3,
            ..Default::default()
        };
        assert!(calculate(&input).is_err());
    }
}
