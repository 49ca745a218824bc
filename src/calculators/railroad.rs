//! Railroad Retirement annuity estimator
//!
//! Tier I mirrors a Social Security benefit computed from railroad and
//! non-railroad earnings. Tier II is 0.7% of average monthly compensation
//! over the highest 60 months, times years of railroad service.
//!
//! Employees with 30+ years may retire at 60 with no reduction. Otherwise
//! Tier I takes the Social Security early reduction and Tier II is reduced
//! by 1/180 for each month under full retirement age.

use serde::{Deserialize, Serialize};

use super::calpers::PensionEligibility;
use super::social_security::{early_reduction, full_retirement_age_months};
use crate::error::{check_range, Result};
use crate::limits::{LimitsTable, TaxYearLimits};

const TIER_II_RATE: f64 = 0.007;
const MINIMUM_SERVICE_YEARS: f64 = 10.0;
const SIXTY_THIRTY_SERVICE: f64 = 30.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RailroadInput {
    pub birth_year: i32,
    pub retirement_age: u32,
    pub retirement_age_months: u32,
    pub years_of_service: f64,
    /// Average indexed monthly earnings for Tier I
    pub average_indexed_monthly_earnings: f64,
    /// Average monthly compensation over the highest 60 months
    pub average_monthly_compensation: f64,
    pub tax_year: i32,
}

impl Default for RailroadInput {
    fn default() -> Self {
        Self {
            birth_year: 1966,
            retirement_age: 60,
            retirement_age_months: 0,
            years_of_service: 30.0,
            average_indexed_monthly_earnings: 6_500.0,
            average_monthly_compensation: 7_500.0,
            tax_year: 2026,
        }
    }
}

impl RailroadInput {
    pub fn validate(&self) -> Result<()> {
        check_range("birth_year", self.birth_year as f64, 1943.0, 2010.0)?;
        check_range("retirement_age", self.retirement_age as f64, 55.0, 80.0)?;
        check_range("retirement_age_months", self.retirement_age_months as f64, 0.0, 11.0)?;
        check_range("years_of_service", self.years_of_service, 0.0, 50.0)?;
        check_range(
            "average_indexed_monthly_earnings",
            self.average_indexed_monthly_earnings,
            0.0,
            30_000.0,
        )?;
        check_range(
            "average_monthly_compensation",
            self.average_monthly_compensation,
            0.0,
            30_000.0,
        )?;
        check_range("tax_year", self.tax_year as f64, 2000.0, 2100.0)?;
        Ok(())
    }

    fn age_months(&self) -> u32 {
        self.retirement_age * 12 + self.retirement_age_months
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RailroadResult {
    pub eligibility: PensionEligibility,
    pub sixty_thirty: bool,
    pub months_before_full_age: u32,
    pub tier_1_unreduced: f64,
    pub tier_1_reduction_percent: f64,
    pub tier_1: f64,
    pub tier_2_unreduced: f64,
    pub tier_2_reduction_percent: f64,
    pub tier_2: f64,
    pub total_monthly: f64,
    pub total_annual: f64,
}

/// Primary insurance amount from AIME and the year's bend points
pub fn primary_insurance_amount(aime: f64, limits: &TaxYearLimits) -> f64 {
    let b1 = limits.pia_bend_point_1;
    let b2 = limits.pia_bend_point_2;
    let first = aime.min(b1);
    let second = (aime.min(b2) - b1).max(0.0);
    let third = (aime - b2).max(0.0);
    0.90 * first + 0.32 * second + 0.15 * third
}

pub fn calculate(input: &RailroadInput, table: &LimitsTable) -> Result<RailroadResult> {
    input.validate()?;
    let limits = table.for_year(input.tax_year)?;

    let age_months = input.age_months();
    let sixty_thirty = input.years_of_service >= SIXTY_THIRTY_SERVICE && age_months >= 60 * 12;

    let eligibility = if input.years_of_service < MINIMUM_SERVICE_YEARS {
        PensionEligibility::InsufficientService
    } else if age_months < 62 * 12 && !sixty_thirty {
        PensionEligibility::BelowMinimumAge
    } else {
        PensionEligibility::Eligible
    };

    let fra = full_retirement_age_months(input.birth_year);
    let months_before_full_age = fra.saturating_sub(age_months);

    let (tier_1_reduction, tier_2_reduction) = if sixty_thirty {
        (0.0, 0.0)
    } else {
        (
            early_reduction(months_before_full_age),
            months_before_full_age as f64 / 180.0,
        )
    };

    let (tier_1_unreduced, tier_2_unreduced) = match eligibility {
        PensionEligibility::Eligible => (
            primary_insurance_amount(input.average_indexed_monthly_earnings, limits),
            TIER_II_RATE * input.average_monthly_compensation * input.years_of_service,
        ),
        _ => (0.0, 0.0),
    };

    let tier_1 = tier_1_unreduced * (1.0 - tier_1_reduction).max(0.0);
    let tier_2 = tier_2_unreduced * (1.0 - tier_2_reduction).max(0.0);
    let total_monthly = tier_1 + tier_2;

    log::debug!(
        "railroad: tier I {:.2}, tier II {:.2}, 60/30 {}",
        tier_1,
        tier_2,
        sixty_thirty
    );

    Ok(RailroadResult {
        eligibility,
        sixty_thirty,
        months_before_full_age,
        tier_1_unreduced,
        tier_1_reduction_percent: tier_1_reduction * 100.0,
        tier_1,
        tier_2_unreduced,
        tier_2_reduction_percent: tier_2_reduction * 100.0,
        tier_2,
        total_monthly,
        total_annual: total_monthly * 12.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_pia_bend_points() {
        let table = LimitsTable::builtin();
        let y2025 = table.for_year(2025).unwrap();

        assert_relative_eq!(primary_insurance_amount(1_000.0, y2025), 900.0, max_relative = 1e-12);
        let expected = 0.9 * 1_226.0 + 0.32 * (7_391.0 - 1_226.0) + 0.15 * 609.0;
        assert_relative_eq!(primary_insurance_amount(8_000.0, y2025), expected, max_relative = 1e-12);
        assert_eq!(primary_insurance_amount(0.0, y2025), 0.0);
    }

    #[test]
    fn test_sixty_thirty_unreduced() {
        let input = RailroadInput {
            tax_year: 2025,
            ..Default::default()
        };
        let result = calculate(&input, &LimitsTable::builtin()).unwrap();

        assert!(result.sixty_thirty);
        assert_eq!(result.eligibility, PensionEligibility::Eligible);
        assert_eq!(result.tier_1, result.tier_1_unreduced);
        assert_relative_eq!(result.tier_2, 0.007 * 7_500.0 * 30.0, max_relative = 1e-12);
    }

    #[test]
    fn test_early_with_under_30_years() {
        let input = RailroadInput {
            retirement_age: 62,
            years_of_service: 20.0,
            ..Default::default()
        };
        let result = calculate(&input, &LimitsTable::builtin()).unwrap();

        assert!(!result.sixty_thirty);
        assert_eq!(result.months_before_full_age, 60);
        assert_relative_eq!(result.tier_1_reduction_percent, 30.0, max_relative = 1e-12);
        assert_relative_eq!(result.tier_2_reduction_percent, 100.0 / 3.0, max_relative = 1e-12);
        assert!(result.tier_1 < result.tier_1_unreduced);
    }

    #[test]
    fn test_ineligible() {
        let short = RailroadInput {
            years_of_service: 8.0,
            retirement_age: 65,
            ..Default::default()
        };
        let result = calculate(&short, &LimitsTable::builtin()).unwrap();
        assert_eq!(result.eligibility, PensionEligibility::InsufficientService);
        assert_eq!(result.total_monthly, 0.0);

        let young = RailroadInput {
            years_of_service: 25.0,
            retirement_age: 60,
            ..Default::default()
        };
        let result = calculate(&young, &LimitsTable::builtin()).unwrap();
        assert_eq!(result.eligibility, PensionEligibility::BelowMinimumAge);
        assert_eq!(result.total_annual, 0.0);
    }
}
