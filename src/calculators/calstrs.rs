//! CalSTRS Defined Benefit estimator
//!
//! Benefit = age factor x service credit x final compensation, capped at 100%
//! of final compensation. 2% at 60 members with 30+ years get a career factor
//! bonus and, when eligible, a monthly longevity bonus.

use serde::{Deserialize, Serialize};

use super::age_factor::AgeFactorTable;
use super::calpers::{project, PensionEligibility, PensionRow};
use crate::error::{check_range, Result};
use crate::finance::pct;

const MINIMUM_SERVICE_YEARS: f64 = 5.0;
const CAREER_FACTOR_YEARS: f64 = 30.0;
const CAREER_FACTOR_BONUS: f64 = 0.2;
const MAXIMUM_AGE_FACTOR: f64 = 2.4;

/// Normal minimum age; 2% at 60 allows 50 with 30 years
const NORMAL_MINIMUM_AGE: f64 = 55.0;

const TWO_AT_60: AgeFactorTable =
    AgeFactorTable::new(&[(50, 1.1), (55, 1.4), (60, 2.0), (63, 2.4)]);

const TWO_AT_62: AgeFactorTable = AgeFactorTable::new(&[(55, 1.16), (62, 2.0), (65, 2.4)]);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalstrsFormula {
    /// Members first hired before 2013
    TwoAt60,
    /// Members first hired in 2013 or later
    TwoAt62,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalstrsInput {
    pub formula: CalstrsFormula,
    pub retirement_age: u32,
    pub retirement_age_months: u32,
    pub service_credit: f64,
    pub final_compensation: f64,
    /// 30+ years of service credit earned before 2011
    pub longevity_bonus_eligible: bool,
    /// Simple annual COLA, percent of the initial benefit
    pub cola: f64,
    pub projection_years: u32,
}

impl Default for CalstrsInput {
    fn default() -> Self {
        Self {
            formula: CalstrsFormula::TwoAt60,
            retirement_age: 60,
            retirement_age_months: 0,
            service_credit: 30.0,
            final_compensation: 95_000.0,
            longevity_bonus_eligible: false,
            cola: 2.0,
            projection_years: 25,
        }
    }
}

impl CalstrsInput {
    pub fn validate(&self) -> Result<()> {
        check_range("retirement_age", self.retirement_age as f64, 45.0, 80.0)?;
        check_range("retirement_age_months", self.retirement_age_months as f64, 0.0, 11.0)?;
        check_range("service_credit", self.service_credit, 0.0, 50.0)?;
        check_range("final_compensation", self.final_compensation, 0.0, 1_000_000.0)?;
        check_range("cola", self.cola, 0.0, 5.0)?;
        check_range("projection_years", self.projection_years as f64, 1.0, 50.0)?;
        Ok(())
    }

    fn age(&self) -> f64 {
        self.retirement_age as f64 + self.retirement_age_months as f64 / 12.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalstrsResult {
    pub eligibility: PensionEligibility,
    pub age_factor: f64,
    pub career_factor_applied: bool,
    pub benefit_percent: f64,
    pub benefit_capped: bool,
    pub monthly_longevity_bonus: f64,
    pub annual_pension: f64,
    pub monthly_pension: f64,
    pub projection: Vec<PensionRow>,
}

fn longevity_bonus(service_credit: f64) -> f64 {
    if service_credit >= 32.0 {
        400.0
    } else if service_credit >= 31.0 {
        300.0
    } else if service_credit >= 30.0 {
        200.0
    } else {
        0.0
    }
}

pub fn calculate(input: &CalstrsInput) -> Result<CalstrsResult> {
    input.validate()?;

    let age = input.age();
    let table = match input.formula {
        CalstrsFormula::TwoAt60 => TWO_AT_60,
        CalstrsFormula::TwoAt62 => TWO_AT_62,
    };

    let early_allowed = input.formula == CalstrsFormula::TwoAt60
        && input.service_credit >= CAREER_FACTOR_YEARS;
    let minimum_age = if early_allowed {
        table.minimum_age() as f64
    } else {
        NORMAL_MINIMUM_AGE
    };

    let eligibility = if age < minimum_age {
        PensionEligibility::BelowMinimumAge
    } else if input.service_credit < MINIMUM_SERVICE_YEARS {
        PensionEligibility::InsufficientService
    } else {
        PensionEligibility::Eligible
    };

    let base_factor = match eligibility {
        PensionEligibility::Eligible => table.factor(age).unwrap_or(0.0),
        _ => 0.0,
    };

    let career_factor_applied = eligibility == PensionEligibility::Eligible
        && input.formula == CalstrsFormula::TwoAt60
        && input.service_credit >= CAREER_FACTOR_YEARS
        && base_factor < MAXIMUM_AGE_FACTOR;
    let age_factor = if career_factor_applied {
        (base_factor + CAREER_FACTOR_BONUS).min(MAXIMUM_AGE_FACTOR)
    } else {
        base_factor
    };

    let raw_share = age_factor * input.service_credit / 100.0;
    let benefit_capped = raw_share > 1.0;
    let benefit_share = raw_share.min(1.0);

    let monthly_longevity_bonus = if eligibility == PensionEligibility::Eligible
        && input.formula == CalstrsFormula::TwoAt60
        && input.longevity_bonus_eligible
    {
        longevity_bonus(input.service_credit)
    } else {
        0.0
    };

    let annual_pension =
        benefit_share * input.final_compensation + monthly_longevity_bonus * 12.0;
    let yearly_increase = annual_pension * pct(input.cola);
    let projection = project(
        input.retirement_age,
        input.projection_years,
        annual_pension,
        |pension| pension + yearly_increase,
    );

    Ok(CalstrsResult {
        eligibility,
        age_factor,
        career_factor_applied,
        benefit_percent: benefit_share * 100.0,
        benefit_capped,
        monthly_longevity_bonus,
        annual_pension,
        monthly_pension: annual_pension / 12.0,
        projection,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_two_at_60_normal() {
        let input = CalstrsInput {
            retirement_age: 60,
            service_credit: 25.0,
            final_compensation: 100_000.0,
            ..Default::default()
        };
        let result = calculate(&input).unwrap();

        assert_eq!(result.age_factor, 2.0);
        assert!(!result.career_factor_applied);
        assert_relative_eq!(result.annual_pension, 50_000.0, max_relative = 1e-12);
    }

    #[test]
    fn test_career_factor() {
        let input = CalstrsInput {
            retirement_age: 60,
            service_credit: 30.0,
            final_compensation: 100_000.0,
            ..Default::default()
        };
        let result = calculate(&input).unwrap();
        assert!(result.career_factor_applied);
        assert_relative_eq!(result.age_factor, 2.2, max_relative = 1e-12);
        assert_relative_eq!(result.annual_pension, 66_000.0, max_relative = 1e-12);
    }

    #[test]
    fn test_career_factor_capped_at_2_4() {
        let input = CalstrsInput {
            retirement_age: 62,
            retirement_age_months: 6,
            service_credit: 30.0,
            ..Default::default()
        };
        let result = calculate(&input).unwrap();
        assert_eq!(result.age_factor, 2.4);
    }

    #[test]
    fn test_benefit_capped_at_final_compensation() {
        let input = CalstrsInput {
            retirement_age: 63,
            service_credit: 45.0,
            final_compensation: 100_000.0,
            ..Default::default()
        };
        let result = calculate(&input).unwrap();
        assert!(result.benefit_capped);
        assert_eq!(result.annual_pension, 100_000.0);
    }

    #[test]
    fn test_early_retirement_needs_30_years() {
        let early = CalstrsInput {
            retirement_age: 52,
            service_credit: 30.0,
            ..Default::default()
        };
        assert_eq!(calculate(&early).unwrap().eligibility, PensionEligibility::Eligible);

        let not_enough = CalstrsInput {
            retirement_age: 52,
            service_credit: 25.0,
            ..Default::default()
        };
        let result = calculate(&not_enough).unwrap();
        assert_eq!(result.eligibility, PensionEligibility::BelowMinimumAge);
        assert_eq!(result.annual_pension, 0.0);
    }

    #[test]
    fn test_two_at_62() {
        let input = CalstrsInput {
            formula: CalstrsFormula::TwoAt62,
            retirement_age: 62,
            service_credit: 30.0,
            final_compensation: 80_000.0,
            ..Default::default()
        };
        let result = calculate(&input).unwrap();
        // No career factor under 2% at 62
        assert!(!result.career_factor_applied);
        assert_eq!(result.age_factor, 2.0);
        assert_relative_eq!(result.annual_pension, 48_000.0, max_relative = 1e-12);
    }

    #[test]
    fn test_longevity_bonus() {
        let input = CalstrsInput {
            retirement_age: 60,
            service_credit: 32.0,
            final_compensation: 100_000.0,
            longevity_bonus_eligible: true,
            ..Default::default()
        };
        let result = calculate(&input).unwrap();
        assert_eq!(result.monthly_longevity_bonus, 400.0);
    }

    #[test]
    fn test_simple_cola() {
        let result = calculate(&CalstrsInput::default()).unwrap();
        let rows = &result.projection;
        let step = result.annual_pension * 0.02;
        assert_relative_eq!(rows[2].annual_pension, result.annual_pension + 2.0 * step, max_relative = 1e-12);
    }
}
