//! FERS basic annuity estimator
//!
//! Annuity = multiplier x high-3 average salary x creditable service, where the
//! multiplier is 1.1% for retirement at 62+ with 20+ years and 1.0% otherwise.
//!
//! Eligibility follows the immediate-retirement rules: MRA+30, 60+20, 62+5
//! unreduced, and MRA+10 reduced by 5% for each year under 62. Unused sick
//! leave counts toward computation only, never toward eligibility.

use serde::{Deserialize, Serialize};

use crate::error::{check_range, Result};

/// Hours of sick leave that equal one year of service
const SICK_LEAVE_HOURS_PER_YEAR: f64 = 2087.0;

/// Years of civilian service the FERS supplement is prorated against
const SUPPLEMENT_FULL_CAREER_YEARS: f64 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurvivorElection {
    None,
    /// 25% survivor annuity, 5% reduction
    Partial,
    /// 50% survivor annuity, 10% reduction
    Full,
}

impl SurvivorElection {
    fn reduction(&self) -> f64 {
        match self {
            SurvivorElection::None => 0.0,
            SurvivorElection::Partial => 0.05,
            SurvivorElection::Full => 0.10,
        }
    }

    fn survivor_share(&self) -> f64 {
        match self {
            SurvivorElection::None => 0.0,
            SurvivorElection::Partial => 0.25,
            SurvivorElection::Full => 0.50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FersInput {
    pub high_three_salary: f64,
    pub years_of_service: u32,
    pub service_months: u32,
    pub sick_leave_hours: f64,
    pub retirement_age: u32,
    pub retirement_age_months: u32,
    pub birth_year: i32,
    pub survivor_election: SurvivorElection,
    /// Estimated monthly Social Security benefit at 62, for the supplement
    pub social_security_at_62: f64,
    /// Assumed CPI, percent
    pub cola_assumption: f64,
    pub projection_years: u32,
}

impl Default for FersInput {
    fn default() -> Self {
        Self {
            high_three_salary: 95_000.0,
            years_of_service: 30,
            service_months: 0,
            sick_leave_hours: 0.0,
            retirement_age: 57,
            retirement_age_months: 0,
            birth_year: 1970,
            survivor_election: SurvivorElection::None,
            social_security_at_62: 1_800.0,
            cola_assumption: 2.5,
            projection_years: 25,
        }
    }
}

impl FersInput {
    pub fn validate(&self) -> Result<()> {
        check_range("high_three_salary", self.high_three_salary, 10_000.0, 500_000.0)?;
        check_range("years_of_service", self.years_of_service as f64, 0.0, 50.0)?;
        check_range("service_months", self.service_months as f64, 0.0, 11.0)?;
        check_range("sick_leave_hours", self.sick_leave_hours, 0.0, 10_000.0)?;
        check_range("retirement_age", self.retirement_age as f64, 50.0, 80.0)?;
        check_range("retirement_age_months", self.retirement_age_months as f64, 0.0, 11.0)?;
        check_range("birth_year", self.birth_year as f64, 1940.0, 2010.0)?;
        check_range("social_security_at_62", self.social_security_at_62, 0.0, 6_000.0)?;
        check_range("cola_assumption", self.cola_assumption, 0.0, 10.0)?;
        check_range("projection_years", self.projection_years as f64, 1.0, 50.0)?;
        Ok(())
    }

    fn age_in_months(&self) -> u32 {
        self.retirement_age * 12 + self.retirement_age_months
    }

    fn service_years(&self) -> f64 {
        self.years_of_service as f64 + self.service_months as f64 / 12.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FersEligibility {
    /// MRA+30, 60+20 or 62+5
    Unreduced,
    /// MRA+10, reduced for each month under 62
    ReducedMra10 { months_under_62: u32 },
    NotEligible,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FersRow {
    pub age: u32,
    pub annuity: f64,
    pub supplement: f64,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FersResult {
    pub eligibility: FersEligibility,
    /// Minimum retirement age in months
    pub mra_months: u32,
    /// Multiplier in percent (1.0 or 1.1)
    pub multiplier: f64,
    pub creditable_service_years: f64,
    pub gross_annual_annuity: f64,
    pub early_reduction_percent: f64,
    pub survivor_reduction_percent: f64,
    pub net_annual_annuity: f64,
    pub net_monthly_annuity: f64,
    pub survivor_annual_annuity: f64,
    pub supplement_monthly: f64,
    pub supplement_years: f64,
    /// Net annuity as a percent of high-3
    pub replacement_percent: f64,
    /// COLA applied from age 62, after the FERS cap
    pub effective_cola_percent: f64,
    pub projection: Vec<FersRow>,
}

/// Minimum retirement age in months for a birth year
pub fn minimum_retirement_age_months(birth_year: i32) -> u32 {
    match birth_year {
        year if year <= 1947 => 55 * 12,
        1948..=1952 => 55 * 12 + 2 * (birth_year - 1947) as u32,
        1953..=1964 => 56 * 12,
        1965..=1969 => 56 * 12 + 2 * (birth_year - 1964) as u32,
        _ => 57 * 12,
    }
}

/// FERS COLA: full CPI up to 2%, 2% for 2-3%, CPI minus 1 above 3%
pub fn fers_cola(cpi_percent: f64) -> f64 {
    if cpi_percent <= 2.0 {
        cpi_percent
    } else if cpi_percent <= 3.0 {
        2.0
    } else {
        cpi_percent - 1.0
    }
}

fn eligibility(age_months: u32, mra_months: u32, service_years: f64) -> FersEligibility {
    if age_months >= 62 * 12 && service_years >= 5.0 {
        FersEligibility::Unreduced
    } else if age_months >= 60 * 12 && service_years >= 20.0 {
        FersEligibility::Unreduced
    } else if age_months >= mra_months && service_years >= 30.0 {
        FersEligibility::Unreduced
    } else if age_months >= mra_months && service_years >= 10.0 {
        FersEligibility::ReducedMra10 {
            months_under_62: (62 * 12u32).saturating_sub(age_months),
        }
    } else {
        FersEligibility::NotEligible
    }
}

pub fn calculate(input: &FersInput) -> Result<FersResult> {
    input.validate()?;

    let age_months = input.age_in_months();
    let mra_months = minimum_retirement_age_months(input.birth_year);
    let service_years = input.service_years();
    let creditable_service_years =
        service_years + input.sick_leave_hours / SICK_LEAVE_HOURS_PER_YEAR;

    let eligibility = eligibility(age_months, mra_months, service_years);

    // Multiplier in tenths of a percent keeps the product exact for whole inputs
    let multiplier_tenths = if age_months >= 62 * 12 && service_years >= 20.0 {
        11.0
    } else {
        10.0
    };

    let gross_annual_annuity = match eligibility {
        FersEligibility::NotEligible => 0.0,
        _ => input.high_three_salary * creditable_service_years * multiplier_tenths / 1000.0,
    };

    let early_reduction = match eligibility {
        FersEligibility::ReducedMra10 { months_under_62 } => {
            (months_under_62 as f64 * 0.05 / 12.0).min(1.0)
        }
        _ => 0.0,
    };
    let survivor_reduction = input.survivor_election.reduction();

    let net_annual_annuity =
        gross_annual_annuity * (1.0 - early_reduction) * (1.0 - survivor_reduction);
    let survivor_annual_annuity = gross_annual_annuity * input.survivor_election.survivor_share();

    let (supplement_monthly, supplement_years) =
        if eligibility == FersEligibility::Unreduced && age_months < 62 * 12 {
            let civilian_years = service_years.round();
            let monthly =
                input.social_security_at_62 * civilian_years / SUPPLEMENT_FULL_CAREER_YEARS;
            (monthly, (62 * 12 - age_months) as f64 / 12.0)
        } else {
            (0.0, 0.0)
        };

    let effective_cola_percent = fers_cola(input.cola_assumption);
    let projection = project(
        input,
        net_annual_annuity,
        supplement_monthly * 12.0,
        effective_cola_percent / 100.0,
    );

    log::debug!(
        "FERS: {:?}, multiplier {}%, gross {:.2}",
        eligibility,
        multiplier_tenths / 10.0,
        gross_annual_annuity
    );

    Ok(FersResult {
        eligibility,
        mra_months,
        multiplier: multiplier_tenths / 10.0,
        creditable_service_years,
        gross_annual_annuity,
        early_reduction_percent: early_reduction * 100.0,
        survivor_reduction_percent: survivor_reduction * 100.0,
        net_annual_annuity,
        net_monthly_annuity: net_annual_annuity / 12.0,
        survivor_annual_annuity,
        supplement_monthly,
        supplement_years,
        replacement_percent: net_annual_annuity / input.high_three_salary * 100.0,
        effective_cola_percent,
        projection,
    })
}

/// COLAs apply from age 62; the supplement stops at 62
fn project(input: &FersInput, annuity: f64, supplement: f64, cola: f64) -> Vec<FersRow> {
    let mut current = annuity;
    (0..input.projection_years)
        .map(|year| {
            let age = input.retirement_age + year;
            if year > 0 && age >= 62 {
                current *= 1.0 + cola;
            }
            let supplement = if age < 62 { supplement } else { 0.0 };
            FersRow {
                age,
                annuity: current,
                supplement,
                total: current + supplement,
            }
        })
        .collect()
}
