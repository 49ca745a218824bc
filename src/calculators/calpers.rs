//! CalPERS service retirement estimator
//!
//! Pension = age factor x service credit x final compensation. Age factors are
//! read from the member's formula table at quarter-year resolution.

use serde::{Deserialize, Serialize};

use super::age_factor::AgeFactorTable;
use crate::error::{check_range, Result};
use crate::finance::pct;
use crate::limits::LimitsTable;

const MINIMUM_SERVICE_YEARS: f64 = 5.0;

/// Safety 3% at 50 benefits may not exceed this share of final compensation
const SAFETY_CLASSIC_CAP: f64 = 0.90;

const CLASSIC_2_AT_55: AgeFactorTable = AgeFactorTable::new(&[
    (50, 1.426),
    (51, 1.522),
    (52, 1.618),
    (53, 1.714),
    (54, 1.810),
    (55, 2.000),
    (56, 2.092),
    (57, 2.178),
    (58, 2.262),
    (59, 2.346),
    (60, 2.418),
]);

const CLASSIC_2_AT_60: AgeFactorTable = AgeFactorTable::new(&[
    (50, 1.092),
    (51, 1.156),
    (52, 1.224),
    (53, 1.296),
    (54, 1.376),
    (55, 1.460),
    (56, 1.552),
    (57, 1.650),
    (58, 1.758),
    (59, 1.874),
    (60, 2.000),
    (61, 2.134),
    (62, 2.272),
    (63, 2.418),
]);

const PEPRA_2_AT_62: AgeFactorTable = AgeFactorTable::new(&[(52, 1.0), (67, 2.5)]);

const SAFETY_3_AT_50: AgeFactorTable = AgeFactorTable::new(&[(50, 3.0)]);

const PEPRA_SAFETY_2_7_AT_57: AgeFactorTable = AgeFactorTable::new(&[(50, 2.0), (57, 2.7)]);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalpersFormula {
    /// Classic miscellaneous 2% at 55
    Classic2At55,
    /// Classic miscellaneous 2% at 60
    Classic2At60,
    /// PEPRA miscellaneous 2% at 62
    Pepra2At62,
    /// Classic safety 3% at 50
    Safety3At50,
    /// PEPRA safety 2.7% at 57
    PepraSafety27At57,
}

impl CalpersFormula {
    fn table(&self) -> AgeFactorTable {
        match self {
            CalpersFormula::Classic2At55 => CLASSIC_2_AT_55,
            CalpersFormula::Classic2At60 => CLASSIC_2_AT_60,
            CalpersFormula::Pepra2At62 => PEPRA_2_AT_62,
            CalpersFormula::Safety3At50 => SAFETY_3_AT_50,
            CalpersFormula::PepraSafety27At57 => PEPRA_SAFETY_2_7_AT_57,
        }
    }

    pub fn is_pepra(&self) -> bool {
        matches!(self, CalpersFormula::Pepra2At62 | CalpersFormula::PepraSafety27At57)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalpersInput {
    pub formula: CalpersFormula,
    pub retirement_age: u32,
    pub retirement_age_months: u32,
    pub service_credit: f64,
    /// Highest average annual pay over the final-compensation period
    pub final_compensation: f64,
    /// Year used for the PEPRA compensation cap
    pub tax_year: i32,
    /// Annual COLA, percent, compounded
    pub cola: f64,
    pub projection_years: u32,
}

impl Default for CalpersInput {
    fn default() -> Self {
        Self {
            formula: CalpersFormula::Pepra2At62,
            retirement_age: 62,
            retirement_age_months: 0,
            service_credit: 25.0,
            final_compensation: 90_000.0,
            tax_year: 2026,
            cola: 2.0,
            projection_years: 25,
        }
    }
}

impl CalpersInput {
    pub fn validate(&self) -> Result<()> {
        check_range("retirement_age", self.retirement_age as f64, 45.0, 80.0)?;
        check_range("retirement_age_months", self.retirement_age_months as f64, 0.0, 11.0)?;
        check_range("service_credit", self.service_credit, 0.0, 50.0)?;
        check_range("final_compensation", self.final_compensation, 0.0, 1_000_000.0)?;
        check_range("tax_year", self.tax_year as f64, 2000.0, 2100.0)?;
        check_range("cola", self.cola, 0.0, 5.0)?;
        check_range("projection_years", self.projection_years as f64, 1.0, 50.0)?;
        Ok(())
    }

    /// Age rounded down to the completed quarter year
    fn age_in_quarters(&self) -> f64 {
        self.retirement_age as f64 + (self.retirement_age_months / 3) as f64 * 0.25
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PensionEligibility {
    Eligible,
    BelowMinimumAge,
    InsufficientService,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PensionRow {
    pub year: u32,
    pub age: u32,
    pub annual_pension: f64,
    pub cumulative: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalpersResult {
    pub eligibility: PensionEligibility,
    /// Percent per year of service
    pub age_factor: f64,
    /// Percent of final compensation replaced
    pub benefit_percent: f64,
    pub pensionable_compensation: f64,
    pub compensation_capped: bool,
    pub benefit_capped: bool,
    pub annual_pension: f64,
    pub monthly_pension: f64,
    pub projection: Vec<PensionRow>,
}

pub fn calculate(input: &CalpersInput, table: &LimitsTable) -> Result<CalpersResult> {
    input.validate()?;

    let mut pensionable_compensation = input.final_compensation;
    let mut compensation_capped = false;
    if input.formula.is_pepra() {
        let cap = table.for_year(input.tax_year)?.pepra_compensation_cap;
        if pensionable_compensation > cap {
            pensionable_compensation = cap;
            compensation_capped = true;
        }
    }

    let factor = input.formula.table().factor(input.age_in_quarters());
    let eligibility = match factor {
        None => PensionEligibility::BelowMinimumAge,
        Some(_) if input.service_credit < MINIMUM_SERVICE_YEARS => {
            PensionEligibility::InsufficientService
        }
        Some(_) => PensionEligibility::Eligible,
    };
    let age_factor = match eligibility {
        PensionEligibility::Eligible => factor.unwrap_or(0.0),
        _ => 0.0,
    };

    let mut benefit_share = age_factor * input.service_credit / 100.0;
    let mut benefit_capped = false;
    if input.formula == CalpersFormula::Safety3At50 && benefit_share > SAFETY_CLASSIC_CAP {
        benefit_share = SAFETY_CLASSIC_CAP;
        benefit_capped = true;
    }

    let annual_pension = benefit_share * pensionable_compensation;
    let projection = project(
        input.retirement_age,
        input.projection_years,
        annual_pension,
        |pension| pension * (1.0 + pct(input.cola)),
    );

    log::debug!(
        "CalPERS {:?}: factor {:.3}%, pension {:.2}",
        input.formula,
        age_factor,
        annual_pension
    );

    Ok(CalpersResult {
        eligibility,
        age_factor,
        benefit_percent: benefit_share * 100.0,
        pensionable_compensation,
        compensation_capped,
        benefit_capped,
        annual_pension,
        monthly_pension: annual_pension / 12.0,
        projection,
    })
}

/// Year-by-year pension with `next` applying each year's COLA
pub(crate) fn project(
    start_age: u32,
    years: u32,
    first_year: f64,
    next: impl Fn(f64) -> f64,
) -> Vec<PensionRow> {
    let mut pension = first_year;
    let mut cumulative = 0.0;
    (0..years)
        .map(|year| {
            if year > 0 {
                pension = next(pension);
            }
            cumulative += pension;
            PensionRow {
                year: year + 1,
                age: start_age + year,
                annual_pension: pension,
                cumulative,
            }
        })
        .collect()
}
