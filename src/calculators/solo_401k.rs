//! Solo 401(k) contribution calculator
//!
//! Employee deferrals are capped by the 402(g) limit shared with any other
//! plan. The employer profit-sharing contribution is 25% of W-2 pay for an
//! S-corp owner, or 20% of net earnings (after half of SE tax) for a sole
//! proprietor. Deferrals plus employer money may not exceed the 415(c) limit;
//! catch-up contributions sit on top of it.

use serde::{Deserialize, Serialize};

use crate::error::{check_range, Result};
use crate::finance::pct;
use crate::limits::{LimitsTable, TaxYearLimits};

/// Share of net profit subject to self-employment tax
const SE_TAX_BASE: f64 = 0.9235;
const SOCIAL_SECURITY_RATE: f64 = 0.124;
const MEDICARE_RATE: f64 = 0.029;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusinessType {
    SoleProprietor,
    SCorporation,
}

impl BusinessType {
    fn employer_rate(&self) -> f64 {
        match self {
            BusinessType::SoleProprietor => 0.20,
            BusinessType::SCorporation => 0.25,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Solo401kInput {
    pub tax_year: i32,
    /// Age at the end of the tax year
    pub age: u32,
    pub business_type: BusinessType,
    /// Net self-employment profit, or W-2 wages for an S-corp
    pub business_income: f64,
    /// Elective deferrals already made to other employers' plans this year
    pub other_plan_deferrals: f64,
    /// Marginal income tax rate, percent
    pub marginal_tax_rate: f64,
}

impl Default for Solo401kInput {
    fn default() -> Self {
        Self {
            tax_year: 2026,
            age: 45,
            business_type: BusinessType::SoleProprietor,
            business_income: 100_000.0,
            other_plan_deferrals: 0.0,
            marginal_tax_rate: 24.0,
        }
    }
}

impl Solo401kInput {
    pub fn validate(&self) -> Result<()> {
        check_range("tax_year", self.tax_year as f64, 2000.0, 2100.0)?;
        check_range("age", self.age as f64, 18.0, 100.0)?;
        check_range("business_income", self.business_income, 0.0, 10_000_000.0)?;
        check_range("other_plan_deferrals", self.other_plan_deferrals, 0.0, 100_000.0)?;
        check_range("marginal_tax_rate", self.marginal_tax_rate, 0.0, 50.0)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solo401kResult {
    pub tax_year: i32,
    pub self_employment_tax: f64,
    /// Compensation the plan may count, after the 401(a)(17) cap
    pub plan_compensation: f64,
    pub employee_deferral: f64,
    pub catch_up: f64,
    pub employer_contribution: f64,
    pub total_contribution: f64,
    /// 415(c) limit plus the catch-up available at this age
    pub maximum_allowed: f64,
    pub estimated_tax_savings: f64,
    /// Separate traditional or Roth IRA limit available on top of the plan
    pub ira_contribution_limit: f64,
}

/// Half of SE tax is deductible when computing sole-proprietor earned income
pub fn self_employment_tax(net_profit: f64, limits: &TaxYearLimits) -> f64 {
    let base = net_profit.max(0.0) * SE_TAX_BASE;
    base.min(limits.ss_wage_base) * SOCIAL_SECURITY_RATE + base * MEDICARE_RATE
}

pub fn calculate(input: &Solo401kInput, table: &LimitsTable) -> Result<Solo401kResult> {
    input.validate()?;
    let limits = table.for_year(input.tax_year)?;

    let (self_employment_tax, compensation) = match input.business_type {
        BusinessType::SoleProprietor => {
            let se_tax = self_employment_tax(input.business_income, limits);
            (se_tax, (input.business_income - se_tax / 2.0).max(0.0))
        }
        BusinessType::SCorporation => (0.0, input.business_income),
    };
    let plan_compensation = compensation.min(limits.compensation_limit);

    let deferral_room = (limits.elective_deferral - input.other_plan_deferrals).max(0.0);
    let employee_deferral = deferral_room.min(compensation);

    let catch_up = limits
        .catch_up_for_age(input.age)
        .min(compensation - employee_deferral)
        .max(0.0);

    let employer_contribution = (plan_compensation * input.business_type.employer_rate())
        .min(limits.annual_additions - employee_deferral)
        .min(compensation - employee_deferral - catch_up)
        .max(0.0);

    let total_contribution = employee_deferral + catch_up + employer_contribution;

    Ok(Solo401kResult {
        tax_year: limits.year,
        self_employment_tax,
        plan_compensation,
        employee_deferral,
        catch_up,
        employer_contribution,
        total_contribution,
        maximum_allowed: limits.annual_additions + limits.catch_up_for_age(input.age),
        estimated_tax_savings: total_contribution * pct(input.marginal_tax_rate),
        ira_contribution_limit: limits.ira_limit_for_age(input.age),
    })
}
