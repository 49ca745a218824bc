//! Display formatting for calculator results
//!
//! Calculators return unrounded figures; rounding to cents happens only here.

use crate::calculators::{
    calpers::PensionEligibility, coast_fire::CoastStatus, fers::FersEligibility,
    rmd::RmdStatus, roth_conversion::ConversionVerdict, withdrawal::WithdrawalStatus,
    CalculatorResponse,
};
use crate::error::Result;

use std::fs::File;
use std::path::Path;

/// One labelled line of a result summary
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryLine {
    pub label: &'static str,
    pub value: String,
}

fn line(label: &'static str, value: String) -> SummaryLine {
    SummaryLine { label, value }
}

/// `$1,234.57`; negative values get a leading minus
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return "n/a".to_string();
    }
    let cents = (value.abs() * 100.0).round() as u64;
    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}${}.{:02}", sign, group_thousands(cents / 100), cents % 100)
}

fn group_thousands(mut n: u64) -> String {
    let mut groups = Vec::new();
    while n >= 1000 {
        groups.push(format!("{:03}", n % 1000));
        n /= 1000;
    }
    groups.push(n.to_string());
    groups.reverse();
    groups.join(",")
}

/// `value` is already a percent: `format_percent(4.5, 1)` gives `4.5%`
pub fn format_percent(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return "n/a".to_string();
    }
    format!("{:.*}%", decimals, value)
}

/// `66 years 8 months`
pub fn format_age_months(months: u32) -> String {
    match months % 12 {
        0 => format!("{} years", months / 12),
        1 => format!("{} years 1 month", months / 12),
        m => format!("{} years {} months", months / 12, m),
    }
}

fn yes_no(flag: bool) -> String {
    if flag { "yes" } else { "no" }.to_string()
}

fn pension_eligibility(eligibility: PensionEligibility) -> String {
    match eligibility {
        PensionEligibility::Eligible => "eligible".to_string(),
        PensionEligibility::BelowMinimumAge => "below minimum retirement age".to_string(),
        PensionEligibility::InsufficientService => "not enough service credit".to_string(),
    }
}

/// Headline figures for a response, in display order
pub fn summary(response: &CalculatorResponse) -> Vec<SummaryLine> {
    match response {
        CalculatorResponse::CoastFire(r) => vec![
            line("FIRE number", format_currency(r.fire_number)),
            line("Coast FIRE number", format_currency(r.coast_fire_number)),
            line("Projected at coast age", format_currency(r.projected_at_coast_age)),
            line("Progress", format_percent(r.progress_percent, 1)),
            line("Amount needed", format_currency(r.amount_needed)),
            line("Monthly savings needed", format_currency(r.monthly_savings_needed)),
            line(
                "Status",
                match r.status {
                    CoastStatus::Reached => "coast FIRE reached".to_string(),
                    CoastStatus::Shortfall => format!("{} years of saving left", r.years_to_coast),
                },
            ),
        ],
        CalculatorResponse::Fers(r) => vec![
            line(
                "Eligibility",
                match r.eligibility {
                    FersEligibility::Unreduced => "unreduced annuity".to_string(),
                    FersEligibility::ReducedMra10 { months_under_62 } => {
                        format!("MRA+10, reduced {} months under 62", months_under_62)
                    }
                    FersEligibility::NotEligible => "not eligible".to_string(),
                },
            ),
            line("Minimum retirement age", format_age_months(r.mra_months)),
            line("Multiplier", format_percent(r.multiplier, 1)),
            line("Gross annual annuity", format_currency(r.gross_annual_annuity)),
            line("Net monthly annuity", format_currency(r.net_monthly_annuity)),
            line("FERS supplement (monthly)", format_currency(r.supplement_monthly)),
            line("Replacement ratio", format_percent(r.replacement_percent, 1)),
        ],
        CalculatorResponse::Rmd(r) => vec![
            line("Age", r.age.to_string()),
            line("RMD start age", r.rmd_start_age.to_string()),
            line(
                "Status",
                match r.status {
                    RmdStatus::Required => "distribution required".to_string(),
                    RmdStatus::NotYetRequired { years_until } => {
                        format!("first RMD in {} (in {} years)", r.first_rmd_year, years_until)
                    }
                },
            ),
            line(
                "Divisor",
                r.divisor.map_or_else(|| "n/a".to_string(), |d| format!("{:.1}", d)),
            ),
            line("RMD amount", format_currency(r.rmd_amount)),
            line("Percent of balance", format_percent(r.percent_of_balance, 2)),
        ],
        CalculatorResponse::Solo401k(r) => vec![
            line("Tax year", r.tax_year.to_string()),
            line("Employee deferral", format_currency(r.employee_deferral)),
            line("Catch-up", format_currency(r.catch_up)),
            line("Employer contribution", format_currency(r.employer_contribution)),
            line("Total contribution", format_currency(r.total_contribution)),
            line("Estimated tax savings", format_currency(r.estimated_tax_savings)),
            line("IRA limit (separate)", format_currency(r.ira_contribution_limit)),
        ],
        CalculatorResponse::Calpers(r) => vec![
            line("Eligibility", pension_eligibility(r.eligibility)),
            line("Age factor", format_percent(r.age_factor, 3)),
            line("Benefit percent", format_percent(r.benefit_percent, 2)),
            line("Compensation capped", yes_no(r.compensation_capped)),
            line("Annual pension", format_currency(r.annual_pension)),
            line("Monthly pension", format_currency(r.monthly_pension)),
        ],
        CalculatorResponse::Calstrs(r) => vec![
            line("Eligibility", pension_eligibility(r.eligibility)),
            line("Age factor", format_percent(r.age_factor, 3)),
            line("Career factor", yes_no(r.career_factor_applied)),
            line("Benefit percent", format_percent(r.benefit_percent, 2)),
            line("Longevity bonus (monthly)", format_currency(r.monthly_longevity_bonus)),
            line("Monthly pension", format_currency(r.monthly_pension)),
        ],
        CalculatorResponse::Railroad(r) => vec![
            line("Eligibility", pension_eligibility(r.eligibility)),
            line("60/30 provision", yes_no(r.sixty_thirty)),
            line("Tier I", format_currency(r.tier_1)),
            line("Tier II", format_currency(r.tier_2)),
            line("Total monthly", format_currency(r.total_monthly)),
        ],
        CalculatorResponse::Crt(r) => vec![
            line("Term (years)", format!("{:.1}", r.term_years)),
            line("First-year payout", format_currency(r.first_year_payout)),
            line("Charitable deduction", format_currency(r.charitable_deduction)),
            line("Remainder", format_percent(r.remainder_percent, 1)),
            line("Passes 10% test", yes_no(r.passes_ten_percent_test)),
            line("Projected remainder", format_currency(r.projected_remainder)),
        ],
        CalculatorResponse::SocialSecurity(r) => vec![
            line("Full retirement age", format_age_months(r.full_retirement_age_months)),
            line("Claiming age", format_age_months(r.claim_age_months)),
            line("Early reduction", format_percent(r.reduction_percent, 2)),
            line("Delayed credits", format_percent(r.delayed_credit_percent, 2)),
            line("Monthly benefit", format_currency(r.monthly_benefit)),
            line(
                "Break-even age",
                r.break_even_age.map_or_else(|| "n/a".to_string(), |age| format!("{:.1}", age)),
            ),
            line("Lifetime benefits", format_currency(r.lifetime_benefits)),
        ],
        CalculatorResponse::SavingsGrowth(r) => vec![
            line("Future value", format_currency(r.future_value)),
            line("In today's dollars", format_currency(r.real_future_value)),
            line("Total contributions", format_currency(r.total_contributions)),
            line("Total growth", format_currency(r.total_growth)),
        ],
        CalculatorResponse::Withdrawal(r) => vec![
            line(
                "Status",
                match r.status {
                    WithdrawalStatus::Sustainable => "sustainable".to_string(),
                    WithdrawalStatus::Depleted { year } => format!("depleted in year {}", year),
                },
            ),
            line("Years lasting", r.years_lasting.to_string()),
            line("Initial withdrawal rate", format_percent(r.initial_withdrawal_rate, 2)),
            line("4% rule amount", format_currency(r.four_percent_rule_amount)),
            line("Ending balance", format_currency(r.ending_balance)),
        ],
        CalculatorResponse::Inflation(r) => vec![
            line("Future cost", format_currency(r.future_cost)),
            line("Purchasing power", format_currency(r.purchasing_power)),
            line("Purchasing power lost", format_percent(r.percent_lost, 1)),
        ],
        CalculatorResponse::MetalsAllocation(r) => vec![
            line("Metals allocation", format_currency(r.metals_dollars)),
            line("Gold", format!("{} ({:.2} oz)", format_currency(r.gold_dollars), r.gold_ounces)),
            line(
                "Silver",
                format!("{} ({:.2} oz)", format_currency(r.silver_dollars), r.silver_ounces),
            ),
            line("Total fees", format_currency(r.total_fees)),
            line("Fee drag", format_percent(r.fee_drag_percent, 1)),
        ],
        CalculatorResponse::RothConversion(r) => vec![
            line("Tax due now", format_currency(r.tax_due_now)),
            line("Roth value", format_currency(r.roth_value)),
            line("Traditional after tax", format_currency(r.traditional_after_tax)),
            line("Advantage", format_currency(r.advantage)),
            line(
                "Verdict",
                match r.verdict {
                    ConversionVerdict::Convert => "convert".to_string(),
                    ConversionVerdict::KeepTraditional => "keep traditional".to_string(),
                    ConversionVerdict::Neutral => "no difference".to_string(),
                },
            ),
        ],
    }
}

/// Summary as aligned `label: value` text
pub fn render_summary(response: &CalculatorResponse) -> String {
    let lines = summary(response);
    let width = lines.iter().map(|l| l.label.len()).max().unwrap_or(0);

    let mut out = format!("{}\n{}\n", response.kind().description(), "=".repeat(40));
    for l in &lines {
        out.push_str(&format!("{:<width$}  {}\n", format!("{}:", l.label), l.value, width = width + 1));
    }
    out
}

/// Write the response's projection table to a CSV file; returns the row count
pub fn export_projection(response: &CalculatorResponse, path: &Path) -> Result<usize> {
    let file = File::create(path)?;
    let rows = response.write_projection(file)?;
    log::info!("wrote {} projection rows to {}", rows, path.display());
    Ok(rows)
}
