//! Retirement calculators
//!
//! Each calculator is an independent pure function of its input struct. This
//! module only dispatches: a [`CalculatorRequest`] names a calculator and
//! carries its input, and [`evaluate`] returns the matching
//! [`CalculatorResponse`].
//!
//! # Example
//!
//! ```rust
//! use retirement_calculators::calculators::{evaluate, CalculatorRequest, CalculatorResponse};
//! use retirement_calculators::Limits;
//!
//! let request: CalculatorRequest = serde_json::from_str(
//!     r#"{"calculator": "coast_fire", "current_age": 35, "current_savings": 80000}"#,
//! ).unwrap();
//!
//! let response = evaluate(&request, &Limits::builtin()).unwrap();
//! if let CalculatorResponse::CoastFire(result) = response {
//!     assert!(result.coast_fire_number > 0.0);
//! }
//! ```

mod age_factor;
pub mod calpers;
pub mod calstrs;
pub mod coast_fire;
pub mod crt;
pub mod fers;
pub mod inflation;
pub mod metals_allocation;
pub mod railroad;
pub mod rmd;
pub mod roth_conversion;
pub mod savings_growth;
pub mod social_security;
pub mod solo_401k;
pub mod withdrawal;

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CalcError, Result};
use crate::limits::Limits;

pub use calpers::{CalpersInput, CalpersResult};
pub use calstrs::{CalstrsInput, CalstrsResult};
pub use coast_fire::{CoastFireInput, CoastFireResult};
pub use crt::{CrtInput, CrtResult};
pub use fers::{FersInput, FersResult};
pub use inflation::{InflationInput, InflationResult};
pub use metals_allocation::{MetalsAllocationInput, MetalsAllocationResult};
pub use railroad::{RailroadInput, RailroadResult};
pub use rmd::{RmdInput, RmdResult};
pub use roth_conversion::{RothConversionInput, RothConversionResult};
pub use savings_growth::{SavingsGrowthInput, SavingsGrowthResult};
pub use social_security::{SocialSecurityInput, SocialSecurityResult};
pub use solo_401k::{Solo401kInput, Solo401kResult};
pub use withdrawal::{WithdrawalInput, WithdrawalResult};

/// Calculator names, as used in requests and on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CalculatorKind {
    CoastFire,
    Fers,
    Rmd,
    Solo401k,
    Calpers,
    Calstrs,
    Railroad,
    Crt,
    SocialSecurity,
    SavingsGrowth,
    Withdrawal,
    Inflation,
    MetalsAllocation,
    RothConversion,
}

impl CalculatorKind {
    pub const ALL: [CalculatorKind; 14] = [
        CalculatorKind::CoastFire,
        CalculatorKind::Fers,
        CalculatorKind::Rmd,
        CalculatorKind::Solo401k,
        CalculatorKind::Calpers,
        CalculatorKind::Calstrs,
        CalculatorKind::Railroad,
        CalculatorKind::Crt,
        CalculatorKind::SocialSecurity,
        CalculatorKind::SavingsGrowth,
        CalculatorKind::Withdrawal,
        CalculatorKind::Inflation,
        CalculatorKind::MetalsAllocation,
        CalculatorKind::RothConversion,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CalculatorKind::CoastFire => "coast_fire",
            CalculatorKind::Fers => "fers",
            CalculatorKind::Rmd => "rmd",
            CalculatorKind::Solo401k => "solo_401k",
            CalculatorKind::Calpers => "calpers",
            CalculatorKind::Calstrs => "calstrs",
            CalculatorKind::Railroad => "railroad",
            CalculatorKind::Crt => "crt",
            CalculatorKind::SocialSecurity => "social_security",
            CalculatorKind::SavingsGrowth => "savings_growth",
            CalculatorKind::Withdrawal => "withdrawal",
            CalculatorKind::Inflation => "inflation",
            CalculatorKind::MetalsAllocation => "metals_allocation",
            CalculatorKind::RothConversion => "roth_conversion",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            CalculatorKind::CoastFire => "Coast FIRE number and savings needed",
            CalculatorKind::Fers => "FERS basic annuity and supplement",
            CalculatorKind::Rmd => "Required minimum distribution",
            CalculatorKind::Solo401k => "Solo 401(k) contribution limits",
            CalculatorKind::Calpers => "CalPERS service retirement",
            CalculatorKind::Calstrs => "CalSTRS defined benefit",
            CalculatorKind::Railroad => "Railroad Retirement Tier I and Tier II",
            CalculatorKind::Crt => "Charitable remainder trust payout and deduction",
            CalculatorKind::SocialSecurity => "Social Security claiming age",
            CalculatorKind::SavingsGrowth => "Retirement savings growth",
            CalculatorKind::Withdrawal => "How long savings will last",
            CalculatorKind::Inflation => "Inflation and purchasing power",
            CalculatorKind::MetalsAllocation => "Precious metals IRA allocation",
            CalculatorKind::RothConversion => "Roth conversion comparison",
        }
    }

    /// Request carrying this calculator's default input
    pub fn default_request(&self) -> CalculatorRequest {
        match self {
            CalculatorKind::CoastFire => CalculatorRequest::CoastFire(Default::default()),
            CalculatorKind::Fers => CalculatorRequest::Fers(Default::default()),
            CalculatorKind::Rmd => CalculatorRequest::Rmd(Default::default()),
            CalculatorKind::Solo401k => CalculatorRequest::Solo401k(Default::default()),
            CalculatorKind::Calpers => CalculatorRequest::Calpers(Default::default()),
            CalculatorKind::Calstrs => CalculatorRequest::Calstrs(Default::default()),
            CalculatorKind::Railroad => CalculatorRequest::Railroad(Default::default()),
            CalculatorKind::Crt => CalculatorRequest::Crt(Default::default()),
            CalculatorKind::SocialSecurity => CalculatorRequest::SocialSecurity(Default::default()),
            CalculatorKind::SavingsGrowth => CalculatorRequest::SavingsGrowth(Default::default()),
            CalculatorKind::Withdrawal => CalculatorRequest::Withdrawal(Default::default()),
            CalculatorKind::Inflation => CalculatorRequest::Inflation(Default::default()),
            CalculatorKind::MetalsAllocation => {
                CalculatorRequest::MetalsAllocation(Default::default())
            }
            CalculatorKind::RothConversion => CalculatorRequest::RothConversion(Default::default()),
        }
    }
}

impl fmt::Display for CalculatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CalculatorKind {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        CalculatorKind::ALL
            .into_iter()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| CalcError::UnknownCalculator(s.to_string()))
    }
}

/// A calculator name plus its input, tagged by `"calculator"` in JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "calculator", rename_all = "snake_case")]
pub enum CalculatorRequest {
    CoastFire(CoastFireInput),
    Fers(FersInput),
    Rmd(RmdInput),
    #[serde(rename = "solo_401k")]
    Solo401k(Solo401kInput),
    Calpers(CalpersInput),
    Calstrs(CalstrsInput),
    Railroad(RailroadInput),
    Crt(CrtInput),
    SocialSecurity(SocialSecurityInput),
    SavingsGrowth(SavingsGrowthInput),
    Withdrawal(WithdrawalInput),
    Inflation(InflationInput),
    MetalsAllocation(MetalsAllocationInput),
    RothConversion(RothConversionInput),
}

impl CalculatorRequest {
    pub fn kind(&self) -> CalculatorKind {
        match self {
            CalculatorRequest::CoastFire(_) => CalculatorKind::CoastFire,
            CalculatorRequest::Fers(_) => CalculatorKind::Fers,
            CalculatorRequest::Rmd(_) => CalculatorKind::Rmd,
            CalculatorRequest::Solo401k(_) => CalculatorKind::Solo401k,
            CalculatorRequest::Calpers(_) => CalculatorKind::Calpers,
            CalculatorRequest::Calstrs(_) => CalculatorKind::Calstrs,
            CalculatorRequest::Railroad(_) => CalculatorKind::Railroad,
            CalculatorRequest::Crt(_) => CalculatorKind::Crt,
            CalculatorRequest::SocialSecurity(_) => CalculatorKind::SocialSecurity,
            CalculatorRequest::SavingsGrowth(_) => CalculatorKind::SavingsGrowth,
            CalculatorRequest::Withdrawal(_) => CalculatorKind::Withdrawal,
            CalculatorRequest::Inflation(_) => CalculatorKind::Inflation,
            CalculatorRequest::MetalsAllocation(_) => CalculatorKind::MetalsAllocation,
            CalculatorRequest::RothConversion(_) => CalculatorKind::RothConversion,
        }
    }

    /// Point year-dependent inputs (tax year, distribution year) at `year`
    pub fn for_year(mut self, year: i32) -> Self {
        match &mut self {
            CalculatorRequest::Rmd(input) => input.distribution_year = year,
            CalculatorRequest::Solo401k(input) => input.tax_year = year,
            CalculatorRequest::Calpers(input) => input.tax_year = year,
            CalculatorRequest::Railroad(input) => input.tax_year = year,
            _ => {}
        }
        self
    }
}

/// Result of one calculator, tagged like the request that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "calculator", rename_all = "snake_case")]
pub enum CalculatorResponse {
    CoastFire(CoastFireResult),
    Fers(FersResult),
    Rmd(RmdResult),
    #[serde(rename = "solo_401k")]
    Solo401k(Solo401kResult),
    Calpers(CalpersResult),
    Calstrs(CalstrsResult),
    Railroad(RailroadResult),
    Crt(CrtResult),
    SocialSecurity(SocialSecurityResult),
    SavingsGrowth(SavingsGrowthResult),
    Withdrawal(WithdrawalResult),
    Inflation(InflationResult),
    MetalsAllocation(MetalsAllocationResult),
    RothConversion(RothConversionResult),
}

impl CalculatorResponse {
    pub fn kind(&self) -> CalculatorKind {
        match self {
            CalculatorResponse::CoastFire(_) => CalculatorKind::CoastFire,
            CalculatorResponse::Fers(_) => CalculatorKind::Fers,
            CalculatorResponse::Rmd(_) => CalculatorKind::Rmd,
            CalculatorResponse::Solo401k(_) => CalculatorKind::Solo401k,
            CalculatorResponse::Calpers(_) => CalculatorKind::Calpers,
            CalculatorResponse::Calstrs(_) => CalculatorKind::Calstrs,
            CalculatorResponse::Railroad(_) => CalculatorKind::Railroad,
            CalculatorResponse::Crt(_) => CalculatorKind::Crt,
            CalculatorResponse::SocialSecurity(_) => CalculatorKind::SocialSecurity,
            CalculatorResponse::SavingsGrowth(_) => CalculatorKind::SavingsGrowth,
            CalculatorResponse::Withdrawal(_) => CalculatorKind::Withdrawal,
            CalculatorResponse::Inflation(_) => CalculatorKind::Inflation,
            CalculatorResponse::MetalsAllocation(_) => CalculatorKind::MetalsAllocation,
            CalculatorResponse::RothConversion(_) => CalculatorKind::RothConversion,
        }
    }

    /// Write the multi-year projection as CSV; returns the number of rows
    ///
    /// Calculators without a projection write nothing.
    pub fn write_projection<W: Write>(&self, writer: W) -> Result<usize> {
        match self {
            CalculatorResponse::CoastFire(r) => write_rows(&r.projection, writer),
            CalculatorResponse::Fers(r) => write_rows(&r.projection, writer),
            CalculatorResponse::Rmd(r) => write_rows(&r.projection, writer),
            CalculatorResponse::Calpers(r) => write_rows(&r.projection, writer),
            CalculatorResponse::Calstrs(r) => write_rows(&r.projection, writer),
            CalculatorResponse::Crt(r) => write_rows(&r.projection, writer),
            CalculatorResponse::SavingsGrowth(r) => write_rows(&r.projection, writer),
            CalculatorResponse::Withdrawal(r) => write_rows(&r.projection, writer),
            CalculatorResponse::Inflation(r) => write_rows(&r.projection, writer),
            CalculatorResponse::MetalsAllocation(r) => write_rows(&r.projection, writer),
            CalculatorResponse::Solo401k(_)
            | CalculatorResponse::Railroad(_)
            | CalculatorResponse::SocialSecurity(_)
            | CalculatorResponse::RothConversion(_) => Ok(0),
        }
    }
}

fn write_rows<T: Serialize, W: Write>(rows: &[T], writer: W) -> Result<usize> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(rows.len())
}

/// Run the calculator named by `request`
pub fn evaluate(request: &CalculatorRequest, limits: &Limits) -> Result<CalculatorResponse> {
    log::debug!("evaluating {}", request.kind());

    let response = match request {
        CalculatorRequest::CoastFire(input) => {
            CalculatorResponse::CoastFire(coast_fire::calculate(input)?)
        }
        CalculatorRequest::Fers(input) => CalculatorResponse::Fers(fers::calculate(input)?),
        CalculatorRequest::Rmd(input) => CalculatorResponse::Rmd(rmd::calculate(input, &limits.rmd)?),
        CalculatorRequest::Solo401k(input) => {
            CalculatorResponse::Solo401k(solo_401k::calculate(input, &limits.tax_years)?)
        }
        CalculatorRequest::Calpers(input) => {
            CalculatorResponse::Calpers(calpers::calculate(input, &limits.tax_years)?)
        }
        CalculatorRequest::Calstrs(input) => {
            CalculatorResponse::Calstrs(calstrs::calculate(input)?)
        }
        CalculatorRequest::Railroad(input) => {
            CalculatorResponse::Railroad(railroad::calculate(input, &limits.tax_years)?)
        }
        CalculatorRequest::Crt(input) => {
            CalculatorResponse::Crt(crt::calculate(input, &limits.life_expectancy)?)
        }
        CalculatorRequest::SocialSecurity(input) => {
            CalculatorResponse::SocialSecurity(social_security::calculate(input)?)
        }
        CalculatorRequest::SavingsGrowth(input) => {
            CalculatorResponse::SavingsGrowth(savings_growth::calculate(input)?)
        }
        CalculatorRequest::Withdrawal(input) => {
            CalculatorResponse::Withdrawal(withdrawal::calculate(input)?)
        }
        CalculatorRequest::Inflation(input) => {
            CalculatorResponse::Inflation(inflation::calculate(input)?)
        }
        CalculatorRequest::MetalsAllocation(input) => {
            CalculatorResponse::MetalsAllocation(metals_allocation::calculate(input)?)
        }
        CalculatorRequest::RothConversion(input) => {
            CalculatorResponse::RothConversion(roth_conversion::calculate(input)?)
        }
    };

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    /// Fields that are legitimately absent for some inputs
    const OPTIONAL_FIELDS: [&str; 2] = ["break_even_age", "divisor"];

    /// Every number in the response is finite and non-negative.
    /// serde_json writes NaN and infinity as null, so unexpected nulls fail too.
    fn assert_finite_non_negative(value: &Value, path: &str) {
        match value {
            Value::Number(n) => {
                let v = n.as_f64().unwrap();
                assert!(v.is_finite() && v >= 0.0, "{} = {}", path, v);
            }
            Value::Null => {
                let field = path.rsplit('.').next().unwrap_or(path);
                assert!(OPTIONAL_FIELDS.contains(&field), "{} is null", path);
            }
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    assert_finite_non_negative(item, &format!("{}[{}]", path, i));
                }
            }
            Value::Object(map) => {
                for (key, item) in map {
                    assert_finite_non_negative(item, &format!("{}.{}", path, key));
                }
            }
            _ => {}
        }
    }

    fn edge_requests() -> Vec<CalculatorRequest> {
        vec![
            CalculatorRequest::CoastFire(CoastFireInput {
                current_age: 70,
                coast_age: 18,
                retirement_age: 30,
                current_savings: 0.0,
                ..Default::default()
            }),
            CalculatorRequest::Fers(FersInput {
                years_of_service: 0,
                retirement_age: 80,
                ..Default::default()
            }),
            CalculatorRequest::Rmd(RmdInput {
                account_balance: 0.0,
                expected_return: 0.0,
                ..Default::default()
            }),
            CalculatorRequest::Solo401k(Solo401kInput {
                business_income: 0.0,
                ..Default::default()
            }),
            CalculatorRequest::Calpers(CalpersInput {
                service_credit: 0.0,
                final_compensation: 0.0,
                ..Default::default()
            }),
            CalculatorRequest::Calstrs(CalstrsInput {
                formula: calstrs::CalstrsFormula::TwoAt62,
                retirement_age: 45,
                service_credit: 0.0,
                final_compensation: 0.0,
                ..Default::default()
            }),
            CalculatorRequest::Calstrs(CalstrsInput {
                retirement_age: 80,
                service_credit: 50.0,
                final_compensation: 1_000_000.0,
                longevity_bonus_eligible: true,
                cola: 5.0,
                projection_years: 50,
                ..Default::default()
            }),
            CalculatorRequest::Railroad(RailroadInput {
                retirement_age: 55,
                years_of_service: 10.0,
                ..Default::default()
            }),
            CalculatorRequest::Railroad(RailroadInput {
                birth_year: 2010,
                years_of_service: 0.0,
                average_indexed_monthly_earnings: 0.0,
                average_monthly_compensation: 0.0,
                ..Default::default()
            }),
            CalculatorRequest::Crt(CrtInput {
                trust_type: crt::TrustType::AnnuityTrust,
                payout_rate: 50.0,
                term: crt::TrustTerm::Lifetime { age: 100 },
                ..Default::default()
            }),
            CalculatorRequest::Crt(CrtInput {
                payout_rate: 50.0,
                term: crt::TrustTerm::Lifetime { age: 25 },
                expected_return: 0.0,
                ..Default::default()
            }),
            CalculatorRequest::SocialSecurity(SocialSecurityInput {
                primary_insurance_amount: 0.0,
                ..Default::default()
            }),
            CalculatorRequest::SocialSecurity(SocialSecurityInput {
                claim_age: 70,
                life_expectancy: 62,
                ..Default::default()
            }),
            CalculatorRequest::SavingsGrowth(SavingsGrowthInput {
                current_balance: 0.0,
                annual_contribution: 0.0,
                expected_return: 0.0,
                ..Default::default()
            }),
            CalculatorRequest::SavingsGrowth(SavingsGrowthInput {
                annual_contribution: 1_000_000.0,
                contribution_growth: 10.0,
                expected_return: 15.0,
                inflation: 10.0,
                years: 60,
                ..Default::default()
            }),
            CalculatorRequest::Withdrawal(WithdrawalInput {
                balance: 0.0,
                annual_withdrawal: 0.0,
                ..Default::default()
            }),
            CalculatorRequest::Inflation(InflationInput {
                years: 0,
                inflation_rate: 0.0,
                ..Default::default()
            }),
            CalculatorRequest::MetalsAllocation(MetalsAllocationInput {
                portfolio_value: 0.0,
                ..Default::default()
            }),
            CalculatorRequest::RothConversion(RothConversionInput {
                conversion_amount: 0.0,
                ..Default::default()
            }),
        ]
    }

    #[test]
    fn test_defaults_produce_finite_non_negative_output() {
        let limits = Limits::builtin();
        for kind in CalculatorKind::ALL {
            let response = evaluate(&kind.default_request(), &limits)
                .unwrap_or_else(|e| panic!("{} failed: {}", kind, e));
            assert_eq!(response.kind(), kind);
            let value = serde_json::to_value(&response).unwrap();
            assert_finite_non_negative(&value, kind.name());
        }
    }

    #[test]
    fn test_edge_inputs_produce_finite_non_negative_output() {
        let limits = Limits::builtin();
        for request in edge_requests() {
            let response = evaluate(&request, &limits).unwrap();
            let value = serde_json::to_value(&response).unwrap();
            assert_finite_non_negative(&value, request.kind().name());
        }
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let limits = Limits::builtin();
        for kind in CalculatorKind::ALL {
            let request = kind.default_request();
            let first = evaluate(&request, &limits).unwrap();
            let second = evaluate(&request, &limits).unwrap();
            // Bit-identical, not merely close
            assert_eq!(
                serde_json::to_string(&first).unwrap(),
                serde_json::to_string(&second).unwrap()
            );
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_request_json_uses_defaults_for_missing_fields() {
        let request: CalculatorRequest =
            serde_json::from_str(r#"{"calculator": "coast_fire", "current_age": 35}"#).unwrap();

        let expected = CoastFireInput {
            current_age: 35,
            ..Default::default()
        };
        assert_eq!(request, CalculatorRequest::CoastFire(expected));
    }

    #[test]
    fn test_request_round_trips_through_tag() {
        let request: CalculatorRequest =
            serde_json::from_str(r#"{"calculator": "solo_401k", "age": 52}"#).unwrap();
        assert_eq!(request.kind(), CalculatorKind::Solo401k);

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["calculator"], "solo_401k");
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!("coast-fire".parse::<CalculatorKind>().unwrap(), CalculatorKind::CoastFire);
        assert_eq!("SOLO_401K".parse::<CalculatorKind>().unwrap(), CalculatorKind::Solo401k);
        assert!(matches!(
            "pension".parse::<CalculatorKind>(),
            Err(CalcError::UnknownCalculator(_))
        ));
        for kind in CalculatorKind::ALL {
            assert_eq!(kind.name().parse::<CalculatorKind>().unwrap(), kind);
            assert_eq!(kind.default_request().kind(), kind);
        }
    }

    #[test]
    fn test_for_year() {
        let request = CalculatorKind::Solo401k.default_request().for_year(2024);
        match request {
            CalculatorRequest::Solo401k(input) => assert_eq!(input.tax_year, 2024),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_write_projection_csv() {
        let response = evaluate(&CalculatorKind::CoastFire.default_request(), &Limits::builtin()).unwrap();
        let mut buffer = Vec::new();
        let rows = response.write_projection(&mut buffer).unwrap();
        assert_eq!(rows, 35);

        let text = String::from_utf8(buffer).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("age,contribution,growth,balance,coasting"));
        assert_eq!(lines.count(), 35);

        let response = evaluate(&CalculatorKind::RothConversion.default_request(), &Limits::builtin()).unwrap();
        assert_eq!(response.write_projection(Vec::new()).unwrap(), 0);
    }

    #[test]
    fn test_out_of_range_reports_field() {
        let request = CalculatorRequest::CoastFire(CoastFireInput {
            current_age: 10,
            ..Default::default()
        });
        let err = evaluate(&request, &Limits::builtin()).unwrap_err();
        assert!(matches!(err, CalcError::OutOfRange { field: "current_age", .. }));
    }
}
