//! Calculator runner for batch evaluation
//!
//! Loads limits once, then evaluates any number of requests against them
//! without re-reading CSV files.

use std::path::Path;

use rayon::prelude::*;

use crate::calculators::{evaluate, CalculatorRequest, CalculatorResponse};
use crate::error::Result;
use crate::limits::Limits;

/// Runner that holds pre-loaded limits
///
/// # Example
/// ```ignore
/// let runner = CalculatorRunner::from_csv()?;
///
/// let requests: Vec<CalculatorRequest> = serde_json::from_str(&text)?;
/// for result in runner.run_batch(&requests) {
///     println!("{:?}", result?);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CalculatorRunner {
    limits: Limits,
}

impl CalculatorRunner {
    /// Create runner with the built-in limits
    pub fn new() -> Self {
        Self {
            limits: Limits::builtin(),
        }
    }

    /// Create runner by loading limits from data/limits
    pub fn from_csv() -> Result<Self> {
        Ok(Self {
            limits: Limits::from_csv()?,
        })
    }

    /// Create runner from a specific limits directory
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        Ok(Self {
            limits: Limits::from_csv_path(path)?,
        })
    }

    pub fn with_limits(limits: Limits) -> Self {
        Self { limits }
    }

    pub fn run(&self, request: &CalculatorRequest) -> Result<CalculatorResponse> {
        evaluate(request, &self.limits)
    }

    /// Evaluate requests in parallel; results keep the input order
    ///
    /// A failing request does not stop the others.
    pub fn run_batch(&self, requests: &[CalculatorRequest]) -> Vec<Result<CalculatorResponse>> {
        requests
            .par_iter()
            .map(|request| evaluate(request, &self.limits))
            .collect()
    }
}

impl Default for CalculatorRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculators::solo_401k::BusinessType;
    use crate::calculators::{CalculatorKind, CoastFireInput, Solo401kInput};
    use crate::error::CalcError;
    use crate::limits::{LimitsTable, TaxYearLimits};

    #[test]
    fn test_batch_keeps_order() {
        let runner = CalculatorRunner::new();
        let requests: Vec<_> = CalculatorKind::ALL
            .iter()
            .map(|kind| kind.default_request())
            .collect();

        let results = runner.run_batch(&requests);
        assert_eq!(results.len(), requests.len());
        for (request, result) in requests.iter().zip(&results) {
            assert_eq!(result.as_ref().unwrap().kind(), request.kind());
        }
    }

    #[test]
    fn test_batch_isolates_failures() {
        let runner = CalculatorRunner::new();
        let requests = vec![
            CalculatorRequest::CoastFire(CoastFireInput::default()),
            CalculatorRequest::CoastFire(CoastFireInput {
                withdrawal_rate: 0.0,
                ..Default::default()
            }),
            CalculatorRequest::CoastFire(CoastFireInput::default()),
        ];

        let results = runner.run_batch(&requests);
        assert!(results[0].is_ok());
        assert!(matches!(
            results[1],
            Err(CalcError::OutOfRange { field: "withdrawal_rate", .. })
        ));
        assert!(results[2].is_ok());
    }

    #[test]
    fn test_batch_matches_single_runs() {
        let runner = CalculatorRunner::new();
        let requests: Vec<_> = [5_000.0, 50_000.0, 500_000.0]
            .iter()
            .map(|&savings| {
                CalculatorRequest::CoastFire(CoastFireInput {
                    current_savings: savings,
                    ..Default::default()
                })
            })
            .collect();

        let batch = runner.run_batch(&requests);
        for (request, result) in requests.iter().zip(batch) {
            assert_eq!(result.unwrap(), runner.run(request).unwrap());
        }
    }

    #[test]
    fn test_with_limits_uses_supplied_tables() {
        let mut year = Limits::builtin().tax_years.for_year(2025).unwrap().clone();
        year.elective_deferral = 30_000.0;
        let custom: Vec<TaxYearLimits> = vec![year];
        let limits = Limits {
            tax_years: LimitsTable::new(custom),
            ..Limits::builtin()
        };
        let runner = CalculatorRunner::with_limits(limits);

        let request = CalculatorRequest::Solo401k(Solo401kInput {
            tax_year: 2025,
            business_type: BusinessType::SCorporation,
            business_income: 200_000.0,
            ..Default::default()
        });
        match runner.run(&request).unwrap() {
            CalculatorResponse::Solo401k(result) => assert_eq!(result.employee_deferral, 30_000.0),
            other => panic!("unexpected {:?}", other),
        }

        // Years before the supplied table are unknown
        let request = CalculatorRequest::Solo401k(Solo401kInput {
            tax_year: 2024,
            ..Default::default()
        });
        assert!(matches!(runner.run(&request), Err(CalcError::UnknownTaxYear(2024))));
    }
}
