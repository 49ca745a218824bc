//! Inflation and purchasing-power calculator

use serde::{Deserialize, Serialize};

use crate::error::{check_range, Result};
use crate::finance::pct;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InflationInput {
    pub amount: f64,
    pub inflation_rate: f64,
    pub years: u32,
}

impl Default for InflationInput {
    fn default() -> Self {
        Self {
            amount: 100_000.0,
            inflation_rate: 3.0,
            years: 20,
        }
    }
}

impl InflationInput {
    pub fn validate(&self) -> Result<()> {
        check_range("amount", self.amount, 0.0, 100_000_000.0)?;
        check_range("inflation_rate", self.inflation_rate, 0.0, 20.0)?;
        check_range("years", self.years as f64, 0.0, 100.0)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InflationRow {
    pub year: u32,
    pub future_cost: f64,
    pub purchasing_power: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InflationResult {
    /// Dollars needed in the future to buy what `amount` buys today
    pub future_cost: f64,
    /// What `amount` held as cash will buy in today's dollars
    pub purchasing_power: f64,
    pub percent_lost: f64,
    pub projection: Vec<InflationRow>,
}

pub fn calculate(input: &InflationInput) -> Result<InflationResult> {
    input.validate()?;

    let growth = 1.0 + pct(input.inflation_rate);
    let projection: Vec<InflationRow> = (1..=input.years)
        .map(|year| {
            let factor = growth.powi(year as i32);
            InflationRow {
                year,
                future_cost: input.amount * factor,
                purchasing_power: input.amount / factor,
            }
        })
        .collect();

    let factor = growth.powi(input.years as i32);

    Ok(InflationResult {
        future_cost: input.amount * factor,
        purchasing_power: input.amount / factor,
        percent_lost: (1.0 - 1.0 / factor) * 100.0,
        projection,
    })
}
