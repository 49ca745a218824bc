//! Sweep one input field across a range and tabulate headline results
//!
//! Takes a base request, overrides a single numeric field at each step,
//! evaluates every step in parallel and writes one CSV row per step with the
//! response's top-level numbers.
//!
//! ```text
//! sweep --input coast.json --field current_savings --from 0 --to 500000 --step 25000
//! ```

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context};
use clap::Parser;
use rayon::prelude::*;
use serde_json::{Map, Value};

use retirement_calculators::{CalculatorRequest, CalculatorRunner};

/// Guard against runaway step counts from a tiny step size
const MAX_STEPS: usize = 100_000;

#[derive(Parser, Debug)]
#[command(name = "sweep", about = "Vary one input field and tabulate the results")]
struct Args {
    #[arg(long, help = "Base request JSON file")]
    input: PathBuf,
    #[arg(long, help = "Input field to vary, e.g. current_savings")]
    field: String,
    #[arg(long)]
    from: f64,
    #[arg(long)]
    to: f64,
    #[arg(long)]
    step: f64,
    #[arg(long, default_value = "sweep_output.csv")]
    output: PathBuf,
    #[arg(long, help = "Load tax-year limits and IRS tables from this directory")]
    limits_dir: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let values = sweep_values(args.from, args.to, args.step)?;

    let runner = match &args.limits_dir {
        Some(dir) => CalculatorRunner::from_csv_path(dir)
            .with_context(|| format!("loading limits from {}", dir.display()))?,
        None => CalculatorRunner::new(),
    };

    let text = fs::read_to_string(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let base: Value = serde_json::from_str(&text).context("parsing base request")?;

    // Validate the base request and learn whether the field is an integer
    let base_request: CalculatorRequest =
        serde_json::from_value(base.clone()).context("base request is not a calculator request")?;
    let normalized = serde_json::to_value(&base_request)?;
    let integer_field = match normalized.get(&args.field) {
        Some(Value::Number(n)) => n.is_u64() || n.is_i64(),
        Some(_) => bail!("{} is not a numeric field of {}", args.field, base_request.kind()),
        None => bail!("{} has no field {}", base_request.kind(), args.field),
    };

    println!(
        "Sweeping {}.{} over {} values...",
        base_request.kind(),
        args.field,
        values.len()
    );
    let start = Instant::now();

    let rows: Vec<(f64, Result<Map<String, Value>, String>)> = values
        .par_iter()
        .map(|&value| {
            let value = if integer_field { value.round() } else { value };
            (value, evaluate_step(&runner, &base, &args.field, value, integer_field))
        })
        .collect();

    println!("Evaluated in {:?}", start.elapsed());

    let columns: Vec<String> = rows
        .iter()
        .find_map(|(_, r)| r.as_ref().ok())
        .map(|outputs| {
            outputs
                .iter()
                .filter(|(_, v)| v.is_number() || v.is_null())
                .map(|(k, _)| k.clone())
                .collect()
        })
        .unwrap_or_default();

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;

    let mut header = vec![args.field.clone()];
    header.extend(columns.iter().cloned());
    header.push("error".to_string());
    writer.write_record(&header)?;

    let mut failures = 0;
    for (value, result) in &rows {
        let mut record = vec![value.to_string()];
        match result {
            Ok(outputs) => {
                record.extend(columns.iter().map(|c| match outputs.get(c) {
                    Some(Value::Number(n)) => n.to_string(),
                    _ => String::new(),
                }));
                record.push(String::new());
            }
            Err(e) => {
                failures += 1;
                record.extend(columns.iter().map(|_| String::new()));
                record.push(e.clone());
            }
        }
        writer.write_record(&record)?;
    }
    writer.flush()?;

    println!("Wrote {} rows to {}", rows.len(), args.output.display());
    if failures > 0 {
        println!("{} steps were outside the valid input range", failures);
    }

    Ok(())
}

/// `from`, `from + step`, ... up to and including `to` (within rounding)
///
/// The step count is checked against `MAX_STEPS` before anything is allocated.
fn sweep_values(from: f64, to: f64, step: f64) -> anyhow::Result<Vec<f64>> {
    if !(from.is_finite() && to.is_finite() && step.is_finite()) {
        bail!("--from, --to and --step must be finite numbers");
    }
    if step <= 0.0 || to < from {
        bail!("need --step > 0 and --to >= --from");
    }
    let steps = ((to - from) / step + 1e-9).floor() + 1.0;
    if !steps.is_finite() || steps > MAX_STEPS as f64 {
        bail!("{} steps exceeds the limit of {}", steps, MAX_STEPS);
    }
    let count = steps as usize;
    Ok((0..count).map(|i| from + step * i as f64).collect())
}

fn evaluate_step(
    runner: &CalculatorRunner,
    base: &Value,
    field: &str,
    value: f64,
    integer_field: bool,
) -> Result<Map<String, Value>, String> {
    let mut request = base.clone();
    let number = if integer_field {
        Value::from(value as i64)
    } else {
        Value::from(value)
    };
    if let Value::Object(map) = &mut request {
        map.insert(field.to_string(), number);
    }

    let request: CalculatorRequest = serde_json::from_value(request).map_err(|e| e.to_string())?;
    let response = runner.run(&request).map_err(|e| e.to_string())?;

    match serde_json::to_value(&response).map_err(|e| e.to_string())? {
        Value::Object(map) => Ok(map),
        _ => Err("response is not an object".to_string()),
    }
}
