//! Retirement Calculators CLI
//!
//! Evaluate calculator requests given as JSON, e.g.
//! `{"calculator": "fers", "high_three_salary": 100000, "years_of_service": 25}`.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use chrono::Datelike;
use clap::{Parser, Subcommand};
use serde::Serialize;

use retirement_calculators::{
    report, CalculatorKind, CalculatorRequest, CalculatorResponse, CalculatorRunner,
};

#[derive(Parser, Debug)]
#[command(name = "retirement_calculators", version, about = "Retirement planning calculators")]
struct Cli {
    #[arg(long, global = true, help = "Load tax-year limits and IRS tables from this directory")]
    limits_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the available calculators
    List,
    /// Print a calculator's default input as JSON
    Defaults {
        calculator: CalculatorKind,
        #[arg(long, help = "Tax or distribution year (defaults to the current year)")]
        year: Option<i32>,
    },
    /// Evaluate one request
    Run {
        #[arg(long, help = "Request JSON file, or - for stdin")]
        input: String,
        #[arg(long, help = "Output machine-readable JSON")]
        json: bool,
        #[arg(long, help = "Write the year-by-year projection to this CSV file")]
        table: Option<PathBuf>,
    },
    /// Evaluate a JSON array of requests in parallel
    Batch {
        #[arg(long, help = "Request array JSON file, or - for stdin")]
        input: String,
        #[arg(long, help = "Output machine-readable JSON")]
        json: bool,
    },
}

#[derive(Serialize)]
struct BatchOut<'a> {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a CalculatorResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let runner = match &cli.limits_dir {
        Some(dir) => CalculatorRunner::from_csv_path(dir)
            .with_context(|| format!("loading limits from {}", dir.display()))?,
        None => CalculatorRunner::new(),
    };

    match cli.command {
        Commands::List => {
            for kind in CalculatorKind::ALL {
                println!("{:<18} {}", kind.name(), kind.description());
            }
        }
        Commands::Defaults { calculator, year } => {
            let year = year.unwrap_or_else(|| chrono::Local::now().year());
            let request = calculator.default_request().for_year(year);
            println!("{}", serde_json::to_string_pretty(&request)?);
        }
        Commands::Run { input, json, table } => {
            let text = read_input(&input)?;
            let request: CalculatorRequest =
                serde_json::from_str(&text).with_context(|| format!("parsing request {}", input))?;

            let response = runner
                .run(&request)
                .with_context(|| format!("evaluating {}", request.kind()))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                print!("{}", report::render_summary(&response));
            }

            if let Some(path) = table {
                let rows = report::export_projection(&response, &path)
                    .with_context(|| format!("writing {}", path.display()))?;
                if !json {
                    println!("\n{} projection rows written to {}", rows, path.display());
                }
            }
        }
        Commands::Batch { input, json } => {
            let text = read_input(&input)?;
            let requests: Vec<CalculatorRequest> =
                serde_json::from_str(&text).with_context(|| format!("parsing requests {}", input))?;

            let results = runner.run_batch(&requests);
            let failures = results.iter().filter(|r| r.is_err()).count();

            if json {
                let out: Vec<BatchOut> = results
                    .iter()
                    .map(|result| match result {
                        Ok(response) => BatchOut { ok: true, data: Some(response), error: None },
                        Err(e) => BatchOut { ok: false, data: None, error: Some(e.to_string()) },
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                for (i, (request, result)) in requests.iter().zip(&results).enumerate() {
                    if i > 0 {
                        println!();
                    }
                    match result {
                        Ok(response) => print!("{}", report::render_summary(response)),
                        Err(e) => println!("#{} {}: error: {}", i + 1, request.kind(), e),
                    }
                }
            }

            if failures > 0 {
                bail!("{} of {} requests failed", failures, requests.len());
            }
        }
    }

    Ok(())
}

fn read_input(input: &str) -> anyhow::Result<String> {
    if input == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("reading request from stdin")?;
        return Ok(text);
    }
    fs::read_to_string(Path::new(input)).with_context(|| format!("reading {}", input))
}
