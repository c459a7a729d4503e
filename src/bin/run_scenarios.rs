//! Run every scenario in a CSV file and write a summary CSV
//!
//! Usage: run_scenarios [input.csv] [output.csv]

use anyhow::{Context, Result};
use fee_projection::report::{write_summary_csv, SummaryCsvRow};
use fee_projection::scenario::{load_scenarios, loader::DEFAULT_SCENARIOS_PATH};
use fee_projection::{ProjectionInput, ScenarioRunner};
use std::fs::File;
use std::time::Instant;

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let input_path = args.next().unwrap_or_else(|| DEFAULT_SCENARIOS_PATH.to_string());
    let output_path = args.next().unwrap_or_else(|| "scenario_summary.csv".to_string());

    let start = Instant::now();
    println!("Loading scenarios from {}...", input_path);

    let scenarios = load_scenarios(&input_path)
        .with_context(|| format!("Failed to load scenarios from {}", input_path))?;
    println!("Loaded {} scenarios in {:?}", scenarios.len(), start.elapsed());

    let runner = ScenarioRunner::new();
    let inputs: Vec<ProjectionInput> = scenarios.iter().map(|s| s.input.clone()).collect();

    let proj_start = Instant::now();
    let results = runner.run_batch(&inputs);
    log::info!("projected {} scenarios in {:?}", results.len(), proj_start.elapsed());

    let mut rows = Vec::with_capacity(results.len());
    let mut failed = 0;
    for (scenario, result) in scenarios.iter().zip(&results) {
        match result {
            Ok(result) => rows.push(SummaryCsvRow::from_result(&scenario.label, result)),
            Err(err) => {
                failed += 1;
                log::warn!("scenario '{}' skipped: {}", scenario.label, err);
            }
        }
    }

    let file = File::create(&output_path)
        .with_context(|| format!("Failed to create {}", output_path))?;
    write_summary_csv(&rows, file)?;
    println!("Output written to {}", output_path);

    println!("\nScenario Summary:");
    println!("{:<28} {:>16} {:>16} {:>10}", "Label", "Without fees", "With fees", "Retained");
    for row in &rows {
        let retained = if row.retention_score.is_empty() {
            "n/a".to_string()
        } else {
            format!("{}%", row.retention_score)
        };
        println!(
            "{:<28} {:>16} {:>16} {:>10}",
            row.label, row.without_fees_final, row.with_fees_final, retained
        );
    }
    if failed > 0 {
        println!("\n{} scenario(s) failed; see log output", failed);
    }

    println!("\nTotal time: {:?}", start.elapsed());
    Ok(())
}
