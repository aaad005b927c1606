//! `hps evaluate`: cost breakdown of one design

use anyhow::Result;
use hps_algo::gto::Objective;
use hps_cli::cli::{DesignArgs, OutputFormat};
use hps_cli::config::load_run_config;
use std::path::Path;
use tracing::warn;

use crate::commands::size::print_costs;
use crate::commands::util::{design_rows, print_json, print_table};

pub fn handle(design: &DesignArgs, config: Option<&Path>, format: OutputFormat) -> Result<()> {
    let config = load_run_config(config)?;
    let problem = config.problem()?;
    let vector = design.to_vector();

    if !problem.bounds().contains(vector.as_slice()) {
        warn!("design lies outside the configured bounds");
    }
    let evaluation = problem.evaluate(&vector);

    match format {
        OutputFormat::Json => print_json(&evaluation),
        OutputFormat::Plain => {
            print_table("COMPONENT\tSIZE\tUNIT", &design_rows(&vector.to_design()))?;
            println!();
            print_costs(evaluation.breakdown())?;
            println!();
            if evaluation.is_feasible() {
                println!("Status: feasible");
            } else {
                println!("Status: infeasible");
                for violation in evaluation.violations() {
                    println!("  violated: {violation}");
                }
            }
            Ok(())
        }
    }
}
