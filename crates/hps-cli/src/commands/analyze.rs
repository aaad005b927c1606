//! `hps analyze`: LCOE, CO2 and battery price sensitivity

use anyhow::{Context, Result};
use hps_algo::analysis::{analyze, AnalysisReport};
use hps_cli::cli::{DesignArgs, OutputFormat};
use hps_cli::config::load_run_config;
use std::path::Path;
use tracing::warn;

use crate::commands::util::{print_json, print_table};

pub fn handle(design: &DesignArgs, config: Option<&Path>, format: OutputFormat) -> Result<()> {
    let config = load_run_config(config)?;
    let problem = config.problem()?;
    config.analysis.validate().context("invalid [analysis]")?;

    let report = analyze(problem.objective(), &config.analysis, &design.to_vector());
    if !report.feasible {
        warn!("design violates the sizing constraints; figures describe an infeasible plant");
    }

    match format {
        OutputFormat::Json => print_json(&report),
        OutputFormat::Plain => print_report(&report),
    }
}

fn print_report(report: &AnalysisReport) -> Result<()> {
    let lcoe = &report.lcoe;
    let co2 = &report.emissions;

    println!("LCOE ANALYSIS");
    print_table(
        "METRIC\tVALUE",
        &[
            format!("Net present cost (USD)\t{:.0}", report.npc.value()),
            format!("Lifetime energy (GWh)\t{:.2}", lcoe.lifetime_energy.to_gwh()),
            format!("LCOE (USD/kWh)\t{:.4}", lcoe.lcoe),
            format!("Grid price (USD/kWh)\t{:.4}", lcoe.grid_price),
            format!("Savings (USD/kWh)\t{:.4}", lcoe.savings_per_kwh),
        ],
    )?;

    println!();
    println!("ENVIRONMENTAL IMPACT (annual)");
    print_table(
        "METRIC\tVALUE",
        &[
            format!("Load served (GWh)\t{:.2}", co2.annual_load.to_gwh()),
            format!("Solar generation (GWh)\t{:.2}", co2.annual_solar.to_gwh()),
            format!("Biogas generation (GWh)\t{:.2}", co2.annual_biogas.to_gwh()),
            format!("Business-as-usual CO2 (t)\t{:.0}", co2.business_as_usual_tons),
            format!("System CO2 (t)\t{:.0}", co2.system_tons),
            format!("CO2 avoided (t)\t{:.0}", co2.avoided_tons),
            format!("Equivalent cars\t{:.0}", co2.equivalent_cars),
        ],
    )?;

    println!();
    println!("BATTERY PRICE SENSITIVITY");
    let reference = report.reference_label.as_deref();
    let header = match reference {
        Some(label) => format!("USD/kWh\tDESIGN NPC (M USD)\t{} NPC (M USD)", label.to_uppercase()),
        None => "USD/kWh\tDESIGN NPC (M USD)".to_string(),
    };
    let rows: Vec<String> = report
        .sensitivity
        .iter()
        .map(|point| match point.reference_npc {
            Some(reference_npc) => format!(
                "{:.1}\t{:.2}\t{:.2}",
                point.battery_price,
                point.npc.to_millions(),
                reference_npc.to_millions()
            ),
            None => format!("{:.1}\t{:.2}", point.battery_price, point.npc.to_millions()),
        })
        .collect();
    print_table(&header, &rows)
}
