//! `hps size`: run the optimizer on the configured scenario

use anyhow::{Context, Result};
use hps_algo::sizing::{size_system, CostBreakdown, SizingOutcome};
use hps_cli::cli::SizeArgs;
use hps_cli::config::load_run_config;
use tracing::info;

use crate::commands::util::{configure_threads, design_rows, print_table, write_json};

pub fn handle(args: &SizeArgs) -> Result<()> {
    let config = load_run_config(args.config.as_deref())?;
    let problem = config.problem()?;

    let mut optimizer = config.optimizer.clone();
    if let Some(seed) = args.seed {
        optimizer.seed = Some(seed);
    }
    if let Some(epochs) = args.epochs {
        optimizer.epochs = epochs;
    }
    if let Some(population) = args.population {
        optimizer.population_size = population;
    }
    configure_threads(&args.threads);

    info!(
        population = optimizer.population_size,
        epochs = optimizer.epochs,
        seed = ?optimizer.seed,
        "sizing hybrid system"
    );
    let result = size_system(&problem, &optimizer).context("running optimizer")?;
    let solution = &result.solution;

    println!("Status: {}", solution.status());
    match &result.outcome {
        SizingOutcome::Feasible { design, costs } => {
            println!();
            print_table("COMPONENT\tSIZE\tUNIT", &design_rows(design))?;
            println!();
            print_costs(costs)?;
        }
        SizingOutcome::NoFeasibleDesign { closest, violations } => {
            println!("Closest design found:");
            print_table("COMPONENT\tSIZE\tUNIT", &design_rows(closest))?;
            for violation in violations {
                println!("  violated: {violation}");
            }
        }
    }

    println!();
    println!(
        "Epochs: {}{}",
        solution.epochs_run(),
        if solution.stopped_early() { " (stalled)" } else { "" }
    );
    println!("Evaluations: {}", solution.evaluations());
    println!(
        "Moves: {} exploration / {} exploitation",
        solution.moves().exploration(),
        solution.moves().exploitation()
    );
    if let Some(improvement) = solution.improvement() {
        println!("Improvement over generation 0: {:.2}%", improvement * 100.0);
    }
    println!("Solve time: {} ms", solution.solve_time().as_millis());

    if let Some(out) = &args.out {
        write_json(&result, out)?;
        println!("\nResults written to {}", out.display());
    }

    Ok(())
}

pub fn print_costs(costs: &CostBreakdown) -> Result<()> {
    let rows = [
        format!("Solar PV capex\t{:.0}", costs.pv_capex.value()),
        format!("Battery capex\t{:.0}", costs.battery_capex.value()),
        format!("Biogas capex\t{:.0}", costs.biogas_capex.value()),
        format!("Converter capex\t{:.0}", costs.converter_capex.value()),
        format!("Total capex\t{:.0}", costs.capex.value()),
        format!("Daily generation (kWh)\t{:.0}", costs.total_generation.value()),
        format!("Daily grid shortage (kWh)\t{:.0}", costs.shortage.value()),
        format!("Lifetime grid cost\t{:.0}", costs.lifetime_grid_cost.value()),
        format!("Net present cost\t{:.0}", costs.npc.value()),
    ];
    print_table("ITEM\tUSD", &rows)
}
