//! `hps config`: write and check run configuration files

use anyhow::{bail, Context, Result};
use hps_cli::cli::ConfigCommands;
use hps_cli::config::{load_run_config, RunConfig};
use std::path::Path;

pub fn handle(command: &ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Init { out, force } => handle_init(out.as_deref(), *force),
        ConfigCommands::Validate { file } => handle_validate(file),
    }
}

fn handle_init(out: Option<&Path>, force: bool) -> Result<()> {
    let text = RunConfig::default().to_toml()?;
    match out {
        None => print!("{text}"),
        Some(path) => {
            if path.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", path.display());
            }
            std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
            println!("Default configuration written to {}", path.display());
        }
    }
    Ok(())
}

fn handle_validate(file: &Path) -> Result<()> {
    let config = load_run_config(Some(file))?;
    let diagnostics = config.validate()?;

    for issue in &diagnostics.issues {
        println!("  {issue}");
    }
    if diagnostics.has_errors() {
        bail!(
            "{}: no design inside the bounds can be feasible ({})",
            file.display(),
            diagnostics.summary()
        );
    }

    println!("Configuration {} is valid ({})", file.display(), diagnostics.summary());
    Ok(())
}
