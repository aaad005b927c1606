use clap::Parser;
use hps_cli::cli::{Cli, Commands};
use hps_cli::config::load_run_config;
use tracing::error;
use tracing_subscriber::FmtSubscriber;

mod commands;

/// `--log-level`, else the `[logging]` level of the run configuration, else info.
fn resolve_log_level(cli: &Cli) -> tracing::Level {
    if let Some(level) = cli.log_level {
        return level;
    }
    cli.command
        .config_path()
        .and_then(|path| load_run_config(Some(path.as_path())).ok())
        .and_then(|config| config.logging.level().ok())
        .unwrap_or(tracing::Level::INFO)
}

fn main() {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(resolve_log_level(&cli))
        .with_writer(std::io::stderr)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("warning: a global tracing subscriber was already installed");
    }

    let result = match &cli.command {
        Commands::Size(args) => commands::size::handle(args),
        Commands::Evaluate {
            design,
            config,
            format,
        } => commands::evaluate::handle(design, config.as_deref(), *format),
        Commands::Analyze {
            design,
            config,
            format,
        } => commands::analyze::handle(design, config.as_deref(), *format),
        Commands::Config { command } => commands::config::handle(command),
    };

    if let Err(err) = result {
        error!("{err:#}");
        std::process::exit(1);
    }
}
