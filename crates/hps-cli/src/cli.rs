use clap::{Args, Parser, Subcommand, ValueEnum, ValueHint};
use hps_core::DecisionVector;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "hps", author, version, about = "Hybrid power system sizing", long_about = None)]
pub struct Cli {
    /// Set the logging level (defaults to the run configuration, then info)
    #[arg(long, global = true)]
    pub log_level: Option<tracing::Level>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Size the plant with the Gorilla Troops Optimizer
    Size(SizeArgs),
    /// Cost breakdown and constraint check of a single design
    Evaluate {
        #[command(flatten)]
        design: DesignArgs,
        /// Run configuration (TOML); factory defaults when omitted
        #[arg(long, value_hint = ValueHint::FilePath)]
        config: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Plain)]
        format: OutputFormat,
    },
    /// LCOE, CO2 and battery price sensitivity of a design
    Analyze {
        #[command(flatten)]
        design: DesignArgs,
        /// Run configuration (TOML); factory defaults when omitted
        #[arg(long, value_hint = ValueHint::FilePath)]
        config: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Plain)]
        format: OutputFormat,
    },
    /// Run configuration files
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

impl Commands {
    /// Run configuration file named on the command line, if any.
    pub fn config_path(&self) -> Option<&PathBuf> {
        match self {
            Commands::Size(args) => args.config.as_ref(),
            Commands::Evaluate { config, .. } | Commands::Analyze { config, .. } => config.as_ref(),
            Commands::Config {
                command: ConfigCommands::Validate { file },
            } => Some(file),
            Commands::Config { .. } => None,
        }
    }
}

#[derive(Args, Debug)]
pub struct SizeArgs {
    /// Run configuration (TOML); factory defaults when omitted
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
    /// RNG seed for a reproducible run
    #[arg(long)]
    pub seed: Option<u64>,
    /// Epoch budget
    #[arg(long)]
    pub epochs: Option<usize>,
    /// Troop size
    #[arg(long)]
    pub population: Option<usize>,
    /// Threads for fitness evaluation ("auto" or a number)
    #[arg(long, default_value = "auto")]
    pub threads: String,
    /// Write the full result as JSON
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub out: Option<PathBuf>,
}

/// The four sizing decisions of one design
#[derive(Args, Debug, Clone, Copy)]
pub struct DesignArgs {
    /// Solar PV rating (kW)
    #[arg(long)]
    pub pv: f64,
    /// Battery capacity (kWh)
    #[arg(long)]
    pub battery: f64,
    /// Biogas generator rating (kW)
    #[arg(long)]
    pub biogas: f64,
    /// Converter rating (kW)
    #[arg(long)]
    pub converter: f64,
}

impl DesignArgs {
    pub fn to_vector(self) -> DecisionVector {
        DecisionVector::new(self.pv, self.battery, self.biogas, self.converter)
    }
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Write the default run configuration
    Init {
        /// Destination file; stdout when omitted
        #[arg(long, value_hint = ValueHint::FilePath)]
        out: Option<PathBuf>,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Check a run configuration and its search space
    Validate {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Plain,
    Json,
}
