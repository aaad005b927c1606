//! Run configuration
//!
//! One TOML file holds everything a run needs. Every field has a default
//! equal to the factory scenario, so an empty file is a valid configuration:
//!
//! ```toml
//! [problem]
//! grid_price_per_kwh = 0.105
//!
//! [bounds]
//! lower = [0.0, 0.0, 2000.0, 35000.0]
//! upper = [150000.0, 300000.0, 15000.0, 100000.0]
//!
//! [optimizer]
//! population_size = 80
//! epochs = 150
//!
//! [logging]
//! level = "info"
//! ```

use hps_algo::analysis::AnalysisParams;
use hps_algo::gto::GtoConfig;
use hps_algo::sizing::{SizingParams, SizingProblem};
use hps_core::{Bounds, Diagnostics, HpsError, HpsResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default)]
    pub problem: SizingParams,
    #[serde(default = "SizingProblem::default_bounds")]
    pub bounds: Bounds,
    #[serde(default)]
    pub optimizer: GtoConfig,
    #[serde(default)]
    pub analysis: AnalysisParams,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            problem: SizingParams::default(),
            bounds: SizingProblem::default_bounds(),
            optimizer: GtoConfig::default(),
            analysis: AnalysisParams::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl LoggingConfig {
    pub fn level(&self) -> HpsResult<tracing::Level> {
        self.level
            .parse()
            .map_err(|_| HpsError::Config(format!("unknown log level '{}'", self.level)))
    }
}

impl RunConfig {
    /// Validated sizing problem
    pub fn problem(&self) -> HpsResult<SizingProblem> {
        Ok(SizingProblem::new(self.problem.clone(), self.bounds.clone())?)
    }

    /// Validate every section; returns the search-space diagnostics.
    pub fn validate(&self) -> HpsResult<Diagnostics> {
        let problem = self.problem()?;
        self.optimizer.validate()?;
        self.analysis.validate()?;
        self.logging.level()?;
        Ok(problem.diagnose())
    }

    pub fn to_toml(&self) -> HpsResult<String> {
        toml::to_string_pretty(self)
            .map_err(|err| HpsError::Other(format!("serializing run configuration: {err}")))
    }
}

/// Load `path`, or the defaults when no file is given.
pub fn load_run_config(path: Option<&Path>) -> HpsResult<RunConfig> {
    let Some(path) = path else {
        return Ok(RunConfig::default());
    };
    let contents = std::fs::read_to_string(path).map_err(|err| {
        HpsError::Io(std::io::Error::new(err.kind(), format!("{}: {err}", path.display())))
    })?;
    toml::from_str(&contents).map_err(|err| HpsError::Parse(format!("{}: {err}", path.display())))
}
