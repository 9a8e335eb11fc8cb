//! Sweep configuration loading.
//!
//! A JSON document describes the base planet, the grid, the sweep options and
//! how to start the simulator. [`SweepConfig::resolve`] picks the document
//! from an explicit path, the `MESASWEEP_CONFIG` variable or the platform
//! configuration directory, and falls back to built-in defaults.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::params::PlanetInputs;
use crate::simulator::{ProcessSimulator, DEFAULT_SIMULATOR_PROGRAM};
use crate::sweep::{SweepGrid, SweepOptions};

/// Default filename of the configuration in the platform config directory.
const CONFIG_FILENAME: &str = "sweep.json";

/// Environment variable naming an explicit configuration file.
pub const CONFIG_ENV: &str = "MESASWEEP_CONFIG";
/// Environment variable overriding the simulator program.
pub const SIMULATOR_ENV: &str = "MESASWEEP_SIMULATOR";
/// Environment variable overriding the working directory.
pub const WORK_DIR_ENV: &str = "MESASWEEP_WORK_DIR";

/// How to start the external simulator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from(DEFAULT_SIMULATOR_PROGRAM),
            args: Vec::new(),
        }
    }
}

impl SimulatorConfig {
    pub fn build(&self) -> ProcessSimulator {
        ProcessSimulator::new(self.program.clone()).with_args(self.args.iter().cloned())
    }
}

/// Sweep configuration document.
///
/// Every section is optional; missing fields fall back to the fiducial
/// planet, the default grid and the default options.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// Directory where inlists, models and run directories are written.
    pub work_dir: Option<PathBuf>,
    pub planet: PlanetInputs,
    pub grid: SweepGrid,
    pub options: SweepOptions,
    pub simulator: SimulatorConfig,
}

impl SweepConfig {
    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&text).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        info!("loaded sweep configuration from {}", path.display());
        Ok(config)
    }

    /// Resolve the configuration to use.
    ///
    /// The resolution order is:
    /// 1. Explicit `path` argument when provided.
    /// 2. `MESASWEEP_CONFIG` environment variable.
    /// 3. `sweep.json` in the platform configuration directory, if present.
    /// 4. Built-in defaults.
    ///
    /// `MESASWEEP_SIMULATOR` and `MESASWEEP_WORK_DIR` are applied on top.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        let mut config = if let Some(explicit) = path {
            Self::load(explicit)?
        } else if let Some(env_path) = env::var_os(CONFIG_ENV) {
            Self::load(Path::new(&env_path))?
        } else {
            match default_config_path() {
                Ok(candidate) if candidate.is_file() => Self::load(&candidate)?,
                Ok(candidate) => {
                    debug!("no configuration at {}, using defaults", candidate.display());
                    Self::default()
                }
                Err(_) => Self::default(),
            }
        };
        config.apply_env();
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Some(program) = env::var_os(SIMULATOR_ENV) {
            self.simulator.program = PathBuf::from(program);
        }
        if let Some(dir) = env::var_os(WORK_DIR_ENV) {
            self.work_dir = Some(PathBuf::from(dir));
        }
    }

    /// Working directory, defaulting to the current directory.
    pub fn work_dir(&self) -> PathBuf {
        self.work_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Platform-specific location of the default configuration file.
pub fn default_config_path() -> Result<PathBuf> {
    let dirs =
        ProjectDirs::from("org", "mesasweep", "mesasweep").ok_or(Error::ProjectDirsUnavailable)?;
    Ok(dirs.config_dir().join(CONFIG_FILENAME))
}
