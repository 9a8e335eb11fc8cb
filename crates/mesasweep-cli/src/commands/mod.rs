// Subcommand handlers. main.rs parses arguments and resolves the
// configuration, then dispatches to one `handle_*` function per subcommand.

pub mod constants;
pub mod names;
pub mod params;
pub mod sweep;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use mesasweep_lib::{ParameterSet, PlanetInputs, RunRequest};

/// Values selecting a single point of the grid.
#[derive(Args, Debug, Clone, Default)]
pub struct PointArgs {
    /// Heating efficiency gamma (fraction of intercepted stellar power).
    #[arg(long)]
    pub gamma: Option<f64>,

    /// Metallicity Z.
    #[arg(long = "z")]
    pub z: Option<f64>,

    /// Pressure depth in bar for depth-dependent heating.
    #[arg(long)]
    pub pdep: Option<f64>,

    /// Deposit heat at a pressure depth instead of uniformly.
    #[arg(long)]
    pub depth_heating: bool,
}

impl PointArgs {
    /// Point described by these arguments; unset values fall back to `base`.
    pub fn request(&self, base: &PlanetInputs, depth_heating: bool) -> RunRequest {
        RunRequest {
            heating_gamma: self.gamma.unwrap_or(base.heating_gamma),
            metallicity: self.z.unwrap_or(base.metallicity),
            pressure_depth_bar: self.pdep,
            depth_heating: depth_heating || self.depth_heating,
        }
    }
}

/// Arguments of the `sweep` subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct SweepArgs {
    #[command(flatten)]
    pub point: PointArgs,

    /// Only derive parameters and create run directories.
    #[arg(long)]
    pub dry_run: bool,

    /// Do not log the derived parameters of every point.
    #[arg(long)]
    pub quiet: bool,

    /// Run the core insertion stage instead of copying the create model.
    #[arg(long)]
    pub insert_core: bool,

    /// Stop at the first stage that leaves no model behind.
    #[arg(long)]
    pub strict: bool,

    /// Skip stages whose model already exists.
    #[arg(long)]
    pub resume: bool,

    /// Simulator program to run in the working directory.
    #[arg(long)]
    pub simulator: Option<PathBuf>,

    /// Extra argument for the simulator (repeatable).
    #[arg(long = "sim-arg", allow_hyphen_values = true)]
    pub sim_args: Vec<String>,
}

/// Derive the parameter set of one point from the configured base inputs.
pub(crate) fn derive_point(base: &PlanetInputs, request: &RunRequest) -> Result<ParameterSet> {
    let inputs = base.with_overrides(&request.overrides());
    ParameterSet::derive(&inputs, request.heating_mode(&inputs)).with_context(|| {
        format!(
            "failed to derive parameters for gamma={} z={}",
            request.heating_gamma, request.metallicity
        )
    })
}
