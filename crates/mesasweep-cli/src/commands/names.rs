//! Names command handler.

use anyhow::Result;

use mesasweep_cli::output::render_names;
use mesasweep_cli::OutputFormat;
use mesasweep_lib::{ArtifactNames, SweepConfig};

use super::{derive_point, PointArgs};

/// Print inlist identifiers, run directories and model names for one point.
///
/// Nothing is created on disk.
pub fn handle_names(config: &SweepConfig, args: &PointArgs, format: OutputFormat) -> Result<()> {
    let request = args.request(&config.planet, config.options.depth_heating);
    let params = derive_point(&config.planet, &request)?;
    let names = ArtifactNames::new(&params);
    println!(
        "{}",
        render_names(&names, &config.work_dir(), format)?.trim_end()
    );
    Ok(())
}
