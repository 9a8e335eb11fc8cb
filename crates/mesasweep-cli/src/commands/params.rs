//! Params command handler.

use anyhow::Result;

use mesasweep_cli::output::render_parameters;
use mesasweep_cli::OutputFormat;
use mesasweep_lib::SweepConfig;

use super::{derive_point, PointArgs};

/// Print the derived parameter block for one point.
pub fn handle_params(config: &SweepConfig, args: &PointArgs, format: OutputFormat) -> Result<()> {
    let request = args.request(&config.planet, config.options.depth_heating);
    let params = derive_point(&config.planet, &request)?;
    println!("{}", render_parameters(&params, format)?.trim_end());
    Ok(())
}
