//! Sweep command handler.

use anyhow::{Context, Result};
use tracing::warn;

use mesasweep_cli::output::render_sweep;
use mesasweep_cli::OutputFormat;
use mesasweep_lib::{SweepConfig, SweepDriver};

use super::SweepArgs;

/// Handle the sweep subcommand.
///
/// With both `--gamma` and `--z` a single point is run. Otherwise the grid
/// from the configuration is swept, with any of `--gamma`, `--z` or `--pdep`
/// pinning its axis to one value.
pub fn handle_sweep(mut config: SweepConfig, args: &SweepArgs, format: OutputFormat) -> Result<()> {
    apply_flags(&mut config, args);

    let work_dir = config.work_dir();
    let single = match (args.point.gamma, args.point.z) {
        (Some(_), Some(_)) => Some(args.point.request(&config.planet, config.options.depth_heating)),
        _ => None,
    };
    if single.is_none() {
        if let Some(gamma) = args.point.gamma {
            config.grid.gammas = vec![gamma];
        }
        if let Some(z) = args.point.z {
            config.grid.metallicities = vec![z];
        }
        if let Some(pdep) = args.point.pdep {
            config.grid.pressure_depths_bar = vec![pdep];
        }
    }
    if args.point.pdep.is_some() && !config.options.depth_heating {
        warn!("--pdep has no effect without depth-dependent heating");
    }

    let driver = SweepDriver::new(
        config.planet.clone(),
        work_dir.clone(),
        config.options,
        config.simulator.build(),
    );
    let report = driver
        .run_sweep(single, &config.grid)
        .with_context(|| format!("sweep in {} failed", work_dir.display()))?;

    println!("{}", render_sweep(&report, format)?.trim_end());
    Ok(())
}

fn apply_flags(config: &mut SweepConfig, args: &SweepArgs) {
    let options = &mut config.options;
    options.depth_heating |= args.point.depth_heating;
    options.insert_core |= args.insert_core;
    options.strict |= args.strict;
    options.resume |= args.resume;
    if args.dry_run {
        options.run_sims = false;
    }
    if args.quiet {
        options.verbose = false;
    }

    if let Some(program) = &args.simulator {
        config.simulator.program = program.clone();
    }
    if !args.sim_args.is_empty() {
        config.simulator.args = args.sim_args.clone();
    }
}
