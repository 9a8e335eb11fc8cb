mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use mesasweep_cli::OutputFormat;
use mesasweep_lib::SweepConfig;

use commands::{PointArgs, SweepArgs};

#[derive(Parser, Debug)]
#[command(author, version, about = "Parameter sweeps of irradiated gas giant interiors")]
struct Cli {
    /// Sweep configuration file (JSON).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory where inlists, models and run directories are written.
    #[arg(long, global = true)]
    work_dir: Option<PathBuf>,

    /// Output format for command results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the create, core and evolve stages over the sweep grid.
    Sweep(SweepArgs),
    /// Print the derived parameters of one point.
    Params(PointArgs),
    /// Print inlist identifiers, run directories and model names of one point.
    Names(PointArgs),
    /// List the physical constants table.
    Constants,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut config = SweepConfig::resolve(cli.config.as_deref())
        .context("failed to load the sweep configuration")?;
    if let Some(dir) = cli.work_dir {
        config.work_dir = Some(dir);
    }

    match cli.command {
        Command::Sweep(args) => commands::sweep::handle_sweep(config, &args, cli.format),
        Command::Params(args) => commands::params::handle_params(&config, &args, cli.format),
        Command::Names(args) => commands::names::handle_names(&config, &args, cli.format),
        Command::Constants => commands::constants::handle_constants(cli.format),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
