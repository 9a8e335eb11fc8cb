use anyhow::Result;

use mesasweep_cli::output::render_constants;
use mesasweep_cli::OutputFormat;

pub fn handle_constants(format: OutputFormat) -> Result<()> {
    println!(
        "{}",
        render_constants(mesasweep_lib::constants(), format)?.trim_end()
    );
    Ok(())
}
