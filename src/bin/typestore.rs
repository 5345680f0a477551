use anyhow::Result;
use clap::Parser;

use typestore::cli::args::CliArgs;
use typestore::cli::commands;

fn main() -> Result<()> {
    // Initialize tracing if TYPESTORE_LOG or RUST_LOG is set (zero cost otherwise).
    typestore::tracing_config::init_tracing();

    let args = CliArgs::parse();
    let output = commands::run(&args)?;
    print!("{output}");
    Ok(())
}
