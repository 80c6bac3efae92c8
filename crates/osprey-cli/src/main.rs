mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod utils;

use crate::cli::{Cli, Commands};
use crate::error::Result;
use clap::Parser;
use tracing::{debug, error, info};

fn main() {
    if let Err(e) = run_app() {
        eprintln!("\n❌ Error: {}", e);
        // Engine-originated failures carry their native stack trace.
        if let Some(fault) = e.engine_fault() {
            if !fault.stacktrace.is_empty() {
                eprintln!("{}", fault.stacktrace);
            }
        }
        std::process::exit(1);
    }
}

fn run_app() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.clone())?;

    info!(
        "🚀 OSPREY bridge CLI v{} starting up.",
        env!("CARGO_PKG_VERSION")
    );
    debug!("Full CLI arguments parsed: {:?}", &cli);

    let command_result = match cli.command {
        Commands::Check => {
            info!("Dispatching to 'check' command.");
            commands::check::run(&cli.launch)
        }
        Commands::Strand(args) => {
            info!("Dispatching to 'strand' command.");
            commands::strand::run(&cli.launch, args)
        }
    };

    match &command_result {
        Ok(_) => info!("✅ Command completed successfully."),
        Err(e) => error!("❌ Command failed: {}", e),
    }

    command_result
}
