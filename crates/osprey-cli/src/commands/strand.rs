use crate::cli::{LaunchArgs, StrandArgs};
use crate::config::resolve_launch_config;
use crate::error::{CliError, Result};
use crate::utils::parser::parse_builder_option;
use osprey_bridge::bridge::jvm::JvmBridge;
use osprey_bridge::runtime::Osprey;
use osprey_bridge::strand::StrandOptions;
use tracing::info;

pub fn run(launch: &LaunchArgs, args: StrandArgs) -> Result<()> {
    let config = resolve_launch_config(launch)?;

    let mut options = StrandOptions::new();
    for raw in &args.set_values {
        let (name, value) =
            parse_builder_option(raw).map_err(|e| CliError::Argument(e.to_string()))?;
        options.insert(name, value);
    }

    let mut engine = Osprey::new(JvmBridge::new(), config);
    engine.start()?;

    info!("Building strand from {:?}", &args.input);
    let _strand = engine.make_strand_with(&args.input, &options)?;

    println!("✓ Strand built from {}", args.input.display());
    Ok(())
}
