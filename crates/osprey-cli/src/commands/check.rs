use crate::cli::LaunchArgs;
use crate::config::resolve_launch_config;
use crate::error::Result;
use osprey_bridge::bridge::jvm::JvmBridge;
use osprey_bridge::runtime::Osprey;
use tracing::info;

pub fn run(launch: &LaunchArgs) -> Result<()> {
    let config = resolve_launch_config(launch)?;

    info!("Booting the embedded engine...");
    let mut engine = Osprey::new(JvmBridge::new(), config);
    engine.start()?;

    info!("Engine responded with version {}.", engine.version()?);
    Ok(())
}
