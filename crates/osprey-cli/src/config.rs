use crate::cli::LaunchArgs;
use crate::error::Result;
use osprey_bridge::config::LaunchConfig;
use tracing::debug;

/// Resolves the final launch configuration: the config file (or built-in
/// defaults) first, then CLI overrides on top. Extra classpath entries are
/// appended after the configured ones, preserving their command-line order.
pub fn resolve_launch_config(args: &LaunchArgs) -> Result<LaunchConfig> {
    let mut config = match &args.config {
        Some(path) => LaunchConfig::from_file(path)?,
        None => LaunchConfig::default(),
    };

    if let Some(heap_size_mb) = args.heap_size_mb {
        config.heap_size_mb = heap_size_mb;
    }
    if args.enable_assertions {
        config.enable_assertions = true;
    }
    config.classpath.extend(args.classpath.iter().cloned());

    debug!(?config, "resolved launch configuration");
    Ok(config)
}
