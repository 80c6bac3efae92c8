use crate::bridge::LaunchOptions;
use crate::error::BridgeError;
use serde::Deserialize;
use std::fs;
use std::path::Path;

// NOTE: the packaging step rewrites these entries for the release layout,
// which ships a single engine jar instead of the development classes folder.
pub const DEFAULT_CLASSPATH: &[&str] = &["build/output/*.jar", "bin"];

pub const DEFAULT_HEAP_SIZE_MB: u64 = 1024;

/// Launch parameters for the embedded engine runtime.
///
/// The classpath entry list is ordered; entries are registered with the
/// bridge in exactly this order. Heap size and the assertion flag are passed
/// through to the runtime uninterpreted, except that a zero heap size is
/// rejected before launch.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LaunchConfig {
    #[serde(rename = "heap-size-mb", default = "default_heap_size_mb")]
    pub heap_size_mb: u64,

    #[serde(rename = "enable-assertions", default)]
    pub enable_assertions: bool,

    #[serde(default = "default_classpath")]
    pub classpath: Vec<String>,
}

fn default_heap_size_mb() -> u64 {
    DEFAULT_HEAP_SIZE_MB
}

fn default_classpath() -> Vec<String> {
    DEFAULT_CLASSPATH.iter().map(|s| s.to_string()).collect()
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            heap_size_mb: DEFAULT_HEAP_SIZE_MB,
            enable_assertions: false,
            classpath: default_classpath(),
        }
    }
}

impl LaunchConfig {
    /// Reads a launch configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, BridgeError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, BridgeError> {
        toml::from_str(contents).map_err(|e| BridgeError::Config(e.to_string()))
    }

    pub(crate) fn options(&self) -> LaunchOptions {
        LaunchOptions {
            heap_size_mb: self.heap_size_mb,
            enable_assertions: self.enable_assertions,
        }
    }
}
