//! Lifecycle of the embedded engine runtime.
//!
//! [`Osprey`] is the single context handle the rest of a program passes
//! around: it owns the bridge, drives the one-shot start sequence, and
//! guards every namespace-dependent operation behind an initialization
//! check. Nothing is observable as ready until `start` has fully succeeded.

use crate::bridge::{EngineBridge, EngineHandle};
use crate::config::LaunchConfig;
use crate::error::BridgeError;
use crate::namespace::{self, Namespace};
use crate::relay;
use tracing::{debug, info, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RuntimeState {
    Idle,
    Ready,
    Failed,
}

/// Context handle for a (possibly not yet started) embedded engine.
pub struct Osprey<B: EngineBridge> {
    bridge: B,
    config: LaunchConfig,
    state: RuntimeState,
    version: Option<String>,
    wild_type: Option<EngineHandle>,
}

impl<B: EngineBridge> Osprey<B> {
    pub fn new(bridge: B, config: LaunchConfig) -> Self {
        Self {
            bridge,
            config,
            state: RuntimeState::Idle,
            version: None,
            wild_type: None,
        }
    }

    /// Starts the embedded runtime and initializes the namespace globals.
    ///
    /// The sequence is fixed: install the uncaught-error relay, register the
    /// classpath entries in configured order, launch the runtime, then
    /// resolve the engine version and the wild-type sentinel. On success the
    /// version banner is printed to stdout.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::AlreadyStarted`] on a second call after a
    /// successful start. A failure at any later step leaves the runtime
    /// permanently unusable (the embedded runtime cannot be relaunched in
    /// the same process) and every accessor keeps reporting
    /// [`BridgeError::NotInitialized`].
    #[instrument(skip_all, name = "engine_start")]
    pub fn start(&mut self) -> Result<(), BridgeError> {
        match self.state {
            RuntimeState::Ready => return Err(BridgeError::AlreadyStarted),
            RuntimeState::Failed => {
                return Err(BridgeError::Launch(
                    "a previous start attempt failed; the embedded runtime cannot be restarted"
                        .to_string(),
                ));
            }
            RuntimeState::Idle => {}
        }
        if self.config.heap_size_mb == 0 {
            return Err(BridgeError::Launch(
                "heap size must be a positive number of megabytes".to_string(),
            ));
        }

        // Installed before any bridge call, so failures during the rest of
        // this sequence are already relayed with engine detail.
        relay::install();

        match self.start_inner() {
            Ok(()) => {
                self.state = RuntimeState::Ready;
                Ok(())
            }
            Err(e) => {
                self.state = RuntimeState::Failed;
                Err(e)
            }
        }
    }

    fn start_inner(&mut self) -> Result<(), BridgeError> {
        for entry in &self.config.classpath {
            debug!(entry = %entry, "registering classpath entry");
            self.bridge.register_classpath(entry)?;
        }

        self.bridge.launch(&self.config.options())?;

        // The namespace only counts as ready once both globals resolved.
        let (version, wild_type) = {
            let ns = Namespace::root(&self.bridge);
            let version_handle = ns.resolve(namespace::VERSION_FIELD).map_err(|e| {
                BridgeError::Initialization(format!("engine version lookup failed: {e}"))
            })?;
            let version = self.bridge.render_string(&version_handle).map_err(|e| {
                BridgeError::Initialization(format!("engine version lookup failed: {e}"))
            })?;
            let wild_type = ns.resolve(namespace::WILD_TYPE_FIELD).map_err(|e| {
                BridgeError::Initialization(format!("wild-type sentinel lookup failed: {e}"))
            })?;
            (version, wild_type)
        };

        info!(version = version.as_str(), "embedded engine started");
        println!("OSPREY {version}");

        self.version = Some(version);
        self.wild_type = Some(wild_type);
        Ok(())
    }

    pub fn is_started(&self) -> bool {
        self.state == RuntimeState::Ready
    }

    /// The engine class namespace, rooted at `edu.duke.cs.osprey`.
    pub fn namespace(&self) -> Result<Namespace<'_, B>, BridgeError> {
        self.ensure_ready()?;
        Ok(Namespace::root(&self.bridge))
    }

    /// Resolves a dotted path relative to the engine root package.
    pub fn resolve(&self, path: &str) -> Result<EngineHandle, BridgeError> {
        self.namespace()?.resolve(path)
    }

    /// The engine's self-reported version string.
    pub fn version(&self) -> Result<&str, BridgeError> {
        self.ensure_ready()?;
        Ok(self.version.as_deref().unwrap_or_default())
    }

    /// The engine's wild-type sentinel: "use the amino acid found in the
    /// original structure".
    pub fn wild_type(&self) -> Result<&EngineHandle, BridgeError> {
        self.ensure_ready()?;
        self.wild_type.as_ref().ok_or(BridgeError::NotInitialized)
    }

    pub(crate) fn bridge(&self) -> &B {
        &self.bridge
    }

    pub(crate) fn ensure_ready(&self) -> Result<(), BridgeError> {
        if self.state == RuntimeState::Ready {
            Ok(())
        } else {
            Err(BridgeError::NotInitialized)
        }
    }
}
