//! The seam between this layer and the embedded engine runtime.
//!
//! Everything the rest of the crate knows about the engine goes through the
//! [`EngineBridge`] trait: classpath registration, the one-shot launch, and
//! dotted-path resolution and invocation. Engine values are only ever seen
//! as opaque [`EngineHandle`]s minted by the bridge.

use crate::error::BridgeError;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

#[cfg(test)]
pub(crate) mod fake;
#[cfg(feature = "jvm")]
pub mod jvm;

/// Parameters handed to the embedded runtime at launch, uninterpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaunchOptions {
    pub heap_size_mb: u64,
    pub enable_assertions: bool,
}

/// An opaque reference to a value owned by the embedded engine.
///
/// Handles are minted by a bridge implementation and passed back into engine
/// calls; this layer never inspects or mutates what they refer to.
#[derive(Clone)]
pub struct EngineHandle {
    repr: Arc<dyn Any + Send + Sync>,
}

impl EngineHandle {
    pub fn new<T: Any + Send + Sync>(repr: T) -> Self {
        Self {
            repr: Arc::new(repr),
        }
    }

    /// Recovers the backend representation. Only the bridge implementation
    /// that minted the handle knows the concrete type.
    pub fn downcast_ref<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.repr.downcast_ref()
    }
}

impl fmt::Debug for EngineHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EngineHandle")
    }
}

/// An argument passed through to an engine entry point.
#[derive(Debug, Clone)]
pub enum Argument<'a> {
    Str(&'a str),
    Bool(bool),
    Int(i64),
    Float(f64),
    Handle(&'a EngineHandle),
}

/// Hosts the embedded engine runtime and resolves its class namespace.
///
/// Implementations own the actual binding mechanism (an in-process JVM in
/// production, an in-memory double in tests). Callers must register every
/// classpath entry before `launch`, and launch exactly once before any
/// resolution or invocation.
pub trait EngineBridge {
    /// Registers one classpath entry with the not-yet-launched runtime.
    ///
    /// Entries are consumed in registration order; the bridge must preserve
    /// that order exactly. Entries are not validated here; a missing path
    /// surfaces later as a resolution failure.
    fn register_classpath(&mut self, entry: &str) -> Result<(), BridgeError>;

    /// Starts the embedded runtime. Valid at most once per bridge; the
    /// production runtime cannot be started twice per process.
    fn launch(&mut self, options: &LaunchOptions) -> Result<(), BridgeError>;

    /// Resolves a fully qualified dotted path to an engine class, function
    /// or constant.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::SymbolNotFound`] naming the failing segment
    /// when the path does not resolve, and [`BridgeError::NotInitialized`]
    /// before `launch`.
    fn resolve(&self, path: &str) -> Result<EngineHandle, BridgeError>;

    /// Invokes a static engine entry point identified by a fully qualified
    /// dotted path, returning whatever the engine produced.
    ///
    /// # Errors
    ///
    /// Engine-raised errors surface verbatim as [`BridgeError::Engine`].
    fn invoke(&self, function: &str, args: &[Argument<'_>]) -> Result<EngineHandle, BridgeError>;

    /// Invokes a method on an engine-owned value.
    fn invoke_on(
        &self,
        target: &EngineHandle,
        method: &str,
        args: &[Argument<'_>],
    ) -> Result<EngineHandle, BridgeError>;

    /// Renders an engine value as a host string (used for the version
    /// banner). The engine's own textual representation is used.
    fn render_string(&self, value: &EngineHandle) -> Result<String, BridgeError>;
}
