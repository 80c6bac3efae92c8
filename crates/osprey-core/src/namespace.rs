//! Lazy accessor over the engine's class namespace.
//!
//! Paths are dotted, rooted at [`ROOT_PACKAGE`]. Building a sub-namespace
//! never touches the bridge; only a terminal `resolve` or `invoke` does, so
//! nothing ever walks the engine's full class tree.

use crate::bridge::{Argument, EngineBridge, EngineHandle};
use crate::error::BridgeError;

/// Root package of the engine class tree.
pub const ROOT_PACKAGE: &str = "edu.duke.cs.osprey";

// The engine surface this layer consumes, relative to the root package.
// These identifiers must match the engine binary exactly.
pub(crate) const VERSION_FIELD: &str = "control.Main.Version";
pub(crate) const WILD_TYPE_FIELD: &str = "confspace.Strand.WildType";
pub(crate) const READ_STRUCTURE_FN: &str = "structure.PDBIO.readFile";
pub(crate) const STRAND_BUILDER_FN: &str = "confspace.Strand.builder";
pub(crate) const BUILDER_BUILD_METHOD: &str = "build";

/// A position in the engine namespace, resolving members on demand.
pub struct Namespace<'a, B: EngineBridge> {
    bridge: &'a B,
    path: String,
}

impl<'a, B: EngineBridge> Namespace<'a, B> {
    pub(crate) fn root(bridge: &'a B) -> Self {
        Self {
            bridge,
            path: ROOT_PACKAGE.to_string(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Descends one segment. No bridge traffic happens until a member is
    /// actually resolved or invoked.
    pub fn at(&self, segment: &str) -> Namespace<'a, B> {
        Namespace {
            bridge: self.bridge,
            path: self.qualify(segment),
        }
    }

    /// Joins a relative dotted path onto this namespace's path.
    pub fn qualify(&self, relative: &str) -> String {
        if relative.is_empty() {
            self.path.clone()
        } else {
            format!("{}.{relative}", self.path)
        }
    }

    /// Resolves a class, function or constant under this namespace.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::SymbolNotFound`] identifying the failing
    /// segment when the path does not exist in the engine.
    pub fn resolve(&self, relative: &str) -> Result<EngineHandle, BridgeError> {
        self.bridge.resolve(&self.qualify(relative))
    }

    /// Invokes a static engine entry point under this namespace.
    pub fn invoke(
        &self,
        function: &str,
        args: &[Argument<'_>],
    ) -> Result<EngineHandle, BridgeError> {
        self.bridge.invoke(&self.qualify(function), args)
    }
}
