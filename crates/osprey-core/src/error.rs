use thiserror::Error;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("Engine runtime is not initialized; call start() first")]
    NotInitialized,

    #[error("Engine runtime has already been started in this process")]
    AlreadyStarted,

    #[error("Failed to launch embedded runtime: {0}")]
    Launch(String),

    #[error("Failed to register classpath entry '{entry}': {reason}")]
    Classpath { entry: String, reason: String },

    #[error("Initialization failed: {0}")]
    Initialization(String),

    #[error("Symbol not found: no '{segment}' under '{path}'")]
    SymbolNotFound { path: String, segment: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Embedded runtime bridge failure: {0}")]
    Bridge(String),

    #[error(transparent)]
    Engine(#[from] EngineFault),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BridgeError {
    /// Returns the engine-native fault payload, if this error carries one.
    pub fn engine_fault(&self) -> Option<&EngineFault> {
        match self {
            BridgeError::Engine(fault) => Some(fault),
            _ => None,
        }
    }
}

/// An error raised inside the embedded engine, carrying its native report.
///
/// The message is the engine's own exception message (absent when the engine
/// raised without one); the stack trace is the engine-rendered trace text.
/// Both are preserved verbatim so the uncaught-error relay can reprint them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", .message.as_deref().unwrap_or("engine fault with no message"))]
pub struct EngineFault {
    pub message: Option<String>,
    pub stacktrace: String,
}
