//! In-memory engine double used by the unit tests.
//!
//! Symbols are registered under fully qualified dotted paths; every
//! invocation is recorded verbatim so tests can assert exact call sequences
//! against the engine surface.

use super::{Argument, EngineBridge, EngineHandle, LaunchOptions};
use crate::error::{BridgeError, EngineFault};
use std::cell::RefCell;
use std::collections::BTreeMap;

pub(crate) const FAKE_VERSION: &str = "4.0-fake";
pub(crate) const FAKE_WILD_TYPE: &str = "wild-type-sentinel";

const VERSION_PATH: &str = "edu.duke.cs.osprey.control.Main.Version";
const WILD_TYPE_PATH: &str = "edu.duke.cs.osprey.confspace.Strand.WildType";
const READ_FILE_PATH: &str = "edu.duke.cs.osprey.structure.PDBIO.readFile";
const STRAND_BUILDER_PATH: &str = "edu.duke.cs.osprey.confspace.Strand.builder";

/// Fake engine value: a printable token recording how it was produced.
pub(crate) struct Token(pub String);

pub(crate) fn token(handle: &EngineHandle) -> String {
    handle
        .downcast_ref::<Token>()
        .map(|t| t.0.clone())
        .unwrap_or_else(|| "<foreign handle>".to_string())
}

pub(crate) struct FakeBridge {
    pub classpath: Vec<String>,
    pub launched: bool,
    pub launch_calls: usize,
    pub launch_options: Option<LaunchOptions>,
    pub fail_launch: Option<String>,
    pub calls: RefCell<Vec<String>>,
    pub resolve_count: RefCell<usize>,
    symbols: BTreeMap<String, String>,
    faults: BTreeMap<String, EngineFault>,
}

impl FakeBridge {
    /// A fake with the full consumed engine surface registered.
    pub fn engine() -> Self {
        let mut symbols = BTreeMap::new();
        symbols.insert(VERSION_PATH.to_string(), FAKE_VERSION.to_string());
        symbols.insert(WILD_TYPE_PATH.to_string(), FAKE_WILD_TYPE.to_string());
        Self {
            classpath: Vec::new(),
            launched: false,
            launch_calls: 0,
            launch_options: None,
            fail_launch: None,
            calls: RefCell::new(Vec::new()),
            resolve_count: RefCell::new(0),
            symbols,
            faults: BTreeMap::new(),
        }
    }

    /// Removes a symbol, so resolution of it fails.
    pub fn without(mut self, path: &str) -> Self {
        self.symbols.remove(path);
        self
    }

    /// Makes the named function or method raise an engine fault.
    pub fn with_fault(mut self, name: &str, fault: EngineFault) -> Self {
        self.faults.insert(name.to_string(), fault);
        self
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }

    /// First dotted segment of `path` that no registered symbol lives under.
    fn missing_segment(&self, path: &str) -> String {
        let mut prefix = String::new();
        for segment in path.split('.') {
            if prefix.is_empty() {
                prefix.push_str(segment);
            } else {
                prefix.push('.');
                prefix.push_str(segment);
            }
            let covered = self
                .symbols
                .keys()
                .any(|key| key == &prefix || key.starts_with(&format!("{prefix}.")));
            if !covered {
                return segment.to_string();
            }
        }
        path.rsplit('.').next().unwrap_or(path).to_string()
    }
}

fn format_args(args: &[Argument<'_>]) -> String {
    args.iter()
        .map(|arg| match arg {
            Argument::Str(s) => format!("\"{s}\""),
            Argument::Bool(b) => b.to_string(),
            Argument::Int(i) => i.to_string(),
            Argument::Float(f) => f.to_string(),
            Argument::Handle(h) => token(h),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

impl EngineBridge for FakeBridge {
    fn register_classpath(&mut self, entry: &str) -> Result<(), BridgeError> {
        if self.launched {
            return Err(BridgeError::Classpath {
                entry: entry.to_string(),
                reason: "runtime already launched".to_string(),
            });
        }
        self.classpath.push(entry.to_string());
        Ok(())
    }

    fn launch(&mut self, options: &LaunchOptions) -> Result<(), BridgeError> {
        self.launch_calls += 1;
        if self.launched {
            return Err(BridgeError::AlreadyStarted);
        }
        if let Some(reason) = &self.fail_launch {
            return Err(BridgeError::Launch(reason.clone()));
        }
        self.launched = true;
        self.launch_options = Some(*options);
        Ok(())
    }

    fn resolve(&self, path: &str) -> Result<EngineHandle, BridgeError> {
        *self.resolve_count.borrow_mut() += 1;
        if !self.launched {
            return Err(BridgeError::NotInitialized);
        }
        match self.symbols.get(path) {
            Some(value) => Ok(EngineHandle::new(Token(value.clone()))),
            None => Err(BridgeError::SymbolNotFound {
                path: path.to_string(),
                segment: self.missing_segment(path),
            }),
        }
    }

    fn invoke(&self, function: &str, args: &[Argument<'_>]) -> Result<EngineHandle, BridgeError> {
        if !self.launched {
            return Err(BridgeError::NotInitialized);
        }
        self.record(format!("{function}({})", format_args(args)));
        if let Some(fault) = self.faults.get(function) {
            return Err(BridgeError::Engine(fault.clone()));
        }
        match function {
            READ_FILE_PATH => match args {
                [Argument::Str(path)] => Ok(EngineHandle::new(Token(format!("molecule:{path}")))),
                _ => Err(BridgeError::Bridge(format!(
                    "readFile expects one path argument, got {}",
                    args.len()
                ))),
            },
            STRAND_BUILDER_PATH => match args {
                [Argument::Handle(molecule)] => Ok(EngineHandle::new(Token(format!(
                    "builder[{}]",
                    token(molecule)
                )))),
                _ => Err(BridgeError::Bridge(format!(
                    "builder expects one molecule argument, got {}",
                    args.len()
                ))),
            },
            _ => Err(BridgeError::SymbolNotFound {
                path: function.to_string(),
                segment: function.rsplit('.').next().unwrap_or(function).to_string(),
            }),
        }
    }

    fn invoke_on(
        &self,
        target: &EngineHandle,
        method: &str,
        args: &[Argument<'_>],
    ) -> Result<EngineHandle, BridgeError> {
        if !self.launched {
            return Err(BridgeError::NotInitialized);
        }
        let receiver = token(target);
        self.record(format!("{receiver}.{method}({})", format_args(args)));
        if let Some(fault) = self.faults.get(method) {
            return Err(BridgeError::Engine(fault.clone()));
        }
        if method == "build" && receiver.starts_with("builder[") {
            return Ok(EngineHandle::new(Token(format!("strand[{receiver}]"))));
        }
        if receiver.starts_with("builder[") {
            // Builder setters are fluent and hand the builder back.
            return Ok(target.clone());
        }
        Err(BridgeError::SymbolNotFound {
            path: receiver,
            segment: method.to_string(),
        })
    }

    fn render_string(&self, value: &EngineHandle) -> Result<String, BridgeError> {
        Ok(token(value))
    }
}
