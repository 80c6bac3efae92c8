//! Convenience constructors over the engine: structure loading and strand
//! building.
//!
//! Both are thin pass-throughs. The engine parses the file and owns the
//! resulting molecule; the strand builder is the engine's own, invoked with
//! no extra arguments unless the caller supplies builder options.

use crate::bridge::{Argument, EngineBridge, EngineHandle};
use crate::error::BridgeError;
use crate::namespace;
use crate::runtime::Osprey;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// A value forwarded verbatim to one strand builder option.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl OptionValue {
    fn as_argument(&self) -> Argument<'_> {
        match self {
            OptionValue::Bool(b) => Argument::Bool(*b),
            OptionValue::Int(i) => Argument::Int(*i),
            OptionValue::Float(f) => Argument::Float(*f),
            OptionValue::Str(s) => Argument::Str(s),
        }
    }
}

/// Named strand builder options, applied in map order before `build`.
pub type StrandOptions = BTreeMap<String, OptionValue>;

impl<B: EngineBridge> Osprey<B> {
    /// Asks the engine to parse a molecular structure file.
    ///
    /// Pure pass-through: missing files, unreadable formats and parse
    /// failures surface verbatim as the engine reports them.
    pub fn load_structure<P: AsRef<Path>>(&self, path: P) -> Result<EngineHandle, BridgeError> {
        let ns = self.namespace()?;
        let path = path.as_ref().to_string_lossy();
        debug!(path = %path, "reading structure through the engine");
        ns.invoke(namespace::READ_STRUCTURE_FN, &[Argument::Str(&path)])
    }

    /// Loads a structure file and builds a strand from it with the engine's
    /// default builder settings.
    pub fn make_strand<P: AsRef<Path>>(&self, path: P) -> Result<EngineHandle, BridgeError> {
        self.make_strand_with(path, &StrandOptions::new())
    }

    /// Loads a structure file and builds a strand, forwarding each builder
    /// option to the engine's builder verbatim before `build`.
    pub fn make_strand_with<P: AsRef<Path>>(
        &self,
        path: P,
        options: &StrandOptions,
    ) -> Result<EngineHandle, BridgeError> {
        let molecule = self.load_structure(path)?;
        let ns = self.namespace()?;
        let builder = ns.invoke(namespace::STRAND_BUILDER_FN, &[Argument::Handle(&molecule)])?;
        for (name, value) in options {
            self.bridge()
                .invoke_on(&builder, name, &[value.as_argument()])?;
        }
        self.bridge()
            .invoke_on(&builder, namespace::BUILDER_BUILD_METHOD, &[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::fake::{self, FakeBridge};
    use crate::config::LaunchConfig;
    use crate::error::EngineFault;

    fn started_engine() -> Osprey<FakeBridge> {
        let mut engine = Osprey::new(FakeBridge::engine(), LaunchConfig::default());
        engine.start().unwrap();
        engine.bridge().calls.borrow_mut().clear();
        engine
    }

    #[test]
    fn load_structure_delegates_to_the_engine_reader() {
        let engine = started_engine();

        let molecule = engine.load_structure("1cc8.pdb").unwrap();

        assert_eq!(fake::token(&molecule), "molecule:1cc8.pdb");
        assert_eq!(
            *engine.bridge().calls.borrow(),
            vec!["edu.duke.cs.osprey.structure.PDBIO.readFile(\"1cc8.pdb\")".to_string()]
        );
    }

    #[test]
    fn make_strand_chains_loader_builder_and_build() {
        let engine = started_engine();

        let strand = engine.make_strand("1cc8.pdb").unwrap();

        assert_eq!(
            fake::token(&strand),
            "strand[builder[molecule:1cc8.pdb]]"
        );
        assert_eq!(
            *engine.bridge().calls.borrow(),
            vec![
                "edu.duke.cs.osprey.structure.PDBIO.readFile(\"1cc8.pdb\")".to_string(),
                "edu.duke.cs.osprey.confspace.Strand.builder(molecule:1cc8.pdb)".to_string(),
                "builder[molecule:1cc8.pdb].build()".to_string(),
            ]
        );
    }

    #[test]
    fn builder_options_pass_through_verbatim_in_order() {
        let engine = started_engine();
        let mut options = StrandOptions::new();
        options.insert(
            "setErrorOnNonTemplateResidues".to_string(),
            OptionValue::Bool(true),
        );
        options.insert(
            "setTemplateLibrary".to_string(),
            OptionValue::Str("lovell".to_string()),
        );

        let strand = engine.make_strand_with("1cc8.pdb", &options).unwrap();

        assert_eq!(
            fake::token(&strand),
            "strand[builder[molecule:1cc8.pdb]]"
        );
        assert_eq!(
            *engine.bridge().calls.borrow(),
            vec![
                "edu.duke.cs.osprey.structure.PDBIO.readFile(\"1cc8.pdb\")".to_string(),
                "edu.duke.cs.osprey.confspace.Strand.builder(molecule:1cc8.pdb)".to_string(),
                "builder[molecule:1cc8.pdb].setErrorOnNonTemplateResidues(true)".to_string(),
                "builder[molecule:1cc8.pdb].setTemplateLibrary(\"lovell\")".to_string(),
                "builder[molecule:1cc8.pdb].build()".to_string(),
            ]
        );
    }

    #[test]
    fn engine_errors_surface_verbatim() {
        let fault = EngineFault {
            message: Some("bad structure file".to_string()),
            stacktrace: "at edu.duke.cs.osprey.structure.PDBIO.readFile".to_string(),
        };
        let bridge = FakeBridge::engine()
            .with_fault("edu.duke.cs.osprey.structure.PDBIO.readFile", fault.clone());
        let mut engine = Osprey::new(bridge, LaunchConfig::default());
        engine.start().unwrap();

        let result = engine.load_structure("broken.pdb");

        match result {
            Err(BridgeError::Engine(surfaced)) => assert_eq!(surfaced, fault),
            other => panic!("expected engine fault, got {other:?}"),
        }
    }

    #[test]
    fn strand_operations_before_start_are_rejected() {
        let engine = Osprey::new(FakeBridge::engine(), LaunchConfig::default());

        assert!(matches!(
            engine.load_structure("1cc8.pdb").err(),
            Some(BridgeError::NotInitialized)
        ));
        assert!(matches!(
            engine.make_strand("1cc8.pdb").err(),
            Some(BridgeError::NotInitialized)
        ));
    }
}
