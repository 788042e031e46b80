use crate::constraints::ClockId;
use crate::error::BuildError;
use crate::io::{PinAssignment, SourceFile};
use std::collections::BTreeMap;

/// Tables handed over by the platform once the design has been serialized:
/// the hardware-description text itself plus the resolved name tables the
/// constraint emitters consume.
#[derive(Debug, Clone, Default)]
pub struct DesignOutput {
    /// Serialized hardware description (written to `<name>.v` by the flow).
    pub hdl: String,
    /// Resolved signal/pin/attribute tuples, in resolution order.
    pub pins: Vec<PinAssignment>,
    /// Raw pass-through IO constraint lines the platform wants appended.
    pub raw_io: Vec<String>,
    /// Port name of every constrainable clock.
    pub clock_names: BTreeMap<ClockId, String>,
}

/// The external collaborator owning the logic design.  Elaboration, signal
/// resolution, and HDL generation happen behind this boundary; the flow only
/// sequences the calls and consumes the resulting tables.
pub trait Platform {
    /// Target device identifier (family/package/speed encoding is
    /// vendor-specific).
    fn device(&self) -> &str;

    /// Finalizes the logic design.  Fails if the design is already finalized
    /// or malformed.
    fn finalize(&mut self) -> Result<(), BuildError>;

    /// Serializes the finalized design under the given top-level name and
    /// resolves the pin/clock name tables.
    fn emit_design(&mut self, name: &str) -> Result<DesignOutput, BuildError>;

    /// Ordered list of registered source files.
    fn sources(&self) -> &[SourceFile];

    /// Appends to the source list (the flow registers the generated HDL
    /// file through this).
    fn add_source(&mut self, source: SourceFile);

    /// Extra include directories for source-level `include` resolution.
    fn include_paths(&self) -> Vec<String> {
        Vec::new()
    }
}
