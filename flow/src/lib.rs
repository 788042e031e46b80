//! Shared core of the prjflow build drivers: constraint bookkeeping, the
//! platform collaborator boundary, SDC text helpers, and the build
//! orchestrator every vendor adapter runs through.

pub mod constraints;
pub mod dir;
pub mod error;
pub mod flow;
pub mod io;
pub mod platform;
pub mod sdc;

pub use constraints::{ClockId, Constraints, format_ns, period_to_ps};
pub use dir::BuildDir;
pub use error::BuildError;
pub use flow::{Backend, BuildOpts, build};
pub use io::{HdlLang, IndexStyle, IoAttr, PinAssignment, SourceFile, expand_bus};
pub use platform::{DesignOutput, Platform};
pub use prjflow_toolchain::Toolchain;
