use crate::constraints::ClockId;
use thiserror::Error;

/// Everything that can go wrong while driving a vendor toolchain.
///
/// All variants are raised synchronously and propagate to the caller; there
/// is no retry.  Restoring the working directory (via [`crate::BuildDir`])
/// is the only cleanup guaranteed on failure.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The same clock was given two different period constraints.
    #[error("clock {clock} already constrained to {old}ns, new constraint to {new}ns")]
    ConfigurationConflict {
        clock: ClockId,
        old: String,
        new: String,
    },
    /// The vendor executable is not reachable through the configured
    /// toolchain environment or `$PATH`.
    #[error("unable to find {tool}, please:\n- Add the {vendor} toolchain to your $PATH.")]
    ToolchainNotFound { tool: String, vendor: String },
    /// The vendor tool ran and exited with a non-zero status.
    #[error("error occurred during {vendor}'s script execution")]
    ToolchainExecutionFailed { vendor: String },
    /// The target device is not in the adapter's device table.
    #[error("unsupported device {0}")]
    UnsupportedDevice(String),
    /// An IO attribute kind the adapter has no directive syntax for.
    #[error("{vendor} has no syntax for {attr} IO constraints")]
    UnsupportedConstraintType { vendor: String, attr: &'static str },
    /// A failure delegated from the platform: finalization, signal
    /// resolution, or an inconsistent design.
    #[error("design error: {0}")]
    Design(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
