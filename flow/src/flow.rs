use crate::dir::BuildDir;
use crate::error::BuildError;
use crate::io::SourceFile;
use crate::platform::{DesignOutput, Platform};
use prjflow_toolchain::Toolchain;
use std::fs;
use std::path::PathBuf;
use std::process::Stdio;

/// Options common to every vendor build.
#[derive(Debug, Clone)]
pub struct BuildOpts {
    pub build_dir: PathBuf,
    pub build_name: String,
    /// Launch the vendor tool after emitting the files.
    pub run: bool,
    /// Environment override for locating and running the vendor tool;
    /// `None` uses the ambient `$PATH`.
    pub toolchain: Option<Toolchain>,
}

impl Default for BuildOpts {
    fn default() -> Self {
        BuildOpts {
            build_dir: "build".into(),
            build_name: "top".into(),
            run: false,
            toolchain: None,
        }
    }
}

/// One vendor adapter, as seen by the shared build driver.
pub trait Backend {
    /// Vendor name used in error messages.
    fn vendor(&self) -> String;

    /// Executable that must be discoverable before a run is attempted.
    fn tool(&self) -> String;

    /// Program and arguments of the actual invocation.  Usually the checked
    /// executable plus the generated script; QuickLogic goes through `make`.
    fn run_command(&self, build_name: &str) -> (String, Vec<String>);

    /// Writes the vendor's constraint and script files into the current
    /// (build) directory: IO, then floorplan where applicable, then timing,
    /// then the project/build script.
    fn emit(
        &mut self,
        platform: &dyn Platform,
        design: &DesignOutput,
        build_name: &str,
    ) -> Result<(), BuildError>;
}

/// Runs one build: finalize the design, serialize it, emit the vendor files,
/// and optionally launch the vendor tool.  The working directory is restored
/// on every exit path.
pub fn build(
    backend: &mut dyn Backend,
    platform: &mut dyn Platform,
    opts: &BuildOpts,
) -> Result<(), BuildError> {
    let _dir = BuildDir::enter(&opts.build_dir)?;

    platform.finalize()?;

    let design = platform.emit_design(&opts.build_name)?;
    let hdl_file = format!("{}.v", opts.build_name);
    fs::write(&hdl_file, &design.hdl)?;
    platform.add_source(SourceFile::verilog(hdl_file));

    backend.emit(platform, &design, &opts.build_name)?;

    if opts.run {
        run_tool(backend, opts)?;
    }
    Ok(())
}

fn run_tool(backend: &dyn Backend, opts: &BuildOpts) -> Result<(), BuildError> {
    let tc = opts.toolchain.clone().unwrap_or_default();
    let tool = backend.tool();
    if tc.locate(&tool).is_none() {
        return Err(BuildError::ToolchainNotFound {
            tool,
            vendor: backend.vendor(),
        });
    }
    let (program, args) = backend.run_command(&opts.build_name);
    let mut cmd = tc.command(&program);
    cmd.args(&args);
    cmd.stdin(Stdio::null());
    let status = cmd.status()?;
    if !status.success() {
        return Err(BuildError::ToolchainExecutionFailed {
            vendor: backend.vendor(),
        });
    }
    Ok(())
}
