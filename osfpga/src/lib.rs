//! OSFPGA (Raptor/FOEDAG family) adapter: emits the `.sdc` timing constraints
//! and a `build.tcl` running the full synth-to-bitstream pipeline, then drives
//! the configured executable in batch mode.  The executable name is a
//! constructor argument since the open toolchains ship under several names.

use prjflow_flow::sdc::{self, SdcObject};
use prjflow_flow::{
    Backend, BuildError, BuildOpts, ClockId, Constraints, DesignOutput, Platform, build,
};
use std::fs;

fn emit_sdc(constraints: &Constraints, design: &DesignOutput) -> Result<String, BuildError> {
    let mut lines = sdc::create_clocks(constraints, &design.clock_names, SdcObject::Ports)?;
    lines.push(String::new());
    Ok(lines.join("\n"))
}

fn emit_tcl(name: &str, platform: &dyn Platform) -> String {
    let mut tcl = vec![
        format!("create_design {name}"),
        format!("target_device {}", platform.device().to_uppercase()),
        "add_include_path ./".to_string(),
    ];
    for path in platform.include_paths() {
        tcl.push(format!("add_include_path {path}"));
    }
    for source in platform.sources() {
        tcl.push(format!("add_design_file {}", source.path));
    }
    tcl.push(format!("set_top_module {name}"));
    tcl.push(format!("add_constraint_file {name}.sdc"));
    for step in [
        "synth",
        "packing",
        "place",
        "route",
        "sta",
        "power",
        "bitstream",
    ] {
        tcl.push(step.to_string());
    }
    tcl.push(String::new());
    tcl.join("\n")
}

#[derive(Debug)]
pub struct OsfpgaToolchain {
    tool: String,
    constraints: Constraints,
}

impl OsfpgaToolchain {
    pub fn new(tool: impl Into<String>) -> Self {
        OsfpgaToolchain {
            tool: tool.into(),
            constraints: Constraints::new(),
        }
    }

    pub fn add_period_constraint(
        &mut self,
        clock: ClockId,
        period_ns: f64,
    ) -> Result<(), BuildError> {
        self.constraints.add_period(clock, period_ns)
    }

    pub fn build(
        &mut self,
        platform: &mut dyn Platform,
        opts: &BuildOpts,
    ) -> Result<(), BuildError> {
        build(self, platform, opts)
    }
}

impl Backend for OsfpgaToolchain {
    fn vendor(&self) -> String {
        self.tool.to_uppercase()
    }

    fn tool(&self) -> String {
        self.tool.clone()
    }

    fn run_command(&self, _build_name: &str) -> (String, Vec<String>) {
        (
            self.tool.clone(),
            vec![
                "--batch".to_string(),
                "--script".to_string(),
                "build.tcl".to_string(),
            ],
        )
    }

    fn emit(
        &mut self,
        platform: &dyn Platform,
        design: &DesignOutput,
        name: &str,
    ) -> Result<(), BuildError> {
        fs::write(format!("{name}.sdc"), emit_sdc(&self.constraints, design)?)?;
        fs::write("build.tcl", emit_tcl(name, platform))?;
        Ok(())
    }
}
