//! QuickLogic Symbiflow adapter: emits the `.pcf` IO constraints and a
//! Makefile wrapping `ql_symbiflow`, then drives it through `make`.  Timing
//! constraints go into an `.sdc` passed with `-s` when any clock is
//! constrained.

use prjflow_flow::sdc::{self, SdcObject};
use prjflow_flow::{
    Backend, BuildError, BuildOpts, ClockId, Constraints, DesignOutput, IndexStyle, Platform,
    build, expand_bus,
};
use std::fmt::Write;
use std::fs;

fn part_for(device: &str) -> Result<&'static str, BuildError> {
    match device {
        "ql-eos-s3" => Ok("PU64"),
        _ => Err(BuildError::UnsupportedDevice(device.to_string())),
    }
}

fn emit_pcf(design: &DesignOutput) -> String {
    let mut pcf = String::new();
    for sc in &design.pins {
        // pin attributes have no .pcf syntax and are dropped here
        for (name, pin) in expand_bus(sc, IndexStyle::Parens) {
            writeln!(pcf, "set_io {name} {pin}").unwrap();
        }
    }
    for line in &design.raw_io {
        pcf.push_str(line);
        pcf.push('\n');
    }
    pcf
}

fn emit_sdc(constraints: &Constraints, design: &DesignOutput) -> Result<String, BuildError> {
    let mut lines = sdc::create_clocks(constraints, &design.clock_names, SdcObject::Ports)?;
    lines.extend(sdc::async_clock_groups(constraints, &design.clock_names)?);
    lines.push(String::new());
    Ok(lines.join("\n"))
}

fn emit_makefile(name: &str, device: &str, with_sdc: bool) -> Result<String, BuildError> {
    let part = part_for(device)?;
    let mut compile = format!(
        "\tql_symbiflow -compile -d {device} -P {part} -v {name}.v -t {name} -p {name}.pcf"
    );
    if with_sdc {
        write!(compile, " -s {name}.sdc").unwrap();
    }
    let makefile = [
        "mkfile_path := $(abspath $(lastword $(MAKEFILE_LIST)))".to_string(),
        "current_dir := $(patsubst %/,%,$(dir $(mkfile_path)))".to_string(),
        format!("TOP_F={name}"),
        format!("all: {name}_bit.h {name}.bin build/{name}.bit"),
        format!("build/{name}.bit:"),
        compile,
        format!("{name}_bit.h: build/{name}.bit"),
        "\t(cd build; TOP_F=$(TOP_F) symbiflow_write_bitheader)".to_string(),
        format!("{name}.bin: build/{name}.bit"),
        "\t(cd build; TOP_F=$(TOP_F) symbiflow_write_binary)".to_string(),
        String::new(),
    ];
    Ok(makefile.join("\n"))
}

#[derive(Debug, Default)]
pub struct SymbiflowToolchain {
    constraints: Constraints,
}

impl SymbiflowToolchain {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn add_period_constraint(
        &mut self,
        clock: ClockId,
        period_ns: f64,
    ) -> Result<(), BuildError> {
        self.constraints.add_period(clock, period_ns)
    }

    pub fn add_false_path_constraint(&mut self, from: ClockId, to: ClockId) {
        self.constraints.add_false_path(from, to);
    }

    pub fn build(
        &mut self,
        platform: &mut dyn Platform,
        opts: &BuildOpts,
    ) -> Result<(), BuildError> {
        build(self, platform, opts)
    }
}

impl Backend for SymbiflowToolchain {
    fn vendor(&self) -> String {
        "QuickLogic Symbiflow".to_string()
    }

    fn tool(&self) -> String {
        "ql_symbiflow".to_string()
    }

    fn run_command(&self, _build_name: &str) -> (String, Vec<String>) {
        ("make".to_string(), vec!["-j1".to_string()])
    }

    fn emit(
        &mut self,
        platform: &dyn Platform,
        design: &DesignOutput,
        name: &str,
    ) -> Result<(), BuildError> {
        fs::write(format!("{name}.pcf"), emit_pcf(design))?;
        let with_sdc = !self.constraints.is_empty();
        if with_sdc {
            fs::write(format!("{name}.sdc"), emit_sdc(&self.constraints, design)?)?;
        }
        fs::write(
            "Makefile",
            emit_makefile(name, platform.device(), with_sdc)?,
        )?;
        Ok(())
    }
}
