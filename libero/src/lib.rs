//! Microsemi Libero SoC (PolarFire) adapter: emits `_io.pdc` and `_fp.pdc`
//! constraint files, the `.sdc` timing constraints, the project `.tcl` and a
//! shell wrapper, then drives the `libero` executable.

use prjflow_flow::sdc::{self, SdcObject};
use prjflow_flow::{
    Backend, BuildError, BuildOpts, ClockId, Constraints, DesignOutput, IndexStyle, IoAttr,
    Platform, SourceFile, build, expand_bus,
};
use std::fmt::Write;
use std::fs;
use std::path::Path;

const FAMILY: &str = "PolarFire";

fn tcl_name(name: &str) -> String {
    format!("{{{name}}}")
}

struct DevInfo {
    die: String,
    package: String,
    speed: String,
}

fn parse_device(device: &str) -> Result<DevInfo, BuildError> {
    match device.split('-').collect::<Vec<_>>()[..] {
        [die, package, speed] => Ok(DevInfo {
            die: die.to_string(),
            package: package.to_string(),
            speed: speed.to_string(),
        }),
        _ => Err(BuildError::UnsupportedDevice(device.to_string())),
    }
}

fn fmt_io_attr(attr: &IoAttr) -> Result<String, BuildError> {
    Ok(match attr {
        IoAttr::IoStandard(std) => format!("-io_std {std}"),
        IoAttr::Pull(pull) => format!("-RES_PULL {pull}"),
        IoAttr::Misc(misc) => format!("-{misc}"),
        IoAttr::Drive(_) | IoAttr::SlewRate(_) => {
            return Err(BuildError::UnsupportedConstraintType {
                vendor: "Libero".to_string(),
                attr: attr.kind(),
            });
        }
    })
}

fn emit_io_pdc(design: &DesignOutput, additional: &[String]) -> Result<String, BuildError> {
    let mut pdc = String::new();
    for sc in &design.pins {
        for (name, pin) in expand_bus(sc, IndexStyle::Brackets) {
            write!(
                pdc,
                "set_io -port_name {port} -pin_name {pin}",
                port = tcl_name(&name)
            )
            .unwrap();
            for attr in &sc.attrs {
                write!(pdc, " {}", fmt_io_attr(attr)?).unwrap();
            }
            writeln!(pdc, " -fixed true").unwrap();
        }
    }
    for line in design.raw_io.iter().chain(additional) {
        pdc.push_str(line);
        pdc.push('\n');
    }
    Ok(pdc)
}

fn emit_fp_pdc(additional: &[String]) -> String {
    let mut pdc = additional.join("\n");
    if !pdc.is_empty() {
        pdc.push('\n');
    }
    pdc
}

fn emit_sdc(
    constraints: &Constraints,
    design: &DesignOutput,
    additional: &[String],
) -> Result<String, BuildError> {
    let mut lines = sdc::create_clocks(constraints, &design.clock_names, SdcObject::Nets)?;
    lines.extend(sdc::async_clock_groups(constraints, &design.clock_names)?);
    lines.extend(additional.iter().cloned());
    lines.push(String::new());
    Ok(lines.join("\n"))
}

fn emit_tcl(name: &str, dev: &DevInfo, sources: &[SourceFile]) -> String {
    let mut tcl = vec![
        format!(
            "new_project -location {{./impl}} -name {name_tcl} -project_description {{}} \
             -block_mode 0 -standalone_peripheral_initialization 0 \
             -instantiate_in_smartdesign 1 -ondemand_build_dh 0 \
             -use_enhanced_constraint_flow 1 -hdl {{VERILOG}} -family {{{FAMILY}}} \
             -die {{}} -package {{}} -speed {{}} -die_voltage {{}} -part_range {{}} \
             -adv_options {{}}",
            name_tcl = tcl_name(name),
        ),
        format!(
            "set_device -family {{{FAMILY}}} -die {die} -package {package} -speed {speed} \
             -die_voltage {{1.0}} -part_range {{EXT}} \
             -adv_options {{IO_DEFT_STD:LVCMOS 1.8V}} \
             -adv_options {{RESTRICTPROBEPINS:1}} \
             -adv_options {{RESTRICTSPIPINS:0}} \
             -adv_options {{TEMPR:EXT}} \
             -adv_options {{UNUSED_MSS_IO_RESISTOR_PULL:None}} \
             -adv_options {{VCCI_1.2_VOLTR:EXT}} \
             -adv_options {{VCCI_1.5_VOLTR:EXT}} \
             -adv_options {{VCCI_1.8_VOLTR:EXT}} \
             -adv_options {{VCCI_2.5_VOLTR:EXT}} \
             -adv_options {{VCCI_3.3_VOLTR:EXT}} \
             -adv_options {{VOLTR:EXT}}",
            die = tcl_name(&dev.die),
            package = tcl_name(&dev.package),
            speed = tcl_name(&format!("-{}", dev.speed)),
        ),
    ];
    for source in sources {
        tcl.push(format!("import_files -hdl_source {}", tcl_name(&source.path)));
    }
    tcl.push(format!("set_root -module {}", tcl_name(name)));
    tcl.push(format!(
        "import_files -io_pdc {}",
        tcl_name(&format!("{name}_io.pdc"))
    ));
    tcl.push(format!(
        "import_files -fp_pdc {}",
        tcl_name(&format!("{name}_fp.pdc"))
    ));
    tcl.push(format!(
        "import_files -convert_EDN_to_HDL 0 -sdc {}",
        tcl_name(&format!("{name}.sdc"))
    ));
    tcl.push(format!(
        "organize_tool_files -tool {{SYNTHESIZE}} -file impl/constraint/{name}.sdc \
         -module {name} -input_type {{constraint}}"
    ));
    tcl.push(format!(
        "organize_tool_files -tool {{PLACEROUTE}} -file impl/constraint/io/{name}_io.pdc \
         -file impl/constraint/fp/{name}_fp.pdc -file impl/constraint/{name}.sdc \
         -module {name} -input_type {{constraint}}"
    ));
    tcl.push(format!(
        "organize_tool_files -tool {{VERIFYTIMING}} -file impl/constraint/{name}.sdc \
         -module {name} -input_type {{constraint}}"
    ));
    for tool in [
        "CONSTRAINT_MANAGEMENT",
        "SYNTHESIZE",
        "PLACEROUTE",
        "GENERATEPROGRAMMINGDATA",
        "GENERATEPROGRAMMINGFILE",
    ] {
        tcl.push(format!("run_tool -name {{{tool}}}"));
    }
    tcl.push(String::new());
    tcl.join("\n")
}

fn emit_script(name: &str) -> String {
    format!("#!/bin/sh\nlibero SCRIPT:{name}.tcl || exit 1\n")
}

#[derive(Debug, Default)]
pub struct LiberoToolchain {
    constraints: Constraints,
    pub additional_io_constraints: Vec<String>,
    pub additional_fp_constraints: Vec<String>,
    pub additional_timing_constraints: Vec<String>,
}

impl LiberoToolchain {
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

impl Backend for LiberoToolchain {
    fn vendor(&self) -> String {
        "Microsemi Libero".to_string()
    }

    fn tool(&self) -> String {
        "libero".to_string()
    }

    fn run_command(&self, build_name: &str) -> (String, Vec<String>) {
        ("libero".to_string(), vec![format!("SCRIPT:{build_name}.tcl")])
    }

    fn emit(
        &mut self,
        platform: &dyn Platform,
        design: &DesignOutput,
        name: &str,
    ) -> Result<(), BuildError> {
        // stale project state from a previous run confuses Libero
        if Path::new("impl").exists() {
            fs::remove_dir_all("impl")?;
        }
        fs::write(
            format!("{name}_io.pdc"),
            emit_io_pdc(design, &self.additional_io_constraints)?,
        )?;
        fs::write(
            format!("{name}_fp.pdc"),
            emit_fp_pdc(&self.additional_fp_constraints),
        )?;
        fs::write(
            format!("{name}.sdc"),
            emit_sdc(&self.constraints, design, &self.additional_timing_constraints)?,
        )?;
        let dev = parse_device(platform.device())?;
        fs::write(format!("{name}.tcl"), emit_tcl(name, &dev, platform.sources()))?;
        fs::write(format!("build_{name}.sh"), emit_script(name))?;
        Ok(())
    }
}
