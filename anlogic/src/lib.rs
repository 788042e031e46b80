//! Anlogic Tang Dynasty adapter: emits `.adc` IO constraints, `.sdc` timing
//! constraints, the `.al` XML project file and the `run.tcl` build script,
//! then drives the `td` executable.

use prjflow_flow::sdc::{self, SdcObject};
use prjflow_flow::{
    Backend, BuildError, BuildOpts, ClockId, Constraints, DesignOutput, IndexStyle, IoAttr,
    Platform, SourceFile, build, expand_bus,
};
use std::fmt::Write;
use std::fs;

const TD_VERSION: &str = "5.0.28716";
// Fixed stamp so that project files are byte-identical across runs.
const PROJECT_STAMP: &str = "2022-01-01 00:00:00";

struct DevInfo {
    architecture: &'static str,
    family: &'static str,
    package: &'static str,
}

fn parse_device(device: &str) -> Result<DevInfo, BuildError> {
    Ok(match device {
        "EG4S20BG256" => DevInfo {
            architecture: "eagle_s20",
            family: "EG4",
            package: "BG256",
        },
        _ => return Err(BuildError::UnsupportedDevice(device.to_string())),
    })
}

fn emit_adc(design: &DesignOutput) -> String {
    let mut adc = String::new();
    for sc in &design.pins {
        for (name, pin) in expand_bus(sc, IndexStyle::Brackets) {
            write!(adc, "set_pin_assignment {{{name}}} {{ LOCATION = {pin};").unwrap();
            for attr in &sc.attrs {
                // only the IO standard has .adc syntax; the rest is left to
                // the tool's defaults
                if let IoAttr::IoStandard(std) = attr {
                    write!(adc, " IOSTANDARD = {std};").unwrap();
                }
            }
            writeln!(adc, " }}").unwrap();
        }
    }
    for line in &design.raw_io {
        adc.push_str(line);
        adc.push('\n');
    }
    adc
}

fn emit_sdc(constraints: &Constraints, design: &DesignOutput) -> Result<String, BuildError> {
    let mut lines = sdc::create_clocks(constraints, &design.clock_names, SdcObject::Ports)?;
    lines.extend(sdc::async_clock_groups(constraints, &design.clock_names)?);
    lines.push(String::new());
    Ok(lines.join("\n"))
}

fn file_info(xml: &mut String, belong_to: &str, compile_order: u32) {
    writeln!(xml, "            <FileInfo>").unwrap();
    writeln!(xml, "                <Attr Name=\"UsedInSyn\" Val=\"true\"/>").unwrap();
    writeln!(xml, "                <Attr Name=\"UsedInP&R\" Val=\"true\"/>").unwrap();
    writeln!(
        xml,
        "                <Attr Name=\"BelongTo\" Val=\"{belong_to}\"/>"
    )
    .unwrap();
    writeln!(
        xml,
        "                <Attr Name=\"CompileOrder\" Val=\"{compile_order}\"/>"
    )
    .unwrap();
    writeln!(xml, "            </FileInfo>").unwrap();
}

fn emit_al(name: &str, dev: &DevInfo, device: &str, sources: &[SourceFile]) -> String {
    let mut xml = String::new();
    writeln!(xml, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>").unwrap();
    writeln!(xml, "<Project Version=\"1\" Path=\"...\">").unwrap();
    writeln!(
        xml,
        "    <Project_Created_Time>{PROJECT_STAMP}</Project_Created_Time>"
    )
    .unwrap();
    writeln!(xml, "    <TD_Version>{TD_VERSION}</TD_Version>").unwrap();
    writeln!(xml, "    <UCode>00000000</UCode>").unwrap();
    writeln!(xml, "    <Name>{name}</Name>").unwrap();
    writeln!(xml, "    <HardWare>").unwrap();
    writeln!(xml, "        <Family>{family}</Family>", family = dev.family).unwrap();
    writeln!(xml, "        <Device>{device}</Device>").unwrap();
    writeln!(xml, "    </HardWare>").unwrap();
    writeln!(xml, "    <Source_Files>").unwrap();
    writeln!(xml, "        <Verilog>").unwrap();
    for source in sources {
        writeln!(xml, "        <File Path=\"{path}\">", path = source.path).unwrap();
        file_info(&mut xml, "design_1", 1);
        writeln!(xml, "        </File>").unwrap();
    }
    writeln!(xml, "        </Verilog>").unwrap();
    writeln!(xml, "        <ADC_FILE>").unwrap();
    writeln!(xml, "        <File Path=\"{name}.adc\">").unwrap();
    file_info(&mut xml, "constrain_1", 1);
    writeln!(xml, "        </File>").unwrap();
    writeln!(xml, "        </ADC_FILE>").unwrap();
    writeln!(xml, "        <SDC_FILE>").unwrap();
    writeln!(xml, "        <File Path=\"{name}.sdc\">").unwrap();
    file_info(&mut xml, "constrain_1", 2);
    writeln!(xml, "        </File>").unwrap();
    writeln!(xml, "        </SDC_FILE>").unwrap();
    writeln!(xml, "    </Source_Files>").unwrap();
    writeln!(xml, "    <FileSets>").unwrap();
    writeln!(
        xml,
        "        <FileSet Name=\"constrain_1\" Type=\"ConstrainFiles\">"
    )
    .unwrap();
    writeln!(xml, "        </FileSet>").unwrap();
    writeln!(
        xml,
        "        <FileSet Name=\"design_1\" Type=\"DesignFiles\">"
    )
    .unwrap();
    writeln!(xml, "        </FileSet>").unwrap();
    writeln!(xml, "    </FileSets>").unwrap();
    writeln!(xml, "    <TOP_MODULE>").unwrap();
    writeln!(xml, "        <LABEL></LABEL>").unwrap();
    writeln!(xml, "        <MODULE>{name}</MODULE>").unwrap();
    writeln!(xml, "        <CREATEINDEX>auto</CREATEINDEX>").unwrap();
    writeln!(xml, "    </TOP_MODULE>").unwrap();
    writeln!(xml, "    <Property>").unwrap();
    writeln!(xml, "    </Property>").unwrap();
    writeln!(xml, "    <Device_Settings>").unwrap();
    writeln!(xml, "    </Device_Settings>").unwrap();
    writeln!(xml, "    <Configurations>").unwrap();
    writeln!(xml, "    </Configurations>").unwrap();
    writeln!(xml, "    <Project_Settings>").unwrap();
    writeln!(
        xml,
        "        <Step_Last_Change>{PROJECT_STAMP}</Step_Last_Change>"
    )
    .unwrap();
    writeln!(xml, "        <Current_Step>0</Current_Step>").unwrap();
    writeln!(xml, "        <Step_Status>true</Step_Status>").unwrap();
    writeln!(xml, "    </Project_Settings>").unwrap();
    writeln!(xml, "</Project>").unwrap();
    xml
}

fn emit_tcl(name: &str, dev: &DevInfo) -> String {
    let mut tcl = String::new();
    writeln!(
        tcl,
        "import_device {arch}.db -package {pkg}",
        arch = dev.architecture,
        pkg = dev.package
    )
    .unwrap();
    writeln!(tcl, "open_project {name}.al").unwrap();
    writeln!(tcl, "elaborate -top {name}").unwrap();
    writeln!(tcl, "read_adc {name}.adc").unwrap();
    writeln!(tcl, "optimize_rtl").unwrap();
    writeln!(tcl, "read_sdc {name}.sdc").unwrap();
    writeln!(tcl, "optimize_gate").unwrap();
    writeln!(tcl, "legalize_phy_inst").unwrap();
    writeln!(tcl, "place").unwrap();
    writeln!(tcl, "route").unwrap();
    writeln!(
        tcl,
        "bitgen -bit \"{name}.bit\" -version 0X00 -g ucode:000000000000000000000000"
    )
    .unwrap();
    tcl
}

#[derive(Debug, Default)]
pub struct TangDynastyToolchain {
    constraints: Constraints,
}

impl TangDynastyToolchain {
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

impl Backend for TangDynastyToolchain {
    fn vendor(&self) -> String {
        "Tang Dynasty".to_string()
    }

    fn tool(&self) -> String {
        "td".to_string()
    }

    fn run_command(&self, _build_name: &str) -> (String, Vec<String>) {
        ("td".to_string(), vec!["run.tcl".to_string()])
    }

    fn emit(
        &mut self,
        platform: &dyn Platform,
        design: &DesignOutput,
        name: &str,
    ) -> Result<(), BuildError> {
        fs::write(format!("{name}.adc"), emit_adc(design))?;
        fs::write(
            format!("{name}.sdc"),
            emit_sdc(&self.constraints, design)?,
        )?;
        let dev = parse_device(platform.device())?;
        fs::write(
            format!("{name}.al"),
            emit_al(name, &dev, platform.device(), platform.sources()),
        )?;
        fs::write("run.tcl", emit_tcl(name, &dev))?;
        Ok(())
    }
}
