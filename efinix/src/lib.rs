//! Efinix PLL configuration helper.  Builds the interface-block record the
//! Efinity toolchain consumes for a Trion or Titanium PLL and the matching
//! `create_clock` SDC commands for the generated outputs.

use prjflow_flow::{BuildError, format_ns, period_to_ps};
use serde::Serialize;

/// The two PLL generations; they differ in block type and output count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PllVersion {
    Trion,
    Titanium,
}

impl PllVersion {
    pub fn block_type(self) -> &'static str {
        match self {
            PllVersion::Trion => "TRIONPLL",
            PllVersion::Titanium => "TITANIUMPLL",
        }
    }

    pub fn max_outputs(self) -> usize {
        match self {
            PllVersion::Trion => 3,
            PllVersion::Titanium => 5,
        }
    }

    fn tag(self) -> &'static str {
        match self {
            PllVersion::Trion => "V1_V2",
            PllVersion::Titanium => "V3",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "input_clock")]
enum ClockInput {
    #[serde(rename = "EXTERNAL")]
    External {
        input_clock_name: String,
        input_clock_pad: String,
    },
    #[serde(rename = "INTERNAL")]
    Internal { input_signal: String },
}

/// One generated clock output.
#[derive(Debug, Clone, Serialize)]
pub struct PllOutput {
    pub name: String,
    pub freq: f64,
    pub phase: f64,
    pub margin: f64,
}

/// The serialized interface-block record.
#[derive(Debug, Clone, Serialize)]
pub struct PllBlock {
    #[serde(rename = "type")]
    pub block_type: &'static str,
    pub name: String,
    pub version: &'static str,
    #[serde(flatten)]
    input: ClockInput,
    pub input_freq: f64,
    pub clk_out: Vec<PllOutput>,
    pub locked: String,
    pub rstn: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<String>,
}

#[derive(Debug)]
pub struct EfinixPll {
    version: PllVersion,
    name: String,
    input: Option<(ClockInput, f64)>,
    outputs: Vec<PllOutput>,
    extra: Option<String>,
}

impl EfinixPll {
    pub fn new(version: PllVersion, n: u32) -> Self {
        EfinixPll {
            version,
            name: format!("pll{n}"),
            input: None,
            outputs: vec![],
            extra: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Interface signal carrying the lock indication.
    pub fn locked_signal(&self) -> String {
        format!("{}_locked", self.name)
    }

    /// Interface signal driving the PLL's active-low reset.
    pub fn rstn_signal(&self) -> String {
        format!("{}_rstn", self.name)
    }

    /// Feeds the PLL from an external pad.
    pub fn register_clkin_external(
        &mut self,
        clock_name: impl Into<String>,
        pad: impl Into<String>,
        freq: f64,
    ) {
        self.input = Some((
            ClockInput::External {
                input_clock_name: clock_name.into(),
                input_clock_pad: pad.into(),
            },
            freq,
        ));
    }

    /// Feeds the PLL from an internal signal.
    pub fn register_clkin_internal(&mut self, signal: impl Into<String>, freq: f64) {
        self.input = Some((
            ClockInput::Internal {
                input_signal: signal.into(),
            },
            freq,
        ));
    }

    /// Adds a clock output and returns its resolved name (an empty `name`
    /// picks `<pll>_clkoutN`).  Fails once the version's output budget is
    /// spent.
    pub fn create_clkout(
        &mut self,
        name: &str,
        freq: f64,
        phase: f64,
        margin: f64,
    ) -> Result<String, BuildError> {
        if self.outputs.len() >= self.version.max_outputs() {
            return Err(BuildError::Design(format!(
                "{}: all {} clock outputs in use",
                self.name,
                self.version.max_outputs()
            )));
        }
        let name = if name.is_empty() {
            format!("{}_clkout{}", self.name, self.outputs.len())
        } else {
            name.to_string()
        };
        self.outputs.push(PllOutput {
            name: name.clone(),
            freq,
            phase,
            margin,
        });
        Ok(name)
    }

    /// Free-form option string passed through to the interface block.
    pub fn extra(&mut self, extra: impl Into<String>) {
        self.extra = Some(extra.into());
    }

    /// One `create_clock` per generated output, in creation order.
    pub fn sdc_commands(&self) -> Vec<String> {
        self.outputs
            .iter()
            .map(|out| {
                format!(
                    "create_clock -period {period} {name}",
                    period = format_ns(period_to_ps(1e9 / out.freq)),
                    name = out.name,
                )
            })
            .collect()
    }

    /// The interface-block record; a clock input must have been registered.
    pub fn block(&self) -> Result<PllBlock, BuildError> {
        let (input, input_freq) = self
            .input
            .clone()
            .ok_or_else(|| BuildError::Design(format!("{}: no clock input registered", self.name)))?;
        Ok(PllBlock {
            block_type: self.version.block_type(),
            name: self.name.clone(),
            version: self.version.tag(),
            input,
            input_freq,
            clk_out: self.outputs.clone(),
            locked: self.locked_signal(),
            rstn: self.rstn_signal(),
            extra: self.extra.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_budget_is_enforced() {
        let mut pll = EfinixPll::new(PllVersion::Trion, 0);
        pll.register_clkin_external("clk25", "P1", 25e6);
        for i in 0..3 {
            pll.create_clkout("", 100e6, 0.0, 0.0)
                .unwrap_or_else(|_| panic!("output {i} rejected"));
        }
        assert!(matches!(
            pll.create_clkout("", 100e6, 0.0, 0.0),
            Err(BuildError::Design(_))
        ));

        let mut pll = EfinixPll::new(PllVersion::Titanium, 1);
        pll.register_clkin_internal("clk_int", 50e6);
        for _ in 0..5 {
            pll.create_clkout("", 100e6, 0.0, 0.0).unwrap();
        }
        assert!(pll.create_clkout("", 100e6, 0.0, 0.0).is_err());
    }

    #[test]
    fn output_names_and_sdc() {
        let mut pll = EfinixPll::new(PllVersion::Trion, 0);
        pll.register_clkin_external("clk25", "P1", 25e6);
        let sys = pll.create_clkout("sys_clk", 100e6, 0.0, 0.0).unwrap();
        let aux = pll.create_clkout("", 133e6, 90.0, 0.0).unwrap();
        assert_eq!(sys, "sys_clk");
        assert_eq!(aux, "pll0_clkout1");
        assert_eq!(
            pll.sdc_commands(),
            vec![
                "create_clock -period 10.0 sys_clk",
                "create_clock -period 7.518 pll0_clkout1",
            ]
        );
    }

    #[test]
    fn block_requires_clkin() {
        let pll = EfinixPll::new(PllVersion::Trion, 2);
        assert!(matches!(pll.block(), Err(BuildError::Design(_))));

        let mut pll = EfinixPll::new(PllVersion::Titanium, 2);
        pll.register_clkin_internal("clk_int", 50e6);
        pll.extra("CLKOUT0_DIV=2");
        let block = pll.block().unwrap();
        assert_eq!(block.block_type, "TITANIUMPLL");
        assert_eq!(block.version, "V3");
        assert_eq!(block.name, "pll2");
        assert_eq!(block.locked, "pll2_locked");
        assert_eq!(block.rstn, "pll2_rstn");
        assert_eq!(block.extra.as_deref(), Some("CLKOUT0_DIV=2"));
    }
}
