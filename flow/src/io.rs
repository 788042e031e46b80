/// Electrical attribute attached to a pin assignment.  A closed set: each
/// vendor emitter formats the kinds it has directive syntax for and rejects
/// or skips the rest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IoAttr {
    IoStandard(String),
    Pull(String),
    Drive(String),
    SlewRate(String),
    Misc(String),
}

impl IoAttr {
    pub fn kind(&self) -> &'static str {
        match self {
            IoAttr::IoStandard(_) => "IO standard",
            IoAttr::Pull(_) => "pull resistor",
            IoAttr::Drive(_) => "drive strength",
            IoAttr::SlewRate(_) => "slew rate",
            IoAttr::Misc(_) => "misc",
        }
    }
}

/// One resolved signal-to-pin binding produced by the platform's signal
/// resolution.  Multi-bit signals keep their pins in bit order and are
/// expanded at emission time.
#[derive(Debug, Clone)]
pub struct PinAssignment {
    pub name: String,
    pub pins: Vec<String>,
    pub attrs: Vec<IoAttr>,
}

/// How a vendor dialect spells bit indices in expanded bus names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexStyle {
    /// `sig[0]` — Anlogic ADC, Libero PDC.
    Brackets,
    /// `sig(0)` — QuickLogic PCF.
    Parens,
}

impl IndexStyle {
    fn apply(self, name: &str, idx: usize) -> String {
        match self {
            IndexStyle::Brackets => format!("{name}[{idx}]"),
            IndexStyle::Parens => format!("{name}({idx})"),
        }
    }
}

/// Expands a pin assignment into one `(name, pin)` entry per bit.  Single-bit
/// signals keep their plain name; wider ones get one indexed entry per pin,
/// each carrying the parent's full attribute set (the attributes live on the
/// [`PinAssignment`] itself).  An assignment without pins expands to nothing.
pub fn expand_bus(sc: &PinAssignment, style: IndexStyle) -> Vec<(String, &str)> {
    match sc.pins.as_slice() {
        [] => vec![],
        [pin] => vec![(sc.name.clone(), pin.as_str())],
        pins => pins
            .iter()
            .enumerate()
            .map(|(i, pin)| (style.apply(&sc.name, i), pin.as_str()))
            .collect(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HdlLang {
    Verilog,
    SystemVerilog,
    Vhdl,
}

/// One entry of the per-build ordered source list.  The platform owns the
/// list; emitters only read it.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: String,
    pub lang: HdlLang,
    pub library: Option<String>,
}

impl SourceFile {
    pub fn verilog(path: impl Into<String>) -> Self {
        SourceFile {
            path: path.into(),
            lang: HdlLang::Verilog,
            library: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_bit_keeps_name() {
        let sc = PinAssignment {
            name: "led".into(),
            pins: vec!["A1".into()],
            attrs: vec![IoAttr::IoStandard("LVCMOS33".into())],
        };
        assert_eq!(
            expand_bus(&sc, IndexStyle::Brackets),
            vec![("led".to_string(), "A1")]
        );
    }

    #[test]
    fn pinless_assignment_expands_to_nothing() {
        let sc = PinAssignment {
            name: "virtual".into(),
            pins: vec![],
            attrs: vec![],
        };
        assert!(expand_bus(&sc, IndexStyle::Brackets).is_empty());
        assert!(expand_bus(&sc, IndexStyle::Parens).is_empty());
    }

    #[test]
    fn bus_expands_per_bit() {
        let sc = PinAssignment {
            name: "sig".into(),
            pins: vec!["P1".into(), "P2".into(), "P3".into()],
            attrs: vec![
                IoAttr::IoStandard("LVCMOS18".into()),
                IoAttr::Pull("UP".into()),
            ],
        };
        assert_eq!(
            expand_bus(&sc, IndexStyle::Brackets),
            vec![
                ("sig[0]".to_string(), "P1"),
                ("sig[1]".to_string(), "P2"),
                ("sig[2]".to_string(), "P3"),
            ]
        );
        assert_eq!(
            expand_bus(&sc, IndexStyle::Parens)[2],
            ("sig(2)".to_string(), "P3")
        );
    }
}
