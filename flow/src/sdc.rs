//! SDC line builders shared by the vendor timing emitters.  Output is
//! deterministic: clocks are traversed in `ClockId` order, false paths by
//! the pair's identifiers.

use crate::constraints::{ClockId, Constraints, format_ns};
use crate::error::BuildError;
use std::collections::BTreeMap;

/// The SDC object class a top-level clock is constrained through; vendors
/// disagree on whether it is a port or a net.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SdcObject {
    Ports,
    Nets,
}

impl SdcObject {
    fn getter(self) -> &'static str {
        match self {
            SdcObject::Ports => "get_ports",
            SdcObject::Nets => "get_nets",
        }
    }
}

fn clock_name<'a>(
    clock_names: &'a BTreeMap<ClockId, String>,
    clock: ClockId,
) -> Result<&'a str, BuildError> {
    clock_names
        .get(&clock)
        .map(String::as_str)
        .ok_or_else(|| BuildError::Design(format!("no resolved port name for clock {clock}")))
}

/// One `create_clock` directive per recorded period constraint.
pub fn create_clocks(
    constraints: &Constraints,
    clock_names: &BTreeMap<ClockId, String>,
    obj: SdcObject,
) -> Result<Vec<String>, BuildError> {
    let mut sdc = vec![];
    for (clock, ps) in constraints.clocks() {
        let name = clock_name(clock_names, clock)?;
        sdc.push(format!(
            "create_clock -name {name} -period {period} [{getter} {{{name}}}]",
            period = format_ns(ps),
            getter = obj.getter(),
        ));
    }
    Ok(sdc)
}

/// One `set_clock_groups -asynchronous` directive per false-path pair.
pub fn async_clock_groups(
    constraints: &Constraints,
    clock_names: &BTreeMap<ClockId, String>,
) -> Result<Vec<String>, BuildError> {
    let mut sdc = vec![];
    for (from, to) in constraints.false_paths() {
        let from = clock_name(clock_names, from)?;
        let to = clock_name(clock_names, to)?;
        sdc.push(format!(
            "set_clock_groups \
             -group [get_clocks -include_generated_clocks -of [get_nets {{{from}}}]] \
             -group [get_clocks -include_generated_clocks -of [get_nets {{{to}}}]] \
             -asynchronous"
        ));
    }
    Ok(sdc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use unnamed_entity::EntityId;

    fn names(list: &[(u32, &str)]) -> BTreeMap<ClockId, String> {
        list.iter()
            .map(|&(idx, name)| (ClockId::from_idx(idx as usize), name.to_string()))
            .collect()
    }

    #[test]
    fn emission_order_is_insertion_independent() {
        let clk_names = names(&[(0, "sys_clk"), (1, "spi_clk"), (2, "eth_clk")]);
        let mut fwd = Constraints::new();
        fwd.add_period(ClockId::from_idx(0), 10.0).unwrap();
        fwd.add_period(ClockId::from_idx(1), 20.0).unwrap();
        fwd.add_period(ClockId::from_idx(2), 8.0).unwrap();
        let mut rev = Constraints::new();
        rev.add_period(ClockId::from_idx(2), 8.0).unwrap();
        rev.add_period(ClockId::from_idx(1), 20.0).unwrap();
        rev.add_period(ClockId::from_idx(0), 10.0).unwrap();
        let a = create_clocks(&fwd, &clk_names, SdcObject::Ports).unwrap();
        let b = create_clocks(&rev, &clk_names, SdcObject::Ports).unwrap();
        assert_eq!(a, b);
        assert_eq!(
            a[0],
            "create_clock -name sys_clk -period 10.0 [get_ports {sys_clk}]"
        );
    }

    #[test]
    fn clock_groups_sorted_by_pair() {
        let clk_names = names(&[(0, "sys_clk"), (1, "spi_clk"), (2, "eth_clk")]);
        let mut c = Constraints::new();
        c.add_false_path(ClockId::from_idx(2), ClockId::from_idx(0));
        c.add_false_path(ClockId::from_idx(1), ClockId::from_idx(2));
        let groups = async_clock_groups(&c, &clk_names).unwrap();
        assert_eq!(groups.len(), 2);
        // (1, 2) sorts before (2, 0)
        assert!(groups[0].contains("{spi_clk}") && groups[0].contains("{eth_clk}"));
        assert!(groups[1].contains("{eth_clk}") && groups[1].contains("{sys_clk}"));
    }

    #[test]
    fn unresolved_clock_is_a_design_error() {
        let mut c = Constraints::new();
        c.add_period(ClockId::from_idx(3), 10.0).unwrap();
        let err = create_clocks(&c, &BTreeMap::new(), SdcObject::Ports).unwrap_err();
        assert!(matches!(err, BuildError::Design(_)));
    }
}
