use crate::error::BuildError;
use std::collections::{BTreeMap, BTreeSet};
use unnamed_entity::entity_id;

entity_id! {
    pub id ClockId u32;
}

/// Rounds a period in nanoseconds down to the picosecond grid.
///
/// The tiny bias compensates for periods with no exact f64 representation:
/// 100.001ns multiplies out to just under 100001ps and must not floor to
/// 100000.
pub fn period_to_ps(period_ns: f64) -> u64 {
    (period_ns * 1e3 + 1e-6).floor() as u64
}

/// Formats a picosecond period the way vendor SDC dialects expect, in
/// nanoseconds with the trailing zeros trimmed (`10.0`, `7.518`).
pub fn format_ns(ps: u64) -> String {
    let ns = ps / 1000;
    let frac = ps % 1000;
    if frac == 0 {
        format!("{ns}.0")
    } else {
        let frac = format!("{frac:03}");
        format!("{ns}.{}", frac.trim_end_matches('0'))
    }
}

/// Per-build constraint accumulator: requested clock periods and false-path
/// pairs, keyed by the design-assigned [`ClockId`] so that emission order
/// never depends on insertion order.
#[derive(Debug, Clone, Default)]
pub struct Constraints {
    clocks: BTreeMap<ClockId, u64>,
    false_paths: BTreeSet<(ClockId, ClockId)>,
}

impl Constraints {
    pub fn new() -> Self {
        Default::default()
    }

    /// Records a period constraint, rounded down to the picosecond.
    /// Re-constraining a clock to the same rounded period is a no-op; a
    /// different period is a conflict.
    pub fn add_period(&mut self, clock: ClockId, period_ns: f64) -> Result<(), BuildError> {
        let ps = period_to_ps(period_ns);
        if let Some(&old) = self.clocks.get(&clock) {
            if old != ps {
                return Err(BuildError::ConfigurationConflict {
                    clock,
                    old: format_ns(old),
                    new: format_ns(ps),
                });
            }
            return Ok(());
        }
        self.clocks.insert(clock, ps);
        Ok(())
    }

    /// Marks two clock domains as asynchronous.  The pair is unordered;
    /// inserting the reverse of a recorded pair is a no-op.
    pub fn add_false_path(&mut self, a: ClockId, b: ClockId) {
        if !self.false_paths.contains(&(a, b)) && !self.false_paths.contains(&(b, a)) {
            self.false_paths.insert((a, b));
        }
    }

    /// Recorded clocks with their periods in picoseconds, in `ClockId` order.
    pub fn clocks(&self) -> impl Iterator<Item = (ClockId, u64)> + '_ {
        self.clocks.iter().map(|(&clock, &ps)| (clock, ps))
    }

    /// Recorded false-path pairs, sorted by the pair's identifiers.
    pub fn false_paths(&self) -> impl Iterator<Item = (ClockId, ClockId)> + '_ {
        self.false_paths.iter().copied()
    }

    pub fn has_clocks(&self) -> bool {
        !self.clocks.is_empty()
    }

    /// True when no period or false-path constraint has been recorded.
    pub fn is_empty(&self) -> bool {
        self.clocks.is_empty() && self.false_paths.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use unnamed_entity::EntityId;

    #[test]
    fn format_periods() {
        assert_eq!(format_ns(10000), "10.0");
        assert_eq!(format_ns(100000), "100.0");
        assert_eq!(format_ns(7518), "7.518");
        assert_eq!(format_ns(7500), "7.5");
        assert_eq!(format_ns(500), "0.5");
    }

    #[test]
    fn rounding_is_downward() {
        assert_eq!(period_to_ps(10.0), 10000);
        assert_eq!(period_to_ps(100.0005), 100000);
        assert_eq!(period_to_ps(100.001), 100001);
        assert_eq!(period_to_ps(7.5189), 7518);
    }

    #[test]
    fn same_rounded_period_is_idempotent() {
        let clk = ClockId::from_idx(0);
        let mut c = Constraints::new();
        c.add_period(clk, 100.0005).unwrap();
        c.add_period(clk, 100.0002).unwrap();
        assert_eq!(c.clocks().collect::<Vec<_>>(), vec![(clk, 100000)]);
    }

    #[test]
    fn conflicting_period_fails() {
        let clk = ClockId::from_idx(0);
        let mut c = Constraints::new();
        c.add_period(clk, 100.0).unwrap();
        let err = c.add_period(clk, 100.001).unwrap_err();
        match err {
            BuildError::ConfigurationConflict { old, new, .. } => {
                assert_eq!(old, "100.0");
                assert_eq!(new, "100.001");
            }
            _ => panic!("wrong error {err}"),
        }
        // the first value stays recorded
        assert_eq!(c.clocks().collect::<Vec<_>>(), vec![(clk, 100000)]);
    }

    #[test]
    fn false_paths_are_unordered() {
        let a = ClockId::from_idx(0);
        let b = ClockId::from_idx(1);
        let mut c = Constraints::new();
        assert!(c.is_empty());
        c.add_false_path(a, b);
        assert!(!c.is_empty());
        assert!(!c.has_clocks());
        c.add_false_path(b, a);
        c.add_false_path(a, b);
        assert_eq!(c.false_paths().collect::<Vec<_>>(), vec![(a, b)]);
    }
}
