use std::collections::BTreeMap;
use std::fmt;

use super::violation::{Invariant, Violation};

/// Outcome of [`verify`](super::verify): one violation list per invariant.
///
/// Every invariant has an entry, empty when it holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationReport {
    violations: BTreeMap<Invariant, Vec<Violation>>,
}

impl VerificationReport {
    pub(crate) fn new() -> Self {
        Self {
            violations: Invariant::ALL.iter().map(|&i| (i, Vec::new())).collect(),
        }
    }

    pub(crate) fn record(&mut self, violation: Violation) {
        self.violations
            .entry(violation.invariant())
            .or_default()
            .push(violation);
    }

    /// True when every invariant holds.
    pub fn is_valid(&self) -> bool {
        self.violations.values().all(Vec::is_empty)
    }

    pub fn passed(&self, invariant: Invariant) -> bool {
        self.violations(invariant).is_empty()
    }

    pub fn violations(&self, invariant: Invariant) -> &[Violation] {
        self.violations
            .get(&invariant)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every violation, grouped by invariant in invariant order.
    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.violations.values().flatten()
    }

    pub fn violation_count(&self) -> usize {
        self.violations.values().map(Vec::len).sum()
    }

    pub fn failed_invariants(&self) -> impl Iterator<Item = Invariant> + '_ {
        self.violations
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(&i, _)| i)
    }
}

impl fmt::Display for VerificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (invariant, violations) in &self.violations {
            if violations.is_empty() {
                writeln!(f, "[PASS] {invariant}")?;
            } else {
                writeln!(f, "[FAIL] {invariant}: {} violation(s)", violations.len())?;
                for v in violations {
                    writeln!(f, "  - {v}")?;
                }
            }
        }
        if self.is_valid() {
            write!(f, "All invariants hold")
        } else {
            write!(f, "{} violation(s) in total", self.violation_count())
        }
    }
}
