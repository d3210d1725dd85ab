//! Linear soft objective over the decision variables.

use crate::config::ObjectiveWeights;
use crate::instance::SessionKind;

use super::variables::{SessionInfo, VarId, Variable};

/// `sum(coefficient * var) + constant`, minimised by the exact strategy.
///
/// Lecture assignments in the first timeslot carry `early_lecture`. Each
/// tutorial slot-used variable carries `tutorial_split`, and the constant
/// removes one `tutorial_split` per tutorial: a tutorial whose two groups
/// share a slot contributes zero, a split one contributes `tutorial_split`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Objective {
    coefficients: Vec<i64>,
    constant: i64,
}

impl Objective {
    pub(crate) fn build(
        variables: &[Variable],
        sessions: &[SessionInfo],
        weights: &ObjectiveWeights,
    ) -> Self {
        let coefficients = variables
            .iter()
            .map(|var| match *var {
                Variable::Assign { session, slot, .. }
                    if sessions[session.0].kind == SessionKind::Lecture
                        && slot.is_first_of_day() =>
                {
                    weights.early_lecture
                }
                Variable::SlotUsed { .. } => weights.tutorial_split,
                _ => 0,
            })
            .collect();
        let tutorials = sessions
            .iter()
            .filter(|s| s.kind == SessionKind::Tutorial)
            .count() as i64;
        Self {
            coefficients,
            constant: -tutorials * weights.tutorial_split,
        }
    }

    pub fn coefficient(&self, var: VarId) -> i64 {
        self.coefficients.get(var.0).copied().unwrap_or(0)
    }

    pub fn constant(&self) -> i64 {
        self.constant
    }

    /// Non-zero terms.
    pub fn terms(&self) -> impl Iterator<Item = (VarId, i64)> + '_ {
        self.coefficients
            .iter()
            .enumerate()
            .filter(|(_, c)| **c != 0)
            .map(|(i, c)| (VarId(i), *c))
    }

    pub fn evaluate(&self, values: &[bool]) -> i64 {
        self.coefficients
            .iter()
            .zip(values)
            .filter(|(_, on)| **on)
            .fold(self.constant, |acc, (c, _)| acc + c)
    }
}
