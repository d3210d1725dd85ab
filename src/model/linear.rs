//! Explicit 0/1 linear rows for every constraint.

use std::fmt;

use super::constraint::Constraint;
use super::variables::VarId;
use super::TimetableModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    Eq,
    Le,
}

/// `sum(coefficient * var) <sense> rhs`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinearRow {
    pub terms: Vec<(VarId, i64)>,
    pub sense: Sense,
    pub rhs: i64,
}

impl LinearRow {
    fn unit(vars: &[VarId], sense: Sense, rhs: i64) -> Self {
        Self {
            terms: vars.iter().map(|&v| (v, 1)).collect(),
            sense,
            rhs,
        }
    }

    pub fn activity(&self, values: &[bool]) -> i64 {
        self.terms
            .iter()
            .filter(|(v, _)| values.get(v.0).copied().unwrap_or(false))
            .map(|(_, c)| c)
            .sum()
    }

    pub fn is_satisfied(&self, values: &[bool]) -> bool {
        let lhs = self.activity(values);
        match self.sense {
            Sense::Eq => lhs == self.rhs,
            Sense::Le => lhs <= self.rhs,
        }
    }
}

impl fmt::Display for LinearRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (var, c)) in self.terms.iter().enumerate() {
            match (i, *c) {
                (0, 1) => write!(f, "{var}")?,
                (0, c) => write!(f, "{c}*{var}")?,
                (_, 1) => write!(f, " + {var}")?,
                (_, c) if c < 0 => write!(f, " - {}*{var}", -c)?,
                (_, c) => write!(f, " + {c}*{var}")?,
            }
        }
        let op = match self.sense {
            Sense::Eq => "=",
            Sense::Le => "<=",
        };
        write!(f, " {op} {}", self.rhs)
    }
}

impl TimetableModel<'_> {
    /// Expands one constraint into its rows.
    pub fn rows_of(&self, constraint: &Constraint) -> Vec<LinearRow> {
        match constraint {
            Constraint::ExactCount { vars, count, .. } => {
                vec![LinearRow::unit(vars, Sense::Eq, *count as i64)]
            }
            Constraint::RoomSlot { vars, .. } => vec![LinearRow::unit(vars, Sense::Le, 1)],
            Constraint::SlotUsedLink { assign, slot_used } => vec![LinearRow {
                terms: vec![(*assign, 1), (*slot_used, -1)],
                sense: Sense::Le,
                rhs: 0,
            }],
            Constraint::LecturerLink { active, assign } => {
                let mut terms: Vec<(VarId, i64)> = assign.iter().map(|&v| (v, 1)).collect();
                terms.push((*active, -(assign.len() as i64)));
                vec![LinearRow {
                    terms,
                    sense: Sense::Le,
                    rhs: 0,
                }]
            }
            Constraint::LecturerSlot { active, .. } => vec![LinearRow::unit(active, Sense::Le, 1)],
            Constraint::Unavailable { vars, .. } => vec![LinearRow::unit(vars, Sense::Eq, 0)],
            Constraint::ProgramSlot { occupancy, .. } => {
                vec![LinearRow::unit(occupancy, Sense::Le, 1)]
            }
            Constraint::Precedence { earlier, later } => {
                let later_vars = self.candidates(*later);
                let mut rows = Vec::new();
                for &a in self.candidates(*earlier) {
                    let rank_a = self.variables[a.index()].slot().rank();
                    for &b in later_vars {
                        if self.variables[b.index()].slot().rank() <= rank_a {
                            rows.push(LinearRow::unit(&[a, b], Sense::Le, 1));
                        }
                    }
                }
                rows
            }
        }
    }

    fn row_count_of(&self, constraint: &Constraint) -> usize {
        match constraint {
            Constraint::Precedence { earlier, later } => {
                let later_ranks: Vec<u32> = self
                    .candidates(*later)
                    .iter()
                    .map(|&b| self.variables[b.index()].slot().rank())
                    .collect();
                self.candidates(*earlier)
                    .iter()
                    .map(|&a| {
                        let rank_a = self.variables[a.index()].slot().rank();
                        later_ranks.partition_point(|&r| r <= rank_a)
                    })
                    .sum()
            }
            _ => 1,
        }
    }

    /// Every row of the model, constraint by constraint.
    pub fn rows(&self) -> impl Iterator<Item = LinearRow> + '_ {
        self.constraints.iter().flat_map(move |c| self.rows_of(c))
    }

    /// Number of rows [`rows`](Self::rows) yields, without materialising
    /// the precedence exclusions.
    pub fn row_count(&self) -> usize {
        self.constraints.iter().map(|c| self.row_count_of(c)).sum()
    }

    /// Constraints with at least one unsatisfied row under `values`.
    pub fn violated(&self, values: &[bool]) -> Vec<&Constraint> {
        self.constraints
            .iter()
            .filter(|c| self.rows_of(c).iter().any(|r| !r.is_satisfied(values)))
            .collect()
    }
}
