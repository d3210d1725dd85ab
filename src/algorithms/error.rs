use std::time::Duration;

use thiserror::Error;

use crate::instance::SessionRef;
use crate::model::ModelError;
use crate::timetable::TimetableError;

/// Why a solving strategy returned no timetable.
///
/// `Infeasible` is a proof, `BudgetExhausted` is not: a caller may retry the
/// latter with a larger budget. `Unplaced` is local to the greedy strategy
/// and names the session it got stuck on, so the caller can retry with a
/// different order.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SolveError {
    #[error("Instance is infeasible: {reason}")]
    Infeasible { reason: String },

    #[error("No timetable found within budget ({nodes} nodes, {elapsed:.2?})")]
    BudgetExhausted { nodes: u64, elapsed: Duration },

    #[error("No slot found for {session}: placed {placed} of {required} assignments")]
    Unplaced {
        session: SessionRef,
        placed: usize,
        required: usize,
    },

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Timetable(#[from] TimetableError),
}

impl SolveError {
    /// Whether this outcome proves that no timetable exists.
    pub fn is_proof_of_infeasibility(&self) -> bool {
        matches!(self, SolveError::Infeasible { .. })
    }
}
