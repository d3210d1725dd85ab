use thiserror::Error;

use crate::instance::{EntityKind, SessionRef};
use crate::timetable::Assignment;
use crate::Id;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// A reference inside the instance could not be resolved.
    #[error("Unknown {kind} {id}")]
    UnknownEntity { kind: EntityKind, id: Id },

    /// An assignment has no decision variable: its room fails the capacity
    /// fraction, its slot lies outside the grid, or its session is unknown.
    #[error("No decision variable for {0}")]
    NotAVariable(Assignment),

    #[error("Precedence edge {from} -> {to} would create a cycle")]
    CycleDetected { from: SessionRef, to: SessionRef },

    #[error("Precedence graph contains a cycle")]
    GraphContainsCycle,
}
