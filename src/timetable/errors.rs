use thiserror::Error;

use super::assignment::Assignment;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TimetableError {
    /// The same `(session, room, slot)` triple was produced twice.
    #[error("Assignment listed more than once: {0}")]
    DuplicateAssignment(Assignment),
}
