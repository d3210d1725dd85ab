//! Decision variables and the sessions they refer to.

use std::fmt;

use crate::instance::{SessionKind, SessionRef, Slot};

/// Dense index of a session inside a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub(crate) usize);

impl SessionId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Dense index of a 0/1 variable inside a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(pub(crate) usize);

impl VarId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// A session with the instance data the model needs resolved to indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInfo {
    pub session: SessionRef,
    pub kind: SessionKind,
    /// Position of the course in [`Instance::courses`](crate::instance::Instance::courses).
    pub course: usize,
    /// Position of the lecturer in [`Instance::lecturers`](crate::instance::Instance::lecturers).
    pub lecturer: usize,
    /// Positions of the programs requiring the course.
    pub programs: Vec<usize>,
    /// Students the session's rooms are sized for.
    pub capacity_basis: u32,
}

impl SessionInfo {
    pub fn required_assignments(&self) -> usize {
        self.kind.required_assignments()
    }
}

/// A 0/1 decision variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variable {
    /// `x`: the session is held in `room` at `slot`.
    Assign {
        session: SessionId,
        room: usize,
        slot: Slot,
    },
    /// `y`: at least one group of a tutorial session uses `slot`.
    SlotUsed { session: SessionId, slot: Slot },
    /// `z`: the lecturer teaches `course` at `slot`. Only generated for
    /// lecturers with more than one course.
    LecturerActive {
        lecturer: usize,
        course: usize,
        slot: Slot,
    },
}

impl Variable {
    pub fn slot(&self) -> Slot {
        match *self {
            Variable::Assign { slot, .. }
            | Variable::SlotUsed { slot, .. }
            | Variable::LecturerActive { slot, .. } => slot,
        }
    }

    pub fn is_assignment(&self) -> bool {
        matches!(self, Variable::Assign { .. })
    }
}

/// Variable counts by kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VariableCounts {
    pub assign: usize,
    pub slot_used: usize,
    pub lecturer_active: usize,
}

impl VariableCounts {
    pub fn total(&self) -> usize {
        self.assign + self.slot_used + self.lecturer_active
    }

    pub(crate) fn record(&mut self, var: &Variable) {
        match var {
            Variable::Assign { .. } => self.assign += 1,
            Variable::SlotUsed { .. } => self.slot_used += 1,
            Variable::LecturerActive { .. } => self.lecturer_active += 1,
        }
    }
}
