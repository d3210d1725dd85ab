//! Hard constraint families over the decision variables.
//!
//! Each constraint is stored in its compact, structured form. The explicit
//! 0/1 rows it stands for are produced on demand by
//! [`TimetableModel::rows_of`](super::TimetableModel::rows_of).

use std::fmt;

use crate::instance::{Day, Slot};

use super::variables::{SessionId, VarId};

/// Constraint family, one per hard rule of the timetable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Family {
    ExactCount,
    RoomSlot,
    SlotUsedLink,
    LecturerLink,
    LecturerSlot,
    Unavailable,
    ProgramSlot,
    Precedence,
}

impl Family {
    pub const ALL: [Family; 8] = [
        Family::ExactCount,
        Family::RoomSlot,
        Family::SlotUsedLink,
        Family::LecturerLink,
        Family::LecturerSlot,
        Family::Unavailable,
        Family::ProgramSlot,
        Family::Precedence,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Family::ExactCount => "exact-count",
            Family::RoomSlot => "room-slot",
            Family::SlotUsedLink => "slot-used-link",
            Family::LecturerLink => "lecturer-link",
            Family::LecturerSlot => "lecturer-slot",
            Family::Unavailable => "unavailable",
            Family::ProgramSlot => "program-slot",
            Family::Precedence => "precedence",
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// `sum(vars) = count`: a lecture gets one assignment, a tutorial two.
    ExactCount {
        session: SessionId,
        vars: Vec<VarId>,
        count: usize,
    },
    /// `sum(vars) <= 1`: one assignment per room per slot.
    RoomSlot {
        room: usize,
        slot: Slot,
        vars: Vec<VarId>,
    },
    /// `assign - slot_used <= 0`: a tutorial group in a slot marks it used.
    SlotUsedLink { assign: VarId, slot_used: VarId },
    /// `sum(assign) - M * active <= 0` with `M = assign.len()`.
    LecturerLink { active: VarId, assign: Vec<VarId> },
    /// `sum(active) <= 1`: one course per lecturer per slot.
    LecturerSlot {
        lecturer: usize,
        slot: Slot,
        active: Vec<VarId>,
    },
    /// `sum(vars) = 0`: nothing on a lecturer's unavailable day.
    Unavailable {
        lecturer: usize,
        day: Day,
        vars: Vec<VarId>,
    },
    /// `sum(occupancy) <= 1`: one session per program per slot. Lecture
    /// assignments count directly, tutorials through their slot-used
    /// variable so that both groups of one tutorial count once.
    ProgramSlot {
        program: usize,
        slot: Slot,
        occupancy: Vec<VarId>,
    },
    /// `x_a + x_b <= 1` for every candidate `x_a` of `earlier` and `x_b` of
    /// `later` with `rank(b) <= rank(a)`. Expanded lazily.
    Precedence { earlier: SessionId, later: SessionId },
}

impl Constraint {
    pub fn family(&self) -> Family {
        match self {
            Constraint::ExactCount { .. } => Family::ExactCount,
            Constraint::RoomSlot { .. } => Family::RoomSlot,
            Constraint::SlotUsedLink { .. } => Family::SlotUsedLink,
            Constraint::LecturerLink { .. } => Family::LecturerLink,
            Constraint::LecturerSlot { .. } => Family::LecturerSlot,
            Constraint::Unavailable { .. } => Family::Unavailable,
            Constraint::ProgramSlot { .. } => Family::ProgramSlot,
            Constraint::Precedence { .. } => Family::Precedence,
        }
    }

    /// Variables combined by a `<= 1` packing row, if this is one.
    pub fn packing_terms(&self) -> Option<&[VarId]> {
        match self {
            Constraint::RoomSlot { vars, .. } => Some(vars),
            Constraint::LecturerSlot { active, .. } => Some(active),
            Constraint::ProgramSlot { occupancy, .. } => Some(occupancy),
            _ => None,
        }
    }

    pub fn stringify(&self) -> String {
        fn join(vars: &[VarId]) -> String {
            vars.iter()
                .map(VarId::to_string)
                .collect::<Vec<_>>()
                .join(" + ")
        }
        match self {
            Constraint::ExactCount { vars, count, .. } => format!("{} = {count}", join(vars)),
            Constraint::RoomSlot { vars, .. } => format!("{} <= 1", join(vars)),
            Constraint::SlotUsedLink { assign, slot_used } => format!("{assign} - {slot_used} <= 0"),
            Constraint::LecturerLink { active, assign } => {
                format!("{} - {}*{active} <= 0", join(assign), assign.len())
            }
            Constraint::LecturerSlot { active, .. } => format!("{} <= 1", join(active)),
            Constraint::Unavailable { vars, .. } => format!("{} = 0", join(vars)),
            Constraint::ProgramSlot { occupancy, .. } => format!("{} <= 1", join(occupancy)),
            Constraint::Precedence { earlier, later } => {
                format!("rank(s{}) < rank(s{})", earlier.0, later.0)
            }
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.family(), self.stringify())
    }
}
