use std::cmp::Ordering;
use std::fmt;

use crate::instance::{Slot, SessionRef};
use crate::Id;

/// One scheduled `(session, room, slot)` triple.
///
/// A lecture session has exactly one assignment in a complete timetable, a
/// tutorial session has two (one per group), in distinct rooms or slots.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Assignment {
    pub session: SessionRef,
    pub slot: Slot,
    pub room: Id,
}

impl Assignment {
    pub fn new(session: SessionRef, slot: Slot, room: impl Into<Id>) -> Self {
        Self {
            session,
            slot,
            room: room.into(),
        }
    }

    pub fn course(&self) -> &str {
        &self.session.course
    }

    /// Composite ordering key.
    pub fn key(&self) -> AssignmentKey<'_> {
        AssignmentKey {
            course: &self.session.course,
            index: self.session.index,
            rank: self.slot.rank(),
            room: &self.room,
        }
    }
}

/// Total order over assignments: course, session index, slot rank, room.
///
/// Iterating a timetable in this order lists each course's sessions in
/// timeline order with their assignments chronologically, so the output is
/// deterministic regardless of how the assignments were produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct AssignmentKey<'a> {
    pub course: &'a str,
    pub index: usize,
    pub rank: u32,
    pub room: &'a str,
}

impl Ord for Assignment {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl PartialOrd for Assignment {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} in {} at {}", self.session, self.room, self.slot)
    }
}
