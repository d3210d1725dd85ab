//! The seven timetable invariants and the records describing their breaches.

use std::fmt;

use chrono::NaiveDate;

use crate::instance::{SessionKind, SessionRef, Slot};
use crate::timetable::Assignment;
use crate::Id;

/// A property every accepted timetable satisfies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Invariant {
    /// Every session has exactly its required number of assignments.
    SessionCount,
    /// No room holds two assignments in one slot.
    RoomConflict,
    /// No lecturer teaches two different courses in one slot.
    LecturerConflict,
    /// No lecturer teaches on a day they are unavailable.
    LecturerAvailability,
    /// No program attends two different sessions in one slot.
    ProgramConflict,
    /// Every room meets the course's capacity fraction.
    RoomCapacity,
    /// Consecutive sessions of a course are strictly ordered in time.
    SessionOrder,
}

impl Invariant {
    pub const ALL: [Invariant; 7] = [
        Invariant::SessionCount,
        Invariant::RoomConflict,
        Invariant::LecturerConflict,
        Invariant::LecturerAvailability,
        Invariant::ProgramConflict,
        Invariant::RoomCapacity,
        Invariant::SessionOrder,
    ];

    /// 1-based position in the list of invariants.
    pub fn number(self) -> u8 {
        self as u8 + 1
    }

    pub fn description(self) -> &'static str {
        match self {
            Invariant::SessionCount => "session assignment count",
            Invariant::RoomConflict => "room double booking",
            Invariant::LecturerConflict => "lecturer double booking",
            Invariant::LecturerAvailability => "lecturer unavailability",
            Invariant::ProgramConflict => "program overlap",
            Invariant::RoomCapacity => "room capacity",
            Invariant::SessionOrder => "chronological session order",
        }
    }
}

impl fmt::Display for Invariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}", self.number(), self.description())
    }
}

/// Why an assignment could not be resolved against the instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Malformation {
    UnknownCourse,
    UnknownSession,
    UnknownRoom,
    SlotOutsideGrid,
}

impl fmt::Display for Malformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Malformation::UnknownCourse => "unknown course",
            Malformation::UnknownSession => "session index outside the course timeline",
            Malformation::UnknownRoom => "unknown room",
            Malformation::SlotOutsideGrid => "slot outside the weekly grid",
        })
    }
}

/// One breach of one invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "violation", rename_all = "snake_case"))]
pub enum Violation {
    /// A session with too few (possibly zero) or too many assignments.
    SessionCount {
        session: SessionRef,
        kind: SessionKind,
        expected: usize,
        actual: usize,
    },
    /// An assignment that does not refer to the instance.
    MalformedAssignment {
        assignment: Assignment,
        problem: Malformation,
    },
    RoomConflict {
        room: Id,
        slot: Slot,
        sessions: Vec<SessionRef>,
    },
    LecturerConflict {
        lecturer: Id,
        slot: Slot,
        courses: Vec<Id>,
    },
    UnavailableLecturer {
        lecturer: Id,
        date: NaiveDate,
        assignment: Assignment,
    },
    /// Distinct sessions attended by one program in one slot.
    ProgramConflict {
        program: Id,
        slot: Slot,
        sessions: Vec<SessionRef>,
    },
    CapacityViolation {
        assignment: Assignment,
        capacity: u32,
        required: u32,
        enrolled: u32,
    },
    /// Session `session` ends no earlier than `next` starts.
    OrderingViolation {
        session: SessionRef,
        latest: Slot,
        next: SessionRef,
        earliest_next: Slot,
    },
}

impl Violation {
    pub fn invariant(&self) -> Invariant {
        match self {
            Violation::SessionCount { .. } | Violation::MalformedAssignment { .. } => {
                Invariant::SessionCount
            }
            Violation::RoomConflict { .. } => Invariant::RoomConflict,
            Violation::LecturerConflict { .. } => Invariant::LecturerConflict,
            Violation::UnavailableLecturer { .. } => Invariant::LecturerAvailability,
            Violation::ProgramConflict { .. } => Invariant::ProgramConflict,
            Violation::CapacityViolation { .. } => Invariant::RoomCapacity,
            Violation::OrderingViolation { .. } => Invariant::SessionOrder,
        }
    }
}

fn join<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::SessionCount {
                session,
                kind,
                expected,
                actual,
            } => write!(
                f,
                "{session} ({kind}): expected {expected} assignment(s), found {actual}"
            ),
            Violation::MalformedAssignment {
                assignment,
                problem,
            } => write!(f, "{assignment}: {problem}"),
            Violation::RoomConflict {
                room,
                slot,
                sessions,
            } => write!(f, "{room} at {slot}: {}", join(sessions)),
            Violation::LecturerConflict {
                lecturer,
                slot,
                courses,
            } => write!(f, "{lecturer} at {slot}: {}", join(courses)),
            Violation::UnavailableLecturer {
                lecturer,
                date,
                assignment,
            } => write!(f, "{lecturer} is unavailable on {date}: {assignment}"),
            Violation::ProgramConflict {
                program,
                slot,
                sessions,
            } => write!(f, "{program} at {slot}: {}", join(sessions)),
            Violation::CapacityViolation {
                assignment,
                capacity,
                required,
                enrolled,
            } => write!(
                f,
                "{assignment}: capacity {capacity}, need {required} ({enrolled} enrolled)"
            ),
            Violation::OrderingViolation {
                session,
                latest,
                next,
                earliest_next,
            } => write!(
                f,
                "{session} ends at {latest}, not before {next} starts at {earliest_next}"
            ),
        }
    }
}
