use chrono::{NaiveDate, Weekday};
use thiserror::Error;

use super::entities::EntityKind;
use crate::Id;

/// Malformed or inconsistent problem input.
///
/// Instance errors are detected before any model is built; an instance that
/// fails validation is never partially scheduled.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InstanceError {
    #[error("Duplicate {kind} id: {id}")]
    DuplicateId { kind: EntityKind, id: Id },

    #[error("Program {program} references unknown course {course}")]
    UnknownCourse { program: Id, course: Id },

    #[error("Program {program} lists course {course} more than once")]
    RepeatedCourse { program: Id, course: Id },

    #[error("Course {course} references unknown lecturer {lecturer}")]
    UnknownLecturer { course: Id, lecturer: Id },

    #[error("Reference week must start on a Monday, got {date} ({weekday})")]
    NotMonday { date: NaiveDate, weekday: Weekday },

    #[error(
        "Lecturer {lecturer} is unavailable on {date}, outside the reference week starting {week_start}"
    )]
    DateOutsideWeek {
        lecturer: Id,
        date: NaiveDate,
        week_start: NaiveDate,
    },

    #[error("Grid must have 1..=5 days and 1..=4 timeslots, got {days} x {timeslots}")]
    InvalidGrid { days: u8, timeslots: u8 },

    #[error("Course {course} has no enrolled students")]
    ZeroEnrollment { course: Id },

    #[error("Nominal enrollment for zero-enrollment courses must be at least 1")]
    ZeroNominalEnrollment,
}
