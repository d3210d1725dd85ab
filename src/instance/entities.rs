//! Programs, courses, rooms and lecturers, in input and validated form.
//!
//! The `*Input` records are the Parameter Store contract: plain data with
//! string ids, as loaded from disk by an external collaborator. The validated
//! counterparts are produced by [`Instance::new`](super::Instance::new) and
//! carry derived fields such as a course's enrollment.

use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;

use super::calendar::Day;
use crate::Id;

/// The kind of a scheduled occurrence in a course timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SessionKind {
    Lecture,
    Tutorial,
}

impl SessionKind {
    /// Number of assignments a session of this kind needs: a lecture takes
    /// one room, a tutorial is split over two parallel rooms.
    pub fn required_assignments(self) -> usize {
        match self {
            SessionKind::Lecture => 1,
            SessionKind::Tutorial => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SessionKind::Lecture => "lecture",
            SessionKind::Tutorial => "tutorial",
        }
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One occurrence, by index, within a course's session timeline.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SessionRef {
    pub course: Id,
    pub index: usize,
}

impl SessionRef {
    pub fn new(course: impl Into<Id>, index: usize) -> Self {
        Self {
            course: course.into(),
            index,
        }
    }

    /// The session that must follow this one in the same course.
    pub fn next(&self) -> SessionRef {
        SessionRef::new(self.course.clone(), self.index + 1)
    }
}

impl fmt::Display for SessionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.course, self.index)
    }
}

/// Entity categories, used in error messages and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EntityKind {
    Program,
    Course,
    Room,
    Lecturer,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EntityKind::Program => "program",
            EntityKind::Course => "course",
            EntityKind::Room => "room",
            EntityKind::Lecturer => "lecturer",
        })
    }
}

// =============================================================================
// Input records
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProgramInput {
    pub id: Id,
    /// Number of students following the program.
    pub size: u32,
    /// Courses the program requires, in order.
    pub courses: Vec<Id>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CourseInput {
    pub id: Id,
    pub name: String,
    /// Ordered session kinds; index `i` must be taught before index `i + 1`.
    pub timeline: Vec<SessionKind>,
    pub lecturer: Id,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoomInput {
    pub id: Id,
    pub capacity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LecturerInput {
    pub id: Id,
    /// Calendar dates on which the lecturer cannot teach.
    #[cfg_attr(feature = "serde", serde(default))]
    pub unavailable: Vec<NaiveDate>,
}

// =============================================================================
// Validated entities
// =============================================================================

/// A group of students sharing one course list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    pub(crate) id: Id,
    pub(crate) size: u32,
    pub(crate) courses: Vec<Id>,
}

impl Program {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn courses(&self) -> &[Id] {
        &self.courses
    }

    pub fn requires(&self, course: &str) -> bool {
        self.courses.iter().any(|c| c == course)
    }
}

/// A course with its session timeline and derived enrollment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    pub(crate) id: Id,
    pub(crate) name: String,
    pub(crate) timeline: Vec<SessionKind>,
    pub(crate) lecturer: Id,
    /// Sum of the sizes of every program requiring this course.
    pub(crate) enrolled: u32,
    /// Programs requiring this course, in instance order.
    pub(crate) programs: Vec<Id>,
}

impl Course {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn timeline(&self) -> &[SessionKind] {
        &self.timeline
    }

    pub fn lecturer(&self) -> &str {
        &self.lecturer
    }

    pub fn enrolled(&self) -> u32 {
        self.enrolled
    }

    pub fn programs(&self) -> &[Id] {
        &self.programs
    }

    pub fn session_count(&self) -> usize {
        self.timeline.len()
    }

    /// References to every session of the course, in timeline order.
    pub fn sessions(&self) -> impl Iterator<Item = (SessionRef, SessionKind)> + '_ {
        self.timeline
            .iter()
            .enumerate()
            .map(|(i, kind)| (SessionRef::new(self.id.clone(), i), *kind))
    }

    /// Total assignments the course needs (one per lecture, two per tutorial).
    pub fn required_assignments(&self) -> usize {
        self.timeline
            .iter()
            .map(|k| k.required_assignments())
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub(crate) id: Id,
    pub(crate) capacity: u32,
}

impl Room {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }
}

/// A lecturer and the weekdays they cannot teach on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lecturer {
    pub(crate) id: Id,
    pub(crate) unavailable_dates: BTreeSet<NaiveDate>,
    pub(crate) unavailable_days: BTreeSet<Day>,
}

impl Lecturer {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn unavailable_dates(&self) -> &BTreeSet<NaiveDate> {
        &self.unavailable_dates
    }

    /// Weekday ordinals derived from the unavailable dates.
    pub fn unavailable_days(&self) -> &BTreeSet<Day> {
        &self.unavailable_days
    }

    pub fn is_available(&self, day: Day) -> bool {
        !self.unavailable_days.contains(&day)
    }
}

/// A course removed from the instance under
/// [`ZeroEnrollmentPolicy::Exclude`](super::ZeroEnrollmentPolicy::Exclude).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExcludedCourse {
    pub id: Id,
    pub name: String,
    /// Programs that listed the course before it was removed.
    pub listed_by: Vec<Id>,
}
