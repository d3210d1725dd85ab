//! The solver output: an immutable set of assignments.
//!
//! A [`Timetable`] is produced by a solving strategy and handed to the
//! verifier and to the grid renderer. It is never mutated after construction;
//! everything downstream reads it through the query methods below.

pub mod assignment;
pub mod errors;
pub mod grid;
pub mod quality;


use std::collections::{BTreeMap, BTreeSet};

use crate::config::ObjectiveWeights;
use crate::instance::{Instance, SessionKind, SessionRef, Slot};
use crate::Id;
pub use assignment::{Assignment, AssignmentKey};
pub use errors::TimetableError;
pub use grid::{GridEntry, WeekGrid};
pub use quality::QualityReport;

/// A set of assignments ordered by [`AssignmentKey`].
///
/// # Examples
///
/// ```
/// use coursegrid::instance::{Day, SessionRef, Slot, Timeslot};
/// use coursegrid::timetable::{Assignment, Timetable};
///
/// let monday = Slot::new(Day::MONDAY, Timeslot::new(1).unwrap());
/// let tuesday = Slot::new(Day::TUESDAY, Timeslot::FIRST);
/// let timetable = Timetable::from_assignments([
///     Assignment::new(SessionRef::new("ALG", 1), tuesday, "B1"),
///     Assignment::new(SessionRef::new("ALG", 0), monday, "Aula"),
/// ])
/// .unwrap();
///
/// assert_eq!(timetable.len(), 2);
/// let first = timetable.iter().next().unwrap();
/// assert_eq!(first.session, SessionRef::new("ALG", 0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timetable {
    id: Id,
    assignments: BTreeSet<Assignment>,
}

impl Timetable {
    /// Collects assignments into a timetable.
    ///
    /// # Errors
    ///
    /// Returns [`TimetableError::DuplicateAssignment`] if the same
    /// assignment appears twice.
    pub fn from_assignments(
        assignments: impl IntoIterator<Item = Assignment>,
    ) -> Result<Self, TimetableError> {
        let mut set = BTreeSet::new();
        for a in assignments {
            if set.contains(&a) {
                return Err(TimetableError::DuplicateAssignment(a));
            }
            set.insert(a);
        }
        Ok(Self {
            id: crate::generate_id(),
            assignments: set,
        })
    }

    /// A timetable with no assignments; the solution for an instance
    /// without courses.
    pub fn empty() -> Self {
        Self {
            id: crate::generate_id(),
            assignments: BTreeSet::new(),
        }
    }

    /// Unique id of this timetable, for logs and exports.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn contains(&self, assignment: &Assignment) -> bool {
        self.assignments.contains(assignment)
    }

    /// All assignments in key order.
    pub fn iter(&self) -> impl Iterator<Item = &Assignment> {
        self.assignments.iter()
    }

    /// Assignments of one session, chronologically.
    pub fn for_session<'a>(
        &'a self,
        session: &'a SessionRef,
    ) -> impl Iterator<Item = &'a Assignment> + 'a {
        self.assignments
            .iter()
            .filter(move |a| &a.session == session)
    }

    /// Distinct slots a session occupies.
    pub fn session_slots(&self, session: &SessionRef) -> BTreeSet<Slot> {
        self.for_session(session).map(|a| a.slot).collect()
    }

    /// Assignments of every session of one course.
    pub fn for_course<'a>(&'a self, course: &'a str) -> impl Iterator<Item = &'a Assignment> + 'a {
        self.assignments.iter().filter(move |a| a.course() == course)
    }

    /// Assignments grouped by slot, slots in rank order.
    pub fn by_slot(&self) -> BTreeMap<Slot, Vec<&Assignment>> {
        let mut map: BTreeMap<Slot, Vec<&Assignment>> = BTreeMap::new();
        for a in &self.assignments {
            map.entry(a.slot).or_default().push(a);
        }
        map
    }

    /// Soft-objective value of this timetable.
    ///
    /// Each lecture assignment in the first timeslot of a day costs
    /// `early_lecture`; each tutorial costs `tutorial_split` for every slot
    /// beyond the first that its groups occupy. On a complete timetable this
    /// equals the model objective evaluated at the timetable's values.
    pub fn penalty(&self, instance: &Instance, weights: &ObjectiveWeights) -> i64 {
        let early = self
            .assignments
            .iter()
            .filter(|a| {
                a.slot.is_first_of_day()
                    && instance.session_kind(&a.session) == Some(SessionKind::Lecture)
            })
            .count() as i64
            * weights.early_lecture;

        let mut tutorial_slots: BTreeMap<&SessionRef, BTreeSet<Slot>> = BTreeMap::new();
        for a in &self.assignments {
            if instance.session_kind(&a.session) == Some(SessionKind::Tutorial) {
                tutorial_slots.entry(&a.session).or_default().insert(a.slot);
            }
        }
        let split = tutorial_slots
            .values()
            .map(|slots| slots.len().saturating_sub(1) as i64)
            .sum::<i64>()
            * weights.tutorial_split;

        early + split
    }

    /// Soft quality metrics, see [`QualityReport`].
    pub fn quality(&self, instance: &Instance) -> QualityReport {
        QualityReport::evaluate(self, instance)
    }

    /// Weekly grid view for rendering and export.
    pub fn grid(&self, instance: &Instance) -> WeekGrid {
        WeekGrid::build(self, instance)
    }
}

impl<'a> IntoIterator for &'a Timetable {
    type Item = &'a Assignment;
    type IntoIter = std::collections::btree_set::Iter<'a, Assignment>;

    fn into_iter(self) -> Self::IntoIter {
        self.assignments.iter()
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Timetable {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.assignments.iter())
    }
}
