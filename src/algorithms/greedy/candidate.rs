//! A session waiting to be placed, with its resolved indices and room order.

use crate::config::LargeLectureRule;
use crate::instance::{EntityKind, Instance, SessionKind, SessionRef};
use crate::model::ModelError;

use super::ordering::room_order;

#[derive(Debug, Clone)]
pub struct Candidate {
    pub(crate) session: SessionRef,
    pub(crate) kind: SessionKind,
    pub(crate) course: usize,
    pub(crate) lecturer: usize,
    pub(crate) programs: Vec<usize>,
    /// Capacity-feasible rooms in the order they are tried.
    pub(crate) rooms: Vec<usize>,
}

impl Candidate {
    /// Resolves session `index` of course `course`.
    ///
    /// # Errors
    ///
    /// `UnknownEntity` if the course, its lecturer or one of its programs
    /// cannot be found in `instance`.
    pub fn new(
        instance: &Instance,
        course: usize,
        index: usize,
        rule: Option<&LargeLectureRule>,
    ) -> Result<Self, ModelError> {
        let unknown = |kind, id: &str| ModelError::UnknownEntity {
            kind,
            id: id.to_string(),
        };
        let c = instance
            .courses()
            .get(course)
            .ok_or_else(|| unknown(EntityKind::Course, &course.to_string()))?;
        let kind = c
            .timeline
            .get(index)
            .copied()
            .ok_or_else(|| unknown(EntityKind::Course, &c.id))?;
        let lecturer = instance
            .lecturer_index(&c.lecturer)
            .ok_or_else(|| unknown(EntityKind::Lecturer, &c.lecturer))?;
        let programs = c
            .programs
            .iter()
            .map(|p| {
                instance
                    .program_index(p)
                    .ok_or_else(|| unknown(EntityKind::Program, p))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            session: SessionRef::new(c.id.clone(), index),
            kind,
            course,
            lecturer,
            programs,
            rooms: room_order(instance, c, kind, rule),
        })
    }

    pub fn session(&self) -> &SessionRef {
        &self.session
    }

    pub fn required(&self) -> usize {
        self.kind.required_assignments()
    }

    /// True when no room at all can hold the session.
    pub fn is_impossible(&self) -> bool {
        self.rooms.is_empty()
    }
}
