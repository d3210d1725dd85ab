//! Week-by-day-by-timeslot view of a timetable.
//!
//! The grid always spans the full five-day, four-timeslot week, even when the
//! instance uses a smaller grid, so consumers can rely on a fixed shape.

use std::fmt;

use crate::instance::{
    Day, Instance, SessionKind, Slot, Timeslot, DAYS_PER_WEEK, TIMESLOTS_PER_DAY,
};
use crate::Id;

use super::Timetable;

/// Label of the only week the grid covers.
pub const WEEK_LABEL: &str = "week_1";

/// One rendered assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GridEntry {
    pub course: Id,
    pub course_name: String,
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub kind: SessionKind,
    /// Index of the session in the course timeline.
    pub session: usize,
    pub room: Id,
    pub lecturer: Id,
    /// First program following the course.
    pub program: Option<Id>,
    pub programs: Vec<Id>,
    /// Tutorial group, 1 or 2. `None` for lectures.
    pub group: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekGrid {
    /// `cells[slot.index()]`, entries in assignment key order.
    cells: Vec<Vec<GridEntry>>,
}

impl WeekGrid {
    pub fn build(timetable: &Timetable, instance: &Instance) -> Self {
        let mut cells = vec![Vec::new(); DAYS_PER_WEEK as usize * TIMESLOTS_PER_DAY as usize];
        let mut group_of_previous: Option<(&crate::instance::SessionRef, u8)> = None;

        for a in timetable.iter() {
            let Some(course) = instance.course(a.course()) else {
                continue;
            };
            let kind = instance
                .session_kind(&a.session)
                .unwrap_or(SessionKind::Lecture);
            let group = match kind {
                SessionKind::Lecture => None,
                SessionKind::Tutorial => {
                    let g = match group_of_previous {
                        Some((prev, g)) if prev == &a.session => g + 1,
                        _ => 1,
                    };
                    group_of_previous = Some((&a.session, g));
                    Some(g)
                }
            };
            cells[a.slot.index()].push(GridEntry {
                course: course.id.clone(),
                course_name: course.name.clone(),
                kind,
                session: a.session.index,
                room: a.room.clone(),
                lecturer: course.lecturer.clone(),
                program: course.programs.first().cloned(),
                programs: course.programs.clone(),
                group,
            });
        }

        Self { cells }
    }

    pub fn entries_at(&self, slot: Slot) -> &[GridEntry] {
        &self.cells[slot.index()]
    }

    /// Every slot of the week with its entries, in rank order.
    pub fn iter(&self) -> impl Iterator<Item = (Slot, &[GridEntry])> {
        self.cells.iter().enumerate().filter_map(|(i, entries)| {
            Slot::from_index(i).map(|slot| (slot, entries.as_slice()))
        })
    }

    /// Total number of entries across the week.
    pub fn entry_count(&self) -> usize {
        self.cells.iter().map(Vec::len).sum()
    }
}

impl fmt::Display for WeekGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for day in Day::all() {
            writeln!(f, "{day}")?;
            for ts in Timeslot::all() {
                let entries = self.entries_at(Slot::new(day, ts));
                if entries.is_empty() {
                    continue;
                }
                for e in entries {
                    write!(f, "  {}  {} {} in {} ({})", ts.span(), e.course, e.kind, e.room, e.lecturer)?;
                    if let Some(g) = e.group {
                        write!(f, " group {g}")?;
                    }
                    writeln!(f)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(feature = "serde")]
mod wire {
    use serde::ser::{Serialize, SerializeMap, Serializer};

    use super::*;

    struct DayCells<'a> {
        grid: &'a WeekGrid,
        day: Day,
    }

    impl Serialize for DayCells<'_> {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut map = serializer.serialize_map(Some(TIMESLOTS_PER_DAY as usize))?;
            for ts in Timeslot::all() {
                map.serialize_entry(ts.label(), self.grid.entries_at(Slot::new(self.day, ts)))?;
            }
            map.end()
        }
    }

    struct Week<'a>(&'a WeekGrid);

    impl Serialize for Week<'_> {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut map = serializer.serialize_map(Some(DAYS_PER_WEEK as usize))?;
            for day in Day::all() {
                map.serialize_entry(day.name(), &DayCells { grid: self.0, day })?;
            }
            map.end()
        }
    }

    impl Serialize for WeekGrid {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut map = serializer.serialize_map(Some(1))?;
            map.serialize_entry(WEEK_LABEL, &Week(self))?;
            map.end()
        }
    }
}
