//! The problem instance: programs, courses, rooms, lecturers and the weekly grid.
//!
//! An [`Instance`] is built once from an [`InstanceInput`] and is immutable
//! afterwards. Validation happens entirely in [`Instance::new`]: unknown
//! references, duplicate ids and unmappable unavailability dates are
//! [`InstanceError`]s, and the zero-enrollment policy is applied there so
//! that the model builder, both solvers and the verifier all see the same
//! set of courses.

pub mod calendar;
pub mod entities;
pub mod error;

#[cfg(test)]
pub(crate) mod fixtures;

use std::collections::{BTreeSet, HashMap, HashSet};

use chrono::NaiveDate;
use log::{debug, warn};

use crate::Id;
pub use calendar::{
    Day, ReferenceWeek, Slot, Timeslot, DAYS_PER_WEEK, SLOTS_PER_WEEK, TIMESLOTS_PER_DAY,
};
pub use entities::{
    Course, CourseInput, EntityKind, ExcludedCourse, Lecturer, LecturerInput, Program,
    ProgramInput, Room, RoomInput, SessionKind, SessionRef,
};
pub use error::InstanceError;

/// What to do with a course that no student is enrolled in.
///
/// A zero-enrollment course has a minimum room capacity of zero, which every
/// room trivially meets; scheduling it would consume rooms and slots for
/// nobody. There is no universally right answer, so the caller chooses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZeroEnrollmentPolicy {
    /// Remove the course from the instance and from every program's list.
    /// Removed courses are kept in [`Instance::excluded_courses`].
    Exclude,
    /// Fail instance construction with [`InstanceError::ZeroEnrollment`].
    Reject,
    /// Keep the course and size its rooms as if this many students attended.
    /// Must be positive.
    Nominal(u32),
}

/// Monday of the reference week used when none is configured.
pub const DEFAULT_REFERENCE_MONDAY: NaiveDate = match NaiveDate::from_ymd_opt(2025, 10, 27) {
    Some(date) => date,
    None => panic!("invalid default reference Monday"),
};

/// Options applied while building an [`Instance`].
#[derive(Debug, Clone)]
pub struct InstanceOptions {
    /// Monday of the week that unavailability dates are mapped against.
    pub reference_week: NaiveDate,
    pub zero_enrollment: ZeroEnrollmentPolicy,
}

impl Default for InstanceOptions {
    fn default() -> Self {
        Self {
            reference_week: DEFAULT_REFERENCE_MONDAY,
            zero_enrollment: ZeroEnrollmentPolicy::Exclude,
        }
    }
}

/// Raw problem input, as supplied by the parameter store.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InstanceInput {
    pub programs: Vec<ProgramInput>,
    pub courses: Vec<CourseInput>,
    pub rooms: Vec<RoomInput>,
    pub lecturers: Vec<LecturerInput>,
    /// Number of weekdays in use, counted from Monday.
    #[cfg_attr(feature = "serde", serde(default = "default_days"))]
    pub days: u8,
    /// Number of timeslots in use per day, counted from 08:30.
    #[cfg_attr(feature = "serde", serde(default = "default_timeslots"))]
    pub timeslots: u8,
}

#[cfg(feature = "serde")]
fn default_days() -> u8 {
    DAYS_PER_WEEK
}

#[cfg(feature = "serde")]
fn default_timeslots() -> u8 {
    TIMESLOTS_PER_DAY
}

impl InstanceInput {
    /// Empty input over the full 5 x 4 week.
    pub fn new() -> Self {
        Self {
            programs: Vec::new(),
            courses: Vec::new(),
            rooms: Vec::new(),
            lecturers: Vec::new(),
            days: DAYS_PER_WEEK,
            timeslots: TIMESLOTS_PER_DAY,
        }
    }
}

impl Default for InstanceInput {
    fn default() -> Self {
        Self::new()
    }
}

/// A validated, immutable problem instance.
#[derive(Debug, Clone)]
pub struct Instance {
    programs: Vec<Program>,
    courses: Vec<Course>,
    rooms: Vec<Room>,
    lecturers: Vec<Lecturer>,
    days: u8,
    timeslots: u8,
    reference_week: ReferenceWeek,
    excluded: Vec<ExcludedCourse>,
    nominal_enrollment: Option<u32>,
    program_by_id: HashMap<Id, usize>,
    course_by_id: HashMap<Id, usize>,
    room_by_id: HashMap<Id, usize>,
    lecturer_by_id: HashMap<Id, usize>,
}

/// Builds an id → position map, rejecting duplicates.
fn index_ids<'a>(
    kind: EntityKind,
    ids: impl Iterator<Item = &'a Id>,
) -> Result<HashMap<Id, usize>, InstanceError> {
    let mut map = HashMap::new();
    for (i, id) in ids.enumerate() {
        if map.insert(id.clone(), i).is_some() {
            return Err(InstanceError::DuplicateId {
                kind,
                id: id.clone(),
            });
        }
    }
    Ok(map)
}

impl Instance {
    /// Validates `input` and applies `options`.
    ///
    /// # Errors
    ///
    /// - `InvalidGrid` if `days` is not in `1..=5` or `timeslots` not in `1..=4`
    /// - `NotMonday` if the reference week does not start on a Monday
    /// - `DuplicateId` for a repeated program, course, room or lecturer id
    /// - `UnknownLecturer` / `UnknownCourse` for dangling references
    /// - `RepeatedCourse` if a program lists the same course twice
    /// - `DateOutsideWeek` for an unavailability date not on a weekday of
    ///   the reference week
    /// - `ZeroEnrollment` under [`ZeroEnrollmentPolicy::Reject`]
    /// - `ZeroNominalEnrollment` for `ZeroEnrollmentPolicy::Nominal(0)`
    pub fn new(input: InstanceInput, options: &InstanceOptions) -> Result<Self, InstanceError> {
        if !(1..=DAYS_PER_WEEK).contains(&input.days)
            || !(1..=TIMESLOTS_PER_DAY).contains(&input.timeslots)
        {
            return Err(InstanceError::InvalidGrid {
                days: input.days,
                timeslots: input.timeslots,
            });
        }
        if options.zero_enrollment == ZeroEnrollmentPolicy::Nominal(0) {
            return Err(InstanceError::ZeroNominalEnrollment);
        }
        let reference_week = ReferenceWeek::starting(options.reference_week)?;

        index_ids(EntityKind::Program, input.programs.iter().map(|p| &p.id))?;
        let course_ids = index_ids(EntityKind::Course, input.courses.iter().map(|c| &c.id))?;
        index_ids(EntityKind::Room, input.rooms.iter().map(|r| &r.id))?;
        let lecturer_ids =
            index_ids(EntityKind::Lecturer, input.lecturers.iter().map(|l| &l.id))?;

        for course in &input.courses {
            if !lecturer_ids.contains_key(&course.lecturer) {
                return Err(InstanceError::UnknownLecturer {
                    course: course.id.clone(),
                    lecturer: course.lecturer.clone(),
                });
            }
        }

        for program in &input.programs {
            let mut seen = HashSet::new();
            for course in &program.courses {
                if !course_ids.contains_key(course) {
                    return Err(InstanceError::UnknownCourse {
                        program: program.id.clone(),
                        course: course.clone(),
                    });
                }
                if !seen.insert(course) {
                    return Err(InstanceError::RepeatedCourse {
                        program: program.id.clone(),
                        course: course.clone(),
                    });
                }
            }
        }

        let lecturers = input
            .lecturers
            .into_iter()
            .map(|l| {
                let mut unavailable_days = BTreeSet::new();
                for date in &l.unavailable {
                    let day = reference_week.day_of(*date).ok_or_else(|| {
                        InstanceError::DateOutsideWeek {
                            lecturer: l.id.clone(),
                            date: *date,
                            week_start: reference_week.monday(),
                        }
                    })?;
                    unavailable_days.insert(day);
                }
                Ok(Lecturer {
                    id: l.id,
                    unavailable_dates: l.unavailable.into_iter().collect(),
                    unavailable_days,
                })
            })
            .collect::<Result<Vec<_>, InstanceError>>()?;

        let mut courses: Vec<Course> = input
            .courses
            .into_iter()
            .map(|c| {
                let listing: Vec<&ProgramInput> = input
                    .programs
                    .iter()
                    .filter(|p| p.courses.contains(&c.id))
                    .collect();
                let enrolled = listing
                    .iter()
                    .fold(0u32, |acc, p| acc.saturating_add(p.size));
                Course {
                    id: c.id,
                    name: c.name,
                    timeline: c.timeline,
                    lecturer: c.lecturer,
                    enrolled,
                    programs: listing.iter().map(|p| p.id.clone()).collect(),
                }
            })
            .collect();

        let mut programs: Vec<Program> = input
            .programs
            .into_iter()
            .map(|p| Program {
                id: p.id,
                size: p.size,
                courses: p.courses,
            })
            .collect();

        let mut excluded = Vec::new();
        let mut nominal_enrollment = None;
        match options.zero_enrollment {
            ZeroEnrollmentPolicy::Reject => {
                if let Some(course) = courses.iter().find(|c| c.enrolled == 0) {
                    return Err(InstanceError::ZeroEnrollment {
                        course: course.id.clone(),
                    });
                }
            }
            ZeroEnrollmentPolicy::Exclude => {
                let (zero, kept): (Vec<Course>, Vec<Course>) =
                    courses.into_iter().partition(|c| c.enrolled == 0);
                courses = kept;
                for course in zero {
                    warn!(
                        "Excluding course {} ({}): no enrolled students",
                        course.id, course.name
                    );
                    excluded.push(ExcludedCourse {
                        id: course.id,
                        name: course.name,
                        listed_by: course.programs,
                    });
                }
                for program in &mut programs {
                    program
                        .courses
                        .retain(|c| !excluded.iter().any(|e| &e.id == c));
                }
            }
            ZeroEnrollmentPolicy::Nominal(students) => {
                nominal_enrollment = Some(students);
            }
        }

        let program_by_id = index_ids(EntityKind::Program, programs.iter().map(|p| &p.id))?;
        let course_by_id = index_ids(EntityKind::Course, courses.iter().map(|c| &c.id))?;
        let rooms: Vec<Room> = input
            .rooms
            .into_iter()
            .map(|r| Room {
                id: r.id,
                capacity: r.capacity,
            })
            .collect();
        let room_by_id = index_ids(EntityKind::Room, rooms.iter().map(|r| &r.id))?;
        let lecturer_by_id = index_ids(EntityKind::Lecturer, lecturers.iter().map(|l| &l.id))?;

        debug!(
            "Instance: {} programs, {} courses ({} excluded), {} rooms, {} lecturers, {}x{} grid",
            programs.len(),
            courses.len(),
            excluded.len(),
            rooms.len(),
            lecturers.len(),
            input.days,
            input.timeslots
        );

        Ok(Self {
            programs,
            courses,
            rooms,
            lecturers,
            days: input.days,
            timeslots: input.timeslots,
            reference_week,
            excluded,
            nominal_enrollment,
            program_by_id,
            course_by_id,
            room_by_id,
            lecturer_by_id,
        })
    }

    pub fn programs(&self) -> &[Program] {
        &self.programs
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn lecturers(&self) -> &[Lecturer] {
        &self.lecturers
    }

    pub fn program(&self, id: &str) -> Option<&Program> {
        self.program_by_id.get(id).map(|&i| &self.programs[i])
    }

    pub fn course(&self, id: &str) -> Option<&Course> {
        self.course_by_id.get(id).map(|&i| &self.courses[i])
    }

    pub fn room(&self, id: &str) -> Option<&Room> {
        self.room_by_id.get(id).map(|&i| &self.rooms[i])
    }

    pub fn lecturer(&self, id: &str) -> Option<&Lecturer> {
        self.lecturer_by_id.get(id).map(|&i| &self.lecturers[i])
    }

    pub fn program_index(&self, id: &str) -> Option<usize> {
        self.program_by_id.get(id).copied()
    }

    pub fn course_index(&self, id: &str) -> Option<usize> {
        self.course_by_id.get(id).copied()
    }

    pub fn room_index(&self, id: &str) -> Option<usize> {
        self.room_by_id.get(id).copied()
    }

    pub fn lecturer_index(&self, id: &str) -> Option<usize> {
        self.lecturer_by_id.get(id).copied()
    }

    /// Lecturer teaching `course`. Always present for a validated instance.
    pub fn lecturer_of(&self, course: &Course) -> Option<&Lecturer> {
        self.lecturer(&course.lecturer)
    }

    /// Courses taught by `lecturer`, in instance order.
    pub fn courses_of_lecturer<'a>(
        &'a self,
        lecturer: &'a str,
    ) -> impl Iterator<Item = &'a Course> + 'a {
        self.courses.iter().filter(move |c| c.lecturer == lecturer)
    }

    /// Programs requiring `course`, in instance order.
    pub fn programs_of<'a>(&'a self, course: &'a str) -> impl Iterator<Item = &'a Program> + 'a {
        self.programs.iter().filter(move |p| p.requires(course))
    }

    /// Kind of the referenced session, or `None` if the course or index is unknown.
    pub fn session_kind(&self, session: &SessionRef) -> Option<SessionKind> {
        self.course(&session.course)
            .and_then(|c| c.timeline.get(session.index).copied())
    }

    /// Every session of every course, course by course in timeline order.
    pub fn sessions(&self) -> impl Iterator<Item = (SessionRef, SessionKind)> + '_ {
        self.courses.iter().flat_map(|c| c.sessions())
    }

    pub fn session_count(&self) -> usize {
        self.courses.iter().map(|c| c.session_count()).sum()
    }

    /// Total assignments a complete timetable contains.
    pub fn required_assignments(&self) -> usize {
        self.courses.iter().map(|c| c.required_assignments()).sum()
    }

    /// Number of students a course's rooms are sized for.
    ///
    /// This is the course's enrollment, except that a zero-enrollment course
    /// kept under [`ZeroEnrollmentPolicy::Nominal`] uses the nominal figure.
    pub fn capacity_basis(&self, course: &Course) -> u32 {
        if course.enrolled == 0 {
            self.nominal_enrollment.unwrap_or(0)
        } else {
            course.enrolled
        }
    }

    pub fn day_count(&self) -> u8 {
        self.days
    }

    pub fn timeslot_count(&self) -> u8 {
        self.timeslots
    }

    /// Weekdays in use, from Monday.
    pub fn days(&self) -> impl Iterator<Item = Day> {
        (0..self.days).filter_map(Day::new)
    }

    /// Timeslots in use per day, from 08:30.
    pub fn timeslots(&self) -> impl Iterator<Item = Timeslot> {
        (0..self.timeslots).filter_map(Timeslot::new)
    }

    /// Every slot of the grid in rank order.
    pub fn slots(&self) -> impl Iterator<Item = Slot> + '_ {
        self.days()
            .flat_map(move |d| self.timeslots().map(move |t| Slot::new(d, t)))
    }

    pub fn slot_count(&self) -> usize {
        self.days as usize * self.timeslots as usize
    }

    /// Whether `slot` lies inside the grid this instance uses.
    pub fn contains_slot(&self, slot: Slot) -> bool {
        slot.day.ordinal() < self.days && slot.timeslot.ordinal() < self.timeslots
    }

    pub fn reference_week(&self) -> &ReferenceWeek {
        &self.reference_week
    }

    /// Courses removed under [`ZeroEnrollmentPolicy::Exclude`].
    pub fn excluded_courses(&self) -> &[ExcludedCourse] {
        &self.excluded
    }

    /// The nominal enrollment under [`ZeroEnrollmentPolicy::Nominal`].
    pub fn nominal_enrollment(&self) -> Option<u32> {
        self.nominal_enrollment
    }
}
