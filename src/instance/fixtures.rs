//! Small instances shared by the unit tests of every module.

use chrono::NaiveDate;

use super::*;

pub fn week() -> NaiveDate {
    DEFAULT_REFERENCE_MONDAY
}

pub fn program(id: &str, size: u32, courses: &[&str]) -> ProgramInput {
    ProgramInput {
        id: id.to_string(),
        size,
        courses: courses.iter().map(|c| c.to_string()).collect(),
    }
}

pub fn course(id: &str, timeline: &[SessionKind], lecturer: &str) -> CourseInput {
    CourseInput {
        id: id.to_string(),
        name: format!("{id} course"),
        timeline: timeline.to_vec(),
        lecturer: lecturer.to_string(),
    }
}

pub fn room(id: &str, capacity: u32) -> RoomInput {
    RoomInput {
        id: id.to_string(),
        capacity,
    }
}

pub fn lecturer(id: &str, unavailable_days: &[u8]) -> LecturerInput {
    LecturerInput {
        id: id.to_string(),
        unavailable: unavailable_days
            .iter()
            .map(|d| week() + chrono::Duration::days(*d as i64))
            .collect(),
    }
}

pub fn build(input: InstanceInput) -> Instance {
    Instance::new(input, &InstanceOptions::default()).unwrap()
}

/// One course (lecture then tutorial), rooms of 100 and 50 seats, one
/// program of 80 students, 2 days x 2 timeslots.
pub fn single_course_input() -> InstanceInput {
    InstanceInput {
        programs: vec![program("CS_Y1", 80, &["ALG"])],
        courses: vec![course(
            "ALG",
            &[SessionKind::Lecture, SessionKind::Tutorial],
            "Tom",
        )],
        rooms: vec![room("Aula", 100), room("B1", 50)],
        lecturers: vec![lecturer("Tom", &[])],
        days: 2,
        timeslots: 2,
    }
}

pub fn single_course() -> Instance {
    build(single_course_input())
}

/// The sole lecturer is unavailable on every weekday.
pub fn absent_lecturer() -> Instance {
    let mut input = single_course_input();
    input.lecturers = vec![lecturer("Tom", &[0, 1, 2, 3, 4])];
    input.days = 5;
    input.timeslots = 4;
    build(input)
}

/// A course listed only by an empty program, next to a regular one.
pub fn zero_enrollment_input() -> InstanceInput {
    InstanceInput {
        programs: vec![
            program("CS_Y1", 60, &["ALG"]),
            program("EMPTY", 0, &["GHOST"]),
        ],
        courses: vec![
            course("ALG", &[SessionKind::Lecture], "Tom"),
            course("GHOST", &[SessionKind::Lecture, SessionKind::Tutorial], "Ann"),
        ],
        rooms: vec![room("Aula", 100), room("B1", 40)],
        lecturers: vec![lecturer("Tom", &[]), lecturer("Ann", &[])],
        days: 2,
        timeslots: 2,
    }
}

/// Two programs sharing `SHARED`, plus one course each of their own.
pub fn shared_course_input() -> InstanceInput {
    InstanceInput {
        programs: vec![
            program("CS_Y1", 40, &["SHARED", "CS1"]),
            program("EE_Y1", 30, &["SHARED", "EE1"]),
        ],
        courses: vec![
            course("SHARED", &[SessionKind::Lecture], "Tom"),
            course("CS1", &[SessionKind::Lecture], "Ann"),
            course("EE1", &[SessionKind::Lecture], "Bob"),
        ],
        rooms: vec![room("Aula", 100), room("B1", 50)],
        lecturers: vec![lecturer("Tom", &[]), lecturer("Ann", &[]), lecturer("Bob", &[])],
        days: 2,
        timeslots: 2,
    }
}

pub fn shared_course() -> Instance {
    build(shared_course_input())
}

/// A lecturer teaching two courses followed by disjoint programs.
pub fn busy_lecturer_input() -> InstanceInput {
    InstanceInput {
        programs: vec![program("CS_Y1", 40, &["A"]), program("EE_Y1", 40, &["B"])],
        courses: vec![
            course("A", &[SessionKind::Lecture, SessionKind::Lecture], "Tom"),
            course("B", &[SessionKind::Lecture], "Tom"),
        ],
        rooms: vec![room("Aula", 100), room("B1", 100)],
        lecturers: vec![lecturer("Tom", &[])],
        days: 1,
        timeslots: 3,
    }
}

pub fn busy_lecturer() -> Instance {
    build(busy_lecturer_input())
}
