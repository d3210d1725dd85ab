//! Independent re-check of a timetable against an instance.
//!
//! [`verify`] recomputes every invariant from the raw assignments. It does
//! not look at the model or at how the timetable was produced, it does not
//! rely on assignment order, and it collects every violation rather than
//! stopping at the first one. Calling it twice yields equal reports.
//!
//! A session with missing assignments and an assignment that cannot be
//! resolved against the instance are both breaches of the first invariant.

mod report;
mod violation;

#[cfg(test)]
mod tests;

use std::collections::{BTreeMap, BTreeSet};

use log::debug;

use crate::instance::{Course, Instance, SessionRef, Slot};
use crate::model::capacity;
use crate::timetable::{Assignment, Timetable};
use crate::Id;

pub use report::VerificationReport;
pub use violation::{Invariant, Malformation, Violation};

/// Checks `timetable` against every invariant of `instance`.
pub fn verify(timetable: &Timetable, instance: &Instance) -> VerificationReport {
    let mut report = VerificationReport::new();
    let resolved = resolve(timetable, instance, &mut report);

    check_session_counts(timetable, instance, &mut report);
    check_rooms(timetable, &mut report);
    check_lecturers(&resolved, &mut report);
    check_availability(&resolved, instance, &mut report);
    check_programs(&resolved, &mut report);
    check_capacity(&resolved, instance, &mut report);
    check_order(timetable, instance, &mut report);

    debug!(
        "Verified {} assignments: {} violation(s)",
        timetable.len(),
        report.violation_count()
    );
    report
}

/// An assignment whose course and room exist in the instance.
struct Resolved<'a> {
    assignment: &'a Assignment,
    course: &'a Course,
    capacity: u32,
}

fn malformation(assignment: &Assignment, instance: &Instance) -> Option<Malformation> {
    let Some(course) = instance.course(assignment.course()) else {
        return Some(Malformation::UnknownCourse);
    };
    if assignment.session.index >= course.session_count() {
        Some(Malformation::UnknownSession)
    } else if instance.room(&assignment.room).is_none() {
        Some(Malformation::UnknownRoom)
    } else if !instance.contains_slot(assignment.slot) {
        Some(Malformation::SlotOutsideGrid)
    } else {
        None
    }
}

fn resolve<'a>(
    timetable: &'a Timetable,
    instance: &'a Instance,
    report: &mut VerificationReport,
) -> Vec<Resolved<'a>> {
    let mut resolved = Vec::with_capacity(timetable.len());
    for assignment in timetable {
        if let Some(problem) = malformation(assignment, instance) {
            report.record(Violation::MalformedAssignment {
                assignment: assignment.clone(),
                problem,
            });
            continue;
        }
        if let (Some(course), Some(room)) = (
            instance.course(assignment.course()),
            instance.room(&assignment.room),
        ) {
            resolved.push(Resolved {
                assignment,
                course,
                capacity: room.capacity(),
            });
        }
    }
    resolved
}

fn check_session_counts(timetable: &Timetable, instance: &Instance, report: &mut VerificationReport) {
    for (session, kind) in instance.sessions() {
        let expected = kind.required_assignments();
        let actual = timetable.for_session(&session).count();
        if actual != expected {
            report.record(Violation::SessionCount {
                session,
                kind,
                expected,
                actual,
            });
        }
    }
}

fn check_rooms(timetable: &Timetable, report: &mut VerificationReport) {
    let mut by_room: BTreeMap<(&str, Slot), Vec<SessionRef>> = BTreeMap::new();
    for a in timetable {
        by_room
            .entry((a.room.as_str(), a.slot))
            .or_default()
            .push(a.session.clone());
    }
    for ((room, slot), sessions) in by_room {
        if sessions.len() > 1 {
            report.record(Violation::RoomConflict {
                room: room.to_string(),
                slot,
                sessions,
            });
        }
    }
}

fn check_lecturers(resolved: &[Resolved<'_>], report: &mut VerificationReport) {
    let mut by_lecturer: BTreeMap<(&str, Slot), BTreeSet<&str>> = BTreeMap::new();
    for r in resolved {
        by_lecturer
            .entry((r.course.lecturer(), r.assignment.slot))
            .or_default()
            .insert(r.course.id());
    }
    for ((lecturer, slot), courses) in by_lecturer {
        if courses.len() > 1 {
            report.record(Violation::LecturerConflict {
                lecturer: lecturer.to_string(),
                slot,
                courses: courses.into_iter().map(Id::from).collect(),
            });
        }
    }
}

fn check_availability(resolved: &[Resolved<'_>], instance: &Instance, report: &mut VerificationReport) {
    for r in resolved {
        let Some(lecturer) = instance.lecturer_of(r.course) else {
            continue;
        };
        let day = r.assignment.slot.day;
        if !lecturer.is_available(day) {
            report.record(Violation::UnavailableLecturer {
                lecturer: lecturer.id().to_string(),
                date: instance.reference_week().date_of(day),
                assignment: r.assignment.clone(),
            });
        }
    }
}

/// Sessions are deduplicated per program and slot, so the two groups of a
/// tutorial and a course shared by several programs count once.
fn check_programs(resolved: &[Resolved<'_>], report: &mut VerificationReport) {
    let mut by_program: BTreeMap<(&str, Slot), BTreeSet<&SessionRef>> = BTreeMap::new();
    for r in resolved {
        for program in r.course.programs() {
            by_program
                .entry((program.as_str(), r.assignment.slot))
                .or_default()
                .insert(&r.assignment.session);
        }
    }
    for ((program, slot), sessions) in by_program {
        if sessions.len() > 1 {
            report.record(Violation::ProgramConflict {
                program: program.to_string(),
                slot,
                sessions: sessions.into_iter().cloned().collect(),
            });
        }
    }
}

fn check_capacity(resolved: &[Resolved<'_>], instance: &Instance, report: &mut VerificationReport) {
    for r in resolved {
        let Some(&kind) = r.course.timeline().get(r.assignment.session.index) else {
            continue;
        };
        let enrolled = instance.capacity_basis(r.course);
        if !capacity::meets(kind, r.capacity, enrolled) {
            report.record(Violation::CapacityViolation {
                assignment: r.assignment.clone(),
                capacity: r.capacity,
                required: capacity::required_seats(kind, enrolled),
                enrolled,
            });
        }
    }
}

/// Every assignment of session `i` must lie strictly before every assignment
/// of session `i + 1`. Sessions without assignments are left to the count
/// check.
fn check_order(timetable: &Timetable, instance: &Instance, report: &mut VerificationReport) {
    for course in instance.courses() {
        let slots: Vec<BTreeSet<Slot>> = course
            .sessions()
            .map(|(session, _)| timetable.session_slots(&session))
            .collect();
        for (index, pair) in slots.windows(2).enumerate() {
            let (Some(&latest), Some(&earliest_next)) = (pair[0].last(), pair[1].first()) else {
                continue;
            };
            if latest.rank() >= earliest_next.rank() {
                let session = SessionRef::new(course.id(), index);
                report.record(Violation::OrderingViolation {
                    next: session.next(),
                    session,
                    latest,
                    earliest_next,
                });
            }
        }
    }
}
