//! Static feasibility checks over an instance, run before solving.
//!
//! Every [`Severity::Blocking`] finding is a proof that no timetable exists.
//! The converse does not hold: an instance without blocking findings can
//! still be infeasible, only a solver can tell.
//!
//! ```
//! use coursegrid::diagnostics::diagnose;
//! use coursegrid::instance::{Instance, InstanceInput, InstanceOptions};
//!
//! let instance = Instance::new(InstanceInput::new(), &InstanceOptions::default()).unwrap();
//! let report = diagnose(&instance);
//! assert!(!report.has_blocking());
//! ```

mod finding;

#[cfg(test)]
mod tests;

use std::fmt;

use log::{info, warn};

use crate::instance::{EntityKind, Instance, SessionKind};
use crate::model::capacity;

pub use finding::{EntityRef, Finding, FindingKind, Severity};

/// Rooms below this count for a session kind give a warning.
pub const FEW_ROOMS: usize = 3;

/// Findings in the order the checks ran.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DiagnosticsReport {
    findings: Vec<Finding>,
}

impl DiagnosticsReport {
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.severity == severity)
    }

    pub fn of_kind(&self, kind: FindingKind) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.kind == kind)
    }

    /// True when some check proves the instance infeasible.
    pub fn has_blocking(&self) -> bool {
        self.findings.iter().any(|f| f.severity == Severity::Blocking)
    }

    fn count(&self, severity: Severity) -> usize {
        self.with_severity(severity).count()
    }

    fn push(&mut self, finding: Finding) {
        self.findings.push(finding);
    }
}

impl fmt::Display for DiagnosticsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for finding in &self.findings {
            writeln!(f, "{finding}")?;
        }
        write!(
            f,
            "{} blocking, {} warning(s), {} note(s)",
            self.count(Severity::Blocking),
            self.count(Severity::Warning),
            self.count(Severity::Info)
        )
    }
}

/// Runs every check on `instance`.
pub fn diagnose(instance: &Instance) -> DiagnosticsReport {
    let mut report = DiagnosticsReport::default();

    check_zero_enrollment(instance, &mut report);
    check_rooms(instance, &mut report);
    check_course_load(instance, &mut report);
    check_lecturer_load(instance, &mut report);
    check_program_load(instance, &mut report);
    check_global_capacity(instance, &mut report);

    let blocking = report.count(Severity::Blocking);
    if blocking > 0 {
        warn!("Diagnostics: {blocking} blocking finding(s), the instance is infeasible");
    }
    info!(
        "Diagnostics: {} finding(s), {} blocking, {} warning(s)",
        report.len(),
        blocking,
        report.count(Severity::Warning)
    );
    report
}

/// Courses nobody enrolls in, whether excluded or kept with a nominal size.
fn check_zero_enrollment(instance: &Instance, report: &mut DiagnosticsReport) {
    for excluded in instance.excluded_courses() {
        let listed = if excluded.listed_by.is_empty() {
            "no program".to_string()
        } else {
            excluded.listed_by.join(", ")
        };
        let mut finding = Finding::new(
            Severity::Warning,
            FindingKind::ZeroEnrollment,
            format!(
                "Course {} has no enrolled students (listed by {listed}); it was excluded",
                excluded.id
            ),
        )
        .about(EntityKind::Course, excluded.id.as_str());
        for program in &excluded.listed_by {
            finding = finding.about(EntityKind::Program, program.as_str());
        }
        report.push(finding);
    }

    for course in instance.courses().iter().filter(|c| c.enrolled() == 0) {
        let basis = instance.capacity_basis(course);
        let mut finding = Finding::new(
            Severity::Warning,
            FindingKind::ZeroEnrollment,
            format!(
                "Course {} has no enrolled students; rooms are sized for a nominal {basis}",
                course.id()
            ),
        )
        .about(EntityKind::Course, course.id());
        for program in course.programs() {
            finding = finding.about(EntityKind::Program, program.as_str());
        }
        report.push(finding);
    }
}

/// Rooms meeting the capacity fraction, per course and session kind.
fn check_rooms(instance: &Instance, report: &mut DiagnosticsReport) {
    for course in instance.courses() {
        let basis = instance.capacity_basis(course);
        for kind in [SessionKind::Lecture, SessionKind::Tutorial] {
            if !course.timeline().contains(&kind) {
                continue;
            }
            let fitting = instance
                .rooms()
                .iter()
                .filter(|r| capacity::meets(kind, r.capacity(), basis))
                .count();
            let seats = capacity::required_seats(kind, basis);
            let finding = if fitting == 0 {
                Finding::new(
                    Severity::Blocking,
                    FindingKind::RoomCapacity,
                    format!(
                        "No room can host a {kind} of {} ({basis} students, need {seats} seats)",
                        course.id()
                    ),
                )
            } else if fitting < FEW_ROOMS {
                Finding::new(
                    Severity::Warning,
                    FindingKind::RoomCapacity,
                    format!(
                        "Only {fitting} room(s) can host a {kind} of {} (need {seats} seats)",
                        course.id()
                    ),
                )
            } else {
                continue;
            };
            report.push(finding.about(EntityKind::Course, course.id()));
        }
    }
}

/// Consecutive sessions of a course take strictly increasing slots.
fn check_course_load(instance: &Instance, report: &mut DiagnosticsReport) {
    let slots = instance.slot_count();
    for course in instance.courses() {
        let sessions = course.session_count();
        if sessions > slots {
            report.push(
                Finding::new(
                    Severity::Blocking,
                    FindingKind::CourseLoad,
                    format!(
                        "Course {} has {sessions} sessions but the week has {slots} slots",
                        course.id()
                    ),
                )
                .about(EntityKind::Course, course.id()),
            );
        }
    }
}

/// A lecturer teaches at most one session per available slot.
fn check_lecturer_load(instance: &Instance, report: &mut DiagnosticsReport) {
    for lecturer in instance.lecturers() {
        let courses: Vec<_> = instance.courses_of_lecturer(lecturer.id()).collect();
        if courses.is_empty() {
            continue;
        }
        let sessions: usize = courses.iter().map(|c| c.session_count()).sum();
        let available_days = instance.days().filter(|&d| lecturer.is_available(d)).count();
        let available = available_days * instance.timeslot_count() as usize;

        if sessions > available {
            let mut finding = Finding::new(
                Severity::Blocking,
                FindingKind::LecturerLoad,
                format!(
                    "{} teaches {sessions} sessions but is available for {available} slots ({available_days} day(s))",
                    lecturer.id()
                ),
            )
            .about(EntityKind::Lecturer, lecturer.id());
            for course in &courses {
                finding = finding.about(EntityKind::Course, course.id());
            }
            report.push(finding);
        }

        if courses.len() > 1 {
            let ids: Vec<_> = courses.iter().map(|c| c.id()).collect();
            let mut finding = Finding::new(
                Severity::Info,
                FindingKind::MultiCourseLecturer,
                format!(
                    "{} teaches {} courses ({}), {sessions} sessions in {available} available slots",
                    lecturer.id(),
                    courses.len(),
                    ids.join(", ")
                ),
            )
            .about(EntityKind::Lecturer, lecturer.id());
            for id in ids {
                finding = finding.about(EntityKind::Course, id);
            }
            report.push(finding);
        }
    }
}

/// A program attends at most one session per slot.
fn check_program_load(instance: &Instance, report: &mut DiagnosticsReport) {
    let slots = instance.slot_count();
    for program in instance.programs() {
        let sessions: usize = program
            .courses()
            .iter()
            .filter_map(|id| instance.course(id))
            .map(|c| c.session_count())
            .sum();
        if sessions > slots {
            report.push(
                Finding::new(
                    Severity::Blocking,
                    FindingKind::ProgramLoad,
                    format!(
                        "Program {} needs {sessions} sessions but the week has {slots} slots",
                        program.id()
                    ),
                )
                .about(EntityKind::Program, program.id()),
            );
        }
    }
}

/// Assignments needed against room-slots offered, plus the utilisation.
fn check_global_capacity(instance: &Instance, report: &mut DiagnosticsReport) {
    let demand = instance.required_assignments();
    let supply = instance.slot_count() * instance.rooms().len();

    if demand > supply {
        report.push(Finding::new(
            Severity::Blocking,
            FindingKind::GlobalCapacity,
            format!("{demand} assignments needed but only {supply} room-slots exist"),
        ));
    } else if supply > 0 {
        let utilisation = 100.0 * demand as f64 / supply as f64;
        report.push(Finding::new(
            Severity::Info,
            FindingKind::GlobalCapacity,
            format!("{demand} assignments over {supply} room-slots ({utilisation:.1}% utilisation)"),
        ));
    }
}
