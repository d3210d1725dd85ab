use super::*;
use crate::instance::fixtures::*;
use crate::instance::{InstanceOptions, ZeroEnrollmentPolicy};

fn kinds(report: &DiagnosticsReport, severity: Severity) -> Vec<FindingKind> {
    report.with_severity(severity).map(|f| f.kind).collect()
}

#[test]
fn solvable_instance_has_no_blocking_findings() {
    let report = diagnose(&single_course());
    assert!(!report.has_blocking(), "{report}");
    // Two rooms only: both session kinds are tight.
    assert_eq!(
        kinds(&report, Severity::Warning),
        vec![FindingKind::RoomCapacity, FindingKind::RoomCapacity]
    );
    assert_eq!(kinds(&report, Severity::Info), vec![FindingKind::GlobalCapacity]);
}

#[test]
fn excluded_zero_enrollment_course_is_flagged() {
    let instance = build(zero_enrollment_input());
    let report = diagnose(&instance);

    let finding = report
        .of_kind(FindingKind::ZeroEnrollment)
        .next()
        .expect("zero enrollment finding");
    assert_eq!(finding.severity, Severity::Warning);
    assert!(finding.involves(EntityKind::Course, "GHOST"));
    assert!(finding.involves(EntityKind::Program, "EMPTY"));
    assert!(finding.message.contains("excluded"));
}

#[test]
fn nominal_zero_enrollment_course_is_flagged() {
    let options = InstanceOptions {
        zero_enrollment: ZeroEnrollmentPolicy::Nominal(20),
        ..InstanceOptions::default()
    };
    let instance = Instance::new(zero_enrollment_input(), &options).unwrap();
    let report = diagnose(&instance);

    let findings: Vec<_> = report.of_kind(FindingKind::ZeroEnrollment).collect();
    assert_eq!(findings.len(), 1);
    assert!(findings[0].involves(EntityKind::Course, "GHOST"));
    assert!(findings[0].message.contains("nominal 20"));
}

#[test]
fn course_without_a_fitting_room_is_blocking() {
    let mut input = single_course_input();
    input.rooms = vec![room("Closet", 30)];
    let report = diagnose(&build(input));

    // 30 seats host a tutorial group (20) but not the lecture (40).
    let blocking: Vec<_> = report.with_severity(Severity::Blocking).collect();
    assert_eq!(blocking.len(), 1);
    assert_eq!(blocking[0].kind, FindingKind::RoomCapacity);
    assert!(blocking[0].message.contains("lecture of ALG"));
    assert!(blocking[0].message.contains("need 40 seats"));
}

#[test]
fn absent_lecturer_is_blocking() {
    let report = diagnose(&absent_lecturer());
    let finding = report
        .of_kind(FindingKind::LecturerLoad)
        .next()
        .expect("lecturer load finding");
    assert_eq!(finding.severity, Severity::Blocking);
    assert!(finding.involves(EntityKind::Lecturer, "Tom"));
    assert!(finding.involves(EntityKind::Course, "ALG"));
    assert!(finding.message.contains("available for 0 slots"));
}

#[test]
fn long_course_overflows_the_week() {
    let mut input = single_course_input();
    input.courses[0].timeline = vec![SessionKind::Lecture; 3];
    input.days = 2;
    input.timeslots = 1;
    let report = diagnose(&build(input));

    // Two rooms still offer four room-slots for three lectures.
    assert_eq!(
        kinds(&report, Severity::Blocking),
        vec![
            FindingKind::CourseLoad,
            FindingKind::LecturerLoad,
            FindingKind::ProgramLoad
        ]
    );
}

#[test]
fn demand_above_room_slots_is_blocking() {
    let mut input = shared_course_input();
    input.rooms = vec![room("Aula", 100)];
    input.days = 1;
    input.timeslots = 2;
    let report = diagnose(&build(input));
    let finding = report
        .of_kind(FindingKind::GlobalCapacity)
        .next()
        .expect("global finding");
    assert_eq!(finding.severity, Severity::Blocking);
    assert_eq!(
        finding.message,
        "3 assignments needed but only 2 room-slots exist"
    );
}

#[test]
fn multi_course_lecturer_gets_a_note() {
    let report = diagnose(&busy_lecturer());
    let note = report
        .of_kind(FindingKind::MultiCourseLecturer)
        .next()
        .expect("multi-course note");
    assert_eq!(note.severity, Severity::Info);
    assert!(note.involves(EntityKind::Course, "A"));
    assert!(note.involves(EntityKind::Course, "B"));
    assert!(!report.has_blocking());
}

#[test]
fn utilisation_is_reported() {
    let report = diagnose(&single_course());
    let note = report
        .of_kind(FindingKind::GlobalCapacity)
        .next()
        .expect("utilisation note");
    // 3 assignments over 2 days x 2 timeslots x 2 rooms.
    assert_eq!(
        note.message,
        "3 assignments over 8 room-slots (37.5% utilisation)"
    );
}

#[test]
fn display_ends_with_a_summary() {
    let text = diagnose(&absent_lecturer()).to_string();
    assert!(text.lines().any(|l| l.starts_with("[blocking] Tom teaches 2 sessions")));
    assert!(text.ends_with("1 blocking, 2 warning(s), 1 note(s)"));
}
