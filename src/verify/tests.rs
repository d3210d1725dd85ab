use chrono::NaiveDate;

use super::*;
use crate::instance::fixtures::*;
use crate::instance::{Day, SessionKind, Timeslot};

fn slot(day: u8, timeslot: u8) -> Slot {
    Slot::new(Day::new(day).unwrap(), Timeslot::new(timeslot).unwrap())
}

fn at(course: &str, index: usize, day: u8, timeslot: u8, room: &str) -> Assignment {
    Assignment::new(SessionRef::new(course, index), slot(day, timeslot), room)
}

fn timetable(assignments: Vec<Assignment>) -> Timetable {
    Timetable::from_assignments(assignments).unwrap()
}

/// Lecture on Monday 11:00, both tutorial groups on Tuesday 08:30.
fn valid_single_course() -> Timetable {
    timetable(vec![
        at("ALG", 0, 0, 1, "Aula"),
        at("ALG", 1, 1, 0, "Aula"),
        at("ALG", 1, 1, 0, "B1"),
    ])
}

fn only_failure(report: &VerificationReport) -> Invariant {
    let failed: Vec<_> = report.failed_invariants().collect();
    assert_eq!(failed.len(), 1, "unexpected report:\n{report}");
    failed[0]
}

mod counts {
    use super::*;

    #[test]
    fn valid_timetable_passes_every_invariant() {
        let report = verify(&valid_single_course(), &single_course());
        assert!(report.is_valid(), "{report}");
        assert_eq!(report.violation_count(), 0);
        for invariant in Invariant::ALL {
            assert!(report.passed(invariant));
        }
    }

    #[test]
    fn missing_tutorial_group() {
        let t = timetable(vec![at("ALG", 0, 0, 1, "Aula"), at("ALG", 1, 1, 0, "B1")]);
        let report = verify(&t, &single_course());
        assert_eq!(only_failure(&report), Invariant::SessionCount);
        assert_eq!(
            report.violations(Invariant::SessionCount),
            &[Violation::SessionCount {
                session: SessionRef::new("ALG", 1),
                kind: SessionKind::Tutorial,
                expected: 2,
                actual: 1,
            }]
        );
    }

    #[test]
    fn empty_timetable_misses_every_session() {
        let report = verify(&Timetable::empty(), &single_course());
        let violations = report.violations(Invariant::SessionCount);
        assert_eq!(violations.len(), 2);
        assert!(violations
            .iter()
            .all(|v| matches!(v, Violation::SessionCount { actual: 0, .. })));
    }

    #[test]
    fn extra_lecture_assignment() {
        let mut assignments: Vec<_> = valid_single_course().iter().cloned().collect();
        assignments.push(at("ALG", 0, 0, 1, "B1"));
        let report = verify(&timetable(assignments), &single_course());
        assert!(matches!(
            report.violations(Invariant::SessionCount),
            [Violation::SessionCount {
                expected: 1,
                actual: 2,
                ..
            }]
        ));
    }

    #[test]
    fn unresolvable_assignments_are_malformed() {
        let mut assignments: Vec<_> = valid_single_course().iter().cloned().collect();
        assignments.push(at("NOPE", 0, 0, 0, "Aula"));
        assignments.push(at("ALG", 5, 0, 0, "Aula"));
        let report = verify(&timetable(assignments), &single_course());

        let problems: Vec<_> = report
            .violations(Invariant::SessionCount)
            .iter()
            .filter_map(|v| match v {
                Violation::MalformedAssignment { problem, .. } => Some(*problem),
                _ => None,
            })
            .collect();
        assert_eq!(
            problems,
            vec![Malformation::UnknownSession, Malformation::UnknownCourse]
        );
    }

    #[test]
    fn unknown_room_and_slot_outside_grid() {
        let t = timetable(vec![
            at("ALG", 0, 0, 1, "Cellar"),
            at("ALG", 1, 4, 0, "Aula"),
            at("ALG", 1, 4, 0, "B1"),
        ]);
        let report = verify(&t, &single_course());
        let problems: Vec<_> = report
            .violations(Invariant::SessionCount)
            .iter()
            .filter_map(|v| match v {
                Violation::MalformedAssignment { problem, .. } => Some(*problem),
                _ => None,
            })
            .collect();
        assert_eq!(
            problems,
            vec![
                Malformation::UnknownRoom,
                Malformation::SlotOutsideGrid,
                Malformation::SlotOutsideGrid
            ]
        );
    }
}

mod conflicts {
    use super::*;

    #[test]
    fn room_double_booking_reports_both_sessions() {
        let t = timetable(vec![
            at("SHARED", 0, 1, 1, "Aula"),
            at("CS1", 0, 0, 1, "Aula"),
            at("EE1", 0, 0, 1, "Aula"),
        ]);
        let report = verify(&t, &shared_course());
        assert_eq!(only_failure(&report), Invariant::RoomConflict);
        assert_eq!(
            report.violations(Invariant::RoomConflict),
            &[Violation::RoomConflict {
                room: "Aula".into(),
                slot: slot(0, 1),
                sessions: vec![SessionRef::new("CS1", 0), SessionRef::new("EE1", 0)],
            }]
        );
    }

    #[test]
    fn lecturer_teaching_two_courses_at_once() {
        let t = timetable(vec![
            at("A", 0, 0, 0, "Aula"),
            at("A", 1, 0, 1, "Aula"),
            at("B", 0, 0, 0, "B1"),
        ]);
        let report = verify(&t, &busy_lecturer());
        assert_eq!(only_failure(&report), Invariant::LecturerConflict);
        assert_eq!(
            report.violations(Invariant::LecturerConflict),
            &[Violation::LecturerConflict {
                lecturer: "Tom".into(),
                slot: slot(0, 0),
                courses: vec!["A".into(), "B".into()],
            }]
        );
    }

    #[test]
    fn parallel_tutorial_groups_share_their_lecturer() {
        let report = verify(&valid_single_course(), &single_course());
        assert!(report.passed(Invariant::LecturerConflict));
    }

    #[test]
    fn lecturer_on_an_unavailable_day() {
        let mut input = single_course_input();
        input.lecturers = vec![lecturer("Tom", &[0])];
        let instance = build(input);

        let report = verify(&valid_single_course(), &instance);
        assert_eq!(only_failure(&report), Invariant::LecturerAvailability);
        assert_eq!(
            report.violations(Invariant::LecturerAvailability),
            &[Violation::UnavailableLecturer {
                lecturer: "Tom".into(),
                date: NaiveDate::from_ymd_opt(2025, 10, 27).unwrap(),
                assignment: at("ALG", 0, 0, 1, "Aula"),
            }]
        );
    }

    #[test]
    fn undersized_room() {
        let mut input = single_course_input();
        input.rooms.push(room("Tiny", 30));
        let instance = build(input);
        let t = timetable(vec![
            at("ALG", 0, 0, 1, "Tiny"),
            at("ALG", 1, 1, 0, "Aula"),
            at("ALG", 1, 1, 0, "Tiny"),
        ]);
        let report = verify(&t, &instance);
        // The tutorial group needs 20 seats and fits; the lecture needs 40.
        assert_eq!(only_failure(&report), Invariant::RoomCapacity);
        assert_eq!(
            report.violations(Invariant::RoomCapacity),
            &[Violation::CapacityViolation {
                assignment: at("ALG", 0, 0, 1, "Tiny"),
                capacity: 30,
                required: 40,
                enrolled: 80,
            }]
        );
    }
}

mod ordering {
    use super::*;

    #[test]
    fn tutorial_before_lecture() {
        let t = timetable(vec![
            at("ALG", 0, 1, 0, "Aula"),
            at("ALG", 1, 0, 1, "Aula"),
            at("ALG", 1, 0, 1, "B1"),
        ]);
        let report = verify(&t, &single_course());
        assert_eq!(only_failure(&report), Invariant::SessionOrder);
        assert_eq!(
            report.violations(Invariant::SessionOrder),
            &[Violation::OrderingViolation {
                session: SessionRef::new("ALG", 0),
                latest: slot(1, 0),
                next: SessionRef::new("ALG", 1),
                earliest_next: slot(0, 1),
            }]
        );
    }

    #[test]
    fn tutorial_group_sharing_the_lecture_slot() {
        let t = timetable(vec![
            at("ALG", 0, 0, 1, "Aula"),
            at("ALG", 1, 0, 1, "B1"),
            at("ALG", 1, 1, 0, "Aula"),
        ]);
        let report = verify(&t, &single_course());
        assert!(!report.passed(Invariant::SessionOrder));
    }

    #[test]
    fn missing_session_is_not_an_ordering_breach() {
        let t = timetable(vec![at("ALG", 1, 1, 0, "Aula"), at("ALG", 1, 1, 0, "B1")]);
        let report = verify(&t, &single_course());
        assert_eq!(only_failure(&report), Invariant::SessionCount);
    }
}

/// Programs and the deduplication of sessions per slot.
mod programs {
    use super::*;

    #[test]
    fn programs_without_common_courses_may_share_a_slot() {
        let t = timetable(vec![
            at("CS1", 0, 0, 1, "Aula"),
            at("EE1", 0, 0, 1, "B1"),
            at("SHARED", 0, 1, 1, "Aula"),
        ]);
        let report = verify(&t, &shared_course());
        assert!(report.is_valid(), "{report}");
    }

    #[test]
    fn shared_tutorial_counts_once_per_program() {
        let mut input = shared_course_input();
        input.courses[0].timeline = vec![SessionKind::Tutorial];
        let instance = build(input);
        // Both programs see two assignments of the one SHARED session.
        let t = timetable(vec![
            at("SHARED", 0, 1, 1, "Aula"),
            at("SHARED", 0, 1, 1, "B1"),
            at("CS1", 0, 0, 1, "Aula"),
            at("EE1", 0, 0, 1, "B1"),
        ]);
        let report = verify(&t, &instance);
        assert!(report.passed(Invariant::ProgramConflict), "{report}");
        assert!(report.is_valid());
    }

    #[test]
    fn two_sessions_of_one_program_clash() {
        let t = timetable(vec![
            at("SHARED", 0, 0, 1, "Aula"),
            at("CS1", 0, 0, 1, "B1"),
            at("EE1", 0, 1, 1, "B1"),
        ]);
        let report = verify(&t, &shared_course());
        assert_eq!(only_failure(&report), Invariant::ProgramConflict);
        assert_eq!(
            report.violations(Invariant::ProgramConflict),
            &[Violation::ProgramConflict {
                program: "CS_Y1".into(),
                slot: slot(0, 1),
                sessions: vec![SessionRef::new("CS1", 0), SessionRef::new("SHARED", 0)],
            }]
        );
    }
}

mod report {
    use super::*;

    fn broken() -> Timetable {
        timetable(vec![
            at("SHARED", 0, 0, 1, "Aula"),
            at("CS1", 0, 0, 1, "Aula"),
        ])
    }

    #[test]
    fn verification_is_idempotent() {
        let instance = shared_course();
        let t = broken();
        assert_eq!(verify(&t, &instance), verify(&t, &instance));
    }

    #[test]
    fn every_violation_is_collected() {
        let report = verify(&broken(), &shared_course());
        let failed: Vec<_> = report.failed_invariants().collect();
        assert_eq!(
            failed,
            vec![
                Invariant::SessionCount,
                Invariant::RoomConflict,
                Invariant::ProgramConflict
            ]
        );
        assert_eq!(report.violation_count(), report.iter().count());
    }

    #[test]
    fn display_lists_each_invariant() {
        let text = verify(&broken(), &shared_course()).to_string();
        assert!(text.contains("[FAIL] 2. room double booking: 1 violation(s)"));
        assert!(text.contains("[PASS] 7. chronological session order"));
        assert!(text.contains("  - Aula at Monday 11:00-13:00: CS1#0, SHARED#0"));
    }
}
