//! Course and room ordering for the constructive scan.

use std::cmp::Reverse;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::config::{LargeLectureRule, SolverConfig};
use crate::instance::{Course, Instance, SessionKind};
use crate::model::capacity;

/// Order in which courses are placed for `attempt`.
///
/// Instance order when shuffling is off, otherwise a permutation drawn from
/// `seed + attempt`. Sessions inside a course always keep timeline order.
pub fn course_order(instance: &Instance, config: &SolverConfig, attempt: u32) -> Vec<usize> {
    let mut order: Vec<usize> = (0..instance.courses().len()).collect();
    if config.shuffle_sessions {
        let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(attempt as u64));
        order.shuffle(&mut rng);
    }
    order
}

/// Whether `course` is a lecture course for a large first-year program.
pub fn is_large_first_year(instance: &Instance, course: &Course, rule: &LargeLectureRule) -> bool {
    instance
        .programs_of(&course.id)
        .any(|p| p.id.ends_with(&rule.program_suffix) && p.size >= rule.min_program_size)
}

/// Capacity-feasible rooms for a `kind` session of `course`.
///
/// Rooms keep instance order, except that a large first-year lecture tries
/// rooms of at least `min_room_capacity` seats first, largest first.
pub fn room_order(
    instance: &Instance,
    course: &Course,
    kind: SessionKind,
    rule: Option<&LargeLectureRule>,
) -> Vec<usize> {
    let rooms = instance.rooms();
    let basis = instance.capacity_basis(course);
    let mut order: Vec<usize> = (0..rooms.len())
        .filter(|&r| capacity::meets(kind, rooms[r].capacity, basis))
        .collect();

    if let Some(rule) = rule {
        if kind == SessionKind::Lecture && is_large_first_year(instance, course, rule) {
            order.sort_by_key(|&r| {
                let cap = rooms[r].capacity;
                if cap >= rule.min_room_capacity {
                    (0, Reverse(cap))
                } else {
                    (1, Reverse(0))
                }
            });
        }
    }
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::fixtures::*;
    use crate::instance::InstanceInput;

    fn large_first_year() -> Instance {
        build(InstanceInput {
            programs: vec![program("BA_Y1", 200, &["OIP"]), program("BA_Y2", 40, &["DB"])],
            courses: vec![
                course("OIP", &[SessionKind::Lecture, SessionKind::Tutorial], "Ann"),
                course("DB", &[SessionKind::Lecture], "Bob"),
            ],
            rooms: vec![room("C0.004", 75), room("C0.008", 120), room("MSP", 150), room("Hall", 300)],
            lecturers: vec![lecturer("Ann", &[]), lecturer("Bob", &[])],
            days: 5,
            timeslots: 4,
        })
    }

    #[test]
    fn large_first_year_lecture_prefers_big_rooms() {
        let instance = large_first_year();
        let oip = instance.course("OIP").unwrap();
        let rule = LargeLectureRule::default();
        assert!(is_large_first_year(&instance, oip, &rule));
        // 200 students: a lecture needs 100 seats.
        assert_eq!(
            room_order(&instance, oip, SessionKind::Lecture, Some(&rule)),
            vec![3, 2, 1]
        );
    }

    #[test]
    fn tutorials_and_other_courses_keep_instance_order() {
        let instance = large_first_year();
        let rule = LargeLectureRule::default();
        let oip = instance.course("OIP").unwrap();
        assert_eq!(
            room_order(&instance, oip, SessionKind::Tutorial, Some(&rule)),
            vec![0, 1, 2, 3]
        );
        let db = instance.course("DB").unwrap();
        assert!(!is_large_first_year(&instance, db, &rule));
        assert_eq!(
            room_order(&instance, db, SessionKind::Lecture, Some(&rule)),
            vec![0, 1, 2, 3]
        );
    }

    #[test]
    fn disabled_rule_keeps_instance_order() {
        let instance = large_first_year();
        let oip = instance.course("OIP").unwrap();
        assert_eq!(
            room_order(&instance, oip, SessionKind::Lecture, None),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn course_order_is_reproducible() {
        let instance = large_first_year();
        let config = SolverConfig::seeded(7);
        assert_eq!(
            course_order(&instance, &config, 0),
            course_order(&instance, &config, 0)
        );
        let fixed = SolverConfig {
            shuffle_sessions: false,
            ..SolverConfig::default()
        };
        assert_eq!(course_order(&instance, &fixed, 3), vec![0, 1]);
    }
}
