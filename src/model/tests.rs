use super::*;
use crate::instance::fixtures::*;
use crate::instance::{Day, InstanceOptions, Timeslot, ZeroEnrollmentPolicy};

fn slot(day: u8, ts: u8) -> Slot {
    Slot::new(Day::new(day).unwrap(), Timeslot::new(ts).unwrap())
}

fn build_model(instance: &Instance) -> TimetableModel<'_> {
    TimetableModel::build(instance, &ObjectiveWeights::default()).unwrap()
}

fn timetable(entries: &[(&str, usize, Slot, &str)]) -> Timetable {
    Timetable::from_assignments(
        entries
            .iter()
            .map(|(c, i, s, r)| Assignment::new(SessionRef::new(*c, *i), *s, *r)),
    )
    .unwrap()
}

mod variables {
    use super::*;

    #[test]
    fn one_assignment_variable_per_session_room_slot() {
        let instance = single_course();
        let model = build_model(&instance);
        let counts = model.variable_counts();
        assert_eq!(counts.assign, 16);
        assert_eq!(counts.slot_used, 4);
        assert_eq!(counts.lecturer_active, 0);
        assert_eq!(model.candidates(SessionId(0)).len(), 8);
    }

    #[test]
    fn candidates_ordered_by_rank_then_room() {
        let instance = single_course();
        let model = build_model(&instance);
        let ranks: Vec<u32> = model
            .candidates(SessionId(0))
            .iter()
            .map(|&v| model.variable(v).unwrap().slot().rank())
            .collect();
        assert_eq!(ranks, vec![0, 0, 1, 1, 5, 5, 6, 6]);
    }

    #[test]
    fn undersized_rooms_are_rejected_not_generated() {
        let mut input = single_course_input();
        input.rooms.push(room("Closet", 10));
        let instance = build(input);
        let model = build_model(&instance);

        let closet = instance.room_index("Closet").unwrap();
        assert!(model.assign_var(SessionId(0), closet, slot(0, 0)).is_none());
        // Lecture needs 40 seats, tutorial 20: both reject the closet.
        assert_eq!(model.space().rejected().len(), 2);
        let rejected = model.space().rejected_for(SessionId(0)).next().unwrap();
        assert_eq!(rejected.required, 40);
        assert_eq!(rejected.capacity, 10);
    }

    #[test]
    fn nominal_enrollment_sizes_rooms() {
        let opts = InstanceOptions {
            zero_enrollment: ZeroEnrollmentPolicy::Nominal(100),
            ..InstanceOptions::default()
        };
        let instance = Instance::new(zero_enrollment_input(), &opts).unwrap();
        let model = build_model(&instance);
        let ghost = model.session_id(&SessionRef::new("GHOST", 0)).unwrap();
        // 100 nominal students: lecture needs 50 seats, B1 (40) is out.
        assert_eq!(model.space().rejected_for(ghost).count(), 1);
        assert_eq!(model.session(ghost).unwrap().capacity_basis, 100);
    }

    #[test]
    fn lecturer_indicator_only_for_multi_course_lecturers() {
        let instance = busy_lecturer();
        let model = build_model(&instance);
        assert_eq!(model.multi_course_lecturers(), vec![0]);
        assert_eq!(model.variable_counts().lecturer_active, 6);

        let single = single_course();
        assert!(build_model(&single).multi_course_lecturers().is_empty());
    }

    #[test]
    fn ids_from_a_larger_model_resolve_to_none() {
        let shared = shared_course();
        let larger = build_model(&shared);
        let instance = single_course();
        let model = build_model(&instance);
        assert!(larger.sessions().len() > model.sessions().len());

        let foreign_session = larger.session_ids().last().unwrap();
        assert!(model.session(foreign_session).is_none());
        assert!(model.candidates(foreign_session).is_empty());

        let foreign_var = VarId(model.variable_count());
        assert!(model.variable(foreign_var).is_none());
        assert!(model.assignment_of(foreign_var).is_none());
        assert!(model.variable(VarId(0)).is_some());
    }
}

mod constraints {
    use super::*;

    #[test]
    fn families_present_for_single_course() {
        let instance = single_course();
        let stats = build_model(&instance).stats();
        assert_eq!(stats.constraints_of(Family::ExactCount), 2);
        assert_eq!(stats.constraints_of(Family::RoomSlot), 8);
        assert_eq!(stats.constraints_of(Family::SlotUsedLink), 8);
        assert_eq!(stats.constraints_of(Family::Precedence), 1);
        assert_eq!(stats.constraints_of(Family::LecturerSlot), 0);
        assert_eq!(stats.constraints_of(Family::Unavailable), 0);
        // Lecture and tutorial can both occupy every slot.
        assert_eq!(stats.constraints_of(Family::ProgramSlot), 4);
    }

    #[test]
    fn exact_count_matches_session_kind() {
        let instance = single_course();
        let model = build_model(&instance);
        let counts: Vec<usize> = model
            .constraints()
            .iter()
            .filter_map(|c| match c {
                Constraint::ExactCount { count, .. } => Some(*count),
                _ => None,
            })
            .collect();
        assert_eq!(counts, vec![1, 2]);
    }

    #[test]
    fn shared_course_programs_constrained() {
        let instance = shared_course();
        let model = build_model(&instance);
        let cs = instance.program_index("CS_Y1").unwrap();
        let rows = model
            .constraints()
            .iter()
            .filter(|c| matches!(c, Constraint::ProgramSlot { program, .. } if *program == cs))
            .count();
        assert_eq!(rows, 4);
    }

    #[test]
    fn unavailable_days_zero_out_assignments() {
        let instance = absent_lecturer();
        let model = build_model(&instance);
        let unavailable: Vec<&Constraint> = model
            .constraints()
            .iter()
            .filter(|c| c.family() == Family::Unavailable)
            .collect();
        assert_eq!(unavailable.len(), 5);
        let covered: usize = unavailable
            .iter()
            .map(|c| match c {
                Constraint::Unavailable { vars, .. } => vars.len(),
                _ => 0,
            })
            .sum();
        assert_eq!(covered, model.variable_counts().assign);
    }

    #[test]
    fn lecturer_slot_rows_for_busy_lecturer() {
        let instance = busy_lecturer();
        let stats = build_model(&instance).stats();
        assert_eq!(stats.constraints_of(Family::LecturerSlot), 3);
        assert_eq!(stats.constraints_of(Family::LecturerLink), 6);
    }

    #[test]
    fn constraint_display() {
        let c = Constraint::SlotUsedLink {
            assign: VarId(3),
            slot_used: VarId(9),
        };
        assert_eq!(c.to_string(), "[slot-used-link] v3 - v9 <= 0");
    }
}

mod linearisation {
    use super::*;

    #[test]
    fn precedence_expands_to_pairwise_exclusions() {
        let instance = single_course();
        let model = build_model(&instance);
        let precedence = model
            .constraints()
            .iter()
            .find(|c| c.family() == Family::Precedence)
            .unwrap();
        let rows = model.rows_of(precedence);
        assert_eq!(rows.len(), 40);
        for row in &rows {
            let (a, b) = (row.terms[0].0, row.terms[1].0);
            assert!(model.variables()[b.index()].slot().rank() <= model.variables()[a.index()].slot().rank());
        }
    }

    #[test]
    fn row_count_matches_expansion() {
        for instance in [single_course(), shared_course(), busy_lecturer()] {
            let model = build_model(&instance);
            assert_eq!(model.row_count(), model.rows().count());
        }
    }

    #[test]
    fn linear_row_display_and_check() {
        let row = LinearRow {
            terms: vec![(VarId(0), 1), (VarId(1), 1), (VarId(2), -2)],
            sense: Sense::Le,
            rhs: 0,
        };
        assert_eq!(row.to_string(), "v0 + v1 - 2*v2 <= 0");
        assert!(row.is_satisfied(&[true, true, true]));
        assert!(!row.is_satisfied(&[true, false, false]));
    }
}

mod evaluation {
    use super::*;

    #[test]
    fn valid_timetable_satisfies_every_row() {
        let instance = single_course();
        let model = build_model(&instance);
        let t = timetable(&[
            ("ALG", 0, slot(0, 1), "Aula"),
            ("ALG", 1, slot(1, 0), "Aula"),
            ("ALG", 1, slot(1, 0), "B1"),
        ]);
        let values = model.values_for(&t).unwrap();
        assert!(model.violated(&values).is_empty());
        assert_eq!(model.objective().evaluate(&values), 0);
        assert_eq!(
            model.objective().evaluate(&values),
            t.penalty(&instance, &ObjectiveWeights::default())
        );
    }

    #[test]
    fn objective_matches_penalty_when_split_and_early() {
        let instance = single_course();
        let model = build_model(&instance);
        let t = timetable(&[
            ("ALG", 0, slot(0, 0), "Aula"),
            ("ALG", 1, slot(1, 0), "Aula"),
            ("ALG", 1, slot(1, 1), "B1"),
        ]);
        let values = model.values_for(&t).unwrap();
        assert!(model.violated(&values).is_empty());
        assert_eq!(model.objective().evaluate(&values), 110);
        assert_eq!(t.penalty(&instance, &ObjectiveWeights::default()), 110);
    }

    #[test]
    fn reversed_sessions_violate_precedence() {
        let instance = single_course();
        let model = build_model(&instance);
        let t = timetable(&[
            ("ALG", 0, slot(1, 1), "Aula"),
            ("ALG", 1, slot(0, 0), "Aula"),
            ("ALG", 1, slot(0, 0), "B1"),
        ]);
        let values = model.values_for(&t).unwrap();
        let families: Vec<Family> = model.violated(&values).iter().map(|c| c.family()).collect();
        assert_eq!(families, vec![Family::Precedence]);
    }

    #[test]
    fn missing_tutorial_group_violates_exact_count() {
        let instance = single_course();
        let model = build_model(&instance);
        let t = timetable(&[("ALG", 0, slot(0, 1), "Aula"), ("ALG", 1, slot(1, 0), "B1")]);
        let values = model.values_for(&t).unwrap();
        let families: Vec<Family> = model.violated(&values).iter().map(|c| c.family()).collect();
        assert_eq!(families, vec![Family::ExactCount]);
    }

    #[test]
    fn busy_lecturer_clash_violates_lecturer_slot() {
        let instance = busy_lecturer();
        let model = build_model(&instance);
        let t = timetable(&[
            ("A", 0, slot(0, 0), "Aula"),
            ("A", 1, slot(0, 1), "Aula"),
            ("B", 0, slot(0, 1), "B1"),
        ]);
        let values = model.values_for(&t).unwrap();
        let families: Vec<Family> = model.violated(&values).iter().map(|c| c.family()).collect();
        assert_eq!(families, vec![Family::LecturerSlot]);
    }

    #[test]
    fn assignment_outside_space_is_not_a_variable() {
        let instance = single_course();
        let model = build_model(&instance);
        let t = timetable(&[("ALG", 0, slot(3, 0), "Aula")]);
        assert!(matches!(
            model.values_for(&t),
            Err(ModelError::NotAVariable(_))
        ));
    }

    #[test]
    fn timetable_from_variables() {
        let instance = single_course();
        let model = build_model(&instance);
        let lecture = model.candidates(SessionId(0))[3];
        let t = model.timetable_from([lecture]).unwrap();
        let a = t.iter().next().unwrap();
        assert_eq!(a.session, SessionRef::new("ALG", 0));
        assert_eq!(a.slot, slot(0, 1));
        assert_eq!(a.room, "B1");
    }
}
