use super::*;
use crate::config::SolverConfig;
use crate::instance::fixtures::*;
use crate::instance::{SessionKind, SessionRef};
use crate::verify::verify;

fn unbounded() -> SolverConfig {
    SolverConfig {
        time_limit: None,
        ..SolverConfig::default()
    }
}

#[test]
fn single_course_lecture_precedes_tutorial() {
    let instance = single_course();
    let solution = ExactSolver::new().solve(&instance, &unbounded()).unwrap();

    assert_eq!(solution.status, SolveStatus::Optimal);
    assert_eq!(solution.objective, 0);
    assert_eq!(solution.timetable.len(), 3);

    let lecture = solution.timetable.session_slots(&SessionRef::new("ALG", 0));
    let tutorial = solution.timetable.session_slots(&SessionRef::new("ALG", 1));
    assert!(lecture.iter().max().unwrap() < tutorial.iter().min().unwrap());
    assert!(verify(&solution.timetable, &instance).is_valid());
}

#[test]
fn objective_equals_timetable_penalty() {
    let instance = busy_lecturer();
    let config = unbounded();
    let solution = ExactSolver::new().solve(&instance, &config).unwrap();
    assert_eq!(
        solution.objective,
        solution.timetable.penalty(&instance, &config.weights)
    );
}

#[test]
fn absent_lecturer_is_infeasible() {
    let instance = absent_lecturer();
    let err = ExactSolver::new().solve(&instance, &unbounded()).unwrap_err();
    assert!(err.is_proof_of_infeasibility(), "unexpected: {err}");
}

#[test]
fn exhausted_tree_proves_infeasibility() {
    let mut input = single_course_input();
    input.courses[0].timeline = vec![SessionKind::Lecture; 3];
    input.days = 2;
    input.timeslots = 1;
    let instance = build(input);

    let err = ExactSolver::new().solve(&instance, &unbounded()).unwrap_err();
    assert!(matches!(err, SolveError::Infeasible { .. }));
}

#[test]
fn shared_course_avoids_program_clashes() {
    let instance = shared_course();
    let solution = ExactSolver::new().solve(&instance, &unbounded()).unwrap();
    assert_eq!(solution.status, SolveStatus::Optimal);
    // Only two non-first slots exist; CS1 and EE1 share one of them.
    assert_eq!(solution.objective, 0);
    assert!(verify(&solution.timetable, &instance).is_valid());
}

#[test]
fn busy_lecturer_forces_an_early_lecture() {
    let instance = busy_lecturer();
    let solution = ExactSolver::new().solve(&instance, &unbounded()).unwrap();
    assert_eq!(solution.status, SolveStatus::Optimal);
    assert_eq!(solution.objective, 100);
    let slots: std::collections::BTreeSet<_> = solution.timetable.iter().map(|a| a.slot).collect();
    assert_eq!(slots.len(), 3);
}

#[test]
fn single_room_splits_tutorial() {
    let mut input = single_course_input();
    input.rooms = vec![room("Aula", 100)];
    let instance = build(input);
    let solution = ExactSolver::new().solve(&instance, &unbounded()).unwrap();
    assert_eq!(solution.objective, 10);
    assert_eq!(
        solution
            .timetable
            .session_slots(&SessionRef::new("ALG", 1))
            .len(),
        2
    );
}

#[test]
fn node_budget_without_incumbent_is_not_infeasibility() {
    let instance = single_course();
    let config = SolverConfig {
        node_limit: Some(0),
        ..unbounded()
    };
    let err = ExactSolver::new().solve(&instance, &config).unwrap_err();
    assert!(matches!(err, SolveError::BudgetExhausted { .. }));
    assert!(!err.is_proof_of_infeasibility());
}

#[test]
fn first_solution_mode_reports_feasible() {
    let instance = shared_course();
    let config = SolverConfig {
        stop_at_first_solution: true,
        ..unbounded()
    };
    let solution = ExactSolver::new().solve(&instance, &config).unwrap();
    assert_eq!(solution.status, SolveStatus::Feasible);
    assert_eq!(solution.statistics.solutions_found, 1);
    assert!(verify(&solution.timetable, &instance).is_valid());
}

#[test]
fn empty_instance_is_trivially_optimal() {
    let mut input = single_course_input();
    input.courses.clear();
    input.programs[0].courses.clear();
    let instance = build(input);
    let solution = ExactSolver::new().solve(&instance, &unbounded()).unwrap();
    assert_eq!(solution.status, SolveStatus::Optimal);
    assert!(solution.timetable.is_empty());
}

#[test]
fn node_budget_after_first_timetable_returns_incumbent() {
    // One room forces a split tutorial: the optimum 10 stays above the root
    // bound, so the search has to keep exploring after its first timetable.
    let mut input = single_course_input();
    input.rooms = vec![room("Aula", 100)];
    let instance = build(input);

    let complete = ExactSolver::new().solve(&instance, &unbounded()).unwrap();
    let first = ExactSolver::new()
        .solve(
            &instance,
            &SolverConfig {
                stop_at_first_solution: true,
                ..unbounded()
            },
        )
        .unwrap();
    let nodes_to_first = first.statistics.nodes_explored;
    assert!(complete.statistics.nodes_explored > nodes_to_first);

    let config = SolverConfig {
        node_limit: Some(nodes_to_first),
        ..unbounded()
    };
    let solution = ExactSolver::new().solve(&instance, &config).unwrap();
    assert_eq!(solution.status, SolveStatus::Feasible);
    assert_eq!(solution.statistics.solutions_found, 1);
    assert_eq!(solution.objective, 10);
    assert_eq!(
        solution.objective,
        solution.timetable.penalty(&instance, &config.weights)
    );
    assert!(verify(&solution.timetable, &instance).is_valid());
}
