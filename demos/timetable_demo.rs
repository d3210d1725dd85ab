//! End-to-end run on a small faculty: diagnostics, both solvers, verification
//! and the week grid.

use std::time::Duration;

use chrono::NaiveDate;
use coursegrid::instance::{CourseInput, LecturerInput, ProgramInput, RoomInput, SessionKind};
use coursegrid::{
    diagnose, verify, ExactSolver, GreedySolver, Instance, InstanceInput, InstanceOptions,
    QualityWeights, SolverConfig, SolvingStrategy,
};

use SessionKind::{Lecture as L, Tutorial as T};

fn program(id: &str, size: u32, courses: &[&str]) -> ProgramInput {
    ProgramInput {
        id: id.to_string(),
        size,
        courses: courses.iter().map(|c| c.to_string()).collect(),
    }
}

fn course(id: &str, name: &str, timeline: &[SessionKind], lecturer: &str) -> CourseInput {
    CourseInput {
        id: id.to_string(),
        name: name.to_string(),
        timeline: timeline.to_vec(),
        lecturer: lecturer.to_string(),
    }
}

fn room(id: &str, capacity: u32) -> RoomInput {
    RoomInput {
        id: id.to_string(),
        capacity,
    }
}

fn lecturer(id: &str, unavailable: &[(i32, u32, u32)]) -> LecturerInput {
    LecturerInput {
        id: id.to_string(),
        unavailable: unavailable
            .iter()
            .filter_map(|&(y, m, d)| NaiveDate::from_ymd_opt(y, m, d))
            .collect(),
    }
}

fn faculty() -> InstanceInput {
    InstanceInput {
        programs: vec![
            program("BA_Y1", 180, &["OIP", "MATH"]),
            program("BA_Y2", 60, &["MATH", "DB"]),
            program("MSC_Y1", 30, &["DB", "ML"]),
        ],
        courses: vec![
            course("OIP", "Introduction to Programming", &[L, T, L], "Tom"),
            course("MATH", "Discrete Mathematics", &[L, L, T], "Ann"),
            course("DB", "Databases", &[L, T], "Tom"),
            course("ML", "Machine Learning", &[L, T], "Bob"),
        ],
        rooms: vec![
            room("C0.004", 60),
            room("C0.008", 70),
            room("B1.02", 40),
            room("MSP", 240),
        ],
        lecturers: vec![
            // Unavailable on Monday and Friday of the reference week.
            lecturer("Tom", &[(2025, 10, 27), (2025, 10, 31)]),
            lecturer("Ann", &[(2025, 10, 29)]),
            lecturer("Bob", &[]),
        ],
        ..InstanceInput::new()
    }
}

fn main() {
    let instance = match Instance::new(faculty(), &InstanceOptions::default()) {
        Ok(instance) => instance,
        Err(e) => {
            eprintln!("Invalid instance: {e}");
            return;
        }
    };

    println!("Diagnostics");
    println!("===========");
    let report = diagnose(&instance);
    println!("{report}\n");
    if report.has_blocking() {
        return;
    }

    let config = SolverConfig {
        time_limit: Some(Duration::from_secs(10)),
        restarts: 10,
        seed: 7,
        ..SolverConfig::default()
    };

    let strategies: [&dyn SolvingStrategy; 2] = [&GreedySolver::new(), &ExactSolver::new()];
    for strategy in strategies {
        println!("Strategy: {}", strategy.name());
        println!("==========={}", "=".repeat(strategy.name().len()));
        match strategy.solve(&instance, &config) {
            Ok(solution) => {
                println!(
                    "{} timetable, objective {}, {} assignments",
                    solution.status,
                    solution.objective,
                    solution.timetable.len()
                );
                println!("{}", solution.statistics);
                println!("{}", verify(&solution.timetable, &instance));
                let quality = solution.timetable.quality(&instance);
                println!("{quality}");
                println!("quality score {:.1}", quality.score(&QualityWeights::default()));
                println!();
                println!("{}", solution.timetable.grid(&instance));
            }
            Err(e) => println!("No timetable: {e}"),
        }
        println!();
    }
}
