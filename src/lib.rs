//! coursegrid - weekly university course timetabling
//!
//! Places every lecture and tutorial of a set of courses into a five-day,
//! four-timeslot week so that rooms, lecturers and student programs never
//! clash, rooms are large enough, lecturers are only booked on days they are
//! available, and the sessions of a course keep their order.
//!
//! The crate is organised around one pipeline:
//!
//! 1. [`instance`]: validate the input into an immutable [`Instance`].
//! 2. [`diagnostics`]: cheap static checks that can prove infeasibility.
//! 3. [`model`]: the 0/1 decision space, hard constraints and objective.
//! 4. [`algorithms`]: the exact branch-and-bound and the greedy strategy,
//!    both behind [`SolvingStrategy`].
//! 5. [`verify`]: an independent re-check of any [`Timetable`].
//!
//! # Example
//!
//! ```
//! use coursegrid::instance::{CourseInput, LecturerInput, ProgramInput, RoomInput, SessionKind};
//! use coursegrid::{
//!     verify, ExactSolver, Instance, InstanceInput, InstanceOptions, SolverConfig, SolvingStrategy,
//! };
//!
//! let input = InstanceInput {
//!     programs: vec![ProgramInput { id: "CS_Y1".into(), size: 80, courses: vec!["ALG".into()] }],
//!     courses: vec![CourseInput {
//!         id: "ALG".into(),
//!         name: "Algorithms".into(),
//!         timeline: vec![SessionKind::Lecture, SessionKind::Tutorial],
//!         lecturer: "Tom".into(),
//!     }],
//!     rooms: vec![
//!         RoomInput { id: "Aula".into(), capacity: 100 },
//!         RoomInput { id: "B1".into(), capacity: 50 },
//!     ],
//!     lecturers: vec![LecturerInput { id: "Tom".into(), unavailable: vec![] }],
//!     days: 2,
//!     timeslots: 2,
//! };
//! let instance = Instance::new(input, &InstanceOptions::default()).unwrap();
//!
//! let solution = ExactSolver::new().solve(&instance, &SolverConfig::default()).unwrap();
//! assert_eq!(solution.objective, 0);
//! assert!(verify(&solution.timetable, &instance).is_valid());
//! ```

pub mod algorithms;
pub mod config;
pub mod diagnostics;
pub mod instance;
pub mod model;
pub mod timetable;
pub mod verify;

pub use algorithms::{ExactSolver, GreedySolver, Solution, SolveError, SolveStatus, SolvingStrategy};
pub use config::{ObjectiveWeights, QualityWeights, SolverConfig};
pub use diagnostics::{diagnose, DiagnosticsReport};
pub use instance::{Instance, InstanceError, InstanceInput, InstanceOptions, ZeroEnrollmentPolicy};
pub use model::TimetableModel;
pub use timetable::{Assignment, QualityReport, Timetable};
pub use verify::{verify, VerificationReport};

/// Identifier type used for programs, courses, rooms, lecturers and timetables.
pub type Id = String;

/// Generates a new unique identifier (UUID v4).
pub fn generate_id() -> Id {
    uuid::Uuid::new_v4().to_string()
}
