//! Solving strategies.
//!
//! Both strategies consume an [`Instance`] and either return a complete
//! [`Timetable`](crate::timetable::Timetable) satisfying every hard rule or a
//! [`SolveError`]. Neither ever returns a partially placed timetable.

pub mod error;
pub mod exact;
pub mod greedy;
pub mod solution;

pub use error::SolveError;
pub use exact::ExactSolver;
pub use greedy::GreedySolver;
pub use solution::{Solution, SolveStatus, SolverStatistics};

use crate::config::SolverConfig;
use crate::instance::Instance;

/// A method of producing a timetable for an instance.
pub trait SolvingStrategy {
    fn name(&self) -> &str;

    /// Solves `instance` under `config`.
    ///
    /// # Errors
    ///
    /// - `Infeasible` when no timetable exists
    /// - `BudgetExhausted` when the search stopped without an answer
    /// - `Unplaced` when a constructive strategy got stuck on one session
    fn solve(&self, instance: &Instance, config: &SolverConfig) -> Result<Solution, SolveError>;
}
