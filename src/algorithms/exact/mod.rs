//! Exact strategy: branch and bound over the full constraint model.
//!
//! The search is exponential in the worst case and runs under the budget of
//! [`SolverConfig`]: a wall-clock limit, a node limit, or both. Its outcome
//! distinguishes four cases:
//!
//! | tree explored | incumbent | result                         |
//! |---------------|-----------|--------------------------------|
//! | yes           | yes       | `Ok`, [`SolveStatus::Optimal`] |
//! | yes           | no        | `Err(Infeasible)`              |
//! | no (budget)   | yes       | `Ok`, [`SolveStatus::Feasible`]|
//! | no (budget)   | no        | `Err(BudgetExhausted)`         |
//!
//! In first-solution mode the first timetable found is returned as
//! `Feasible` without further search.

mod monitor;
mod search;

#[cfg(test)]
mod tests;

use log::{debug, info, warn};

use crate::config::SolverConfig;
use crate::instance::Instance;
use crate::model::TimetableModel;

use super::error::SolveError;
use super::solution::{Solution, SolveStatus};
use super::SolvingStrategy;
use search::{Search, Termination};

/// Branch-and-bound optimiser minimising the soft objective.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactSolver;

impl ExactSolver {
    pub fn new() -> Self {
        Self
    }

    /// Solves an already built model.
    ///
    /// # Errors
    ///
    /// See the module documentation.
    pub fn solve_model(
        &self,
        model: &TimetableModel<'_>,
        config: &SolverConfig,
    ) -> Result<Solution, SolveError> {
        let mut search = Search::new(model, config);

        if let Some(&session) = search.starved_sessions().first() {
            let info = &model.sessions()[session.index()];
            let reason = format!(
                "{} {} has fewer admissible rooms and slots than the {} it needs",
                info.kind,
                info.session,
                info.required_assignments()
            );
            warn!("{reason}");
            return Err(SolveError::Infeasible { reason });
        }

        let termination = search.run();
        let mut statistics = search.statistics.clone();
        let elapsed = search.elapsed();
        debug!("Search ended ({termination:?})\n{statistics}");

        let (status, (objective, vars)) = match (termination, search.into_best()) {
            (Termination::Budget(reason), None) => {
                warn!("Exact search stopped without a timetable: {reason}");
                return Err(SolveError::BudgetExhausted {
                    nodes: statistics.nodes_explored,
                    elapsed,
                });
            }
            (_, None) => {
                return Err(SolveError::Infeasible {
                    reason: "every branch violates a hard constraint".to_string(),
                });
            }
            (Termination::Completed | Termination::BoundReached, Some(best)) => {
                (SolveStatus::Optimal, best)
            }
            (Termination::FirstSolution | Termination::Budget(_), Some(best)) => {
                (SolveStatus::Feasible, best)
            }
        };

        let timetable = model.timetable_from(vars)?;
        statistics.attempts = 1;
        info!(
            "Exact search: {status} timetable, objective {objective}, {} assignments, {} nodes",
            timetable.len(),
            statistics.nodes_explored
        );
        Ok(Solution {
            timetable,
            status,
            objective,
            statistics,
        })
    }
}

impl SolvingStrategy for ExactSolver {
    fn name(&self) -> &str {
        "exact"
    }

    fn solve(&self, instance: &Instance, config: &SolverConfig) -> Result<Solution, SolveError> {
        let model = TimetableModel::build(instance, &config.weights)?;
        self.solve_model(&model, config)
    }
}
