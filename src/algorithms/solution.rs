use std::fmt;
use std::time::Duration;

use crate::timetable::Timetable;

/// How much a returned timetable is known to be worth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// Proven to minimise the objective.
    Optimal,
    /// Satisfies every hard constraint; the search stopped before proving
    /// optimality (budget or first-solution mode).
    Feasible,
    /// Built by the greedy strategy, which does not optimise.
    Constructed,
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SolveStatus::Optimal => "optimal",
            SolveStatus::Feasible => "feasible",
            SolveStatus::Constructed => "constructed",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SolverStatistics {
    /// Search nodes visited (exact) or sessions placed (greedy).
    pub nodes_explored: u64,
    pub backtracks: u64,
    pub max_depth: u64,
    /// Nodes cut because some session had too few admissible candidates.
    pub prunings_infeasible: u64,
    /// Nodes cut because their lower bound reached the incumbent.
    pub prunings_bound: u64,
    pub solutions_found: u64,
    /// Greedy attempts made, including the successful one.
    pub attempts: u32,
    /// Objective lower bound at the root node.
    pub root_lower_bound: i64,
    pub time_total: Duration,
}

impl SolverStatistics {
    #[inline]
    pub fn on_node_explored(&mut self) {
        self.nodes_explored = self.nodes_explored.saturating_add(1);
    }

    #[inline]
    pub fn on_backtrack(&mut self) {
        self.backtracks = self.backtracks.saturating_add(1);
    }

    #[inline]
    pub fn on_depth_update(&mut self, depth: u64) {
        self.max_depth = self.max_depth.max(depth);
    }

    #[inline]
    pub fn on_pruning_infeasible(&mut self) {
        self.prunings_infeasible = self.prunings_infeasible.saturating_add(1);
    }

    #[inline]
    pub fn on_pruning_bound(&mut self) {
        self.prunings_bound = self.prunings_bound.saturating_add(1);
    }

    #[inline]
    pub fn on_solution_found(&mut self) {
        self.solutions_found = self.solutions_found.saturating_add(1);
    }
}

impl fmt::Display for SolverStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Solver Statistics:")?;
        writeln!(f, "  Nodes explored:       {}", self.nodes_explored)?;
        writeln!(f, "  Backtracks:           {}", self.backtracks)?;
        writeln!(f, "  Max depth reached:    {}", self.max_depth)?;
        writeln!(f, "  Prunings (infeasible):{}", self.prunings_infeasible)?;
        writeln!(f, "  Prunings (bound):     {}", self.prunings_bound)?;
        writeln!(f, "  Solutions found:      {}", self.solutions_found)?;
        writeln!(f, "  Attempts:             {}", self.attempts)?;
        writeln!(f, "  Root lower bound:     {}", self.root_lower_bound)?;
        writeln!(f, "  Total time:           {:.2?}", self.time_total)?;
        Ok(())
    }
}

/// A timetable together with how it was obtained.
#[derive(Debug, Clone)]
pub struct Solution {
    pub timetable: Timetable,
    pub status: SolveStatus,
    /// Objective value of `timetable`, see [`Timetable::penalty`].
    pub objective: i64,
    pub statistics: SolverStatistics,
}
