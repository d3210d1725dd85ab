//! Greedy strategy: first-available constructive placement.
//!
//! Courses are taken in instance order or shuffled from the configured seed;
//! the sessions of a course keep timeline order. Each session commits to the
//! first admissible `(slot, room)` pairs and is never revisited. A session
//! only looks at slots after the last slot of its predecessor, and only at
//! rooms meeting the capacity fraction, so a returned timetable satisfies
//! the same hard rules as the exact strategy.
//!
//! Getting stuck is a local failure ([`SolveError::Unplaced`]) naming the
//! session, not a proof of infeasibility. With `restarts > 0` the scan is
//! retried with the next seed.

mod candidate;
mod engine;
mod occupancy;
mod ordering;


use std::time::Instant;

use log::{info, warn};

use crate::config::SolverConfig;
use crate::instance::Instance;
use crate::timetable::Timetable;

use super::error::SolveError;
use super::solution::{Solution, SolveStatus, SolverStatistics};
use super::SolvingStrategy;

#[derive(Debug, Clone, Copy, Default)]
pub struct GreedySolver;

impl GreedySolver {
    pub fn new() -> Self {
        Self
    }
}

impl SolvingStrategy for GreedySolver {
    fn name(&self) -> &str {
        "greedy"
    }

    fn solve(&self, instance: &Instance, config: &SolverConfig) -> Result<Solution, SolveError> {
        let start = Instant::now();
        let mut statistics = SolverStatistics::default();
        let mut last_error = None;

        for attempt in 0..config.attempts() {
            statistics.attempts = attempt + 1;
            match engine::construct(instance, config, attempt) {
                Ok(assignments) => {
                    let timetable = Timetable::from_assignments(assignments)?;
                    let objective = timetable.penalty(instance, &config.weights);
                    statistics.nodes_explored = instance.session_count() as u64;
                    statistics.solutions_found = 1;
                    statistics.time_total = start.elapsed();
                    info!(
                        "Greedy placement: {} assignments after {} attempt(s), objective {objective}",
                        timetable.len(),
                        statistics.attempts
                    );
                    return Ok(Solution {
                        timetable,
                        status: SolveStatus::Constructed,
                        objective,
                        statistics,
                    });
                }
                Err(e @ SolveError::Unplaced { .. }) => {
                    warn!("Greedy attempt {} failed: {e}", attempt + 1);
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| SolveError::Infeasible {
            reason: "no greedy attempt was made".to_string(),
        }))
    }
}
