use std::time::{Duration, Instant};

use crate::config::SolverConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SearchCommand {
    Continue,
    Terminate(String),
}

/// Stops the search once its node or wall-clock budget is spent.
///
/// The node limit is checked on every step; the clock only every
/// `check_interval` steps.
#[derive(Debug, Clone)]
pub(crate) struct BudgetMonitor {
    check_interval: u64,
    steps: u64,
    time_limit: Option<Duration>,
    node_limit: Option<u64>,
    start_time: Instant,
}

impl BudgetMonitor {
    pub fn new(time_limit: Option<Duration>, node_limit: Option<u64>, check_interval: u64) -> Self {
        Self {
            check_interval: check_interval.max(1),
            steps: 0,
            time_limit,
            node_limit,
            start_time: Instant::now(),
        }
    }

    pub fn from_config(config: &SolverConfig) -> Self {
        Self::new(config.time_limit, config.node_limit, config.check_interval)
    }

    pub fn on_enter_search(&mut self) {
        self.start_time = Instant::now();
        self.steps = 0;
    }

    #[inline(always)]
    pub fn on_step(&mut self) {
        self.steps = self.steps.wrapping_add(1);
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn search_command(&self) -> SearchCommand {
        if let Some(limit) = self.node_limit {
            if self.steps > limit {
                return SearchCommand::Terminate("node limit reached".to_string());
            }
        }
        if let Some(limit) = self.time_limit {
            if self.steps % self.check_interval == 0 && self.elapsed() >= limit {
                return SearchCommand::Terminate("time limit reached".to_string());
            }
        }
        SearchCommand::Continue
    }
}
