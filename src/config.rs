//! Solver configuration: objective weights, search budgets and greedy options.

use std::time::Duration;

/// Coefficients of the soft objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectiveWeights {
    /// Cost of a lecture assignment in the first timeslot of a day.
    pub early_lecture: i64,
    /// Cost of each extra slot a tutorial's two groups occupy.
    pub tutorial_split: i64,
}

impl Default for ObjectiveWeights {
    fn default() -> Self {
        Self {
            early_lecture: 100,
            tutorial_split: 10,
        }
    }
}

/// Coefficients of the timetable quality score.
///
/// Penalties are subtracted, `continuous_block` is added per session in a
/// run of back-to-back timeslots.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QualityWeights {
    pub uneven_distribution: f64,
    pub excessive_daily_sessions: f64,
    pub student_gap: f64,
    pub room_change: f64,
    pub underutilised_room: f64,
    pub continuous_block: f64,
}

impl Default for QualityWeights {
    fn default() -> Self {
        Self {
            uneven_distribution: 10.0,
            excessive_daily_sessions: 15.0,
            student_gap: 5.0,
            room_change: 8.0,
            underutilised_room: 3.0,
            continuous_block: 2.0,
        }
    }
}

/// Room preference for large first-year lectures in the greedy strategy.
///
/// A lecture of a course followed by a program whose id ends in
/// `program_suffix` and whose size is at least `min_program_size` tries rooms
/// of at least `min_room_capacity` seats first, largest first.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LargeLectureRule {
    pub program_suffix: String,
    pub min_program_size: u32,
    pub min_room_capacity: u32,
}

impl Default for LargeLectureRule {
    fn default() -> Self {
        Self {
            program_suffix: "_Y1".to_string(),
            min_program_size: 150,
            min_room_capacity: 150,
        }
    }
}

/// Configuration shared by both solving strategies.
///
/// Each strategy reads the fields relevant to it and ignores the rest.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    // --- Objective ---
    pub weights: ObjectiveWeights,

    // --- Exact search budget ---
    /// Wall-clock limit for the exact search. `None` searches to completion.
    pub time_limit: Option<Duration>,
    /// Maximum number of search nodes. `None` is unbounded.
    pub node_limit: Option<u64>,
    /// Number of nodes between two budget checks.
    pub check_interval: u64,
    /// Return the first complete timetable found instead of proving optimality.
    pub stop_at_first_solution: bool,

    // --- Greedy ---
    /// Seed for the course order shuffle.
    pub seed: u64,
    /// Shuffle course order before placing. Disabled, courses are placed in
    /// instance order.
    pub shuffle_sessions: bool,
    /// Additional attempts, each with the next seed, after a failed placement.
    pub restarts: u32,
    /// Preferred rooms for large first-year lectures. `None` disables it.
    pub large_lecture: Option<LargeLectureRule>,
}

impl SolverConfig {
    /// Config with a fixed seed and every other field at its default.
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Number of greedy attempts in total.
    pub fn attempts(&self) -> u32 {
        self.restarts.saturating_add(1)
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            weights: ObjectiveWeights::default(),
            time_limit: Some(Duration::from_secs(60)),
            node_limit: None,
            check_interval: 1024,
            stop_at_first_solution: false,
            seed: 0,
            shuffle_sessions: true,
            restarts: 0,
            large_lecture: Some(LargeLectureRule::default()),
        }
    }
}
