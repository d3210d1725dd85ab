//! Depth-first branch and bound over the model's assignment variables.
//!
//! The search fixes one session per level. Packing constraints (`<= 1` rows
//! over rooms, programs and lecturers) are tracked with activity counters;
//! the auxiliary slot-used and lecturer-active variables are switched on by
//! reference count, so the two groups of a tutorial, or two sessions of one
//! course, share them instead of colliding. Precedence is enforced directly
//! from the ranks placed so far.

use log::trace;

use crate::config::SolverConfig;
use crate::instance::SessionKind;
use crate::model::{Constraint, SessionId, TimetableModel, VarId};

use super::super::solution::SolverStatistics;
use super::monitor::{BudgetMonitor, SearchCommand};

/// Why the search returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Termination {
    /// The tree was fully explored.
    Completed,
    /// The incumbent reached the root lower bound.
    BoundReached,
    /// First-solution mode found a timetable.
    FirstSolution,
    /// The budget ran out.
    Budget(String),
}

/// A branching option: the variables to fix for one session and their
/// combined objective increment.
struct Branch {
    vars: [Option<VarId>; 2],
    cost: i64,
}

pub(crate) struct Search<'m, 'a> {
    model: &'m TimetableModel<'a>,
    stop_at_first: bool,

    // Static tables, indexed by variable.
    direct: Vec<Vec<usize>>,
    aux_of: Vec<Vec<VarId>>,
    aux_members: Vec<Vec<usize>>,
    forbidden: Vec<bool>,
    rank: Vec<u32>,
    coefficient: Vec<i64>,

    // Dynamic state.
    activity: Vec<u32>,
    aux_refs: Vec<u32>,
    placed: Vec<Vec<VarId>>,
    unplaced: usize,
    cost: i64,

    best: Option<(i64, Vec<VarId>)>,
    termination: Option<Termination>,
    pub statistics: SolverStatistics,
    monitor: BudgetMonitor,
}

impl<'m, 'a> Search<'m, 'a> {
    pub fn new(model: &'m TimetableModel<'a>, config: &SolverConfig) -> Self {
        let n = model.variable_count();
        let mut direct = vec![Vec::new(); n];
        let mut aux_of = vec![Vec::new(); n];
        let mut aux_members = vec![Vec::new(); n];
        let mut forbidden = vec![false; n];

        for (c, constraint) in model.constraints().iter().enumerate() {
            if let Some(terms) = constraint.packing_terms() {
                for &v in terms {
                    if model.variables()[v.index()].is_assignment() {
                        direct[v.index()].push(c);
                    } else {
                        aux_members[v.index()].push(c);
                    }
                }
                continue;
            }
            match constraint {
                Constraint::SlotUsedLink { assign, slot_used } => {
                    aux_of[assign.index()].push(*slot_used);
                }
                Constraint::LecturerLink { active, assign } => {
                    for v in assign {
                        aux_of[v.index()].push(*active);
                    }
                }
                Constraint::Unavailable { vars, .. } => {
                    for v in vars {
                        forbidden[v.index()] = true;
                    }
                }
                _ => {}
            }
        }

        let rank = model.variables().iter().map(|v| v.slot().rank()).collect();
        let coefficient = (0..n)
            .map(|i| model.objective().coefficient(VarId(i)))
            .collect();

        Self {
            model,
            stop_at_first: config.stop_at_first_solution,
            direct,
            aux_of,
            aux_members,
            forbidden,
            rank,
            coefficient,
            activity: vec![0; model.constraints().len()],
            aux_refs: vec![0; n],
            placed: vec![Vec::new(); model.sessions().len()],
            unplaced: model.sessions().len(),
            cost: model.objective().constant(),
            best: None,
            termination: None,
            statistics: SolverStatistics::default(),
            monitor: BudgetMonitor::from_config(config),
        }
    }

    /// Sessions whose candidates are all excluded by an unavailability row
    /// or fewer than they need.
    pub fn starved_sessions(&self) -> Vec<SessionId> {
        self.model
            .session_ids()
            .filter(|&s| {
                let admissible = self
                    .model
                    .candidates(s)
                    .iter()
                    .filter(|v| !self.forbidden[v.index()])
                    .count();
                admissible < self.model.sessions()[s.index()].required_assignments()
            })
            .collect()
    }

    pub fn run(&mut self) -> Termination {
        self.monitor.on_enter_search();
        self.dfs(0);
        self.statistics.time_total = self.monitor.elapsed();
        self.termination.take().unwrap_or(Termination::Completed)
    }

    pub fn into_best(self) -> Option<(i64, Vec<VarId>)> {
        self.best
    }

    pub fn elapsed(&self) -> std::time::Duration {
        self.monitor.elapsed()
    }

    fn session_ranks(&self, session: SessionId) -> Option<(u32, u32)> {
        let placed = &self.placed[session.index()];
        let min = placed.iter().map(|v| self.rank[v.index()]).min()?;
        let max = placed.iter().map(|v| self.rank[v.index()]).max()?;
        Some((min, max))
    }

    fn admits(&self, session: SessionId, var: VarId) -> bool {
        let v = var.index();
        if self.forbidden[v] {
            return false;
        }
        if self.direct[v].iter().any(|&c| self.activity[c] > 0) {
            return false;
        }
        for aux in &self.aux_of[v] {
            if self.aux_refs[aux.index()] == 0
                && self.aux_members[aux.index()]
                    .iter()
                    .any(|&c| self.activity[c] > 0)
            {
                return false;
            }
        }
        let precedence = self.model.precedence();
        if let Some((_, max)) = precedence
            .predecessor(session)
            .and_then(|p| self.session_ranks(p))
        {
            if self.rank[v] <= max {
                return false;
            }
        }
        if let Some((min, _)) = precedence
            .successor(session)
            .and_then(|s| self.session_ranks(s))
        {
            if self.rank[v] >= min {
                return false;
            }
        }
        true
    }

    /// Objective increase from switching `var` on in the current state.
    fn increment(&self, var: VarId) -> i64 {
        let aux: i64 = self.aux_of[var.index()]
            .iter()
            .filter(|a| self.aux_refs[a.index()] == 0)
            .map(|a| self.coefficient[a.index()])
            .sum();
        self.coefficient[var.index()] + aux
    }

    fn place(&mut self, session: SessionId, var: VarId) {
        self.cost += self.increment(var);
        for &c in &self.direct[var.index()] {
            self.activity[c] += 1;
        }
        for aux in &self.aux_of[var.index()] {
            if self.aux_refs[aux.index()] == 0 {
                for &c in &self.aux_members[aux.index()] {
                    self.activity[c] += 1;
                }
            }
            self.aux_refs[aux.index()] += 1;
        }
        self.placed[session.index()].push(var);
    }

    fn unplace(&mut self, session: SessionId, var: VarId) {
        self.placed[session.index()].pop();
        for aux in &self.aux_of[var.index()] {
            self.aux_refs[aux.index()] -= 1;
            if self.aux_refs[aux.index()] == 0 {
                for &c in &self.aux_members[aux.index()] {
                    self.activity[c] -= 1;
                }
            }
        }
        for &c in &self.direct[var.index()] {
            self.activity[c] -= 1;
        }
        self.cost -= self.increment(var);
    }

    fn check_budget(&mut self) -> bool {
        self.statistics.on_node_explored();
        self.monitor.on_step();
        if let SearchCommand::Terminate(reason) = self.monitor.search_command() {
            self.termination = Some(Termination::Budget(reason));
        }
        self.termination.is_some()
    }

    fn record_solution(&mut self) {
        self.statistics.on_solution_found();
        let vars: Vec<VarId> = self.placed.iter().flatten().copied().collect();
        trace!("Incumbent with objective {}", self.cost);
        self.best = Some((self.cost, vars));
        if self.stop_at_first {
            self.termination = Some(Termination::FirstSolution);
        } else if self.cost <= self.statistics.root_lower_bound {
            self.termination = Some(Termination::BoundReached);
        }
    }

    fn dfs(&mut self, depth: u64) {
        if self.check_budget() {
            return;
        }
        self.statistics.on_depth_update(depth);

        if self.unplaced == 0 {
            if depth == 0 {
                self.statistics.root_lower_bound = self.cost;
            }
            self.record_solution();
            return;
        }

        // Pick the open session with the fewest admissible candidates and
        // bound the remaining cost by each session's cheapest candidate.
        let mut selected: Option<(SessionId, Vec<VarId>)> = None;
        let mut remaining = 0;
        for session in self.model.session_ids() {
            if !self.placed[session.index()].is_empty() {
                continue;
            }
            let admissible: Vec<VarId> = self
                .model
                .candidates(session)
                .iter()
                .copied()
                .filter(|&v| self.admits(session, v))
                .collect();
            if admissible.len() < self.model.sessions()[session.index()].required_assignments() {
                self.statistics.on_pruning_infeasible();
                return;
            }
            remaining += admissible
                .iter()
                .map(|&v| self.increment(v))
                .min()
                .unwrap_or(0);
            if selected
                .as_ref()
                .map_or(true, |(_, best)| admissible.len() < best.len())
            {
                selected = Some((session, admissible));
            }
        }

        let bound = self.cost + remaining;
        if depth == 0 {
            self.statistics.root_lower_bound = bound;
        }
        if let Some((best, _)) = &self.best {
            if bound >= *best {
                self.statistics.on_pruning_bound();
                return;
            }
        }

        let Some((session, admissible)) = selected else {
            return;
        };
        for option in self.options(session, &admissible) {
            if self.termination.is_some() {
                break;
            }
            if let Some((best, _)) = &self.best {
                if self.cost + option.cost >= *best {
                    self.statistics.on_pruning_bound();
                    continue;
                }
            }
            let fixed: Vec<VarId> = option.vars.iter().flatten().copied().collect();
            for &v in &fixed {
                self.place(session, v);
            }
            self.unplaced -= 1;
            self.dfs(depth + 1);
            self.unplaced += 1;
            for &v in fixed.iter().rev() {
                self.unplace(session, v);
            }
        }
        self.statistics.on_backtrack();
    }

    /// Branching options for `session`, cheapest first.
    fn options(&mut self, session: SessionId, admissible: &[VarId]) -> Vec<Branch> {
        let mut options = Vec::new();
        match self.model.sessions()[session.index()].kind {
            SessionKind::Lecture => {
                for &v in admissible {
                    options.push(Branch {
                        vars: [Some(v), None],
                        cost: self.increment(v),
                    });
                }
            }
            SessionKind::Tutorial => {
                for (i, &first) in admissible.iter().enumerate() {
                    let first_cost = self.increment(first);
                    self.place(session, first);
                    for &second in &admissible[i + 1..] {
                        if self.admits(session, second) {
                            options.push(Branch {
                                vars: [Some(first), Some(second)],
                                cost: first_cost + self.increment(second),
                            });
                        }
                    }
                    self.unplace(session, first);
                }
            }
        }
        // Stable: ties keep slot-rank order.
        options.sort_by_key(|o| o.cost);
        options
    }
}
