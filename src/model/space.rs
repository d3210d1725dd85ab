//! Candidate space: the assignment variables open to each session.
//!
//! Rooms that cannot hold a session's required fraction of students never
//! get a variable. They are recorded as [`RejectedRoom`]s instead, so the
//! exclusion is visible rather than silent.

use super::variables::{SessionId, VarId};

/// A room left out of a session's candidates for lack of capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RejectedRoom {
    pub session: SessionId,
    pub room: usize,
    /// Seats the session needs.
    pub required: u32,
    pub capacity: u32,
}

/// Per-session candidate assignment variables, ordered by slot rank then
/// room position.
#[derive(Debug, Clone, Default)]
pub struct CandidateSpace {
    candidates: Vec<Vec<VarId>>,
    rejected: Vec<RejectedRoom>,
}

impl CandidateSpace {
    pub(crate) fn with_sessions(sessions: usize) -> Self {
        Self {
            candidates: vec![Vec::new(); sessions],
            rejected: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, session: SessionId, var: VarId) {
        self.candidates[session.0].push(var);
    }

    pub(crate) fn reject(&mut self, rejected: RejectedRoom) {
        self.rejected.push(rejected);
    }

    pub fn candidates(&self, session: SessionId) -> &[VarId] {
        self.candidates
            .get(session.0)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Rooms excluded for every session, in build order.
    pub fn rejected(&self) -> &[RejectedRoom] {
        &self.rejected
    }

    pub fn rejected_for(&self, session: SessionId) -> impl Iterator<Item = &RejectedRoom> {
        self.rejected.iter().filter(move |r| r.session == session)
    }

    pub fn session_count(&self) -> usize {
        self.candidates.len()
    }

    /// Total number of candidate variables.
    pub fn candidate_count(&self) -> usize {
        self.candidates.iter().map(Vec::len).sum()
    }

    /// Sessions with fewer candidates than `required(session)`.
    pub fn starved<'a>(
        &'a self,
        required: impl Fn(SessionId) -> usize + 'a,
    ) -> impl Iterator<Item = SessionId> + 'a {
        self.candidates
            .iter()
            .enumerate()
            .filter(move |(i, vars)| vars.len() < required(SessionId(*i)))
            .map(|(i, _)| SessionId(i))
    }
}
