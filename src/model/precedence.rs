//! Chronological ordering between the sessions of each course.
//!
//! Sessions are nodes of a directed acyclic graph and an edge `a -> b` means
//! every assignment of `a` must come strictly before every assignment of `b`.
//! Courses contribute a chain `0 -> 1 -> ... -> n-1`.

use std::collections::HashMap;

use petgraph::algo::{has_path_connecting, toposort};
use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableGraph;
use petgraph::Direction;

use super::error::ModelError;
use super::variables::{SessionId, SessionInfo};

#[derive(Debug, Clone, Default)]
pub struct PrecedenceGraph {
    graph: StableGraph<SessionId, ()>,
    node_by_session: HashMap<SessionId, NodeIndex>,
}

impl PrecedenceGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the per-course chains for `sessions`, which must list each
    /// course's sessions contiguously in timeline order.
    pub(crate) fn from_sessions(sessions: &[SessionInfo]) -> Result<Self, ModelError> {
        let mut graph = Self::new();
        for i in 0..sessions.len() {
            graph.add_session(SessionId(i));
        }
        for (i, pair) in sessions.windows(2).enumerate() {
            if pair[0].course == pair[1].course {
                graph.add_dependency(SessionId(i), SessionId(i + 1), sessions)?;
            }
        }
        Ok(graph)
    }

    pub fn add_session(&mut self, session: SessionId) -> NodeIndex {
        if let Some(&node) = self.node_by_session.get(&session) {
            return node;
        }
        let node = self.graph.add_node(session);
        self.node_by_session.insert(session, node);
        node
    }

    /// Adds `earlier -> later`.
    ///
    /// # Errors
    ///
    /// `CycleDetected` if a path `later -> earlier` already exists.
    pub fn add_dependency(
        &mut self,
        earlier: SessionId,
        later: SessionId,
        sessions: &[SessionInfo],
    ) -> Result<(), ModelError> {
        let from = self.add_session(earlier);
        let to = self.add_session(later);
        if has_path_connecting(&self.graph, to, from, None) {
            return Err(ModelError::CycleDetected {
                from: sessions[earlier.0].session.clone(),
                to: sessions[later.0].session.clone(),
            });
        }
        self.graph.add_edge(from, to, ());
        Ok(())
    }

    fn neighbor(&self, session: SessionId, direction: Direction) -> Option<SessionId> {
        let node = self.node_by_session.get(&session)?;
        self.graph
            .neighbors_directed(*node, direction)
            .next()
            .and_then(|n| self.graph.node_weight(n).copied())
    }

    /// The session that must come directly before `session`.
    pub fn predecessor(&self, session: SessionId) -> Option<SessionId> {
        self.neighbor(session, Direction::Incoming)
    }

    /// The session that must come directly after `session`.
    pub fn successor(&self, session: SessionId) -> Option<SessionId> {
        self.neighbor(session, Direction::Outgoing)
    }

    /// Sessions in an order where every session follows its predecessor.
    ///
    /// # Errors
    ///
    /// `GraphContainsCycle`, which [`add_dependency`](Self::add_dependency) prevents.
    pub fn topo_order(&self) -> Result<Vec<SessionId>, ModelError> {
        let nodes = toposort(&self.graph, None).map_err(|_| ModelError::GraphContainsCycle)?;
        Ok(nodes
            .into_iter()
            .filter_map(|n| self.graph.node_weight(n).copied())
            .collect())
    }

    /// All `(earlier, later)` pairs.
    pub fn edges(&self) -> impl Iterator<Item = (SessionId, SessionId)> + '_ {
        self.graph.edge_indices().filter_map(move |e| {
            let (a, b) = self.graph.edge_endpoints(e)?;
            Some((*self.graph.node_weight(a)?, *self.graph.node_weight(b)?))
        })
    }

    /// First sessions of each course.
    pub fn roots(&self) -> Vec<SessionId> {
        let mut roots: Vec<SessionId> = self
            .graph
            .node_indices()
            .filter(|&n| {
                self.graph
                    .neighbors_directed(n, Direction::Incoming)
                    .next()
                    .is_none()
            })
            .filter_map(|n| self.graph.node_weight(n).copied())
            .collect();
        roots.sort();
        roots
    }

    pub fn session_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn dependency_count(&self) -> usize {
        self.graph.edge_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::{SessionKind, SessionRef};

    fn info(course: usize, index: usize) -> SessionInfo {
        SessionInfo {
            session: SessionRef::new(format!("C{course}"), index),
            kind: SessionKind::Lecture,
            course,
            lecturer: 0,
            programs: vec![],
            capacity_basis: 10,
        }
    }

    #[test]
    fn chains_follow_courses() {
        let sessions = vec![info(0, 0), info(0, 1), info(0, 2), info(1, 0)];
        let g = PrecedenceGraph::from_sessions(&sessions).unwrap();
        assert_eq!(g.session_count(), 4);
        assert_eq!(g.dependency_count(), 2);
        assert_eq!(g.successor(SessionId(0)), Some(SessionId(1)));
        assert_eq!(g.predecessor(SessionId(2)), Some(SessionId(1)));
        assert_eq!(g.predecessor(SessionId(3)), None);
        assert_eq!(g.roots(), vec![SessionId(0), SessionId(3)]);
    }

    #[test]
    fn topo_order_respects_chains() {
        let sessions = vec![info(0, 0), info(0, 1), info(1, 0), info(1, 1)];
        let g = PrecedenceGraph::from_sessions(&sessions).unwrap();
        let order = g.topo_order().unwrap();
        let pos = |s: usize| order.iter().position(|x| x.0 == s).unwrap();
        assert!(pos(0) < pos(1));
        assert!(pos(2) < pos(3));
    }

    #[test]
    fn cycle_rejected() {
        let sessions = vec![info(0, 0), info(0, 1)];
        let mut g = PrecedenceGraph::from_sessions(&sessions).unwrap();
        let err = g
            .add_dependency(SessionId(1), SessionId(0), &sessions)
            .unwrap_err();
        assert!(matches!(err, ModelError::CycleDetected { .. }));
    }
}
