//! Two-step connection mode: pick a source, then pick a target.
//!
//! ```text
//! Idle ──begin(s)──▶ Connecting(s) ──select_node(t ≠ s)──▶ Idle   (+ connection s → t)
//!                    Connecting(s) ──select_node(s)──────▶ Connecting(s)
//!                    Connecting(s) ──cancel / begin(s')──▶ Idle / Connecting(s')
//! ```
//!
//! While connecting, pointer moves update a transient preview segment that
//! is never stored in the graph.

use wf_core::{ConnectionId, ConnectionOptions, GraphError, GraphModel, NodeId, Point};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ConnectionState {
    #[default]
    Idle,
    Connecting {
        source: NodeId,
        /// Last pointer position in canvas space, if one has been seen.
        pointer: Option<Point>,
    },
}

/// Result of picking a node while the machine is running.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectOutcome {
    /// No connection was pending; the pick means nothing to this machine.
    Idle,
    /// The source was picked again; still connecting.
    SameNode,
    Connected(ConnectionId),
    /// The graph refused the connection. The machine is back to `Idle`.
    Rejected(GraphError),
}

#[derive(Debug, Clone, Default)]
pub struct ConnectionStateMachine {
    state: ConnectionState,
}

impl ConnectionStateMachine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_connecting(&self) -> bool {
        matches!(self.state, ConnectionState::Connecting { .. })
    }

    pub fn pending_source(&self) -> Option<NodeId> {
        match self.state {
            ConnectionState::Connecting { source, .. } => Some(source),
            ConnectionState::Idle => None,
        }
    }

    /// Start connecting from `source`, replacing any pending source.
    /// Returns the replaced source.
    pub fn begin(&mut self, source: NodeId) -> Option<NodeId> {
        let replaced = self.pending_source();
        self.state = ConnectionState::Connecting {
            source,
            pointer: None,
        };
        log::debug!("connect: begin from {source:?} (replaced {replaced:?})");
        replaced
    }

    /// Pick `target`. A different node completes the connection through
    /// `graph`; the source itself is a no-op.
    pub fn select_node(
        &mut self,
        target: NodeId,
        graph: &mut GraphModel,
        options: ConnectionOptions,
    ) -> SelectOutcome {
        let Some(source) = self.pending_source() else {
            return SelectOutcome::Idle;
        };
        if source == target {
            return SelectOutcome::SameNode;
        }

        self.state = ConnectionState::Idle;
        match graph.add_connection(source, target, options) {
            Ok(id) => SelectOutcome::Connected(id),
            Err(err) => {
                log::debug!("connect: {source:?} -> {target:?} rejected: {err}");
                SelectOutcome::Rejected(err)
            }
        }
    }

    /// Abort a pending connection. Returns `false` when already idle.
    pub fn cancel(&mut self) -> bool {
        if !self.is_connecting() {
            return false;
        }
        log::debug!("connect: cancelled");
        self.state = ConnectionState::Idle;
        true
    }

    /// Record the pointer (canvas space) for the preview. Ignored when idle.
    pub fn update_pointer(&mut self, point: Point) -> bool {
        match &mut self.state {
            ConnectionState::Connecting { pointer, .. } => {
                *pointer = Some(point);
                true
            }
            ConnectionState::Idle => false,
        }
    }

    /// Transient segment from the source anchor to the pointer, in canvas
    /// space. `None` when idle, before the first move, or if the source is
    /// gone.
    pub fn preview(&self, graph: &GraphModel) -> Option<(Point, Point)> {
        let ConnectionState::Connecting {
            source,
            pointer: Some(pointer),
        } = self.state
        else {
            return None;
        };
        let from = graph.node(source)?.anchor();
        Some((from, pointer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wf_core::{NodeKind, NodeOverrides};

    fn two_nodes() -> (GraphModel, NodeId, NodeId) {
        let mut graph = GraphModel::new();
        let a = graph.add_node(NodeKind::Start, Point::new(0.0, 0.0), NodeOverrides::default());
        let b = graph.add_node(NodeKind::End, Point::new(200.0, 0.0), NodeOverrides::default());
        (graph, a, b)
    }

    #[test]
    fn selecting_the_source_is_a_noop() {
        let (mut graph, a, b) = two_nodes();
        let mut machine = ConnectionStateMachine::new();
        machine.begin(a);

        assert_eq!(
            machine.select_node(a, &mut graph, ConnectionOptions::default()),
            SelectOutcome::SameNode
        );
        assert_eq!(machine.pending_source(), Some(a));
        assert_eq!(graph.connection_count(), 0);

        let outcome = machine.select_node(b, &mut graph, ConnectionOptions::default());
        let SelectOutcome::Connected(id) = outcome else {
            panic!("expected a connection, got {outcome:?}");
        };
        let conn = graph.connection(id).unwrap();
        assert_eq!((conn.source, conn.target), (a, b));
        assert_eq!(graph.connection_count(), 1);
        assert_eq!(machine.state(), ConnectionState::Idle);
    }

    #[test]
    fn begin_replaces_pending_source() {
        let (_, a, b) = two_nodes();
        let mut machine = ConnectionStateMachine::new();
        assert_eq!(machine.begin(a), None);
        assert_eq!(machine.begin(b), Some(a));
        assert_eq!(machine.pending_source(), Some(b));
    }

    #[test]
    fn select_while_idle_does_nothing() {
        let (mut graph, _, b) = two_nodes();
        let mut machine = ConnectionStateMachine::new();
        assert_eq!(
            machine.select_node(b, &mut graph, ConnectionOptions::default()),
            SelectOutcome::Idle
        );
        assert_eq!(graph.connection_count(), 0);
    }

    #[test]
    fn rejected_connection_still_returns_to_idle() {
        let (mut graph, a, b) = two_nodes();
        let mut machine = ConnectionStateMachine::new();
        machine.begin(a);
        graph.remove_node(b);

        let outcome = machine.select_node(b, &mut graph, ConnectionOptions::default());
        assert_eq!(outcome, SelectOutcome::Rejected(GraphError::UnknownNode(b)));
        assert!(!machine.is_connecting());
    }

    #[test]
    fn preview_tracks_pointer_until_exit() {
        let (graph, a, _) = two_nodes();
        let mut machine = ConnectionStateMachine::new();
        assert!(!machine.update_pointer(Point::new(1.0, 1.0)));

        machine.begin(a);
        assert_eq!(machine.preview(&graph), None);
        assert!(machine.update_pointer(Point::new(120.0, 90.0)));
        assert_eq!(
            machine.preview(&graph),
            Some((Point::new(30.0, 30.0), Point::new(120.0, 90.0)))
        );

        assert!(machine.cancel());
        assert_eq!(machine.preview(&graph), None);
        assert!(!machine.cancel());
    }
}
