//! The workflow graph: nodes plus directed connections.
//!
//! Backed by a `StableDiGraph` so node and edge indices survive removals,
//! with id → index maps for lookup by stable id. The graph reuses freed
//! slots, so paint order is kept separately as insertion order. Parallel edges are allowed
//! (duplicate source/target pairs are legal), self-loops are not. Removing a
//! node removes every connection touching it in the same call, so a
//! connection can never outlive one of its endpoints.

use crate::catalog::NodeKind;
use crate::error::GraphError;
use crate::id::{ConnectionId, NodeId};
use crate::model::*;
use petgraph::Direction;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashMap;

/// Plain serializable form of a graph, as handed to and from the host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub connections: Vec<Connection>,
}

/// A node removed from the graph together with the connections it took along.
#[derive(Debug, Clone, PartialEq)]
pub struct RemovedNode {
    pub node: Node,
    pub connections: SmallVec<[Connection; 4]>,
}

#[derive(Debug, Clone, Default)]
pub struct GraphModel {
    graph: StableDiGraph<Node, Connection>,
    node_index: HashMap<NodeId, NodeIndex>,
    connection_index: HashMap<ConnectionId, EdgeIndex>,
    /// Insertion order; the last node paints on top.
    node_order: Vec<NodeId>,
    connection_order: Vec<ConnectionId>,
}

impl GraphModel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a graph from persisted records.
    ///
    /// # Errors
    /// Duplicate ids, self-connections, or connections whose endpoints are
    /// not among `snapshot.nodes`.
    pub fn from_snapshot(snapshot: GraphSnapshot) -> Result<Self, GraphError> {
        let mut model = Self::new();
        for node in snapshot.nodes {
            model.insert_node(node)?;
        }
        for connection in snapshot.connections {
            model.insert_connection(connection)?;
        }
        log::debug!(
            "restored graph: {} nodes, {} connections",
            model.node_count(),
            model.connection_count()
        );
        Ok(model)
    }

    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            nodes: self.nodes().cloned().collect(),
            connections: self.connections().cloned().collect(),
        }
    }

    // ─── Nodes ───────────────────────────────────────────────────────────

    /// Create a node of `kind` at `position` with catalog defaults, then
    /// merge `overrides` over them.
    pub fn add_node(&mut self, kind: NodeKind, position: Point, overrides: NodeOverrides) -> NodeId {
        let id = NodeId::fresh(kind.key(), |id| self.node_index.contains_key(&id));
        let mut node = Node::new(id, kind, position);
        overrides.apply(&mut node);
        let idx = self.graph.add_node(node);
        self.node_index.insert(id, idx);
        self.node_order.push(id);
        log::debug!("add node {id:?} ({kind}) at ({}, {})", position.x, position.y);
        id
    }

    /// Insert a fully specified node (used when resuming a document).
    ///
    /// # Errors
    /// `DuplicateNode` if the id is already taken.
    pub fn insert_node(&mut self, node: Node) -> Result<(), GraphError> {
        if self.node_index.contains_key(&node.id) {
            return Err(GraphError::DuplicateNode(node.id));
        }
        let id = node.id;
        let idx = self.graph.add_node(node);
        self.node_index.insert(id, idx);
        self.node_order.push(id);
        Ok(())
    }

    /// Remove a node and, atomically, every connection that references it.
    pub fn remove_node(&mut self, id: NodeId) -> Option<RemovedNode> {
        let idx = self.node_index.remove(&id)?;

        let incident: SmallVec<[EdgeIndex; 4]> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .chain(self.graph.edges_directed(idx, Direction::Incoming))
            .map(|e| e.id())
            .collect();

        let mut connections: SmallVec<[Connection; 4]> = SmallVec::new();
        for edge in incident {
            if let Some(conn) = self.graph.remove_edge(edge) {
                self.connection_index.remove(&conn.id);
                connections.push(conn);
            }
        }

        let node = self.graph.remove_node(idx)?;
        self.node_order.retain(|n| *n != id);
        self.connection_order
            .retain(|c| !connections.iter().any(|conn| conn.id == *c));
        log::debug!(
            "remove node {id:?}, cascaded {} connection(s)",
            connections.len()
        );
        Some(RemovedNode { node, connections })
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.node_index.get(&id).map(|idx| &self.graph[*idx])
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.node_index.contains_key(&id)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.node_index
            .get(&id)
            .copied()
            .map(|idx| &mut self.graph[idx])
    }

    /// Translate a node by a canvas-space delta. Returns false for unknown ids.
    pub fn move_node(&mut self, id: NodeId, dx: f32, dy: f32) -> bool {
        match self.node_mut(id) {
            Some(node) => {
                node.position.x += dx;
                node.position.y += dy;
                true
            }
            None => false,
        }
    }

    /// Place a node's top-left corner. Non-finite positions are refused.
    pub fn set_position(&mut self, id: NodeId, position: Point) -> bool {
        if !(position.x.is_finite() && position.y.is_finite()) {
            return false;
        }
        match self.node_mut(id) {
            Some(node) => {
                node.position = position;
                true
            }
            None => false,
        }
    }

    /// Width and height must be positive and finite.
    pub fn resize_node(&mut self, id: NodeId, size: Size) -> bool {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if !(valid(size.width) && valid(size.height)) {
            return false;
        }
        match self.node_mut(id) {
            Some(node) => {
                node.size = size;
                true
            }
            None => false,
        }
    }

    /// Replace a node's payload (label, description, properties, style).
    ///
    /// # Errors
    /// `UnknownNode` if `id` is not in the graph.
    pub fn set_data(&mut self, id: NodeId, data: NodeData) -> Result<(), GraphError> {
        let node = self.node_mut(id).ok_or(GraphError::UnknownNode(id))?;
        node.data = data;
        Ok(())
    }

    /// Nodes in insertion (paint) order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.node_order.iter().filter_map(|id| self.node(*id))
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn node_rects(&self) -> impl Iterator<Item = Rect> + '_ {
        self.nodes().map(Node::rect)
    }

    /// Bounding box of every node rectangle, `None` for an empty graph.
    pub fn content_bounds(&self) -> Option<Rect> {
        Rect::union_all(self.node_rects())
    }

    // ─── Connections ─────────────────────────────────────────────────────

    /// Connect `source` → `target`.
    ///
    /// # Errors
    /// `SelfConnection` when `source == target`, `UnknownNode` when either
    /// endpoint is missing, `DuplicateConnection` when `options.id` is taken.
    /// The graph is unchanged on error.
    pub fn add_connection(
        &mut self,
        source: NodeId,
        target: NodeId,
        options: ConnectionOptions,
    ) -> Result<ConnectionId, GraphError> {
        let id = match options.id {
            Some(id) => id,
            None => ConnectionId::fresh("conn", |id| self.connection_index.contains_key(&id)),
        };
        self.insert_connection(Connection {
            id,
            source,
            target,
            curve: options.curve.unwrap_or_default(),
            style: options.style,
            label: options.label,
        })?;
        log::debug!("connect {source:?} -> {target:?} as {id:?}");
        Ok(id)
    }

    /// Insert a fully specified connection after validating its endpoints.
    ///
    /// # Errors
    /// Same conditions as [`GraphModel::add_connection`].
    pub fn insert_connection(&mut self, connection: Connection) -> Result<(), GraphError> {
        if connection.source == connection.target {
            return Err(GraphError::SelfConnection(connection.source));
        }
        if self.connection_index.contains_key(&connection.id) {
            return Err(GraphError::DuplicateConnection(connection.id));
        }
        let from = self
            .node_index
            .get(&connection.source)
            .copied()
            .ok_or(GraphError::UnknownNode(connection.source))?;
        let to = self
            .node_index
            .get(&connection.target)
            .copied()
            .ok_or(GraphError::UnknownNode(connection.target))?;

        let id = connection.id;
        let edge = self.graph.add_edge(from, to, connection);
        self.connection_index.insert(id, edge);
        self.connection_order.push(id);
        Ok(())
    }

    pub fn remove_connection(&mut self, id: ConnectionId) -> Option<Connection> {
        let edge = self.connection_index.remove(&id)?;
        let removed = self.graph.remove_edge(edge);
        if removed.is_some() {
            self.connection_order.retain(|c| *c != id);
            log::debug!("remove connection {id:?}");
        }
        removed
    }

    pub fn connection(&self, id: ConnectionId) -> Option<&Connection> {
        self.connection_index
            .get(&id)
            .and_then(|edge| self.graph.edge_weight(*edge))
    }

    /// Connections in insertion order.
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.connection_order
            .iter()
            .filter_map(|id| self.connection(*id))
    }

    pub fn connection_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Every connection with `id` as source or target.
    pub fn connections_of(&self, id: NodeId) -> SmallVec<[&Connection; 4]> {
        let Some(&idx) = self.node_index.get(&id) else {
            return SmallVec::new();
        };
        self.graph
            .edges_directed(idx, Direction::Outgoing)
            .chain(self.graph.edges_directed(idx, Direction::Incoming))
            .map(|e| e.weight())
            .collect()
    }

    /// Anchor points (node centers) of a connection's two endpoints.
    pub fn endpoints(&self, connection: &Connection) -> Option<(Point, Point)> {
        let from = self.node(connection.source)?.anchor();
        let to = self.node(connection.target)?.anchor();
        Some((from, to))
    }
}
