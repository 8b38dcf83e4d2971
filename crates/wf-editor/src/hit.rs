//! Hit testing in canvas space.

use wf_core::{GraphModel, NodeId, Point};

/// Topmost node whose rectangle contains `point`.
///
/// Nodes paint in index order, so the last match is on top.
pub fn hit_test(graph: &GraphModel, point: Point) -> Option<NodeId> {
    graph
        .nodes()
        .filter(|node| node.rect().contains(point))
        .last()
        .map(|node| node.id)
}
