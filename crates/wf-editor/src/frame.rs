//! Per-frame screen-space geometry handed to the host renderer.

use crate::connect::ConnectionStateMachine;
use serde::Serialize;
use wf_core::{
    ConnectionId, CurveKind, GraphModel, NodeId, NodeKind, Point, Rect, ViewportController,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeFrame {
    pub id: NodeId,
    pub kind: NodeKind,
    pub rect: Rect,
    pub label: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectionFrame {
    pub id: ConnectionId,
    pub from: Point,
    pub to: Point,
    pub curve: CurveKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
}

/// Everything the host needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameGeometry {
    pub scale: f32,
    pub offset: Point,
    pub nodes: Vec<NodeFrame>,
    pub connections: Vec<ConnectionFrame>,
    /// The in-progress connection, only while connecting.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<Segment>,
}

impl FrameGeometry {
    pub fn build(
        graph: &GraphModel,
        viewport: &ViewportController,
        connect: &ConnectionStateMachine,
        selected: Option<NodeId>,
    ) -> Self {
        let nodes = graph
            .nodes()
            .map(|node| NodeFrame {
                id: node.id,
                kind: node.kind,
                rect: viewport.to_screen_rect(node.rect()),
                label: node.data.label.clone(),
                selected: selected == Some(node.id),
            })
            .collect();

        let connections = graph
            .connections()
            .filter_map(|conn| {
                let (from, to) = graph.endpoints(conn)?;
                Some(ConnectionFrame {
                    id: conn.id,
                    from: viewport.to_screen_point(from),
                    to: viewport.to_screen_point(to),
                    curve: conn.curve,
                    label: conn.label.clone(),
                })
            })
            .collect();

        let preview = connect.preview(graph).map(|(from, to)| Segment {
            from: viewport.to_screen_point(from),
            to: viewport.to_screen_point(to),
        });

        Self {
            scale: viewport.scale(),
            offset: viewport.offset(),
            nodes,
            connections,
            preview,
        }
    }
}
