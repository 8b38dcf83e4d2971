//! Flow canvas session: owns the graph and routes host input.
//!
//! ## Pointer routing
//!
//! | State / hit | Pointer down | Pointer move | Pointer up |
//! |-------------|--------------|--------------|------------|
//! | connecting, node | complete (or no-op on source) | update preview | nothing |
//! | connecting, empty | cancel, begin pan | pan | end pan |
//! | idle, node | select, begin node drag | drag node | end drag |
//! | idle, empty | deselect, begin pan | pan | end pan |
//! | ⌘ / Ctrl held | cancel, begin pan | pan | end pan |

use crate::connect::{ConnectionStateMachine, SelectOutcome};
use crate::dragdrop::drop_node;
use crate::frame::FrameGeometry;
use crate::hit::hit_test;
use crate::input::{InputEvent, Modifiers};
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use wf_core::{
    ConnectionId, ConnectionOptions, EditorConfig, GraphError, GraphModel, GraphSnapshot, NodeData, NodeId,
    NodeKind, NodeOverrides, Point, RemovedNode, Size, ViewTransform, ViewportController,
    ViewportSize,
};

/// A node being dragged by the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
struct NodeDrag {
    id: NodeId,
    /// Last pointer position, screen space.
    last: Point,
}

#[derive(Debug, Clone)]
pub struct CanvasSession {
    graph: GraphModel,
    viewport: ViewportController,
    connect: ConnectionStateMachine,
    selected: Option<NodeId>,
    drag: Option<NodeDrag>,
    size: ViewportSize,
    config: EditorConfig,
}

impl Default for CanvasSession {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl CanvasSession {
    #[must_use]
    pub fn new(config: EditorConfig) -> Self {
        Self {
            graph: GraphModel::new(),
            viewport: ViewportController::new(),
            connect: ConnectionStateMachine::new(),
            selected: None,
            drag: None,
            size: config.viewport,
            config,
        }
    }

    /// Resume a saved graph.
    ///
    /// # Errors
    /// Any [`GraphError`] raised while validating the snapshot.
    pub fn from_snapshot(snapshot: GraphSnapshot, config: EditorConfig) -> Result<Self, GraphError> {
        let mut session = Self::new(config);
        session.graph = GraphModel::from_snapshot(snapshot)?;
        Ok(session)
    }

    /// Swap in a saved graph, keeping the view. Pending interaction state is
    /// dropped. On error the current graph is kept.
    ///
    /// # Errors
    /// Any [`GraphError`] raised while validating the snapshot.
    pub fn load(&mut self, snapshot: GraphSnapshot) -> Result<(), GraphError> {
        self.graph = GraphModel::from_snapshot(snapshot)?;
        self.connect.cancel();
        self.selected = None;
        self.drag = None;
        self.viewport.end_pan();
        Ok(())
    }

    pub fn snapshot(&self) -> GraphSnapshot {
        self.graph.snapshot()
    }

    pub fn graph(&self) -> &GraphModel {
        &self.graph
    }

    pub fn viewport(&self) -> &ViewportController {
        &self.viewport
    }

    pub fn connection(&self) -> &ConnectionStateMachine {
        &self.connect
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    /// Select `id`, or clear the selection with `None`. Unknown ids are refused.
    pub fn select(&mut self, id: Option<NodeId>) -> bool {
        if id.is_some_and(|id| !self.graph.contains_node(id)) {
            return false;
        }
        let changed = self.selected != id;
        self.selected = id;
        changed
    }

    pub fn frame(&self) -> FrameGeometry {
        FrameGeometry::build(&self.graph, &self.viewport, &self.connect, self.selected)
    }

    // ─── View ────────────────────────────────────────────────────────────

    pub fn resize(&mut self, size: ViewportSize) {
        self.size = size;
    }

    pub fn view(&self) -> ViewTransform {
        self.viewport.transform()
    }

    pub fn set_view(&mut self, transform: ViewTransform) {
        self.viewport.set_transform(transform);
    }

    /// Frame every node. `false` for an empty graph.
    pub fn fit_to_content(&mut self) -> bool {
        self.viewport
            .fit_to_content(self.graph.node_rects(), self.size, self.config.fit_padding)
    }

    pub fn reset_view(&mut self) {
        self.viewport.reset();
    }

    fn zoom_centered(&mut self, delta: f32) {
        let center = Point::new(self.size.width / 2.0, self.size.height / 2.0);
        self.viewport.zoom_at(delta, center);
    }

    // ─── Graph edits ─────────────────────────────────────────────────────

    /// Add a node with its top-left at a canvas position.
    pub fn add_node(&mut self, kind: NodeKind, position: Point, overrides: NodeOverrides) -> NodeId {
        self.graph.add_node(kind, position, overrides)
    }

    /// Add a palette node dropped at a screen position.
    pub fn drop_node(&mut self, kind: NodeKind, screen: Point) -> NodeId {
        drop_node(kind, screen, &self.viewport, &mut self.graph)
    }

    /// Remove a node and its connections. A pending connection from this
    /// node is cancelled.
    pub fn remove_node(&mut self, id: NodeId) -> Option<RemovedNode> {
        let removed = self.graph.remove_node(id)?;
        if self.connect.pending_source() == Some(id) {
            self.connect.cancel();
        }
        if self.selected == Some(id) {
            self.selected = None;
        }
        if self.drag.is_some_and(|drag| drag.id == id) {
            self.drag = None;
        }
        Some(removed)
    }

    /// Move a node's top-left corner to a canvas position.
    pub fn set_node_position(&mut self, id: NodeId, position: Point) -> bool {
        self.graph.set_position(id, position)
    }

    /// Give a node an explicit size. Non-positive sizes are refused.
    pub fn resize_node(&mut self, id: NodeId, size: Size) -> bool {
        self.graph.resize_node(id, size)
    }

    /// # Errors
    /// `UnknownNode` if `id` is not in the graph.
    pub fn set_node_data(&mut self, id: NodeId, data: NodeData) -> Result<(), GraphError> {
        self.graph.set_data(id, data)
    }

    /// Connect two nodes directly, bypassing connection mode.
    ///
    /// # Errors
    /// See [`GraphModel::add_connection`].
    pub fn connect(&mut self, source: NodeId, target: NodeId) -> Result<ConnectionId, GraphError> {
        let options = self.connection_options();
        self.graph.add_connection(source, target, options)
    }

    /// # Errors
    /// `UnknownConnection` if `id` is not in the graph.
    pub fn remove_connection(&mut self, id: ConnectionId) -> Result<(), GraphError> {
        self.graph
            .remove_connection(id)
            .map(|_| ())
            .ok_or(GraphError::UnknownConnection(id))
    }

    /// Enter connection mode from `source`. Unknown nodes are refused.
    pub fn begin_connection(&mut self, source: NodeId) -> bool {
        if !self.graph.contains_node(source) {
            return false;
        }
        self.connect.begin(source);
        self.drag = None;
        true
    }

    pub fn cancel_connection(&mut self) -> bool {
        self.connect.cancel()
    }

    fn connection_options(&self) -> ConnectionOptions {
        ConnectionOptions {
            curve: Some(self.config.default_curve),
            ..Default::default()
        }
    }

    // ─── Input routing ───────────────────────────────────────────────────

    /// Route one input event. Returns `true` when the host must re-render.
    pub fn handle(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::PointerDown { x, y, modifiers } => {
                self.pointer_down(Point::new(*x, *y), *modifiers)
            }
            InputEvent::PointerMove { x, y, .. } => self.pointer_move(Point::new(*x, *y)),
            InputEvent::PointerUp { .. } => self.pointer_up(),
            InputEvent::Wheel { dy, x, y, .. } => {
                let before = self.viewport.transform();
                self.viewport
                    .zoom_at(-dy * self.config.wheel_zoom_step, Point::new(*x, *y));
                self.viewport.transform() != before
            }
            InputEvent::Key { key, modifiers } => match ShortcutMap::resolve(key, *modifiers) {
                Some(action) => self.apply_shortcut(action),
                None => false,
            },
        }
    }

    fn pointer_down(&mut self, screen: Point, modifiers: Modifiers) -> bool {
        let hit = if modifiers.forces_pan() {
            None
        } else {
            hit_test(&self.graph, self.viewport.to_canvas_point(screen))
        };
        log::trace!("pointer down at ({}, {}), hit {hit:?}", screen.x, screen.y);

        match hit {
            Some(target) if self.connect.is_connecting() => {
                let options = self.connection_options();
                match self.connect.select_node(target, &mut self.graph, options) {
                    SelectOutcome::Connected(_) => {
                        self.selected = Some(target);
                        true
                    }
                    SelectOutcome::Rejected(_) => true,
                    SelectOutcome::SameNode | SelectOutcome::Idle => false,
                }
            }
            Some(target) => {
                let changed = self.selected != Some(target);
                self.selected = Some(target);
                self.drag = Some(NodeDrag {
                    id: target,
                    last: screen,
                });
                changed
            }
            None => {
                let cancelled = self.connect.cancel();
                let deselected = !modifiers.forces_pan() && self.selected.take().is_some();
                self.viewport.begin_pan(screen);
                cancelled || deselected
            }
        }
    }

    fn pointer_move(&mut self, screen: Point) -> bool {
        if self.viewport.is_panning() {
            return self.viewport.pan_to(screen);
        }
        if let Some(drag) = self.drag.as_mut() {
            let scale = self.viewport.scale();
            let dx = (screen.x - drag.last.x) / scale;
            let dy = (screen.y - drag.last.y) / scale;
            drag.last = screen;
            return self.graph.move_node(drag.id, dx, dy);
        }
        if self.connect.is_connecting() {
            return self
                .connect
                .update_pointer(self.viewport.to_canvas_point(screen));
        }
        false
    }

    fn pointer_up(&mut self) -> bool {
        let was_active = self.viewport.is_panning() || self.drag.is_some();
        self.viewport.end_pan();
        self.drag = None;
        was_active
    }

    /// Run a resolved shortcut. Returns `true` when something changed.
    pub fn apply_shortcut(&mut self, action: ShortcutAction) -> bool {
        log::debug!("shortcut: {}", action.name());
        match action {
            ShortcutAction::Cancel => {
                let dragging = self.drag.take().is_some();
                self.connect.cancel() || dragging
            }
            ShortcutAction::ConnectFromSelection => match self.selected {
                Some(id) => self.begin_connection(id),
                None => false,
            },
            ShortcutAction::DeleteSelection => match self.selected {
                Some(id) => self.remove_node(id).is_some(),
                None => false,
            },
            ShortcutAction::ZoomIn => {
                let before = self.viewport.scale();
                self.zoom_centered(self.config.zoom_step);
                self.viewport.scale() != before
            }
            ShortcutAction::ZoomOut => {
                let before = self.viewport.scale();
                self.zoom_centered(-self.config.zoom_step);
                self.viewport.scale() != before
            }
            ShortcutAction::ResetView => {
                let before = self.viewport.transform();
                self.reset_view();
                self.viewport.transform() != before
            }
            ShortcutAction::FitToContent => self.fit_to_content(),
        }
    }
}
