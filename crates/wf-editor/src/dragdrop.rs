//! Drag & drop resolution for both editing surfaces.
//!
//! On the form grid a drop carries either a palette item ("new field of
//! kind T") or an existing field, and lands on a cell or on the grid as a
//! whole. The resolver turns that into exactly one layout outcome:
//!
//! | Payload | Target | Outcome |
//! |---------|--------|---------|
//! | new item | empty cell in range | `CreatePlacement` |
//! | existing field | empty cell in range | `MovePlacement` (old cell left empty) |
//! | either | whole grid | seed `(1, 1)`, or append a row and place at column 1 |
//! | either | occupied / out of range | `Ignored`, nothing moves |
//!
//! A plain click on an empty cell is `ClickCreate` with the configured
//! default field kind.

use serde::{Serialize, Serializer};
use wf_core::grid::Cell;
use wf_core::{
    FieldId, FieldKind, GraphModel, GridError, GridLayout, NodeId, NodeKind, NodeOverrides, Point,
    ViewportController,
};

/// What is being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPayload {
    NewItem(FieldKind),
    Existing(FieldId),
}

/// Where it was released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    Cell(Cell),
    /// Anywhere on the grid surface outside a cell.
    Canvas,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DropOutcome {
    CreatePlacement {
        id: FieldId,
        kind: FieldKind,
        cell: Cell,
    },
    MovePlacement {
        id: FieldId,
        #[serde(skip_serializing_if = "Option::is_none")]
        from: Option<Cell>,
        cell: Cell,
    },
    ClickCreate {
        id: FieldId,
        kind: FieldKind,
        cell: Cell,
    },
    Ignored {
        #[serde(serialize_with = "error_message")]
        reason: GridError,
    },
}

impl DropOutcome {
    pub fn is_ignored(&self) -> bool {
        matches!(self, DropOutcome::Ignored { .. })
    }
}

fn error_message<S: Serializer>(err: &GridError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(err)
}

/// Apply `payload` dropped on `target` to `grid`.
///
/// Stateless; [`DragDropResolver`] wraps it with the pending-drag state.
pub fn resolve(payload: DragPayload, target: DropTarget, grid: &mut GridLayout) -> DropOutcome {
    if let DragPayload::Existing(id) = payload {
        if !grid.contains_field(id) {
            return DropOutcome::Ignored {
                reason: GridError::UnknownField(id),
            };
        }
    }

    let cell = match target {
        DropTarget::Cell(cell) => cell,
        DropTarget::Canvas if !grid.is_seeded() => Cell::new(1, 1),
        DropTarget::Canvas => match grid.add_row() {
            Ok(row) => Cell::new(row, 1),
            Err(reason) => return DropOutcome::Ignored { reason },
        },
    };

    let result = match payload {
        DragPayload::NewItem(kind) => grid
            .add_field(kind, Some(cell))
            .map(|id| DropOutcome::CreatePlacement { id, kind, cell }),
        DragPayload::Existing(id) => grid
            .place_field(id, cell)
            .map(|from| DropOutcome::MovePlacement { id, from, cell }),
    };

    result.unwrap_or_else(|reason| {
        log::debug!("drop at {cell} ignored: {reason}");
        DropOutcome::Ignored { reason }
    })
}

/// Holds at most one pending drag between `begin_drag` and `drop`.
#[derive(Debug, Clone, Default)]
pub struct DragDropResolver {
    pending: Option<DragPayload>,
}

impl DragDropResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> Option<DragPayload> {
        self.pending
    }

    /// Start a drag, replacing any pending one.
    pub fn begin_drag(&mut self, payload: DragPayload) {
        log::trace!("drag: begin {payload:?}");
        self.pending = Some(payload);
    }

    /// Drop abandoned outside any target. Returns whether a drag was pending.
    pub fn cancel_drag(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Resolve the pending drag against `target`. `None` if nothing was
    /// being dragged.
    pub fn drop(&mut self, target: DropTarget, grid: &mut GridLayout) -> Option<DropOutcome> {
        let payload = self.pending.take()?;
        Some(resolve(payload, target, grid))
    }

    /// A click without a drag: create a `kind` field in an empty cell.
    pub fn click(&mut self, cell: Cell, kind: FieldKind, grid: &mut GridLayout) -> DropOutcome {
        match grid.add_field(kind, Some(cell)) {
            Ok(id) => DropOutcome::ClickCreate { id, kind, cell },
            Err(reason) => DropOutcome::Ignored { reason },
        }
    }
}

// ─── Graph canvas ────────────────────────────────────────────────────────

/// Drop a palette node at a screen position. The node's top-left corner
/// lands on the projected canvas point.
pub fn drop_node(
    kind: NodeKind,
    screen: Point,
    viewport: &ViewportController,
    graph: &mut GraphModel,
) -> NodeId {
    let position = viewport.to_canvas_point(screen);
    graph.add_node(kind, position, NodeOverrides::default())
}
