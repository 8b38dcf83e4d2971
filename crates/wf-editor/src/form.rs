//! Form designer session: owns the grid layout and the drop resolver.

use crate::dragdrop::{DragDropResolver, DragPayload, DropOutcome, DropTarget};
use wf_core::grid::{FieldDef, RowTrack};
use wf_core::{Cell, EditorConfig, FieldId, GridError, GridLayout, GridSnapshot};

#[derive(Debug, Clone)]
pub struct FormSession {
    grid: GridLayout,
    resolver: DragDropResolver,
    config: EditorConfig,
}

impl Default for FormSession {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl FormSession {
    #[must_use]
    pub fn new(config: EditorConfig) -> Self {
        Self {
            grid: GridLayout::new(),
            resolver: DragDropResolver::new(),
            config,
        }
    }

    /// Resume a saved form layout.
    ///
    /// # Errors
    /// Any [`GridError`] raised while validating the snapshot.
    pub fn from_snapshot(snapshot: GridSnapshot, config: EditorConfig) -> Result<Self, GridError> {
        Ok(Self {
            grid: GridLayout::from_snapshot(snapshot)?,
            resolver: DragDropResolver::new(),
            config,
        })
    }

    pub fn snapshot(&self) -> GridSnapshot {
        self.grid.snapshot()
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn grid(&self) -> &GridLayout {
        &self.grid
    }

    pub fn tracks(&self) -> Vec<RowTrack> {
        self.grid.tracks()
    }

    // ─── Drag & drop ─────────────────────────────────────────────────────

    pub fn begin_drag(&mut self, payload: DragPayload) {
        self.resolver.begin_drag(payload);
    }

    pub fn cancel_drag(&mut self) -> bool {
        self.resolver.cancel_drag()
    }

    pub fn is_dragging(&self) -> bool {
        self.resolver.pending().is_some()
    }

    /// Release the pending drag over `target`. `None` when nothing was dragged.
    pub fn drop(&mut self, target: DropTarget) -> Option<DropOutcome> {
        self.resolver.drop(target, &mut self.grid)
    }

    /// Non-drag click on a cell: create a field of the configured default kind.
    pub fn click(&mut self, cell: Cell) -> DropOutcome {
        self.resolver
            .click(cell, self.config.default_field_kind, &mut self.grid)
    }

    // ─── Structure & fields ──────────────────────────────────────────────

    /// # Errors
    /// `RowOutOfRange` if the row does not exist.
    pub fn add_column(&mut self, row: u32) -> Result<u32, GridError> {
        self.grid.add_column(row)
    }

    /// # Errors
    /// `RowOutOfRange` once the grid has its maximum number of rows.
    pub fn add_row(&mut self) -> Result<u32, GridError> {
        self.grid.add_row()
    }

    /// Delete a row and the fields placed in it.
    ///
    /// # Errors
    /// `RowOutOfRange` if the row does not exist.
    pub fn remove_row(&mut self, row: u32) -> Result<Vec<FieldDef>, GridError> {
        self.grid.remove_row(row)
    }

    /// # Errors
    /// `UnknownField` if the field does not exist.
    pub fn remove_field(&mut self, id: FieldId) -> Result<FieldDef, GridError> {
        self.grid.remove_field(id)
    }

    /// # Errors
    /// `UnknownField` if the field does not exist.
    pub fn unplace_field(&mut self, id: FieldId) -> Result<Option<Cell>, GridError> {
        self.grid.unplace_field(id)
    }

    /// # Errors
    /// `UnknownField` if the field does not exist.
    pub fn update_field(&mut self, id: FieldId, label: String, required: bool) -> Result<(), GridError> {
        self.grid.update_field(id, label, required)
    }

    /// # Errors
    /// See [`GridLayout::set_column_weight`].
    pub fn set_column_weight(&mut self, col: u32, weight: f32) -> Result<(), GridError> {
        self.grid.set_column_weight(col, weight)
    }

    /// # Errors
    /// See [`GridLayout::set_row_weight`].
    pub fn set_row_weight(&mut self, row: u32, weight: f32) -> Result<(), GridError> {
        self.grid.set_row_weight(row, weight)
    }
}
