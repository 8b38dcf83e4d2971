//! `FormGrid`: the form designer surface for JavaScript.

use crate::{BridgeError, config_from_json, known, respond};
use wasm_bindgen::prelude::*;
use wf_core::{Cell, FieldId, FieldKind, GridSnapshot};
use wf_editor::{DragPayload, DropOutcome, DropTarget, FormSession};

#[wasm_bindgen]
pub struct FormGrid {
    session: FormSession,
}

#[wasm_bindgen]
impl FormGrid {
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Self {
        crate::console_error_panic_hook_setup();
        Self {
            session: FormSession::new(config_from_json(config_json)),
        }
    }

    /// Replace the layout with a saved snapshot. Answers with the field count.
    pub fn load(&mut self, snapshot_json: &str) -> String {
        respond(self.try_load(snapshot_json))
    }

    pub fn snapshot(&self) -> String {
        respond(Ok(self.session.snapshot()))
    }

    /// Per-row tracks with normalized column fractions.
    pub fn tracks(&self) -> String {
        respond(Ok(self.session.tracks()))
    }

    // ─── Drag & drop ─────────────────────────────────────────────────────

    /// Start dragging a palette item. `false` for an unknown field kind.
    pub fn begin_drag_new(&mut self, kind: &str) -> bool {
        match FieldKind::from_key(kind) {
            Some(kind) => {
                self.session.begin_drag(DragPayload::NewItem(kind));
                true
            }
            None => {
                log::warn!("bridge: {}", BridgeError::UnknownFieldKind(kind.to_string()));
                false
            }
        }
    }

    /// Start dragging a field already in the form. `false` for unknown ids.
    pub fn begin_drag_existing(&mut self, field_id: &str) -> bool {
        match FieldId::get(field_id) {
            Some(id) if self.session.grid().contains_field(id) => {
                self.session.begin_drag(DragPayload::Existing(id));
                true
            }
            _ => false,
        }
    }

    pub fn cancel_drag(&mut self) -> bool {
        self.session.cancel_drag()
    }

    /// Drop on a cell. Answers with the tagged outcome, or `null` when
    /// nothing was being dragged.
    pub fn drop_on_cell(&mut self, row: u32, col: u32) -> String {
        let outcome = self.session.drop(DropTarget::Cell(Cell::new(row, col)));
        respond(Ok(outcome))
    }

    /// Drop on the grid surface outside any cell.
    pub fn drop_on_canvas(&mut self) -> String {
        let outcome = self.session.drop(DropTarget::Canvas);
        respond(Ok(outcome))
    }

    /// Plain click on a cell: creates a default-kind field if it is empty.
    pub fn click_cell(&mut self, row: u32, col: u32) -> String {
        let outcome: DropOutcome = self.session.click(Cell::new(row, col));
        respond(Ok(outcome))
    }

    // ─── Structure ───────────────────────────────────────────────────────

    /// Answers with the new row index.
    pub fn add_row(&mut self) -> String {
        respond(self.session.add_row().map_err(BridgeError::from))
    }

    /// Answers with the row's new column count.
    pub fn add_column(&mut self, row: u32) -> String {
        respond(self.session.add_column(row).map_err(BridgeError::from))
    }

    /// Answers with the ids of the fields deleted along with the row.
    pub fn remove_row(&mut self, row: u32) -> String {
        let result = self
            .session
            .remove_row(row)
            .map(|fields| fields.into_iter().map(|f| f.id).collect::<Vec<_>>())
            .map_err(BridgeError::from);
        respond(result)
    }

    pub fn set_column_weight(&mut self, col: u32, weight: f32) -> String {
        respond(self.session.set_column_weight(col, weight).map_err(BridgeError::from))
    }

    pub fn set_row_weight(&mut self, row: u32, weight: f32) -> String {
        respond(self.session.set_row_weight(row, weight).map_err(BridgeError::from))
    }

    // ─── Fields ──────────────────────────────────────────────────────────

    pub fn update_field(&mut self, field_id: &str, label: &str, required: bool) -> String {
        let result = known(FieldId::get(field_id), field_id)
            .and_then(|id| Ok(self.session.update_field(id, label.to_string(), required)?));
        respond(result)
    }

    /// Take a field out of the grid. Answers with its former cell.
    pub fn unplace_field(&mut self, field_id: &str) -> String {
        let result = known(FieldId::get(field_id), field_id)
            .and_then(|id| Ok(self.session.unplace_field(id)?));
        respond(result)
    }

    pub fn remove_field(&mut self, field_id: &str) -> String {
        let result = known(FieldId::get(field_id), field_id)
            .and_then(|id| Ok(self.session.remove_field(id)?));
        respond(result)
    }
}

impl FormGrid {
    fn try_load(&mut self, snapshot_json: &str) -> Result<usize, BridgeError> {
        let snapshot: GridSnapshot = serde_json::from_str(snapshot_json)?;
        let config = self.session.config().clone();
        self.session = FormSession::from_snapshot(snapshot, config)?;
        Ok(self.session.grid().fields().len())
    }
}
