//! Flexible grid layout engine for form fields.
//!
//! Rows are independent: each row carries its own column count, so the
//! structure is a `row → column count` map rather than a rectangle. Field
//! placements live in a separate sparse `cell → field` map. After every
//! placement mutation the structure is reconciled against the placements:
//!
//! - every occupied row grows to its highest occupied column,
//! - no row is ever narrowed, so a vacated column stays available,
//! - rows the user widened with `add_column` are never dropped,
//! - untouched rows that nothing needs any more are dropped.
//!
//! Row and column indices are 1-based and bounded by [`MAX_ROWS`] and
//! [`MAX_COLUMNS`]. Track weights (flex ratios) are kept
//! apart from the structure and only ever grow, so a user-set weight
//! survives the grid temporarily shrinking below it.

use crate::catalog::FieldKind;
use crate::error::GridError;
use crate::id::FieldId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

pub const DEFAULT_WEIGHT: f32 = 1.0;

/// Highest addressable row index.
pub const MAX_ROWS: u32 = 1_000;

/// Widest a single row may grow.
pub const MAX_COLUMNS: u32 = 32;

// ─── Cells & structure ───────────────────────────────────────────────────

/// A 1-based (row, column) grid position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub row: u32,
    pub col: u32,
}

impl Cell {
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    fn is_valid(&self) -> bool {
        (1..=MAX_ROWS).contains(&self.row) && (1..=MAX_COLUMNS).contains(&self.col)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Row index → column count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GridStructure(BTreeMap<u32, u32>);

impl GridStructure {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn columns(&self, row: u32) -> Option<u32> {
        self.0.get(&row).copied()
    }

    pub fn contains_row(&self, row: u32) -> bool {
        self.0.contains_key(&row)
    }

    /// Whether `cell` addresses an existing column of an existing row.
    pub fn contains(&self, cell: Cell) -> bool {
        cell.is_valid() && self.columns(cell.row).is_some_and(|cols| cell.col <= cols)
    }

    pub fn rows(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.0.iter().map(|(&row, &cols)| (row, cols))
    }

    pub fn max_row(&self) -> Option<u32> {
        self.0.keys().next_back().copied()
    }

    /// Column count of the widest row.
    pub fn max_columns(&self) -> u32 {
        self.0.values().copied().max().unwrap_or(0)
    }

    pub fn row_count(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn set(&mut self, row: u32, cols: u32) {
        self.0.insert(row, cols.max(1));
    }

    fn remove(&mut self, row: u32) -> Option<u32> {
        self.0.remove(&row)
    }
}

impl<const N: usize> From<[(u32, u32); N]> for GridStructure {
    fn from(rows: [(u32, u32); N]) -> Self {
        Self(rows.into_iter().collect())
    }
}

// ─── Pure layout functions ───────────────────────────────────────────────

/// Smallest structure that holds every placement.
///
/// Each occupied row gets at least its highest occupied column; every row
/// from 1 to the highest occupied row is present with at least one column.
pub fn minimum_structure(placements: impl IntoIterator<Item = Cell>) -> GridStructure {
    let mut rows: BTreeMap<u32, u32> = BTreeMap::new();
    for cell in placements.into_iter().filter(Cell::is_valid) {
        let cols = rows.entry(cell.row).or_insert(1);
        *cols = (*cols).max(cell.col);
    }
    let max_row = rows.keys().next_back().copied();
    if let Some(max_row) = max_row {
        for row in 1..=max_row {
            rows.entry(row).or_insert(1);
        }
    }
    GridStructure(rows)
}

/// Adjust `structure` to the placements.
///
/// Rows are raised to their minimum and never narrowed. A row is dropped
/// only when the placements do not require it and it was never widened. A
/// structure that had any rows never reconciles to an empty one; it falls
/// back to a single one-column row.
pub fn reconcile(
    structure: &GridStructure,
    widened: &BTreeSet<u32>,
    placements: impl IntoIterator<Item = Cell>,
) -> GridStructure {
    let minimum = minimum_structure(placements);
    let rows: BTreeSet<u32> = structure
        .0
        .keys()
        .chain(minimum.0.keys())
        .copied()
        .collect();

    let mut next = GridStructure::new();
    for row in rows {
        let current = structure.columns(row).unwrap_or(1);
        match minimum.columns(row) {
            Some(required) => next.set(row, current.max(required)),
            None if widened.contains(&row) => next.set(row, current),
            None => {}
        }
    }

    if next.is_empty() && !structure.is_empty() {
        next.set(1, 1);
    }
    next
}

/// `weights[0..n]`, padded with the default weight.
pub fn resize_weights(weights: &[f32], n: usize) -> Vec<f32> {
    let mut out: Vec<f32> = weights.iter().copied().take(n).collect();
    out.resize(n, DEFAULT_WEIGHT);
    out
}

fn grow_weights(weights: &mut Vec<f32>, n: usize) {
    if weights.len() < n {
        weights.resize(n, DEFAULT_WEIGHT);
    }
}

fn validate_weight(weight: f32) -> Result<f32, GridError> {
    if weight.is_finite() && weight > 0.0 {
        Ok(weight)
    } else {
        Err(GridError::InvalidWeight(weight))
    }
}

// ─── Fields ──────────────────────────────────────────────────────────────

/// A form field definition, independent of where it sits in the grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    pub id: FieldId,
    pub kind: FieldKind,
    pub label: String,
    #[serde(default)]
    pub required: bool,
}

/// A field plus its optional placement, as persisted by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldRecord {
    #[serde(flatten)]
    pub field: FieldDef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placement: Option<Cell>,
}

/// Plain serializable form of a grid layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSnapshot {
    pub structure: GridStructure,
    pub widened_rows: BTreeSet<u32>,
    pub fields: Vec<FieldRecord>,
    pub column_weights: Vec<f32>,
    pub row_weights: Vec<f32>,
}

/// Derived per-row track description for the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowTrack {
    pub row: u32,
    pub columns: u32,
    /// Row height weight.
    pub weight: f32,
    /// Column widths of this row as fractions summing to 1.
    pub fractions: Vec<f32>,
}

// ─── Engine ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct GridLayout {
    structure: GridStructure,
    /// Rows the user widened with `add_column`; reconciliation keeps them.
    widened: BTreeSet<u32>,
    /// Field definitions in document order.
    fields: Vec<FieldDef>,
    cells: BTreeMap<Cell, FieldId>,
    placements: HashMap<FieldId, Cell>,
    column_weights: Vec<f32>,
    row_weights: Vec<f32>,
}

impl GridLayout {
    /// An unseeded layout: no structure until the first placement.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a layout from persisted records.
    ///
    /// The stored structure is kept as authored, only raised where a
    /// placement would otherwise fall outside it. Rows stored wider than
    /// their placements need are treated as widened.
    ///
    /// # Errors
    /// `DuplicateField` for repeated ids, `CellOccupied` when two fields
    /// claim the same cell, `InvalidWeight` for non-positive weights,
    /// `RowOutOfRange` / `OutOfRange` for rows, columns or placements past
    /// the grid limits.
    pub fn from_snapshot(snapshot: GridSnapshot) -> Result<Self, GridError> {
        let mut layout = Self::new();
        for record in snapshot.fields {
            let id = record.field.id;
            if layout.field_index(id).is_some() {
                return Err(GridError::DuplicateField(id));
            }
            if let Some(cell) = record.placement {
                if !cell.is_valid() {
                    return Err(GridError::OutOfRange(cell));
                }
                if let Some(&occupant) = layout.cells.get(&cell) {
                    return Err(GridError::CellOccupied { cell, occupant });
                }
                layout.cells.insert(cell, id);
                layout.placements.insert(id, cell);
            }
            layout.fields.push(record.field);
        }

        let minimum = minimum_structure(layout.cells.keys().copied());
        let mut structure = GridStructure::new();
        for (row, cols) in snapshot.structure.rows() {
            if !(1..=MAX_ROWS).contains(&row) {
                return Err(GridError::RowOutOfRange(row));
            }
            if cols > MAX_COLUMNS {
                return Err(GridError::OutOfRange(Cell::new(row, cols)));
            }
            structure.set(row, cols);
        }
        for (row, required) in minimum.rows() {
            let current = structure.columns(row).unwrap_or(1);
            structure.set(row, current.max(required));
        }
        let mut widened = snapshot.widened_rows;
        widened.retain(|row| structure.contains_row(*row));
        for (row, cols) in structure.rows() {
            if cols > minimum.columns(row).unwrap_or(1) {
                widened.insert(row);
            }
        }
        layout.structure = structure;
        layout.widened = widened;

        layout.column_weights = snapshot
            .column_weights
            .into_iter()
            .map(validate_weight)
            .collect::<Result<_, _>>()?;
        layout.row_weights = snapshot
            .row_weights
            .into_iter()
            .map(validate_weight)
            .collect::<Result<_, _>>()?;
        layout.sync_weights();

        log::debug!(
            "restored grid: {} rows, {} fields",
            layout.structure.row_count(),
            layout.fields.len()
        );
        Ok(layout)
    }

    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot {
            structure: self.structure.clone(),
            widened_rows: self.widened.clone(),
            fields: self
                .fields
                .iter()
                .map(|field| FieldRecord {
                    field: field.clone(),
                    placement: self.placements.get(&field.id).copied(),
                })
                .collect(),
            column_weights: self.column_weights().to_vec(),
            row_weights: self.row_weights().to_vec(),
        }
    }

    // ─── Structure ───────────────────────────────────────────────────────

    pub fn structure(&self) -> &GridStructure {
        &self.structure
    }

    /// Whether any structure exists yet.
    pub fn is_seeded(&self) -> bool {
        !self.structure.is_empty()
    }

    pub fn is_widened(&self, row: u32) -> bool {
        self.widened.contains(&row)
    }

    /// Seed an empty grid to exactly the structure needed for `cell`.
    /// Returns `false` if a structure already exists.
    pub fn seed(&mut self, cell: Cell) -> bool {
        if self.is_seeded() || !cell.is_valid() {
            return false;
        }
        self.structure = minimum_structure([cell]);
        self.sync_weights();
        log::debug!("seed grid at {cell}: {:?}", self.structure);
        true
    }

    /// Append a column to `row`, marking it as manually widened.
    ///
    /// # Errors
    /// `RowOutOfRange` if the row does not exist, `OutOfRange` once the row
    /// holds [`MAX_COLUMNS`].
    pub fn add_column(&mut self, row: u32) -> Result<u32, GridError> {
        let current = self
            .structure
            .columns(row)
            .ok_or(GridError::RowOutOfRange(row))?;
        let cols = current
            .checked_add(1)
            .filter(|cols| *cols <= MAX_COLUMNS)
            .ok_or(GridError::OutOfRange(Cell::new(row, current.saturating_add(1))))?;
        self.structure.set(row, cols);
        self.widened.insert(row);
        self.sync_weights();
        log::debug!("row {row} widened to {cols} columns");
        Ok(cols)
    }

    /// Append a one-column row after the current last row.
    ///
    /// # Errors
    /// `RowOutOfRange` when the last row is already [`MAX_ROWS`].
    pub fn add_row(&mut self) -> Result<u32, GridError> {
        let last = self.structure.max_row().unwrap_or(0);
        let row = last
            .checked_add(1)
            .filter(|row| *row <= MAX_ROWS)
            .ok_or(GridError::RowOutOfRange(last.saturating_add(1)))?;
        self.structure.set(row, 1);
        self.sync_weights();
        log::debug!("add row {row}");
        Ok(row)
    }

    /// Delete a row together with every field placed in it.
    ///
    /// # Errors
    /// `RowOutOfRange` if the row does not exist.
    pub fn remove_row(&mut self, row: u32) -> Result<Vec<FieldDef>, GridError> {
        if !self.structure.contains_row(row) {
            return Err(GridError::RowOutOfRange(row));
        }

        let doomed: Vec<FieldId> = self
            .cells
            .range(Cell::new(row, 0)..=Cell::new(row, u32::MAX))
            .map(|(_, id)| *id)
            .collect();
        let mut removed = Vec::with_capacity(doomed.len());
        for id in doomed {
            if let Some(cell) = self.placements.remove(&id) {
                self.cells.remove(&cell);
            }
            if let Some(pos) = self.field_index(id) {
                removed.push(self.fields.remove(pos));
            }
        }

        self.structure.remove(row);
        self.widened.remove(&row);
        if self.structure.is_empty() {
            // Removing the last row leaves the grid seeded.
            self.structure.set(1, 1);
        }
        log::debug!("remove row {row}, deleted {} field(s)", removed.len());
        self.reconcile();
        Ok(removed)
    }

    /// Re-derive the structure from the current placements.
    pub fn reconcile(&mut self) {
        let next = reconcile(&self.structure, &self.widened, self.cells.keys().copied());
        if next != self.structure {
            log::debug!("reconcile: {:?} -> {:?}", self.structure, next);
            self.structure = next;
        }
        self.widened.retain(|row| self.structure.contains_row(*row));
        self.sync_weights();
    }

    // ─── Fields ──────────────────────────────────────────────────────────

    fn field_index(&self, id: FieldId) -> Option<usize> {
        self.fields.iter().position(|f| f.id == id)
    }

    pub fn field(&self, id: FieldId) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.id == id)
    }

    pub fn contains_field(&self, id: FieldId) -> bool {
        self.field_index(id).is_some()
    }

    /// Fields in document order.
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    pub fn placement_of(&self, id: FieldId) -> Option<Cell> {
        self.placements.get(&id).copied()
    }

    pub fn field_at(&self, cell: Cell) -> Option<FieldId> {
        self.cells.get(&cell).copied()
    }

    /// Fields without a placement, in document order.
    pub fn unplaced_fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields
            .iter()
            .filter(|f| !self.placements.contains_key(&f.id))
    }

    /// Check that `cell` can receive `id` (or a new field when `id` is None).
    fn check_target(&self, cell: Cell, id: Option<FieldId>) -> Result<(), GridError> {
        if !self.structure.contains(cell) {
            return Err(GridError::OutOfRange(cell));
        }
        match self.cells.get(&cell) {
            Some(&occupant) if Some(occupant) != id => {
                Err(GridError::CellOccupied { cell, occupant })
            }
            _ => Ok(()),
        }
    }

    /// Create a field of `kind`, optionally placed at `cell`.
    ///
    /// Placing into an unseeded grid seeds it to exactly `cell` first.
    ///
    /// # Errors
    /// `OutOfRange` or `CellOccupied` for an unusable target; nothing is
    /// created in that case.
    pub fn add_field(&mut self, kind: FieldKind, cell: Option<Cell>) -> Result<FieldId, GridError> {
        if let Some(cell) = cell {
            self.seed(cell);
            self.check_target(cell, None)?;
        }

        let id = FieldId::fresh("field", |id| self.contains_field(id));
        self.fields.push(FieldDef {
            id,
            kind,
            label: kind.label().to_string(),
            required: false,
        });
        if let Some(cell) = cell {
            self.cells.insert(cell, id);
            self.placements.insert(id, cell);
            self.reconcile();
        }
        log::debug!("add field {id:?} ({kind}) at {cell:?}");
        Ok(id)
    }

    /// Move a field to `cell`, vacating its previous cell (no swap).
    /// Returns the previous placement.
    ///
    /// # Errors
    /// `UnknownField`, `OutOfRange`, or `CellOccupied`; the field keeps its
    /// prior placement on error.
    pub fn place_field(&mut self, id: FieldId, cell: Cell) -> Result<Option<Cell>, GridError> {
        if !self.contains_field(id) {
            return Err(GridError::UnknownField(id));
        }
        self.seed(cell);
        self.check_target(cell, Some(id))?;

        let previous = self.placements.insert(id, cell);
        if let Some(prev) = previous {
            self.cells.remove(&prev);
        }
        self.cells.insert(cell, id);
        log::debug!("move field {id:?}: {previous:?} -> {cell}");
        self.reconcile();
        Ok(previous)
    }

    /// Take a field out of the grid; it falls back to document order.
    ///
    /// # Errors
    /// `UnknownField` if the field does not exist.
    pub fn unplace_field(&mut self, id: FieldId) -> Result<Option<Cell>, GridError> {
        if !self.contains_field(id) {
            return Err(GridError::UnknownField(id));
        }
        let previous = self.placements.remove(&id);
        if let Some(prev) = previous {
            self.cells.remove(&prev);
            self.reconcile();
        }
        Ok(previous)
    }

    /// Delete a field and its placement.
    ///
    /// # Errors
    /// `UnknownField` if the field does not exist.
    pub fn remove_field(&mut self, id: FieldId) -> Result<FieldDef, GridError> {
        let pos = self.field_index(id).ok_or(GridError::UnknownField(id))?;
        let field = self.fields.remove(pos);
        if let Some(cell) = self.placements.remove(&id) {
            self.cells.remove(&cell);
            self.reconcile();
        }
        log::debug!("remove field {id:?}");
        Ok(field)
    }

    /// Edit a field's label and required flag.
    ///
    /// # Errors
    /// `UnknownField` if the field does not exist.
    pub fn update_field(&mut self, id: FieldId, label: String, required: bool) -> Result<(), GridError> {
        let pos = self.field_index(id).ok_or(GridError::UnknownField(id))?;
        let field = &mut self.fields[pos];
        field.label = label;
        field.required = required;
        Ok(())
    }

    // ─── Track weights ───────────────────────────────────────────────────

    fn sync_weights(&mut self) {
        grow_weights(&mut self.column_weights, self.structure.max_columns() as usize);
        grow_weights(
            &mut self.row_weights,
            self.structure.max_row().unwrap_or(0) as usize,
        );
    }

    /// Column weights for the widest row (index 0 is column 1).
    pub fn column_weights(&self) -> &[f32] {
        let n = self.structure.max_columns() as usize;
        &self.column_weights[..n.min(self.column_weights.len())]
    }

    /// Row weights for rows 1..=max_row (index 0 is row 1).
    pub fn row_weights(&self) -> &[f32] {
        let n = self.structure.max_row().unwrap_or(0) as usize;
        &self.row_weights[..n.min(self.row_weights.len())]
    }

    /// # Errors
    /// `OutOfRange` past the widest row, `InvalidWeight` for non-positive
    /// or non-finite weights.
    pub fn set_column_weight(&mut self, col: u32, weight: f32) -> Result<(), GridError> {
        let weight = validate_weight(weight)?;
        if col == 0 || col > self.structure.max_columns() {
            return Err(GridError::OutOfRange(Cell::new(1, col)));
        }
        self.column_weights[col as usize - 1] = weight;
        Ok(())
    }

    /// # Errors
    /// `RowOutOfRange` past the last row, `InvalidWeight` for non-positive
    /// or non-finite weights.
    pub fn set_row_weight(&mut self, row: u32, weight: f32) -> Result<(), GridError> {
        let weight = validate_weight(weight)?;
        if row == 0 || row > self.structure.max_row().unwrap_or(0) {
            return Err(GridError::RowOutOfRange(row));
        }
        self.row_weights[row as usize - 1] = weight;
        Ok(())
    }

    /// Per-row tracks with normalized column fractions.
    pub fn tracks(&self) -> Vec<RowTrack> {
        self.structure
            .rows()
            .map(|(row, columns)| {
                let weights = resize_weights(&self.column_weights, columns as usize);
                let total: f32 = weights.iter().sum();
                RowTrack {
                    row,
                    columns,
                    weight: self
                        .row_weights
                        .get(row as usize - 1)
                        .copied()
                        .unwrap_or(DEFAULT_WEIGHT),
                    fractions: weights.iter().map(|w| w / total).collect(),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn grid_with(cells: &[(u32, u32)]) -> (GridLayout, Vec<FieldId>) {
        let mut grid = GridLayout::new();
        let mut ids = Vec::new();
        for &(row, col) in cells {
            let id = grid.add_field(FieldKind::Text, None).unwrap();
            force_place(&mut grid, id, Cell::new(row, col));
            ids.push(id);
        }
        (grid, ids)
    }

    /// Place without range checks, then reconcile like a real mutation.
    fn force_place(grid: &mut GridLayout, id: FieldId, cell: Cell) {
        grid.cells.insert(cell, id);
        grid.placements.insert(id, cell);
        grid.reconcile();
    }

    #[test]
    fn minimum_structure_covers_placements() {
        let min = minimum_structure([Cell::new(2, 3), Cell::new(1, 1)]);
        assert_eq!(min, GridStructure::from([(1, 1), (2, 3)]));
    }

    #[test]
    fn minimum_structure_fills_row_gaps() {
        let min = minimum_structure([Cell::new(4, 2)]);
        assert_eq!(min, GridStructure::from([(1, 1), (2, 1), (3, 1), (4, 2)]));
        assert!(minimum_structure(Vec::<Cell>::new()).is_empty());
    }

    #[test]
    fn removing_last_field_collapses_untouched_row() {
        let (mut grid, ids) = grid_with(&[(1, 1), (2, 3)]);
        assert_eq!(grid.structure(), &GridStructure::from([(1, 1), (2, 3)]));

        grid.remove_field(ids[1]).unwrap();
        assert_eq!(grid.structure(), &GridStructure::from([(1, 1)]));
    }

    #[test]
    fn widened_row_survives_removal() {
        let (mut grid, ids) = grid_with(&[(1, 1), (2, 3)]);
        assert_eq!(grid.add_column(2), Ok(4));

        grid.remove_field(ids[1]).unwrap();
        assert_eq!(grid.structure(), &GridStructure::from([(1, 1), (2, 4)]));
    }

    #[test]
    fn add_row_skips_gaps() {
        let mut grid = GridLayout::from_snapshot(GridSnapshot {
            structure: GridStructure::from([(1, 2), (3, 1)]),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(grid.add_row(), Ok(4));
        assert_eq!(grid.structure().columns(4), Some(1));
        assert!(!grid.structure().contains_row(2));
    }

    #[test]
    fn add_column_on_missing_row_is_rejected() {
        let mut grid = GridLayout::new();
        assert_eq!(grid.add_column(1), Err(GridError::RowOutOfRange(1)));
    }

    #[test]
    fn reconcile_never_empties_a_seeded_structure() {
        let (mut grid, ids) = grid_with(&[(1, 1)]);
        grid.remove_field(ids[0]).unwrap();
        assert_eq!(grid.structure(), &GridStructure::from([(1, 1)]));
    }

    #[test]
    fn reconcile_never_narrows_a_required_row() {
        let mut grid = GridLayout::new();
        let id = grid.add_field(FieldKind::Text, Some(Cell::new(1, 3))).unwrap();
        assert_eq!(grid.structure(), &GridStructure::from([(1, 3)]));

        grid.place_field(id, Cell::new(1, 1)).unwrap();
        assert_eq!(grid.structure(), &GridStructure::from([(1, 3)]));
        // The vacated column is still a valid target.
        assert_eq!(grid.place_field(id, Cell::new(1, 3)), Ok(Some(Cell::new(1, 1))));
    }

    #[test]
    fn reconcile_raises_and_drops_but_never_narrows() {
        let structure = GridStructure::from([(1, 4), (2, 2), (3, 2)]);
        let widened = BTreeSet::from([3]);
        let next = reconcile(&structure, &widened, [Cell::new(1, 2), Cell::new(1, 5)]);
        assert_eq!(next, GridStructure::from([(1, 5), (3, 2)]));
    }

    #[test]
    fn huge_indices_are_rejected_not_allocated() {
        let snapshot = GridSnapshot {
            structure: GridStructure::from([(u32::MAX, 1)]),
            ..Default::default()
        };
        assert_eq!(
            GridLayout::from_snapshot(snapshot).unwrap_err(),
            GridError::RowOutOfRange(u32::MAX)
        );

        let wide = GridSnapshot {
            structure: GridStructure::from([(1, MAX_COLUMNS + 1)]),
            ..Default::default()
        };
        assert!(GridLayout::from_snapshot(wide).is_err());

        let mut grid = GridLayout::new();
        let far = Cell::new(u32::MAX, 1);
        assert_eq!(grid.add_field(FieldKind::Text, Some(far)), Err(GridError::OutOfRange(far)));
        assert!(!grid.is_seeded());
        assert!(grid.fields().is_empty());
    }

    #[test]
    fn add_row_and_add_column_stop_at_the_limits() {
        let mut grid = GridLayout::from_snapshot(GridSnapshot {
            structure: GridStructure::from([(MAX_ROWS, MAX_COLUMNS)]),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(grid.add_row(), Err(GridError::RowOutOfRange(MAX_ROWS + 1)));
        assert_eq!(
            grid.add_column(MAX_ROWS),
            Err(GridError::OutOfRange(Cell::new(MAX_ROWS, MAX_COLUMNS + 1)))
        );
        assert_eq!(grid.structure().columns(MAX_ROWS), Some(MAX_COLUMNS));
    }

    #[test]
    fn place_field_vacates_previous_cell() {
        let (mut grid, ids) = grid_with(&[(1, 1)]);
        grid.add_column(1).unwrap();
        let previous = grid.place_field(ids[0], Cell::new(1, 2)).unwrap();
        assert_eq!(previous, Some(Cell::new(1, 1)));
        assert_eq!(grid.field_at(Cell::new(1, 1)), None);
        assert_eq!(grid.field_at(Cell::new(1, 2)), Some(ids[0]));
    }

    #[test]
    fn out_of_range_and_occupied_targets_are_rejected() {
        let (mut grid, ids) = grid_with(&[(1, 1)]);
        let other = grid.add_field(FieldKind::Email, None).unwrap();

        assert_eq!(
            grid.place_field(other, Cell::new(1, 2)),
            Err(GridError::OutOfRange(Cell::new(1, 2)))
        );
        assert_eq!(
            grid.place_field(other, Cell::new(1, 1)),
            Err(GridError::CellOccupied {
                cell: Cell::new(1, 1),
                occupant: ids[0],
            })
        );
        assert_eq!(grid.placement_of(other), None);
    }

    #[test]
    fn first_placement_seeds_exact_structure() {
        let mut grid = GridLayout::new();
        assert!(!grid.is_seeded());
        let id = grid.add_field(FieldKind::Date, Some(Cell::new(2, 3))).unwrap();
        assert_eq!(grid.structure(), &GridStructure::from([(1, 1), (2, 3)]));
        assert_eq!(grid.placement_of(id), Some(Cell::new(2, 3)));
    }

    #[test]
    fn remove_row_deletes_its_fields() {
        let (mut grid, ids) = grid_with(&[(1, 1), (2, 1), (3, 1)]);
        let removed = grid.remove_row(2).unwrap();
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].id, ids[1]);
        assert!(!grid.contains_field(ids[1]));
        // Row 3 still holds a field, so the minimum restores an empty row 2.
        assert_eq!(grid.structure(), &GridStructure::from([(1, 1), (2, 1), (3, 1)]));
        assert_eq!(grid.remove_row(9), Err(GridError::RowOutOfRange(9)));
    }

    #[test]
    fn removing_the_only_row_keeps_one_cell() {
        let (mut grid, _) = grid_with(&[(1, 2)]);
        grid.remove_row(1).unwrap();
        assert!(grid.is_seeded());
        assert_eq!(grid.structure(), &GridStructure::from([(1, 1)]));
    }

    #[test]
    fn resize_weights_pads_and_slices() {
        assert_eq!(resize_weights(&[2.0, 3.0], 4), vec![2.0, 3.0, 1.0, 1.0]);
        assert_eq!(resize_weights(&[2.0, 3.0, 4.0], 2), vec![2.0, 3.0]);
        assert_eq!(resize_weights(&[], 0), Vec::<f32>::new());
    }

    #[test]
    fn weights_survive_temporary_shrink() {
        let (mut grid, ids) = grid_with(&[(1, 3)]);
        grid.set_column_weight(3, 2.5).unwrap();
        grid.remove_field(ids[0]).unwrap();
        assert_eq!(grid.structure(), &GridStructure::from([(1, 1)]));
        assert_eq!(grid.column_weights(), &[1.0]);

        grid.add_column(1).unwrap();
        grid.add_column(1).unwrap();
        assert_eq!(grid.column_weights(), &[1.0, 1.0, 2.5]);
    }

    #[test]
    fn invalid_weight_is_rejected() {
        let (mut grid, _) = grid_with(&[(1, 1)]);
        assert_eq!(grid.set_row_weight(1, 0.0), Err(GridError::InvalidWeight(0.0)));
        assert!(grid.set_row_weight(1, f32::NAN).is_err());
        assert_eq!(grid.set_row_weight(2, 1.5), Err(GridError::RowOutOfRange(2)));
    }

    #[test]
    fn tracks_normalize_column_fractions() {
        let (mut grid, _) = grid_with(&[(1, 2), (2, 1)]);
        grid.set_column_weight(1, 3.0).unwrap();
        grid.set_row_weight(2, 2.0).unwrap();

        let tracks = grid.tracks();
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].columns, 2);
        assert_eq!(tracks[0].fractions, vec![0.75, 0.25]);
        assert_eq!(tracks[1].fractions, vec![1.0]);
        assert_eq!(tracks[1].weight, 2.0);
    }

    #[test]
    fn unplaced_fields_keep_document_order() {
        let mut grid = GridLayout::new();
        let a = grid.add_field(FieldKind::Text, None).unwrap();
        let b = grid.add_field(FieldKind::Number, Some(Cell::new(1, 1))).unwrap();
        let c = grid.add_field(FieldKind::Toggle, None).unwrap();
        let order: Vec<FieldId> = grid.unplaced_fields().map(|f| f.id).collect();
        assert_eq!(order, vec![a, c]);
        assert_eq!(grid.fields().len(), 3);
        assert_eq!(grid.placement_of(b), Some(Cell::new(1, 1)));
    }
}
