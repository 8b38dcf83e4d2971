use crate::grid::Cell;
use crate::id::{ConnectionId, FieldId, NodeId};
use thiserror::Error;

/// Rejected graph edits. The model is left unchanged whenever one is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Node '{0}' cannot be connected to itself")]
    SelfConnection(NodeId),

    #[error("Node '{0}' does not exist in this graph")]
    UnknownNode(NodeId),

    #[error("A node with id '{0}' already exists")]
    DuplicateNode(NodeId),

    #[error("Connection '{0}' does not exist in this graph")]
    UnknownConnection(ConnectionId),

    #[error("A connection with id '{0}' already exists")]
    DuplicateConnection(ConnectionId),
}

/// Rejected grid edits. Prior structure and placements are retained.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    #[error("Cell {0} lies outside the current grid structure")]
    OutOfRange(Cell),

    #[error("Cell {cell} is already occupied by field '{occupant}'")]
    CellOccupied { cell: Cell, occupant: FieldId },

    #[error("Row {0} does not exist")]
    RowOutOfRange(u32),

    #[error("Field '{0}' does not exist in this form")]
    UnknownField(FieldId),

    #[error("A field with id '{0}' already exists")]
    DuplicateField(FieldId),

    #[error("Track weight must be a positive finite number, got {0}")]
    InvalidWeight(f32),
}
