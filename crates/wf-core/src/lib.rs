pub mod catalog;
pub mod config;
pub mod error;
pub mod graph;
pub mod grid;
pub mod id;
pub mod model;
pub mod viewport;

pub use catalog::{FieldCategory, FieldKind, NodeKind};
pub use config::EditorConfig;
pub use error::{GraphError, GridError};
pub use graph::{GraphModel, GraphSnapshot, RemovedNode};
pub use grid::{Cell, GridLayout, GridSnapshot, GridStructure, minimum_structure, reconcile};
pub use id::{ConnectionId, FieldId, NodeId};
pub use model::*;
pub use viewport::{MAX_SCALE, MIN_SCALE, ViewTransform, ViewportController, ViewportSize};
