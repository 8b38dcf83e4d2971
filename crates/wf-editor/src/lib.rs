pub mod connect;
pub mod dragdrop;
pub mod form;
pub mod frame;
pub mod hit;
pub mod input;
pub mod session;
pub mod shortcuts;

pub use connect::{ConnectionState, ConnectionStateMachine, SelectOutcome};
pub use dragdrop::{DragDropResolver, DragPayload, DropOutcome, DropTarget};
pub use form::FormSession;
pub use frame::FrameGeometry;
pub use input::{InputEvent, Modifiers};
pub use session::CanvasSession;
pub use shortcuts::{ShortcutAction, ShortcutMap};
