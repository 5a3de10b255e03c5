//! Headless subtitle editing engine: undo/redo history, pure editing
//! operations, drag state machines, playback-time mapping, and the layout
//! math behind a virtualized subtitle list.

pub mod drag;
pub mod history;
pub mod layout;
pub mod ops;
pub mod playback;
pub mod track;

pub use drag::{DragKind, DragPayload, DropZone, RetimeDrag, classify_drop_zone, drop_command};
pub use history::EditHistory;
pub use layout::{AutoScroller, RowHeightCache, VirtualLayout, row_height};
pub use ops::EditOp;
pub use playback::{TickThrottle, active_index, progress};
pub use track::{EditorSession, TrackHandle, TrackKind};
