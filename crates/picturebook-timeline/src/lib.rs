//! PictureBook Timeline - Clip model and interaction engine
//!
//! Provides the clip arena and the rules that turn pointer input into
//! clip mutations:
//! - Hit-testing with selection stickiness and cycling
//! - Edge detection for resize
//! - Snapping to zero, the playhead and other clips
//! - Drag (single and ripple) and trim (plain and linked)
//! - Undo capture as before/after field sets

pub mod clip;
pub mod edge;
pub mod interaction;
pub mod snapping;
pub mod timeline;
pub mod trim;
pub mod undo;

pub use clip::{Clip, ClipFields, ClipId, ClipKind, SourceWindow};
pub use edge::{find_edge, Edge, EdgeHit};
pub use hit_test::{
    cycle_selection, hit_stack, resolve_press_target, topmost_at, HitStack, PressTarget, Selection,
};
pub use interaction::{
    Cursor, DragScope, InteractionController, InteractionState, Modifiers, MoveOutcome,
    PressAction, PressOutcome, ReleaseOutcome,
};
pub use snapping::{SnapKind, SnapPoint, SnapResolver, SnappedMove};
pub use timeline::Timeline;
pub use trim::{apply_trim, find_linked, follow_boundary, TrimLimits};
pub use undo::{ClipChange, EditKind, Snapshot, UndoCommand, UndoSink};
