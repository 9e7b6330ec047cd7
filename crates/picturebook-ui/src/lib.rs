//! PictureBook UI - Interactive timeline canvas
//!
//! Wires pointer, wheel and timer input into the interaction engine and
//! the render cache, and reports what happened as [`CanvasEvent`]s.

pub mod canvas;
pub mod throttle;

pub use canvas::{CanvasEvent, CursorShape, PointerButton, TimelineCanvas};
pub use throttle::{FrameWork, UpdateThrottle};
