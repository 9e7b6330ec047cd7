//! PictureBook Core - Foundation types for the timeline editor
//!
//! This crate provides the fundamental types used throughout PictureBook:
//! - Time ↔ pixel mapping (Viewport) and track lane layout
//! - Colors for clip and overlay drawing
//! - Editor configuration (thresholds, throttling, zoom limits)
//! - The shared error type

pub mod color;
pub mod config;
pub mod error;
pub mod geometry;

pub use color::Color;
pub use config::EditorConfig;
pub use error::{PictureBookError, Result};
pub use geometry::{Point, TrackLayout, Viewport};

/// Interaction constants shared by the timeline and the canvas.
pub mod limits {
    /// Shortest duration a clip may be trimmed to (seconds).
    pub const MIN_DURATION: f64 = 0.1;

    /// Pixel distance from a clip edge that still counts as grabbing it.
    pub const EDGE_THRESHOLD_PX: f64 = 8.0;

    /// Pixel distance within which a dragged boundary is pulled to an anchor.
    pub const SNAP_THRESHOLD_PX: f64 = 10.0;

    /// Tolerance when comparing original starts for ripple scope membership.
    pub const RIPPLE_EPSILON: f64 = 1e-4;

    /// Tolerance when matching touching edges for linked resize.
    pub const LINK_EPSILON: f64 = 0.01;

    /// Fixed repaint cadence during pointer interaction (~60 Hz).
    pub const REPAINT_INTERVAL_MS: u64 = 16;
}
