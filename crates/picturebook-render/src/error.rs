//! Error types for timeline rendering.

use thiserror::Error;

/// Failures that abort a single repaint. Interaction state is never affected.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Cannot allocate a {width}x{height} surface")]
    SurfaceAllocation { width: u32, height: u32 },

    #[error("PNG encoding error: {0}")]
    Encode(String),
}

/// Result type alias for rendering operations.
pub type RenderResult<T> = std::result::Result<T, RenderError>;
