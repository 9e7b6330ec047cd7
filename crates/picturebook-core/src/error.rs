//! Error types for PictureBook.

use thiserror::Error;

/// Main error type for PictureBook operations.
///
/// Interaction rules never produce these: geometry is clamped instead.
/// Only configuration and I/O at the edges of the system can fail.
#[derive(Error, Debug)]
pub enum PictureBookError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for PictureBook operations.
pub type Result<T> = std::result::Result<T, PictureBookError>;
