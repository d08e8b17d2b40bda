//! Error types for cueloop-player
//!
//! Only the edges of the player can fail: reading and classifying input
//! files. The playback controller itself never returns an error; its guard
//! conditions are silent no-ops.

use thiserror::Error;

/// Main error type for cueloop-player
#[derive(Error, Debug)]
pub enum Error {
    /// Subtitle file could not be understood
    #[error("Subtitle error: {0}")]
    Subtitle(String),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Input file could not be classified as audio or subtitles
    #[error("Unsupported file: {0}")]
    UnsupportedFile(String),
}

/// Convenience Result type using cueloop-player Error
pub type Result<T> = std::result::Result<T, Error>;
