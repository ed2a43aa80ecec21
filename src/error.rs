//! Error types for configuration and persistence boundaries.
//!
//! The engine itself never fails once it has a validated configuration:
//! stale piece ids and drag/solve overlaps are handled as no-ops.

use thiserror::Error;

use crate::pieces::PieceId;

/// Errors raised before a session reaches the tiling pipeline, or while
/// moving piece snapshots in and out of files.
#[derive(Debug, Error)]
pub enum PuzzleError {
    /// Canvas side must be a finite, positive length.
    #[error("invalid canvas size: {0}")]
    InvalidCanvas(f64),

    /// Grid mode needs at least one row and one column.
    #[error("invalid grid dimensions: {rows}x{cols}")]
    InvalidDimensions { rows: u32, cols: u32 },

    #[error("complexity must be at least 1")]
    InvalidComplexity,

    /// A grid side or hat complexity above `config::MAX_TILES_PER_SIDE`.
    #[error("{requested} tiles per side exceeds the limit of {max}")]
    TooManyTiles { requested: u32, max: u32 },

    #[error("invalid snap threshold: {0}")]
    InvalidSnapThreshold(f64),

    #[error("solve duration must be non-zero")]
    InvalidDuration,

    /// More pieces requested for removal than the tiling produces.
    #[error("cannot remove {requested} pieces from a puzzle of {available}")]
    TooManyMissing { requested: usize, available: usize },

    /// A snapshot lists the same piece id twice.
    #[error("duplicate piece id: {0}")]
    DuplicatePieceId(PieceId),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PuzzleError>;
