//! Polygon Jigsaw Engine
//!
//! Cuts a square image into polygonal pieces, takes some of them off the
//! board, and tracks a player dragging them back. Two tilings are available:
//! a plain rectangular grid and a quasi-periodic hat-like tiling.
//!
//! Pipeline: [`tiling::generate`] -> [`pieces::build_pieces`] ->
//! [`layout::Layout::apply`] -> [`board::Board`], wired together by
//! [`session::Session`].

pub mod animation;
pub mod board;
pub mod config;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod hat;
pub mod layout;
pub mod persistence;
pub mod pieces;
pub mod session;
pub mod tiling;

use geometry::Polygon;

pub use board::{Board, DragState, Release};
pub use config::PuzzleConfig;
pub use error::PuzzleError;
pub use pieces::{PieceId, PuzzlePiece};
pub use session::Session;

/// A tiling generator, independent of its parameters.
///
/// Both tilings emit polygons in row-major order, so `columns` tells callers
/// how to fold the piece list back into rows.
pub trait Tiler {
    fn generate(&self, canvas_size: f64) -> Vec<Polygon>;
    fn tile_count(&self) -> usize;
    fn columns(&self) -> usize;
}
