//! JSON snapshots of a board.
//!
//! The snapshot is what the presentation layer consumes: every piece with its
//! polygon, anchor and live position, plus the z-order and the solved flag.
//! Field names are camelCase (`correctX`, `isPlaced`, ...).

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::error::{PuzzleError, Result};
use crate::pieces::{PieceId, PuzzlePiece};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSnapshot {
    pub canvas_size: f64,
    pub snap_threshold: f64,
    pub solved: bool,
    pub pieces: Vec<PuzzlePiece>,
    /// Piece ids back to front.
    pub render_order: Vec<PieceId>,
}

impl BoardSnapshot {
    pub fn capture(board: &Board, canvas_size: f64) -> Self {
        Self {
            canvas_size,
            snap_threshold: board.snap_threshold(),
            solved: board.is_solved(),
            pieces: board.pieces().to_vec(),
            render_order: board.render_ids(),
        }
    }

    /// Rebuilds a board; the solved flag is re-derived from the pieces.
    pub fn into_board(self) -> Result<Board> {
        if !self.snap_threshold.is_finite() || self.snap_threshold < 0.0 {
            return Err(PuzzleError::InvalidSnapThreshold(self.snap_threshold));
        }
        let mut seen = FxHashSet::default();
        if let Some(piece) = self.pieces.iter().find(|piece| !seen.insert(piece.id())) {
            return Err(PuzzleError::DuplicatePieceId(piece.id().clone()));
        }

        let mut board = Board::new(self.pieces, self.snap_threshold);
        board.set_render_order(&self.render_order);
        Ok(board)
    }
}

pub fn to_json(snapshot: &BoardSnapshot) -> Result<String> {
    Ok(serde_json::to_string_pretty(snapshot)?)
}

pub fn save(path: impl AsRef<Path>, snapshot: &BoardSnapshot) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, snapshot)?;
    writer.flush()?;
    Ok(())
}

pub fn load(path: impl AsRef<Path>) -> Result<BoardSnapshot> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}
