//! One play session: the full pipeline from configuration to a live board.

use tracing::info;

use crate::board::Board;
use crate::config::PuzzleConfig;
use crate::error::Result;
use crate::layout::Layout;
use crate::pieces::build_pieces;
use crate::tiling::generate;

/// Runs generator, factory and layout for `config`.
pub fn build_board(config: &PuzzleConfig) -> Result<Board> {
    config.validate()?;

    let mode = config.tiling_mode();
    let polygons = generate(config.canvas_size, mode);
    let mut pieces = build_pieces(polygons);
    let displaced = Layout::new(config.canvas_size, config.scatter, config.seed)
        .apply(&mut pieces, config.missing_pieces);

    info!(
        mode = ?mode.kind(),
        pieces = pieces.len(),
        missing = displaced.len(),
        "built puzzle"
    );
    Ok(Board::new(pieces, config.snap_threshold))
}

/// A configuration and the board built from it.
#[derive(Clone, Debug)]
pub struct Session {
    config: PuzzleConfig,
    board: Board,
}

impl Session {
    pub fn new(config: PuzzleConfig) -> Result<Self> {
        let board = build_board(&config)?;
        Ok(Self { config, board })
    }

    pub fn config(&self) -> &PuzzleConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// Pieces per row of generation order.
    pub fn columns(&self) -> usize {
        self.config.tiling_mode().tiler().columns()
    }

    /// Discards the board and rebuilds it from `config`.
    ///
    /// On error the current session is left untouched.
    pub fn reset(&mut self, config: PuzzleConfig) -> Result<()> {
        self.board = build_board(&config)?;
        self.config = config;
        Ok(())
    }

    /// Starts the auto-solve with the configured timings.
    pub fn solve(&mut self) -> bool {
        self.board
            .start_solve(self.config.solve_duration(), self.config.settle_delay())
    }
}
