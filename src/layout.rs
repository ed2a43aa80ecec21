//! Initial placement of pieces.
//!
//! A contiguous run of pieces is pulled off the board; everything else starts
//! on its anchor. The run starts at index 10 when the puzzle is large enough,
//! which favours tiles from the middle of the image over its edges.

use std::ops::Range;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::geometry::Point;
use crate::pieces::PuzzlePiece;

/// Preferred first displaced index.
const DISPLACED_START: usize = 10;

/// Gap between the board's right edge and the first tray slot.
pub const TRAY_MARGIN: f64 = 50.0;
/// Vertical position of the first tray row.
pub const TRAY_TOP: f64 = 50.0;
/// Distance between neighbouring tray slots.
pub const TRAY_SPACING: f64 = 70.0;
pub const TRAY_COLUMNS: usize = 3;
/// Gap between the board and the tray panel.
pub const TRAY_PANEL_OFFSET: f64 = 20.0;
pub const TRAY_PANEL_WIDTH: f64 = 260.0;
/// Extra width the tray adds to the play area.
pub const TRAY_AREA_WIDTH: f64 = 300.0;

/// How displaced pieces are spread out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScatterStrategy {
    /// Three-column grid in the tray.
    #[default]
    TrayGrid,
    /// Uniformly random inside the tray panel.
    TrayRandom,
    /// Uniformly random over the whole board.
    BoardRandom,
}

/// Where the tray sits relative to a board.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrayGeometry {
    pub origin: Point,
    pub spacing: f64,
    pub columns: usize,
    pub panel_x: f64,
    pub panel_width: f64,
    pub height: f64,
}

impl TrayGeometry {
    pub fn for_canvas(canvas_size: f64) -> Self {
        Self {
            origin: Point::new(canvas_size + TRAY_MARGIN, TRAY_TOP),
            spacing: TRAY_SPACING,
            columns: TRAY_COLUMNS,
            panel_x: canvas_size + TRAY_PANEL_OFFSET,
            panel_width: TRAY_PANEL_WIDTH,
            height: canvas_size,
        }
    }

    /// Position of the `slot`-th tray cell, filled row by row.
    pub fn slot(&self, slot: usize) -> Point {
        Point::new(
            self.origin.x + (slot % self.columns) as f64 * self.spacing,
            self.origin.y + (slot / self.columns) as f64 * self.spacing,
        )
    }
}

/// Indices of the pieces to displace.
///
/// Starts at `min(10, total - count)`; a count larger than the puzzle
/// displaces everything.
pub fn displaced_range(total: usize, count: usize) -> Range<usize> {
    let count = count.min(total);
    let start = DISPLACED_START.min(total - count);
    start..start + count
}

/// Layout parameters for one board.
#[derive(Clone, Copy, Debug)]
pub struct Layout {
    pub canvas_size: f64,
    pub strategy: ScatterStrategy,
    pub tray: TrayGeometry,
    pub seed: u64,
}

impl Layout {
    pub fn new(canvas_size: f64, strategy: ScatterStrategy, seed: u64) -> Self {
        Self {
            canvas_size,
            strategy,
            tray: TrayGeometry::for_canvas(canvas_size),
            seed,
        }
    }

    /// Places every piece and returns the displaced index range.
    ///
    /// Pieces outside the range sit on their anchors and count as placed.
    /// The range itself does not depend on the scatter strategy.
    pub fn apply(&self, pieces: &mut [PuzzlePiece], num_displaced: usize) -> Range<usize> {
        let displaced = displaced_range(pieces.len(), num_displaced);
        let mut rng = Pcg32::seed_from_u64(self.seed);

        for (index, piece) in pieces.iter_mut().enumerate() {
            if displaced.contains(&index) {
                let slot = index - displaced.start;
                piece.move_to(self.scatter_position(slot, &mut rng));
                piece.is_placed = false;
            } else {
                piece.snap();
            }
        }

        debug!(
            start = displaced.start,
            count = displaced.len(),
            strategy = ?self.strategy,
            "laid out pieces"
        );
        displaced
    }

    fn scatter_position(&self, slot: usize, rng: &mut Pcg32) -> Point {
        match self.strategy {
            ScatterStrategy::TrayGrid => self.tray.slot(slot),
            ScatterStrategy::TrayRandom => Point::new(
                rng.random_range(self.tray.origin.x..self.tray.panel_x + self.tray.panel_width),
                rng.random_range(self.tray.origin.y..self.tray.height.max(self.tray.origin.y + 1.0)),
            ),
            ScatterStrategy::BoardRandom => Point::new(
                rng.random_range(0.0..self.canvas_size),
                rng.random_range(0.0..self.canvas_size),
            ),
        }
    }
}
