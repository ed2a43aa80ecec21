//! Rectangular grid tiling and text rendering of a board.
//!
//! Cells are emitted in row-major order, so cell `(row, col)` becomes the
//! polygon at index `row * cols + col`.

use crate::geometry::{Point, Polygon};
use crate::pieces::PuzzlePiece;
use crate::Tiler;

/// `rows x cols` equal rectangles covering a square canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridTiling {
    pub rows: u32,
    pub cols: u32,
}

impl GridTiling {
    pub const fn new(rows: u32, cols: u32) -> Self {
        Self { rows, cols }
    }
}

impl Tiler for GridTiling {
    fn generate(&self, canvas_size: f64) -> Vec<Polygon> {
        grid_polygons(canvas_size, self.rows, self.cols)
    }

    fn tile_count(&self) -> usize {
        self.rows as usize * self.cols as usize
    }

    fn columns(&self) -> usize {
        self.cols as usize
    }
}

/// Partitions the canvas into axis-aligned cells.
///
/// Each polygon lists its corners clockwise in screen space, starting at the
/// top-left: `(x, y), (x + w, y), (x + w, y + h), (x, y + h)`.
pub fn grid_polygons(canvas_size: f64, rows: u32, cols: u32) -> Vec<Polygon> {
    let piece_width = canvas_size / cols as f64;
    let piece_height = canvas_size / rows as f64;

    let mut polygons = Vec::with_capacity(rows as usize * cols as usize);
    for row in 0..rows {
        for col in 0..cols {
            let x = col as f64 * piece_width;
            let y = row as f64 * piece_height;
            polygons.push(Polygon::new(vec![
                Point::new(x, y),
                Point::new(x + piece_width, y),
                Point::new(x + piece_width, y + piece_height),
                Point::new(x, y + piece_height),
            ]));
        }
    }
    polygons
}

/// Formats a board as a human-readable string.
///
/// Pieces are drawn in generation order, `columns` per row: `#` for a placed
/// piece, `.` for a gap. Loose pieces follow, listed with their current and
/// target anchors.
pub fn format_board(pieces: &[PuzzlePiece], columns: usize) -> String {
    let columns = columns.max(1);
    let placed = pieces.iter().filter(|p| p.is_placed()).count();

    let mut lines = vec![format!("placed {}/{}", placed, pieces.len())];
    for row in pieces.chunks(columns) {
        lines.push(
            row.iter()
                .map(|p| if p.is_placed() { '#' } else { '.' })
                .collect(),
        );
    }

    lines.push("tray:".to_string());
    for piece in pieces.iter().filter(|p| !p.is_placed()) {
        let current = piece.current();
        let correct = piece.correct();
        lines.push(format!(
            "  {} at ({:.1}, {:.1}) -> ({:.1}, {:.1})",
            piece.id(),
            current.x,
            current.y,
            correct.x,
            correct.y
        ));
    }

    lines.join("\n")
}
