//! Puzzle pieces and the factory that cuts them from polygons.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Polygon};

/// Stable piece identifier, `piece-<index>` in generation order.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PieceId(String);

impl PieceId {
    pub fn from_index(index: usize) -> Self {
        Self(format!("piece-{index}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PieceId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// The mutable unit of play.
///
/// The polygon stays where it was generated; the piece is drawn translated by
/// [`PuzzlePiece::offset`]. `correct_x/correct_y` are fixed at creation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PuzzlePiece {
    id: PieceId,
    polygon: Polygon,
    correct_x: f64,
    correct_y: f64,
    pub(crate) current_x: f64,
    pub(crate) current_y: f64,
    /// Always zero; there is no rotation mechanic.
    rotation: f64,
    pub(crate) is_placed: bool,
}

impl PuzzlePiece {
    /// Creates an unplaced piece anchored at the polygon's vertex mean.
    ///
    /// The current position is a placeholder until layout runs.
    pub fn new(index: usize, polygon: Polygon) -> Self {
        let anchor = polygon.centroid();
        Self {
            id: PieceId::from_index(index),
            polygon,
            correct_x: anchor.x,
            correct_y: anchor.y,
            current_x: 0.0,
            current_y: 0.0,
            rotation: 0.0,
            is_placed: false,
        }
    }

    pub fn id(&self) -> &PieceId {
        &self.id
    }

    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    pub fn correct(&self) -> Point {
        Point::new(self.correct_x, self.correct_y)
    }

    pub fn current(&self) -> Point {
        Point::new(self.current_x, self.current_y)
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn is_placed(&self) -> bool {
        self.is_placed
    }

    /// Distance between the live position and the target anchor.
    pub fn distance_to_target(&self) -> f64 {
        self.current().distance(self.correct())
    }

    /// Translation to apply to the generated polygon when drawing.
    pub fn offset(&self) -> (f64, f64) {
        (
            self.current_x - self.correct_x,
            self.current_y - self.correct_y,
        )
    }

    /// The polygon at the piece's live position.
    pub fn display_polygon(&self) -> Polygon {
        let (dx, dy) = self.offset();
        self.polygon.translated(dx, dy)
    }

    pub(crate) fn move_to(&mut self, position: Point) {
        self.current_x = position.x;
        self.current_y = position.y;
    }

    /// Puts the piece exactly on its anchor and marks it placed.
    pub(crate) fn snap(&mut self) {
        self.current_x = self.correct_x;
        self.current_y = self.correct_y;
        self.is_placed = true;
    }
}

/// Turns generated polygons into pieces, preserving generation order.
pub fn build_pieces(polygons: Vec<Polygon>) -> Vec<PuzzlePiece> {
    polygons
        .into_iter()
        .enumerate()
        .map(|(index, polygon)| PuzzlePiece::new(index, polygon))
        .collect()
}
