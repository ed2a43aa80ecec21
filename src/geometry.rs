//! Planar points and polygons.
//!
//! Polygons are kept in canvas-absolute coordinates exactly as a generator
//! produced them. Pieces move by offset, never by rewriting their vertices.

use serde::{Deserialize, Serialize};

/// A planar coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance, computed as `sqrt(dx² + dy²)`.
    #[inline]
    pub fn distance(self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Generation record attached to aperiodic-style tiles.
///
/// Written once by the generator and never recomputed.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileMetadata {
    pub row: u32,
    pub col: u32,
    /// Angular phase, always 0, 1 or 2.
    pub variant: u8,
    pub fib_offset: f64,
    pub center_x: f64,
    pub center_y: f64,
}

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// A closed contour of at least three points.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub points: Vec<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<TileMetadata>,
}

impl Polygon {
    pub fn new(points: Vec<Point>) -> Self {
        debug_assert!(points.len() >= 3, "polygon needs at least 3 points");
        Self {
            points,
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, metadata: TileMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Arithmetic mean of the vertices.
    ///
    /// This is the piece anchor. It is not the area centroid for irregular
    /// shapes and must not be replaced by one: snapping compares against it.
    pub fn centroid(&self) -> Point {
        let count = self.points.len() as f64;
        let (sum_x, sum_y) = self
            .points
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        Point::new(sum_x / count, sum_y / count)
    }

    pub fn bounds(&self) -> Bounds {
        self.points.iter().fold(
            Bounds {
                min_x: f64::INFINITY,
                min_y: f64::INFINITY,
                max_x: f64::NEG_INFINITY,
                max_y: f64::NEG_INFINITY,
            },
            |b, p| Bounds {
                min_x: b.min_x.min(p.x),
                min_y: b.min_y.min(p.y),
                max_x: b.max_x.max(p.x),
                max_y: b.max_y.max(p.y),
            },
        )
    }

    /// Unsigned shoelace area.
    pub fn area(&self) -> f64 {
        let n = self.points.len();
        let twice: f64 = (0..n)
            .map(|i| {
                let a = self.points[i];
                let b = self.points[(i + 1) % n];
                a.x * b.y - b.x * a.y
            })
            .sum();
        twice.abs() / 2.0
    }

    /// Returns a copy shifted by `(dx, dy)`; metadata is carried unchanged.
    pub fn translated(&self, dx: f64, dy: f64) -> Polygon {
        Polygon {
            points: self
                .points
                .iter()
                .map(|p| Point::new(p.x + dx, p.y + dy))
                .collect(),
            metadata: self.metadata,
        }
    }

    /// Renders the contour as an SVG `points` attribute value.
    pub fn to_svg_points(&self) -> String {
        self.points
            .iter()
            .map(|p| format!("{},{}", p.x, p.y))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
