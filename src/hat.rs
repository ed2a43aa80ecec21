//! Quasi-periodic "hat-like" tiling.
//!
//! A simplified stand-in for the 2023 hat monotile: one perturbed hexagon per
//! cell of a `complexity x complexity` grid. Cell centers are pushed by a
//! golden-ratio offset so no finite window repeats, and one of three angular
//! phases is chosen per cell.
//!
//! Coverage is approximate. Neighbouring tiles may overlap or leave slivers;
//! the formula is kept exactly as is because tile metadata explains it.

use std::f64::consts::PI;

use crate::geometry::{Point, Polygon, TileMetadata};
use crate::Tiler;

/// The golden ratio, `(1 + sqrt(5)) / 2`.
pub const PHI: f64 = 1.618_033_988_749_895;
/// `1 / PHI`.
pub const INV_PHI: f64 = 0.618_033_988_749_894_8;

/// Number of sides of every hat-like tile.
const NUM_SIDES: usize = 6;
/// Fraction of the cell size used as the golden-ratio offset amplitude.
const OFFSET_SCALE: f64 = 0.3;
/// Vertical damping applied to the offset.
const OFFSET_Y_SCALE: f64 = 0.7;
/// Tile radius as a fraction of the cell size.
const RADIUS_SCALE: f64 = 0.45;
/// Radius boost on the sides selected by the tile variant.
const NOTCH_BOOST: f64 = 0.2;

/// Attribution for the monotile this tiling imitates.
#[derive(Debug)]
pub struct HatInfo {
    pub discoverers: &'static [&'static str],
    pub year: u16,
    pub paper: &'static str,
    pub source: &'static str,
}

pub const HAT_INFO: HatInfo = HatInfo {
    discoverers: &[
        "David Smith",
        "Joseph Samuel Myers",
        "Craig S. Kaplan",
        "Chaim Goodman-Strauss",
    ],
    year: 2023,
    paper: "An aperiodic monotile",
    source: "https://github.com/isohedral/hatviz",
};

/// `complexity x complexity` hat-like tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HatTiling {
    pub complexity: u32,
}

impl HatTiling {
    pub const fn new(complexity: u32) -> Self {
        Self { complexity }
    }
}

impl Tiler for HatTiling {
    fn generate(&self, canvas_size: f64) -> Vec<Polygon> {
        hat_polygons(canvas_size, self.complexity)
    }

    fn tile_count(&self) -> usize {
        self.complexity as usize * self.complexity as usize
    }

    fn columns(&self) -> usize {
        self.complexity as usize
    }
}

/// Golden-ratio perturbation for cell `(row, col)`.
#[inline]
pub fn fib_offset(row: u32, col: u32, cell_size: f64) -> f64 {
    ((row as f64 * PHI + col as f64 * INV_PHI) % 1.0) * cell_size * OFFSET_SCALE
}

/// Generates the hat-like tiles in row-major order, each with metadata.
pub fn hat_polygons(canvas_size: f64, complexity: u32) -> Vec<Polygon> {
    let cell_size = canvas_size / complexity as f64;
    let mut polygons = Vec::with_capacity(complexity as usize * complexity as usize);

    for row in 0..complexity {
        for col in 0..complexity {
            let offset = fib_offset(row, col, cell_size);
            let center = Point::new(
                col as f64 * cell_size + cell_size / 2.0 + offset,
                row as f64 * cell_size + cell_size / 2.0 + offset * OFFSET_Y_SCALE,
            );
            let variant = ((row + col) % 3) as u8;
            let polygon = hat_like_polygon(center, cell_size * RADIUS_SCALE, variant);

            polygons.push(polygon.with_metadata(TileMetadata {
                row,
                col,
                variant,
                fib_offset: offset,
                center_x: center.x,
                center_y: center.y,
            }));
        }
    }

    polygons
}

/// Builds a hexagon rotated by `variant * 30°` whose sides `i` with
/// `i % 3 == variant` reach 20% further out.
fn hat_like_polygon(center: Point, size: f64, variant: u8) -> Polygon {
    let angle_offset = variant as f64 * (PI / 6.0);

    let points = (0..NUM_SIDES)
        .map(|i| {
            let angle = (i as f64 * 2.0 * PI / NUM_SIDES as f64) + angle_offset;
            let boost = if variant as usize == i % 3 { NOTCH_BOOST } else { 0.0 };
            let radius = size * (1.0 + boost);
            Point::new(
                center.x + radius * angle.cos(),
                center.y + radius * angle.sin(),
            )
        })
        .collect();

    Polygon::new(points)
}

impl TileMetadata {
    /// Explains how this tile's position was derived.
    pub fn explain(&self) -> String {
        [
            format!("Position: Row {}, Col {}", self.row, self.col),
            format!("Variant: {} (affects angle offset)", self.variant),
            "Golden Ratio Offset:".to_string(),
            format!("  φ = {PHI:.5} (golden ratio)"),
            format!("  1/φ = {INV_PHI:.5}"),
            format!("  offset = ({} × φ + {} × 1/φ) mod 1", self.row, self.col),
            format!("  = {:.3}", self.fib_offset),
            format!("Center: ({:.1}, {:.1})", self.center_x, self.center_y),
        ]
        .join("\n")
    }
}
