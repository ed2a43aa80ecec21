//! Tiling mode selection.

use serde::{Deserialize, Serialize};

use crate::geometry::Polygon;
use crate::grid::GridTiling;
use crate::hat::HatTiling;
use crate::Tiler;

/// Which generator a session uses, without its parameters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TilingKind {
    Grid,
    #[default]
    Hat,
}

/// A generator together with its parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TilingMode {
    Grid(GridTiling),
    Hat(HatTiling),
}

impl TilingMode {
    pub fn tiler(&self) -> &dyn Tiler {
        match self {
            TilingMode::Grid(grid) => grid,
            TilingMode::Hat(hat) => hat,
        }
    }

    pub fn kind(&self) -> TilingKind {
        match self {
            TilingMode::Grid(_) => TilingKind::Grid,
            TilingMode::Hat(_) => TilingKind::Hat,
        }
    }
}

/// Generates the polygons for `mode` on a square canvas.
///
/// Pure: the same inputs always produce bit-identical output.
pub fn generate(canvas_size: f64, mode: TilingMode) -> Vec<Polygon> {
    mode.tiler().generate(canvas_size)
}
