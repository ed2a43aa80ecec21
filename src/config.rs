//! Session configuration.
//!
//! Values come from defaults, an optional JSON file, and CLI overrides, in
//! that order. Everything is validated here so the engine can trust it.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{PuzzleError, Result};
use crate::grid::GridTiling;
use crate::hat::HatTiling;
use crate::layout::ScatterStrategy;
use crate::tiling::{TilingKind, TilingMode};

/// Fewest pieces the difficulty selector removes.
pub const MIN_MISSING: usize = 1;
/// Most pieces the difficulty selector removes.
pub const MAX_MISSING: usize = 20;
/// Largest grid side or hat complexity accepted.
pub const MAX_TILES_PER_SIDE: u32 = 100;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PuzzleConfig {
    /// Image the presentation layer cuts pieces from.
    pub image_url: String,
    /// Side length of the square board, in pixels.
    pub canvas_size: f64,
    pub grid_rows: u32,
    pub grid_cols: u32,
    /// Largest release distance that still counts as placed (exclusive).
    pub snap_threshold: f64,
    pub mode: TilingKind,
    /// Hat tiles per side.
    pub complexity: u32,
    pub missing_pieces: usize,
    pub scatter: ScatterStrategy,
    pub seed: u64,
    pub solve_duration_ms: u64,
    pub settle_delay_ms: u64,
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self {
            image_url: "./oom-arie-circle.png".to_string(),
            canvas_size: 600.0,
            grid_rows: 4,
            grid_cols: 4,
            snap_threshold: 30.0,
            mode: TilingKind::Hat,
            complexity: 6,
            missing_pieces: 5,
            scatter: ScatterStrategy::TrayGrid,
            seed: 0,
            solve_duration_ms: 1500,
            settle_delay_ms: 500,
        }
    }
}

impl PuzzleConfig {
    /// Reads a JSON config file; missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn tiling_mode(&self) -> TilingMode {
        match self.mode {
            TilingKind::Grid => TilingMode::Grid(GridTiling::new(self.grid_rows, self.grid_cols)),
            TilingKind::Hat => TilingMode::Hat(HatTiling::new(self.complexity)),
        }
    }

    pub fn solve_duration(&self) -> Duration {
        Duration::from_millis(self.solve_duration_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Rejects anything the engine is not prepared to handle.
    pub fn validate(&self) -> Result<()> {
        if !self.canvas_size.is_finite() || self.canvas_size <= 0.0 {
            return Err(PuzzleError::InvalidCanvas(self.canvas_size));
        }
        match self.mode {
            TilingKind::Grid if self.grid_rows == 0 || self.grid_cols == 0 => {
                return Err(PuzzleError::InvalidDimensions {
                    rows: self.grid_rows,
                    cols: self.grid_cols,
                });
            }
            TilingKind::Hat if self.complexity == 0 => {
                return Err(PuzzleError::InvalidComplexity);
            }
            _ => {}
        }
        let largest_side = match self.mode {
            TilingKind::Grid => self.grid_rows.max(self.grid_cols),
            TilingKind::Hat => self.complexity,
        };
        if largest_side > MAX_TILES_PER_SIDE {
            return Err(PuzzleError::TooManyTiles {
                requested: largest_side,
                max: MAX_TILES_PER_SIDE,
            });
        }
        if !self.snap_threshold.is_finite() || self.snap_threshold < 0.0 {
            return Err(PuzzleError::InvalidSnapThreshold(self.snap_threshold));
        }
        if self.solve_duration_ms == 0 {
            return Err(PuzzleError::InvalidDuration);
        }

        let available = self.tiling_mode().tiler().tile_count();
        if self.missing_pieces > available {
            return Err(PuzzleError::TooManyMissing {
                requested: self.missing_pieces,
                available,
            });
        }
        Ok(())
    }
}
