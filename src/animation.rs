//! Auto-solve animation.
//!
//! Progress is a function of elapsed time only, so late or dropped frames
//! never slow the animation down. The caller owns the clock and calls
//! [`SolveAnimation::advance`] with the time since the solve started.

use std::time::Duration;

use crate::geometry::Point;
use crate::pieces::PuzzlePiece;

/// Default time to move every piece home.
pub const SOLVE_DURATION: Duration = Duration::from_millis(1500);
/// Pause after the last frame before the puzzle counts as solved.
pub const SETTLE_DELAY: Duration = Duration::from_millis(500);

/// Symmetric quadratic ease-in-ease-out.
#[inline]
pub fn ease_in_out(progress: f64) -> f64 {
    if progress < 0.5 {
        2.0 * progress * progress
    } else {
        1.0 - (-2.0 * progress + 2.0).powi(2) / 2.0
    }
}

/// Outcome of one animation step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationStep {
    /// Raw progress, clamped to `[0, 1]`.
    pub progress: f64,
    pub eased: f64,
    /// Every piece sits on its anchor.
    pub done: bool,
    /// The settle delay has also elapsed.
    pub settled: bool,
}

/// In-flight solve of a whole board.
#[derive(Clone, Debug)]
pub struct SolveAnimation {
    /// Start positions, indexed like the board's piece storage.
    starts: Vec<Point>,
    duration: Duration,
    settle: Duration,
}

impl SolveAnimation {
    /// Captures every piece's current position as its start point.
    pub fn start(pieces: &[PuzzlePiece], duration: Duration, settle: Duration) -> Self {
        Self {
            starts: pieces.iter().map(PuzzlePiece::current).collect(),
            duration,
            settle,
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// `clamp(elapsed / duration, 0, 1)`.
    pub fn progress(&self, elapsed: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    /// Moves every piece to its eased position for `elapsed`.
    ///
    /// Pieces stay unplaced until progress reaches 1; at that point they are
    /// put exactly on their anchors rather than interpolated there.
    pub fn advance(&self, pieces: &mut [PuzzlePiece], elapsed: Duration) -> AnimationStep {
        let progress = self.progress(elapsed);
        let eased = ease_in_out(progress);
        let done = progress >= 1.0;

        for (piece, start) in pieces.iter_mut().zip(&self.starts) {
            if done {
                piece.snap();
            } else {
                let target = piece.correct();
                piece.move_to(Point::new(
                    start.x + (target.x - start.x) * eased,
                    start.y + (target.y - start.y) * eased,
                ));
                piece.is_placed = false;
            }
        }

        AnimationStep {
            progress,
            eased,
            done,
            settled: done && elapsed >= self.duration + self.settle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::grid_polygons;
    use crate::layout::{Layout, ScatterStrategy};
    use crate::pieces::build_pieces;

    fn scattered() -> Vec<PuzzlePiece> {
        let mut pieces = build_pieces(grid_polygons(600.0, 4, 4));
        Layout::new(600.0, ScatterStrategy::BoardRandom, 3).apply(&mut pieces, 6);
        pieces
    }

    #[test]
    fn test_ease_curve() {
        assert_eq!(ease_in_out(0.0), 0.0);
        assert_eq!(ease_in_out(0.25), 0.125);
        assert_eq!(ease_in_out(0.5), 0.5);
        assert_eq!(ease_in_out(0.75), 0.875);
        assert_eq!(ease_in_out(1.0), 1.0);
    }

    #[test]
    fn test_progress_clamps() {
        let animation = SolveAnimation::start(&[], SOLVE_DURATION, SETTLE_DELAY);
        assert_eq!(animation.progress(Duration::ZERO), 0.0);
        assert_eq!(animation.progress(Duration::from_millis(750)), 0.5);
        assert_eq!(animation.progress(Duration::from_secs(10)), 1.0);
    }

    #[test]
    fn test_midway_uses_eased_progress() {
        let mut pieces = scattered();
        let animation = SolveAnimation::start(&pieces, SOLVE_DURATION, SETTLE_DELAY);
        let start = pieces[10].current();
        let target = pieces[10].correct();

        // 375ms of 1500ms is p = 0.25, eased to 0.125
        let step = animation.advance(&mut pieces, Duration::from_millis(375));
        assert_eq!(step.progress, 0.25);
        assert!(!step.done);

        let expected_x = start.x + (target.x - start.x) * 0.125;
        assert!((pieces[10].current().x - expected_x).abs() < 1e-9);
        assert!(pieces.iter().all(|p| !p.is_placed()), "nothing is placed mid-animation");
    }

    #[test]
    fn test_completion_is_exact() {
        let mut pieces = scattered();
        let animation = SolveAnimation::start(&pieces, SOLVE_DURATION, SETTLE_DELAY);

        let step = animation.advance(&mut pieces, SOLVE_DURATION);
        assert!(step.done);
        assert!(!step.settled, "settle delay has not elapsed");
        for piece in &pieces {
            assert_eq!(piece.current(), piece.correct());
            assert!(piece.is_placed());
        }

        let step = animation.advance(&mut pieces, SOLVE_DURATION + SETTLE_DELAY);
        assert!(step.settled);
    }

    #[test]
    fn test_late_frame_still_finishes() {
        let mut pieces = scattered();
        let animation = SolveAnimation::start(&pieces, SOLVE_DURATION, SETTLE_DELAY);
        // a single very late step jumps straight to the end
        let step = animation.advance(&mut pieces, Duration::from_secs(5));
        assert!(step.done && step.settled);
        assert!(pieces.iter().all(PuzzlePiece::is_placed));
    }
}
