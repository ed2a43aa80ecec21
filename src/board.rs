//! Interaction state machine.
//!
//! The board owns the live piece collection. Pointer events drag one piece at
//! a time; releasing close enough to the target snaps it home. A running solve
//! animation takes precedence over any drag.
//!
//! Storage order never changes, so piece indices stay valid for the
//! animation's start table. Z-order lives in a separate list.

use std::time::Duration;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, info, trace};

use crate::animation::{AnimationStep, SolveAnimation};
use crate::geometry::Point;
use crate::pieces::{PieceId, PuzzlePiece};

/// Pointer session state. Only one drag can be active.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        piece: PieceId,
        /// Pointer position minus piece position at pick-up.
        offset: Point,
    },
}

/// Result of ending a drag.
#[derive(Clone, Debug, PartialEq)]
pub struct Release {
    pub piece: PieceId,
    /// Distance from the target at the moment of release.
    pub distance: f64,
    pub snapped: bool,
}

/// A solve animation bound to the board that started it.
#[derive(Clone, Debug)]
struct ActiveSolve {
    animation: SolveAnimation,
    last_step: Option<AnimationStep>,
}

#[derive(Clone, Debug)]
pub struct Board {
    pieces: Vec<PuzzlePiece>,
    lookup: FxHashMap<PieceId, usize>,
    /// Storage indices, back to front.
    render_order: Vec<usize>,
    drag: DragState,
    snap_threshold: f64,
    solved: bool,
    solving: Option<ActiveSolve>,
}

impl Board {
    pub fn new(pieces: Vec<PuzzlePiece>, snap_threshold: f64) -> Self {
        let lookup = pieces
            .iter()
            .enumerate()
            .map(|(index, piece)| (piece.id().clone(), index))
            .collect();
        let render_order = (0..pieces.len()).collect();
        let mut board = Self {
            pieces,
            lookup,
            render_order,
            drag: DragState::Idle,
            snap_threshold,
            solved: false,
            solving: None,
        };
        board.refresh_solved();
        board
    }

    /// Pieces in generation order.
    pub fn pieces(&self) -> &[PuzzlePiece] {
        &self.pieces
    }

    pub fn piece(&self, id: &PieceId) -> Option<&PuzzlePiece> {
        self.lookup.get(id).map(|&index| &self.pieces[index])
    }

    /// Pieces back to front; the last one is drawn on top.
    pub fn render_order(&self) -> impl Iterator<Item = &PuzzlePiece> + '_ {
        self.render_order.iter().map(|&index| &self.pieces[index])
    }

    pub fn render_ids(&self) -> Vec<PieceId> {
        self.render_order().map(|p| p.id().clone()).collect()
    }

    /// Restores a saved z-order. Unknown ids are skipped, a repeated id keeps
    /// its last position, and pieces missing from `ids` keep their relative
    /// order underneath.
    pub fn set_render_order(&mut self, ids: &[PieceId]) {
        let mut seen = FxHashSet::default();
        let mut front: Vec<usize> = ids
            .iter()
            .rev()
            .filter_map(|id| self.lookup.get(id).copied())
            .filter(|&index| seen.insert(index))
            .collect();
        front.reverse();
        let mut order: Vec<usize> = self
            .render_order
            .iter()
            .copied()
            .filter(|index| !front.contains(index))
            .collect();
        order.extend(front);
        self.render_order = order;
    }

    pub fn snap_threshold(&self) -> f64 {
        self.snap_threshold
    }

    pub fn drag_state(&self) -> &DragState {
        &self.drag
    }

    pub fn dragged(&self) -> Option<&PuzzlePiece> {
        match &self.drag {
            DragState::Idle => None,
            DragState::Dragging { piece, .. } => self.piece(piece),
        }
    }

    /// Formula explanation for the piece under the pointer, if it has one.
    pub fn dragged_formula(&self) -> Option<String> {
        self.dragged()
            .and_then(|piece| piece.polygon().metadata)
            .map(|meta| meta.explain())
    }

    pub fn is_solved(&self) -> bool {
        self.solved
    }

    pub fn is_animating(&self) -> bool {
        self.solving.is_some()
    }

    /// The solve action is offered only while unsolved and idle.
    pub fn can_solve(&self) -> bool {
        !self.solved && self.solving.is_none()
    }

    pub fn placed_count(&self) -> usize {
        self.pieces.iter().filter(|p| p.is_placed()).count()
    }

    /// Unplaced pieces in generation order; these leave holes in the image.
    pub fn gaps(&self) -> impl Iterator<Item = &PuzzlePiece> + '_ {
        self.pieces.iter().filter(|p| !p.is_placed())
    }

    /// Unplaced pieces back to front.
    pub fn loose_pieces(&self) -> impl Iterator<Item = &PuzzlePiece> + '_ {
        self.render_order().filter(|p| !p.is_placed())
    }

    /// Starts dragging `id` from `pointer`.
    ///
    /// Ignored for unknown ids, placed pieces, a solved board, a running
    /// solve, or while another drag is active. Returns whether a drag began.
    pub fn pointer_down(&mut self, id: &PieceId, pointer: Point) -> bool {
        if self.solved || self.solving.is_some() || self.drag != DragState::Idle {
            debug!(piece = %id, "pointer down ignored");
            return false;
        }
        let Some(&index) = self.lookup.get(id) else {
            debug!(piece = %id, "pointer down on unknown piece");
            return false;
        };
        let piece = &self.pieces[index];
        if piece.is_placed() {
            return false;
        }

        let current = piece.current();
        let offset = Point::new(pointer.x - current.x, pointer.y - current.y);
        self.bring_to_front(index);
        self.drag = DragState::Dragging {
            piece: id.clone(),
            offset,
        };
        debug!(piece = %id, x = current.x, y = current.y, "drag started");
        true
    }

    /// Moves the dragged piece so it keeps its pick-up offset.
    pub fn pointer_move(&mut self, pointer: Point) -> bool {
        let Some((index, offset)) = self.drag_target() else {
            return false;
        };
        let piece = &mut self.pieces[index];
        piece.move_to(Point::new(pointer.x - offset.x, pointer.y - offset.y));
        // never placed while in motion, even over its own target
        piece.is_placed = false;
        trace!(piece = %piece.id(), x = piece.current_x, y = piece.current_y, "drag move");
        self.refresh_solved();
        true
    }

    /// Ends the drag, snapping when strictly inside the threshold.
    pub fn pointer_up(&mut self) -> Option<Release> {
        let (index, _) = self.drag_target()?;
        self.drag = DragState::Idle;

        let piece = &mut self.pieces[index];
        let distance = piece.distance_to_target();
        let snapped = distance < self.snap_threshold;
        if snapped {
            piece.snap();
        } else {
            piece.is_placed = false;
        }
        debug!(piece = %piece.id(), distance, snapped, "drag released");

        let release = Release {
            piece: piece.id().clone(),
            distance,
            snapped,
        };
        self.refresh_solved();
        Some(release)
    }

    /// Leaving the interactive surface ends the drag like a release.
    pub fn pointer_leave(&mut self) -> Option<Release> {
        self.pointer_up()
    }

    /// Starts animating every piece home, abandoning any drag.
    ///
    /// No-op on a solved board or while a solve is already running.
    pub fn start_solve(&mut self, duration: Duration, settle: Duration) -> bool {
        if !self.can_solve() {
            return false;
        }
        if let DragState::Dragging { piece, .. } = &self.drag {
            debug!(piece = %piece, "drag abandoned for solve");
        }
        self.drag = DragState::Idle;
        self.solving = Some(ActiveSolve {
            animation: SolveAnimation::start(&self.pieces, duration, settle),
            last_step: None,
        });
        info!(?duration, "auto-solve started");
        true
    }

    /// Steps the running solve to `elapsed` since it started.
    ///
    /// Returns `None` when no solve is running. The board becomes solved once
    /// the settle delay has passed.
    pub fn advance(&mut self, elapsed: Duration) -> Option<AnimationStep> {
        let solve = self.solving.as_mut()?;
        let step = solve.animation.advance(&mut self.pieces, elapsed);
        solve.last_step = Some(step);
        if step.settled {
            self.solving = None;
            info!("auto-solve finished");
        }
        self.refresh_solved();
        Some(step)
    }

    /// Last step the running solve produced.
    pub fn last_step(&self) -> Option<AnimationStep> {
        self.solving.as_ref().and_then(|s| s.last_step)
    }

    fn drag_target(&self) -> Option<(usize, Point)> {
        match &self.drag {
            DragState::Idle => None,
            DragState::Dragging { piece, offset } => {
                self.lookup.get(piece).map(|&index| (index, *offset))
            }
        }
    }

    fn bring_to_front(&mut self, index: usize) {
        if let Some(position) = self.render_order.iter().position(|&i| i == index) {
            let picked = self.render_order.remove(position);
            self.render_order.push(picked);
        }
    }

    /// Re-derives the solved flag from the pieces.
    fn refresh_solved(&mut self) {
        let solved = !self.pieces.is_empty()
            && self.solving.is_none()
            && self.pieces.iter().all(PuzzlePiece::is_placed);
        if solved != self.solved {
            info!(solved, "solved state changed");
        }
        self.solved = solved;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Polygon;
    use crate::grid::grid_polygons;
    use crate::hat::hat_polygons;
    use crate::layout::{Layout, ScatterStrategy};
    use crate::pieces::build_pieces;
    use proptest::prelude::*;

    fn single_piece_board(threshold: f64) -> Board {
        let polygon = Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(100.0, 100.0),
            Point::new(0.0, 100.0),
        ]);
        let mut pieces = build_pieces(vec![polygon]);
        Layout::new(600.0, ScatterStrategy::TrayGrid, 0).apply(&mut pieces, 1);
        Board::new(pieces, threshold)
    }

    fn grid_board(missing: usize) -> Board {
        let mut pieces = build_pieces(grid_polygons(600.0, 4, 4));
        Layout::new(600.0, ScatterStrategy::TrayGrid, 0).apply(&mut pieces, missing);
        Board::new(pieces, 30.0)
    }

    /// Drags `id` so that it is released at `target`.
    fn drop_at(board: &mut Board, id: &PieceId, target: Point) -> Option<Release> {
        let start = board.piece(id)?.current();
        let grab = Point::new(start.x + 7.0, start.y + 3.0);
        assert!(board.pointer_down(id, grab), "could not pick up {id}");
        board.pointer_move(Point::new(target.x + 7.0, target.y + 3.0));
        board.pointer_up()
    }

    #[test]
    fn test_scenario_release_inside_threshold() {
        let mut board = single_piece_board(30.0);
        let id = PieceId::from("piece-0");
        let correct = board.piece(&id).map(PuzzlePiece::correct).unwrap();
        assert!(!board.is_solved());

        let release = drop_at(&mut board, &id, Point::new(correct.x + 29.0, correct.y)).unwrap();
        assert!(release.snapped);
        assert_eq!(board.piece(&id).unwrap().current(), correct);
        assert!(board.is_solved(), "last piece placed must solve the board");
    }

    #[test]
    fn test_scenario_release_on_threshold_does_not_snap() {
        let mut board = single_piece_board(30.0);
        let id = PieceId::from("piece-0");
        let correct = board.piece(&id).map(PuzzlePiece::correct).unwrap();

        let release = drop_at(&mut board, &id, Point::new(correct.x + 30.0, correct.y)).unwrap();
        assert_eq!(release.distance, 30.0);
        assert!(!release.snapped);
        let piece = board.piece(&id).unwrap();
        assert_eq!(piece.current(), Point::new(correct.x + 30.0, correct.y));
        assert!(!piece.is_placed());
        assert!(!board.is_solved());
    }

    #[test]
    fn test_pick_up_keeps_offset_and_raises_piece() {
        let mut board = grid_board(5);
        let id = PieceId::from("piece-11");
        assert!(board.pointer_down(&id, Point::new(730.0, 60.0)));
        assert_eq!(
            board.drag_state(),
            &DragState::Dragging {
                piece: id.clone(),
                offset: Point::new(10.0, 10.0),
            }
        );
        assert_eq!(board.render_order().last().map(PuzzlePiece::id), Some(&id));
        // storage order is untouched
        assert_eq!(board.pieces()[11].id(), &id);

        board.pointer_move(Point::new(110.0, 210.0));
        assert_eq!(board.piece(&id).unwrap().current(), Point::new(100.0, 200.0));
    }

    #[test]
    fn test_moving_over_target_is_not_placed() {
        let mut board = grid_board(1);
        let id = PieceId::from("piece-10");
        let correct = board.piece(&id).unwrap().correct();
        let start = board.piece(&id).unwrap().current();
        board.pointer_down(&id, start);
        board.pointer_move(correct);
        assert!(!board.piece(&id).unwrap().is_placed());
        assert!(!board.is_solved(), "mid-drag never counts as solved");
        board.pointer_up();
        assert!(board.is_solved());
    }

    #[test]
    fn test_ignored_pointer_downs() {
        let mut board = grid_board(2);
        // placed piece
        assert!(!board.pointer_down(&PieceId::from("piece-0"), Point::new(0.0, 0.0)));
        // stale id
        assert!(!board.pointer_down(&PieceId::from("piece-99"), Point::new(0.0, 0.0)));
        assert_eq!(board.drag_state(), &DragState::Idle);

        // second pointer while dragging
        assert!(board.pointer_down(&PieceId::from("piece-10"), Point::new(650.0, 50.0)));
        assert!(!board.pointer_down(&PieceId::from("piece-11"), Point::new(720.0, 50.0)));
        assert_eq!(board.dragged().map(PuzzlePiece::id), Some(&PieceId::from("piece-10")));
    }

    #[test]
    fn test_events_without_drag_are_noops() {
        let mut board = grid_board(2);
        let before = board.pieces().to_vec();
        assert!(!board.pointer_move(Point::new(1.0, 1.0)));
        assert_eq!(board.pointer_up(), None);
        assert_eq!(board.pointer_leave(), None);
        assert_eq!(board.pieces(), &before[..]);
    }

    #[test]
    fn test_pointer_leave_releases() {
        let mut board = grid_board(1);
        let id = PieceId::from("piece-10");
        let correct = board.piece(&id).unwrap().correct();
        drop_at(&mut board, &id, Point::new(correct.x + 100.0, correct.y));
        let start = board.piece(&id).unwrap().current();
        board.pointer_down(&id, start);
        board.pointer_move(Point::new(correct.x + 5.0, correct.y - 5.0));
        let release = board.pointer_leave().unwrap();
        assert!(release.snapped);
        assert!(board.is_solved());
    }

    #[test]
    fn test_solved_board_rejects_drags() {
        let mut board = grid_board(1);
        let id = PieceId::from("piece-10");
        let correct = board.piece(&id).unwrap().correct();
        drop_at(&mut board, &id, correct);
        assert!(board.is_solved());
        assert!(!board.can_solve());
        assert!(!board.pointer_down(&id, correct));
    }

    #[test]
    fn test_solved_is_rederived_when_piece_leaves() {
        let mut board = grid_board(1);
        let id = PieceId::from("piece-10");
        let correct = board.piece(&id).unwrap().correct();
        drop_at(&mut board, &id, correct);
        assert!(board.is_solved());

        // force a drag on the placed piece to move it back out
        board.drag = DragState::Dragging {
            piece: id.clone(),
            offset: Point::new(0.0, 0.0),
        };
        board.pointer_move(Point::new(correct.x + 200.0, correct.y));
        assert!(!board.is_solved());
        let release = board.pointer_up().unwrap();
        assert!(!release.snapped);
        assert!(!board.is_solved(), "solved must flip back when a piece is moved away");
    }

    #[test]
    fn test_solve_animation_preempts_drag() {
        let mut board = grid_board(5);
        let id = PieceId::from("piece-12");
        board.pointer_down(&id, Point::new(790.0, 50.0));
        board.pointer_move(Point::new(400.0, 400.0));

        assert!(board.start_solve(Duration::from_millis(1500), Duration::from_millis(500)));
        assert_eq!(board.drag_state(), &DragState::Idle);
        assert!(!board.pointer_down(&id, Point::new(0.0, 0.0)), "animated pieces are not draggable");
        assert!(!board.start_solve(Duration::from_millis(1500), Duration::from_millis(500)));

        let step = board.advance(Duration::from_millis(750)).unwrap();
        assert_eq!(step.progress, 0.5);
        assert!(board.pieces().iter().all(|p| !p.is_placed()));
        assert!(!board.is_solved());

        let step = board.advance(Duration::from_millis(1500)).unwrap();
        assert!(step.done);
        for piece in board.pieces() {
            assert_eq!(piece.current(), piece.correct());
            assert!(piece.is_placed());
        }
        assert!(!board.is_solved(), "solved waits for the settle delay");

        let step = board.advance(Duration::from_millis(2000)).unwrap();
        assert!(step.settled);
        assert!(board.is_solved());
        assert!(!board.is_animating());
        assert_eq!(board.advance(Duration::from_millis(2100)), None);
    }

    #[test]
    fn test_dragged_formula() {
        let mut pieces = build_pieces(hat_polygons(600.0, 6));
        Layout::new(600.0, ScatterStrategy::TrayGrid, 0).apply(&mut pieces, 5);
        let mut board = Board::new(pieces, 30.0);
        assert_eq!(board.dragged_formula(), None);

        board.pointer_down(&PieceId::from("piece-10"), Point::new(650.0, 50.0));
        let text = board.dragged_formula().expect("hat tiles explain themselves");
        assert!(text.starts_with("Position: Row 1, Col 4"));

        let mut grid = grid_board(5);
        grid.pointer_down(&PieceId::from("piece-10"), Point::new(650.0, 50.0));
        assert_eq!(grid.dragged_formula(), None);
    }

    #[test]
    fn test_gap_and_loose_views() {
        let mut board = grid_board(3);
        assert_eq!(board.gaps().count(), 3);
        board.pointer_down(&PieceId::from("piece-10"), Point::new(650.0, 50.0));
        board.pointer_up();
        let loose: Vec<&str> = board.loose_pieces().map(|p| p.id().as_str()).collect();
        assert_eq!(loose, vec!["piece-11", "piece-12", "piece-10"]);
        assert_eq!(board.placed_count(), 13);
    }

    #[test]
    fn test_set_render_order() {
        let mut board = grid_board(0);
        board.set_render_order(&[PieceId::from("piece-2"), PieceId::from("nope"), PieceId::from("piece-0")]);
        let ids = board.render_ids();
        assert_eq!(ids.len(), 16);
        assert_eq!(ids[14], PieceId::from("piece-2"));
        assert_eq!(ids[15], PieceId::from("piece-0"));
    }

    #[test]
    fn test_set_render_order_repeated_id_keeps_last() {
        let mut board = grid_board(0);
        board.set_render_order(&[
            PieceId::from("piece-2"),
            PieceId::from("piece-0"),
            PieceId::from("piece-2"),
        ]);
        let ids = board.render_ids();
        assert_eq!(ids.len(), board.pieces().len());
        assert_eq!(ids[14], PieceId::from("piece-0"));
        assert_eq!(ids[15], PieceId::from("piece-2"));
        assert_eq!(ids.iter().filter(|id| id.as_str() == "piece-2").count(), 1);
    }

    proptest! {
        #[test]
        fn prop_snap_is_strict(threshold in 1.0f64..100.0, dx in -150.0f64..150.0, dy in -150.0f64..150.0) {
            let mut board = single_piece_board(threshold);
            let id = PieceId::from("piece-0");
            let correct = board.piece(&id).unwrap().correct();
            let start = board.piece(&id).unwrap().current();

            board.pointer_down(&id, start);
            board.pointer_move(Point::new(correct.x + dx, correct.y + dy));
            let distance = board.piece(&id).unwrap().distance_to_target();
            let release = board.pointer_up().unwrap();

            prop_assert_eq!(release.snapped, distance < threshold);
            prop_assert_eq!(board.is_solved(), distance < threshold);
        }
    }
}
