//! Preview window for a puzzle session using kiss3d.
//!
//! Pieces are drawn as flat tiles sized to their bounding boxes. The view is
//! a debugging aid for the engine, not a full presentation layer: there is no
//! image clipping and no mouse dragging.

use std::time::Instant;

use kiss3d::prelude::*;
use tracing::{info, warn};

use tessera::config::{MAX_MISSING, MIN_MISSING};
use tessera::layout::TRAY_AREA_WIDTH;
use tessera::{PieceId, PuzzlePiece, Session};

/// World units per canvas pixel.
const WORLD_SCALE: f32 = 0.01;
/// Thickness of every tile.
const TILE_DEPTH: f32 = 0.05;
/// Tiles are shrunk slightly so neighbours stay distinguishable.
const TILE_SHRINK: f32 = 0.9;
/// Depth step between consecutive pieces in render order.
const LAYER_STEP: f32 = 0.002;

fn piece_color(piece: &PuzzlePiece) -> Color {
    if piece.is_placed() {
        Color::new(0.4, 0.5, 0.92, 1.0) // board blue
    } else {
        Color::new(1.0, 0.6, 0.2, 1.0) // loose orange
    }
}

fn gap_color() -> Color {
    Color::new(0.15, 0.15, 0.18, 1.0)
}

/// A tile in the scene tracking one piece.
struct RenderedPiece {
    node: SceneNode3d,
    id: PieceId,
    layer: f32,
}

/// Maps canvas coordinates to world space, centering board and tray.
fn to_world(x: f64, y: f64, center: (f64, f64), layer: f32) -> Vec3 {
    Vec3::new(
        (x - center.0) as f32 * WORLD_SCALE,
        -((y - center.1) as f32) * WORLD_SCALE,
        layer,
    )
}

fn view_center(session: &Session) -> (f64, f64) {
    let canvas = session.config().canvas_size;
    ((canvas + TRAY_AREA_WIDTH) / 2.0, canvas / 2.0)
}

/// Builds one tile per gap and one per piece.
fn build_scene(
    scene: &mut SceneNode3d,
    session: &Session,
) -> (Vec<SceneNode3d>, Vec<RenderedPiece>) {
    let board = session.board();
    let center = view_center(session);

    let gaps = board
        .gaps()
        .map(|piece| {
            let bounds = piece.polygon().bounds();
            let correct = piece.correct();
            scene
                .add_cube(
                    bounds.width() as f32 * WORLD_SCALE * TILE_SHRINK,
                    bounds.height() as f32 * WORLD_SCALE * TILE_SHRINK,
                    TILE_DEPTH * 0.5,
                )
                .set_color(gap_color())
                .set_position(to_world(correct.x, correct.y, center, 0.0))
        })
        .collect();

    let pieces = board
        .render_order()
        .enumerate()
        .map(|(depth, piece)| {
            let bounds = piece.polygon().bounds();
            let current = piece.current();
            let layer = TILE_DEPTH + depth as f32 * LAYER_STEP;
            let node = scene
                .add_cube(
                    bounds.width() as f32 * WORLD_SCALE * TILE_SHRINK,
                    bounds.height() as f32 * WORLD_SCALE * TILE_SHRINK,
                    TILE_DEPTH,
                )
                .set_color(piece_color(piece))
                .set_position(to_world(current.x, current.y, center, layer));
            RenderedPiece {
                node,
                id: piece.id().clone(),
                layer,
            }
        })
        .collect();

    (gaps, pieces)
}

fn window_title(session: &Session) -> String {
    let board = session.board();
    let status = if board.is_solved() {
        "Solved!".to_string()
    } else {
        format!("{}/{} placed", board.placed_count(), board.pieces().len())
    };
    format!(
        "{} - {} missing - [S] solve, [R] reset, [Left/Right] missing pieces",
        status,
        session.config().missing_pieces
    )
}

/// Rebuilds the session with one piece more or less missing.
fn change_difficulty(session: &mut Session, delta: isize) {
    let mut config = session.config().clone();
    let available = config.tiling_mode().tiler().tile_count();
    let upper = MAX_MISSING.min(available).max(MIN_MISSING);
    config.missing_pieces = config
        .missing_pieces
        .saturating_add_signed(delta)
        .clamp(MIN_MISSING, upper);
    match session.reset(config) {
        Ok(()) => info!(missing = session.config().missing_pieces, "difficulty changed"),
        Err(e) => warn!("reset failed: {e}"),
    }
}

/// Displays a session in an interactive window.
pub fn display(session: Session) {
    pollster::block_on(display_async(session));
}

async fn display_async(mut session: Session) {
    let mut window = Window::new(&window_title(&session)).await;

    let mut camera = OrbitCamera3d::default();
    camera.set_dist(12.0);

    let mut scene = SceneNode3d::empty();
    scene
        .add_light(Light::point(100.0))
        .set_position(Vec3::new(0.0, 0.0, 10.0));

    let (mut gap_nodes, mut rendered) = build_scene(&mut scene, &session);
    let mut solve_started: Option<Instant> = None;
    let mut needs_rebuild = false;

    loop {
        for event in window.events().iter() {
            if let kiss3d::event::WindowEvent::Key(key, action, _) = event.value {
                use kiss3d::event::{Action, Key};
                if action != Action::Press {
                    continue;
                }
                match key {
                    Key::S => {
                        if session.solve() {
                            solve_started = Some(Instant::now());
                        }
                    }
                    Key::R => {
                        let config = session.config().clone();
                        if let Err(e) = session.reset(config) {
                            warn!("reset failed: {e}");
                        }
                        solve_started = None;
                        needs_rebuild = true;
                    }
                    Key::Left => {
                        change_difficulty(&mut session, -1);
                        solve_started = None;
                        needs_rebuild = true;
                    }
                    Key::Right => {
                        change_difficulty(&mut session, 1);
                        solve_started = None;
                        needs_rebuild = true;
                    }
                    _ => {}
                }
            }
        }

        if let Some(started) = solve_started {
            session.board_mut().advance(started.elapsed());
            if !session.board().is_animating() {
                solve_started = None;
                needs_rebuild = true;
            }
        }

        if needs_rebuild {
            for mut node in gap_nodes.drain(..) {
                node.remove();
            }
            for mut piece in rendered.drain(..) {
                piece.node.remove();
            }
            let (new_gaps, new_rendered) = build_scene(&mut scene, &session);
            gap_nodes = new_gaps;
            rendered = new_rendered;
            window.set_title(&window_title(&session));
            needs_rebuild = false;
        }

        let center = view_center(&session);
        for piece in &mut rendered {
            if let Some(current) = session.board().piece(&piece.id).map(PuzzlePiece::current) {
                piece
                    .node
                    .set_position(to_world(current.x, current.y, center, piece.layer));
            }
        }

        if !window.render_3d(&mut scene, &mut camera).await {
            break;
        }
    }
}
