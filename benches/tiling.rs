//! Benchmarks for the tiling pipeline and the solve animation.

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use tessera::animation::{SolveAnimation, SETTLE_DELAY, SOLVE_DURATION};
use tessera::grid::grid_polygons;
use tessera::hat::hat_polygons;
use tessera::layout::{Layout, ScatterStrategy};
use tessera::pieces::build_pieces;
use tessera::session::build_board;
use tessera::{PieceId, PuzzleConfig};

/// Benchmark generating a large grid tiling.
fn bench_grid(c: &mut Criterion) {
    c.bench_function("grid_polygons_32x32", |b| {
        b.iter(|| grid_polygons(black_box(600.0), 32, 32))
    });
}

/// Benchmark generating hat-like tilings at two sizes.
fn bench_hat(c: &mut Criterion) {
    let mut group = c.benchmark_group("hat_polygons");
    for complexity in [6u32, 32] {
        group.bench_function(format!("{complexity}x{complexity}"), |b| {
            b.iter(|| hat_polygons(black_box(600.0), complexity))
        });
    }
    group.finish();
}

/// Benchmark building and laying out pieces.
fn bench_pieces_and_layout(c: &mut Criterion) {
    let polygons = hat_polygons(600.0, 32);
    let layout = Layout::new(600.0, ScatterStrategy::BoardRandom, 1);

    c.bench_function("build_and_layout_1024", |b| {
        b.iter(|| {
            let mut pieces = build_pieces(black_box(polygons.clone()));
            layout.apply(&mut pieces, 200);
            pieces
        })
    });
}

/// Benchmark one animation frame over a full board.
fn bench_animation_step(c: &mut Criterion) {
    let mut pieces = build_pieces(hat_polygons(600.0, 32));
    Layout::new(600.0, ScatterStrategy::BoardRandom, 1).apply(&mut pieces, 1024);
    let animation = SolveAnimation::start(&pieces, SOLVE_DURATION, SETTLE_DELAY);

    c.bench_function("solve_step_1024", |b| {
        b.iter(|| animation.advance(&mut pieces, black_box(Duration::from_millis(700))))
    });
}

/// Benchmark a pick-up, move and release cycle.
fn bench_drag_cycle(c: &mut Criterion) {
    let config = PuzzleConfig {
        missing_pieces: 20,
        ..Default::default()
    };
    let mut board = build_board(&config).expect("default config is valid");
    let id = PieceId::from("piece-10");
    let start = board.piece(&id).map(|p| p.current()).unwrap_or_default();

    c.bench_function("drag_cycle", |b| {
        b.iter(|| {
            board.pointer_down(&id, start);
            board.pointer_move(black_box(start));
            board.pointer_up()
        })
    });
}

criterion_group!(
    benches,
    bench_grid,
    bench_hat,
    bench_pieces_and_layout,
    bench_animation_step,
    bench_drag_cycle
);
criterion_main!(benches);
