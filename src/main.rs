//! Polygon Jigsaw
//!
//! Builds a puzzle from a square image, removes a handful of pieces into a
//! tray, and lets the player put them back. Tiles are either a plain grid or a
//! quasi-periodic hat-like tiling. The CLI prints and exports boards, runs the
//! auto-solve on a synthetic clock, and opens a preview window.

mod visualization;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use tessera::grid::format_board;
use tessera::hat::HAT_INFO;
use tessera::layout::ScatterStrategy;
use tessera::persistence::{self, BoardSnapshot};
use tessera::tiling::{generate, TilingKind};
use tessera::{PuzzleConfig, PuzzleError, Session};

/// Polygon jigsaw engine with grid and hat-like tilings.
#[derive(Parser)]
#[command(name = "tessera")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    options: ConfigArgs,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Args)]
struct ConfigArgs {
    /// JSON config file; flags below override its values.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[arg(long, global = true)]
    mode: Option<ModeArg>,

    /// Hat tiles per side.
    #[arg(long, global = true)]
    complexity: Option<u32>,

    #[arg(long, global = true)]
    rows: Option<u32>,

    #[arg(long, global = true)]
    cols: Option<u32>,

    /// Number of pieces moved into the tray.
    #[arg(long, global = true)]
    missing: Option<usize>,

    #[arg(long, global = true)]
    scatter: Option<ScatterArg>,

    /// Seed for the random scatter strategies.
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[arg(long, global = true)]
    canvas_size: Option<f64>,

    #[arg(long, global = true)]
    snap_threshold: Option<f64>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Grid,
    Hat,
}

#[derive(Clone, Copy, ValueEnum)]
enum ScatterArg {
    TrayGrid,
    TrayRandom,
    BoardRandom,
}

#[derive(Subcommand)]
enum Command {
    /// Print the generated tiles.
    Tiles,
    /// Print the laid-out board.
    Board,
    /// Write the laid-out board as JSON.
    Export {
        /// Output file; stdout when omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Run the auto-solve on a fixed frame clock and report progress.
    Solve {
        /// Milliseconds between simulated frames.
        #[arg(long, default_value_t = 16)]
        frame_ms: u64,
    },
    /// Open the preview window.
    Display,
}

impl ConfigArgs {
    fn resolve(&self) -> Result<PuzzleConfig, PuzzleError> {
        let mut config = match &self.config {
            Some(path) => PuzzleConfig::from_json_file(path)?,
            None => PuzzleConfig::default(),
        };

        if let Some(mode) = self.mode {
            config.mode = match mode {
                ModeArg::Grid => TilingKind::Grid,
                ModeArg::Hat => TilingKind::Hat,
            };
        }
        if let Some(scatter) = self.scatter {
            config.scatter = match scatter {
                ScatterArg::TrayGrid => ScatterStrategy::TrayGrid,
                ScatterArg::TrayRandom => ScatterStrategy::TrayRandom,
                ScatterArg::BoardRandom => ScatterStrategy::BoardRandom,
            };
        }
        config.complexity = self.complexity.unwrap_or(config.complexity);
        config.grid_rows = self.rows.unwrap_or(config.grid_rows);
        config.grid_cols = self.cols.unwrap_or(config.grid_cols);
        config.missing_pieces = self.missing.unwrap_or(config.missing_pieces);
        config.seed = self.seed.unwrap_or(config.seed);
        config.canvas_size = self.canvas_size.unwrap_or(config.canvas_size);
        config.snap_threshold = self.snap_threshold.unwrap_or(config.snap_threshold);

        config.validate()?;
        Ok(config)
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), PuzzleError> {
    let config = cli.options.resolve()?;

    match cli.command {
        Some(Command::Tiles) => run_tiles(&config),
        Some(Command::Board) => run_board(config)?,
        Some(Command::Export { output }) => run_export(config, output)?,
        Some(Command::Solve { frame_ms }) => run_solve(config, frame_ms)?,
        Some(Command::Display) | None => visualization::display(Session::new(config)?),
    }
    Ok(())
}

/// Prints one line per tile, with the formula for hat tiles.
fn run_tiles(config: &PuzzleConfig) {
    print!("{}", describe_tiles(config));
    if config.mode == TilingKind::Hat {
        println!(
            "after \"{}\" ({}) by {}, see {}",
            HAT_INFO.paper,
            HAT_INFO.year,
            HAT_INFO.discoverers.join(", "),
            HAT_INFO.source
        );
    }
}

fn describe_tiles(config: &PuzzleConfig) -> String {
    let polygons = generate(config.canvas_size, config.tiling_mode());
    let mut output = format!("{} tiles\n", polygons.len());
    for (index, polygon) in polygons.iter().enumerate() {
        let center = polygon.centroid();
        output.push_str(&format!(
            "piece-{index}: {} points, anchor ({:.1}, {:.1})\n",
            polygon.points.len(),
            center.x,
            center.y
        ));
        if let Some(meta) = &polygon.metadata {
            for line in meta.explain().lines() {
                output.push_str(&format!("    {line}\n"));
            }
        }
    }
    output
}

fn run_board(config: PuzzleConfig) -> Result<(), PuzzleError> {
    let session = Session::new(config)?;
    println!("{}", format_board(session.board().pieces(), session.columns()));
    Ok(())
}

fn run_export(config: PuzzleConfig, output: Option<PathBuf>) -> Result<(), PuzzleError> {
    let canvas_size = config.canvas_size;
    let session = Session::new(config)?;
    let snapshot = BoardSnapshot::capture(session.board(), canvas_size);

    match output {
        Some(path) => {
            persistence::save(&path, &snapshot)?;
            info!(path = %path.display(), pieces = snapshot.pieces.len(), "exported board");
        }
        None => println!("{}", persistence::to_json(&snapshot)?),
    }
    Ok(())
}

/// Drives the solve animation with a fixed frame step until it settles.
fn run_solve(config: PuzzleConfig, frame_ms: u64) -> Result<(), PuzzleError> {
    let mut session = Session::new(config)?;
    println!("{}", format_board(session.board().pieces(), session.columns()));

    if !session.solve() {
        println!("Already solved");
        return Ok(());
    }

    let frame = Duration::from_millis(frame_ms.max(1));
    let mut elapsed = Duration::ZERO;
    let mut frames = 0usize;
    let mut last_quarter = 0;
    while let Some(step) = session.board_mut().advance(elapsed) {
        let quarter = (step.progress * 4.0).floor() as usize;
        if quarter > last_quarter {
            println!(
                "t={:>5}ms progress {:.2} eased {:.2}",
                elapsed.as_millis(),
                step.progress,
                step.eased
            );
            last_quarter = quarter;
        }
        frames += 1;
        elapsed += frame;
    }

    println!(
        "Solved after {} frames: {}",
        frames,
        session.board().is_solved()
    );
    Ok(())
}
