//! Quarry-Go command line.
//!
//! ## Usage
//!
//! - `quarry-go` / `quarry-go demo` - Play a short capture and ko sequence
//! - `quarry-go selfplay` - Random self-play game with full validation and undo
//! - `quarry-go handicap` - Show a fixed handicap setup
//!
//! Set `RUST_LOG` (e.g. `RUST_LOG=quarry_go=debug`) or pass `--verbose` for
//! engine logging on stderr.

use anyhow::{Context, Result, bail, ensure};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use quarry_go::board::{Board, PositionChanges};
use quarry_go::constants::DEFAULT_KOMI;
use quarry_go::grid::{Cell, Color, Move, Point, neighbors};
use quarry_go::rules::{RuleSet, adjust_color_to_play, check_move, is_game_over, legal_points};
use quarry_go::score::score_game;
use quarry_go::setup::{fixed_handicap_stones, get_default_setup};
use quarry_go::vertex::{move_to_vertex, parse_vertex};

/// Quarry-Go: an incremental Go rules engine
#[derive(Parser)]
#[command(name = "quarry-go")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log engine internals at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a short capture and ko sequence on a 5x5 board
    Demo,
    /// Play a random game, validating every step, then undo all of it
    Selfplay {
        #[arg(long, default_value_t = 9)]
        width: usize,
        #[arg(long, default_value_t = 9)]
        height: usize,
        /// Maximum number of moves before stopping
        #[arg(long, default_value_t = 200)]
        moves: u32,
        #[arg(long, default_value_t = 1)]
        seed: u64,
        #[arg(long, default_value_t = DEFAULT_KOMI)]
        komi: f64,
        #[arg(long, value_enum, default_value_t = RuleSet::Default)]
        rules: RuleSet,
    },
    /// Print a fixed handicap setup
    Handicap {
        #[arg(long, default_value_t = 19)]
        width: usize,
        #[arg(long, default_value_t = 19)]
        height: usize,
        #[arg(long, default_value_t = 9)]
        stones: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Some(Commands::Demo) | None => run_demo(),
        Some(Commands::Selfplay {
            width,
            height,
            moves,
            seed,
            komi,
            rules,
        }) => run_selfplay(width, height, moves, seed, komi, rules),
        Some(Commands::Handicap {
            width,
            height,
            stones,
        }) => run_handicap(width, height, stones),
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn play(board: &mut Board, color: Color, vertex: &str) -> Result<()> {
    let mv = parse_vertex(vertex, board.width(), board.height())?;
    check_move(board, RuleSet::Default, color, mv)
        .with_context(|| format!("{color} {vertex}"))?;
    board.play_move(color, mv);
    Ok(())
}

fn run_demo() -> Result<()> {
    println!("Quarry-Go: incremental Go rules engine\n");
    let mut board = Board::new(5, 5)?;

    println!("=== Capture ===");
    for (color, vertex) in [
        (Color::Black, "B3"),
        (Color::White, "C3"),
        (Color::Black, "D3"),
        (Color::White, "E1"),
        (Color::Black, "C4"),
        (Color::White, "E2"),
        (Color::Black, "C2"),
    ] {
        play(&mut board, color, vertex)?;
    }
    println!("{board}\n");

    println!("=== Ko ===");
    let mut board = Board::new(5, 5)?;
    for (color, vertex) in [
        (Color::Black, "B4"),
        (Color::Black, "A3"),
        (Color::Black, "B2"),
        (Color::Black, "C3"),
        (Color::White, "C4"),
        (Color::White, "D3"),
        (Color::White, "C2"),
        (Color::White, "B3"),
    ] {
        play(&mut board, color, vertex)?;
    }
    println!("{board}");
    let retake = parse_vertex("C3", 5, 5)?;
    match check_move(&board, RuleSet::Default, Color::Black, retake) {
        Ok(()) => bail!("immediate ko retake was accepted"),
        Err(e) => println!("Black C3: {e}\n"),
    }

    println!("=== Undo ===");
    while !board.history().is_empty() {
        board.undo();
    }
    board.validate()?;
    println!("{board}");
    Ok(())
}

/// Empty point whose on-board neighbours are all `color` stones.
fn is_own_eye(board: &Board, color: Color, pt: Point) -> bool {
    neighbors(pt)
        .into_iter()
        .all(|n| matches!(board.cell(n), Cell::Off) || board.cell(n) == Cell::from(color))
}

fn run_selfplay(
    width: usize,
    height: usize,
    moves: u32,
    seed: u64,
    komi: f64,
    rules: RuleSet,
) -> Result<()> {
    let mut board = Board::new(width, height).context("creating board")?;
    let (black, white) = get_default_setup(width, height);
    let setup = PositionChanges {
        black,
        white,
        ..PositionChanges::default()
    };
    if !setup.is_empty() {
        board.apply_changes(&setup);
    }
    let mut rng = fastrand::Rng::with_seed(seed);
    let mut color = Color::Black;

    while !is_game_over(&board) && board.move_number() < moves {
        color = adjust_color_to_play(&board, color);
        let candidates: Vec<Point> = legal_points(&board, rules, color)
            .into_iter()
            .filter(|&pt| board.cell(pt) == Cell::Empty && !is_own_eye(&board, color, pt))
            .collect();
        let mv = if candidates.is_empty() {
            Move::Pass
        } else {
            Move::Play(candidates[rng.usize(..candidates.len())])
        };

        board.play_move(color, mv);
        board
            .validate()
            .with_context(|| format!("after {color} {}", move_to_vertex(mv, height)))?;
        color = color.other();
    }
    info!(moves = board.move_number(), "game finished");

    println!("{board}");
    let score = score_game(&board, &[], komi);
    println!(
        "Black {} + {} captured, White {} + {} captured + {komi} komi: {}",
        score.territory[0], score.prisoners[0], score.territory[1], score.prisoners[1], score.result
    );

    let depth = board.history().len();
    while !board.history().is_empty() {
        board.undo();
        board.validate().context("after undo")?;
    }
    ensure!(
        board.grid().count(Cell::Empty) == width * height && board.move_number() == 0,
        "undo did not restore the empty board"
    );
    println!("Undid {depth} entries, board is empty again");
    Ok(())
}

fn run_handicap(width: usize, height: usize, stones: usize) -> Result<()> {
    let mut board = Board::new(width, height)?;
    let changes = PositionChanges {
        black: fixed_handicap_stones(width, height, stones)?,
        ..PositionChanges::default()
    };
    if changes.is_empty() {
        println!("No handicap stones");
    } else {
        board.apply_changes(&changes);
    }
    println!("{board}");
    Ok(())
}
