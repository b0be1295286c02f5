//! Tiny-Go: 9x9 stone placement against an MCTS opponent.
//!
//! ## Usage
//!
//! - `tiny-go` - Watch the engine play itself
//! - `tiny-go play` - Play Black against the engine in the terminal
//! - `tiny-go gtp` - Start a GTP server for GUI integration

use std::io::{self, BufRead, Write};

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::info;

use tiny_go::board::{Point, Stone};
use tiny_go::constants::{MAX_ROLLOUT_LEN, N_SIMS};
use tiny_go::game::{AiMove, BoardObserver, Game};
use tiny_go::gtp::{GtpEngine, parse_vertex, vertex_str};
use tiny_go::logging::setup_logging;
use tiny_go::mcts::SearchConfig;
use tiny_go::tree::BackpropPolicy;

/// Tiny-Go: a 9x9 stone placement game with an MCTS opponent
#[derive(Parser)]
#[command(name = "tiny-go")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Simulations per computer move
    #[arg(long, short = 's', default_value_t = N_SIMS, global = true)]
    simulations: usize,

    /// Seed for the search RNG
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Credit rollout results from the mover's side at each ply
    #[arg(long, global = true)]
    flip_reward: bool,

    /// Log level or filter spec (overridden by RUST_LOG)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Play Black against the engine in the terminal
    Play,
    /// Start the GTP (Go Text Protocol) server for use with GUI applications
    Gtp,
    /// Let the engine play both sides until the board is full
    Demo,
}

impl Cli {
    fn search_config(&self) -> SearchConfig {
        SearchConfig {
            simulations: self.simulations,
            seed: self.seed,
            backprop: if self.flip_reward {
                BackpropPolicy::FlipPerPly
            } else {
                BackpropPolicy::Constant
            },
            ..SearchConfig::default()
        }
    }
}

/// Prints every cell change as it happens.
struct TextRenderer;

impl BoardObserver for TextRenderer {
    fn cell_changed(&mut self, point: Point, stone: Option<Stone>) {
        match stone {
            Some(stone) => println!("{stone} stone at {}", vertex_str(point)),
            None => println!("captured {}", vertex_str(point)),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _logger = setup_logging(&cli.log_level)?;
    let config = cli.search_config();

    match cli.command {
        Some(Commands::Gtp) => GtpEngine::new(config).run()?,
        Some(Commands::Play) => run_play(config)?,
        Some(Commands::Demo) | None => run_demo(config),
    }
    Ok(())
}

fn run_play(config: SearchConfig) -> Result<()> {
    let mut game = Game::new(config);
    let mut renderer = TextRenderer;
    let stdin = io::stdin();

    println!("You are Black (X). Enter a vertex like E5, or 'quit'.\n");
    println!("{}", game.board());

    loop {
        if game.is_over() || !game.has_legal_move() {
            break;
        }
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Ok(());
        }
        let line = line.trim();
        if line.eq_ignore_ascii_case("quit") {
            return Ok(());
        }
        let Some((x, y)) = parse_vertex(line) else {
            println!("not a vertex: {line}");
            continue;
        };

        match game.play_human_turn(x, y, &mut renderer) {
            Ok(AiMove::NoMove) => {
                println!("{}", game.board());
                break;
            }
            Ok(_) => println!("{}", game.board()),
            Err(err) => println!("{err}"),
        }
    }

    report_result(&game);
    Ok(())
}

fn run_demo(config: SearchConfig) {
    let mut game = Game::new(config);
    let mut renderer = TextRenderer;

    for _ in 0..MAX_ROLLOUT_LEN {
        if game.is_over() {
            break;
        }
        match game.ai_move(&mut renderer) {
            AiMove::Played(_) => {}
            AiMove::Occupied(_) | AiMove::Rejected(_) | AiMove::NoMove => break,
        }
    }

    println!("{}", game.board());
    report_result(&game);
}

fn report_result(game: &Game) {
    let board = game.board();
    let black = board.stone_count(Stone::Black);
    let white = board.stone_count(Stone::White);
    info!("final count: black {black}, white {white}");
    println!("Black {black} - White {white}: {:?}", game.winner());
}
