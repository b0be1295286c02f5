//! Tiny-Go: a 9x9 stone-placement game with a Monte Carlo Tree Search opponent.
//!
//! The rules are a simplified take on Go: stones are captured when their
//! group runs out of liberties, a single ko point is remembered, the game ends
//! when the board is full, and the side with more stones on the board wins.
//!
//! ## Modules
//!
//! - [`constants`] - Board dimensions and search defaults
//! - [`board`] - Board state, captures, ko, scoring
//! - [`tree`] - Arena-backed search tree with UCB1 selection
//! - [`mcts`] - Monte Carlo Tree Search driver
//! - [`playout`] - Random play-outs for leaf evaluation
//! - [`game`] - Human-versus-computer session and render callbacks
//! - [`gtp`] - Go Text Protocol frontend
//! - [`logging`] - Logger setup for the binary
//!
//! ## Example
//!
//! ```
//! use tiny_go::board::Board;
//! use tiny_go::mcts::{SearchConfig, tree_search};
//!
//! let mut board = Board::new();
//! board.play(4, 4).unwrap();
//!
//! let best = tree_search(&board, SearchConfig::with_simulations(50));
//! if let Some((x, y)) = best {
//!     assert!(board.get(x, y).is_none());
//! }
//! ```

pub mod board;
pub mod constants;
pub mod game;
pub mod gtp;
pub mod logging;
pub mod mcts;
pub mod playout;
pub mod tree;
