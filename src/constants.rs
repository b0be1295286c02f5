//! Constants for board dimensions and search parameters.
//!
//! The board is a plain 9x9 grid addressed by `(x, y)` pairs, where `x` is the
//! row and `y` the column. Search defaults below are what the engine uses when
//! no command-line override is given.

// =============================================================================
// Board Geometry
// =============================================================================

/// Board size (NxN).
pub const N: usize = 9;

/// Number of points on the board.
pub const BOARD_AREA: usize = N * N;

/// Upper bound on placements in a single rollout.
///
/// Captures re-open cells, so random play-outs routinely run to several
/// times the board area before it fills. This is only a backstop against a
/// runaway loop; real play-outs end on a full board well before it.
pub const MAX_ROLLOUT_LEN: usize = BOARD_AREA * 50;

/// Orthogonal neighbor offsets as (dx, dy). Order: South, North, East, West.
pub const DELTA: [(isize, isize); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

// =============================================================================
// MCTS Parameters
// =============================================================================

/// Default number of simulations per AI move.
pub const N_SIMS: usize = 5;

/// Probability of stopping the selection walk at the current node.
pub const EARLY_STOP_PROB: f64 = 0.1;

/// Constant inside the UCB1 exploration square root.
pub const EXPLORATION: f64 = 2.0;

/// Exploration bonus given to a child that has never been visited.
pub const UNVISITED_BONUS: f64 = 1.0;
