//! Monte Carlo Tree Search over the arena tree.
//!
//! Each simulation:
//! - walks down from the root with UCB1 selection, stopping early at random
//! - expands a leaf and steps into one of its new children
//! - plays random moves from there until the board is full
//! - credits the stone-count result to the selected node and its ancestors
//!
//! Every search builds a fresh tree rooted at a copy of the caller's board;
//! nothing is kept between searches.

use log::{debug, trace};

use crate::board::{Board, Point};
use crate::constants::{EARLY_STOP_PROB, EXPLORATION, N_SIMS};
use crate::playout::rollout;
use crate::tree::{BackpropPolicy, NodeId, Tree};

/// Tunables for a single search.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchConfig {
    /// Number of select/simulate/backpropagate rounds
    pub simulations: usize,
    /// Chance of stopping the selection walk at each step
    pub early_stop_prob: f64,
    /// Constant inside the UCB1 square root
    pub exploration: f64,
    pub backprop: BackpropPolicy,
    /// Fixed RNG seed; `None` seeds from the environment
    pub seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            simulations: N_SIMS,
            early_stop_prob: EARLY_STOP_PROB,
            exploration: EXPLORATION,
            backprop: BackpropPolicy::default(),
            seed: None,
        }
    }
}

impl SearchConfig {
    pub fn with_simulations(simulations: usize) -> Self {
        Self {
            simulations,
            ..Self::default()
        }
    }
}

/// Per-move statistics of a root child.
#[derive(Clone, Debug, PartialEq)]
pub struct MoveStats {
    pub point: Point,
    pub visits: u32,
    pub wins: f64,
}

pub struct Mcts {
    tree: Tree,
    rng: fastrand::Rng,
    config: SearchConfig,
}

impl Mcts {
    pub fn new(board: &Board, config: SearchConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        Self {
            tree: Tree::new(board),
            rng,
            config,
        }
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Run the configured number of simulations and return the most visited
    /// root move, or `None` if the root has no visited child.
    pub fn search(&mut self) -> Option<Point> {
        for i in 0..self.config.simulations {
            let node = self.select_node();
            let reward = self.simulate(node);
            trace!("simulation {i}: node {node:?} reward {reward}");
            self.tree.backpropagate(node, reward, self.config.backprop);
        }

        dump_children(&self.root_children());
        self.best_move()
    }

    /// Walk from the root to the node that will be simulated.
    fn select_node(&mut self) -> NodeId {
        let mut node = self.tree.root();
        while !self.tree.node(node).children.is_empty() {
            if self.rng.f64() < self.config.early_stop_prob {
                return node;
            }
            match self.tree.select_child(node, &mut self.rng, self.config.exploration) {
                Some(child) => node = child,
                None => return node,
            }
        }

        self.tree.expand(node);
        // A full board expands to nothing; simulate the leaf itself.
        self.tree
            .select_child(node, &mut self.rng, self.config.exploration)
            .unwrap_or(node)
    }

    /// Play random legal moves on a copy of the node's board until it is
    /// full, and score it.
    fn simulate(&mut self, node: NodeId) -> f64 {
        let mut board = self.tree.node(node).board.copy();
        rollout(&mut board, &mut self.rng);
        board.calculate_winner().reward()
    }

    /// Most visited root child among those visited at least once.
    fn best_move(&self) -> Option<Point> {
        let root = self.tree.node(self.tree.root());
        let mut best: Option<(NodeId, u32)> = None;
        for &child in &root.children {
            let visits = self.tree.node(child).visits;
            if visits == 0 {
                continue;
            }
            if best.is_none_or(|(_, v)| visits > v) {
                best = Some((child, visits));
            }
        }
        best.and_then(|(child, _)| self.tree.move_of(child))
    }

    /// Statistics for every root child, in expansion order.
    pub fn root_children(&self) -> Vec<MoveStats> {
        let root = self.tree.node(self.tree.root());
        root.children
            .iter()
            .filter_map(|&id| {
                let node = self.tree.node(id);
                Some(MoveStats {
                    point: node.board.get_last_move()?,
                    visits: node.visits,
                    wins: node.wins,
                })
            })
            .collect()
    }
}

/// Run a fresh search from `board` with the given configuration.
pub fn tree_search(board: &Board, config: SearchConfig) -> Option<Point> {
    Mcts::new(board, config).search()
}

/// Log the visited root children at debug level.
pub fn dump_children(children: &[MoveStats]) {
    for stats in children.iter().filter(|s| s.visits > 0) {
        debug!(
            "move ({},{}) visits={} wins={:.1}",
            stats.point.0, stats.point.1, stats.visits, stats.wins
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Stone;
    use crate::constants::N;

    fn seeded(simulations: usize, seed: u64) -> SearchConfig {
        SearchConfig {
            simulations,
            seed: Some(seed),
            ..SearchConfig::default()
        }
    }

    #[test]
    fn test_default_config() {
        let config = SearchConfig::default();
        assert_eq!(config.simulations, N_SIMS);
        assert_eq!(config.early_stop_prob, EARLY_STOP_PROB);
        assert_eq!(config.backprop, BackpropPolicy::Constant);
    }

    #[test]
    fn test_search_returns_empty_point() {
        let mut board = Board::new();
        board.play(4, 4).unwrap();
        for seed in 0..10 {
            if let Some((x, y)) = tree_search(&board, seeded(20, seed)) {
                assert_eq!(board.get(x, y), None);
            }
        }
    }

    #[test]
    fn test_search_full_board_finds_nothing() {
        let mut board = Board::new();
        for x in 0..N {
            for y in 0..N {
                board.set_stone(x, y, Some(Stone::White));
            }
        }
        assert_eq!(tree_search(&board, seeded(5, 1)), None);
    }

    #[test]
    fn test_search_single_empty_point() {
        let mut board = Board::new();
        for x in 0..N {
            for y in 0..N {
                board.set_stone(x, y, Some(Stone::Black));
            }
        }
        board.set_stone(2, 3, None);
        board.set_current_player(Stone::White);
        // With no early stop the first simulation always expands the root.
        let config = SearchConfig {
            early_stop_prob: 0.0,
            ..seeded(3, 9)
        };
        assert_eq!(tree_search(&board, config), Some((2, 3)));
    }

    #[test]
    fn test_search_does_not_touch_board() {
        let mut board = Board::new();
        board.play(4, 4).unwrap();
        let before = board.clone();
        let _ = tree_search(&board, seeded(30, 5));
        assert_eq!(board, before);
    }

    #[test]
    fn test_search_visit_counts() {
        let board = Board::new();
        let mut mcts = Mcts::new(&board, seeded(50, 11));
        mcts.search();
        let root = mcts.tree().node(mcts.tree().root());
        assert_eq!(root.visits, 50);
        let child_visits: u32 = mcts.root_children().iter().map(|s| s.visits).sum();
        assert!(child_visits <= 50);
    }

    #[test]
    fn test_always_stop_early_stays_at_root() {
        let board = Board::new();
        let config = SearchConfig {
            early_stop_prob: 1.0,
            ..seeded(20, 6)
        };
        let mut mcts = Mcts::new(&board, config);
        let best = mcts.search();

        // Only the first simulation gets past the root, by expanding it.
        let tree = mcts.tree();
        assert_eq!(tree.len(), 1 + N * N);
        assert_eq!(tree.node(tree.root()).visits, 20);
        let stats = mcts.root_children();
        let visited: Vec<&MoveStats> = stats.iter().filter(|s| s.visits > 0).collect();
        assert_eq!(visited.len(), 1);
        assert_eq!(visited[0].visits, 1);
        assert_eq!(best, Some(visited[0].point));
    }

    #[test]
    fn test_same_seed_same_move() {
        let mut board = Board::new();
        board.play(3, 3).unwrap();
        let a = tree_search(&board, seeded(40, 123));
        let b = tree_search(&board, seeded(40, 123));
        assert_eq!(a, b);
    }
}
