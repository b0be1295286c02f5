//! Arena-backed search tree.
//!
//! Nodes live in a single `Vec` and refer to each other through [`NodeId`]
//! handles. Children are owned by the arena; the parent link is a plain
//! handle used to walk statistics back to the root without recursion.

use crate::board::{Board, Point, Stone};
use crate::constants::UNVISITED_BONUS;

/// Handle to a node inside a [`Tree`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// How a rollout reward is credited to the nodes on the path.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum BackpropPolicy {
    /// Add the same reward (Black-positive) at every level.
    #[default]
    Constant,
    /// Credit each node from the side of the player whose move produced it,
    /// so the sign alternates ply by ply.
    FlipPerPly,
}

/// A node in the search tree.
#[derive(Debug, Clone)]
pub struct Node {
    /// Game state after the moves on the path from the root
    pub board: Board,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Number of simulations that passed through this node
    pub visits: u32,
    /// Accumulated reward
    pub wins: f64,
}

impl Node {
    fn new(board: Board, parent: Option<NodeId>) -> Self {
        Self {
            board,
            parent,
            children: Vec::new(),
            visits: 0,
            wins: 0.0,
        }
    }

    /// Average reward, or 0 when never visited.
    pub fn winrate(&self) -> f64 {
        if self.visits > 0 {
            self.wins / self.visits as f64
        } else {
            0.0
        }
    }
}

/// UCB1-style score of `child` under a parent visited `parent_visits` times.
///
/// Unvisited children get a flat exploration bonus instead of the log term.
pub fn ucb_score(child: &Node, parent_visits: u32, exploration: f64) -> f64 {
    let denom = child.visits as f64 + 1.0;
    let exploit = child.wins / denom;
    let explore = if child.visits > 0 {
        (exploration * (parent_visits as f64).ln() / denom).sqrt()
    } else {
        UNVISITED_BONUS
    };
    exploit + explore
}

#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    /// A one-node tree whose root holds a copy of `board`.
    pub fn new(board: &Board) -> Self {
        Self {
            nodes: vec![Node::new(board.copy(), None)],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The move that led from the parent to `id`.
    pub fn move_of(&self, id: NodeId) -> Option<Point> {
        self.node(id).board.get_last_move()
    }

    /// Add one child per legal move of `id`'s board.
    ///
    /// Does nothing if the node already has children.
    pub fn expand(&mut self, id: NodeId) {
        if !self.nodes[id.0].children.is_empty() {
            return;
        }

        let parent_board = &self.nodes[id.0].board;
        let child_boards: Vec<Board> = parent_board
            .legal_moves()
            .into_iter()
            .filter_map(|(x, y)| {
                let mut child = parent_board.copy();
                child.play(x, y).ok().map(|_| child)
            })
            .collect();

        let mut children = Vec::with_capacity(child_boards.len());
        for board in child_boards {
            children.push(NodeId(self.nodes.len()));
            self.nodes.push(Node::new(board, Some(id)));
        }
        self.nodes[id.0].children = children;
    }

    /// Pick the child to descend into.
    ///
    /// An unvisited node picks uniformly at random; otherwise the child with
    /// the highest [`ucb_score`] wins, first one on ties. `None` if the node
    /// has no children.
    pub fn select_child(
        &self,
        id: NodeId,
        rng: &mut fastrand::Rng,
        exploration: f64,
    ) -> Option<NodeId> {
        let node = self.node(id);
        if node.children.is_empty() {
            return None;
        }
        if node.visits == 0 {
            return Some(node.children[rng.usize(..node.children.len())]);
        }

        let mut best = node.children[0];
        let mut best_score = f64::NEG_INFINITY;
        for &child in &node.children {
            let score = ucb_score(self.node(child), node.visits, exploration);
            if score > best_score {
                best = child;
                best_score = score;
            }
        }
        Some(best)
    }

    /// Record one simulation result on `id` and every ancestor.
    pub fn backpropagate(&mut self, id: NodeId, reward: f64, policy: BackpropPolicy) {
        let mut current = Some(id);
        while let Some(NodeId(i)) = current {
            let node = &mut self.nodes[i];
            let credit = match policy {
                BackpropPolicy::Constant => reward,
                BackpropPolicy::FlipPerPly => {
                    // The player to move did not make the move into this node.
                    match node.board.current_player().opponent() {
                        Stone::Black => reward,
                        Stone::White => -reward,
                    }
                }
            };
            node.visits += 1;
            node.wins += credit;
            current = node.parent;
        }
    }
}
