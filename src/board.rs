//! Board state and the simplified capture rules.
//!
//! The board is a 9x9 grid of optional stones. Placing a stone resolves
//! captures of adjacent opposing groups and updates the single remembered ko
//! point. Turn order lives on the board too, but only [`Board::advance_turn`]
//! changes it; [`Board::play`] is the one place that calls it after a
//! completed placement.

use std::fmt;

use thiserror::Error;

use crate::constants::{BOARD_AREA, DELTA, N};

/// A point on the board as `(x, y)`: row, then column.
pub type Point = (usize, usize);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Stone {
    Black,
    White,
}

impl Stone {
    pub fn opponent(self) -> Self {
        match self {
            Stone::Black => Stone::White,
            Stone::White => Stone::Black,
        }
    }
}

impl fmt::Display for Stone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stone::Black => write!(f, "black"),
            Stone::White => write!(f, "white"),
        }
    }
}

/// Why a placement was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("position out of bounds: ({0},{1})")]
    OutOfBounds(usize, usize),
    #[error("position already occupied: ({0},{1})")]
    Occupied(usize, usize),
    #[error("position retakes ko: ({0},{1})")]
    Ko(usize, usize),
    #[error("game is over")]
    GameOver,
    #[error("not your turn")]
    NotYourTurn,
}

/// Result of comparing raw stone counts on the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    BlackWins,
    WhiteWins,
    Draw,
}

impl Outcome {
    /// Scalar reward used by the search: +1 Black, -1 White, 0 tie.
    pub fn reward(self) -> f64 {
        match self {
            Outcome::BlackWins => 1.0,
            Outcome::WhiteWins => -1.0,
            Outcome::Draw => 0.0,
        }
    }
}

/// What a successful placement changed on the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub point: Point,
    pub stone: Stone,
    pub captured: Vec<Point>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    cells: [Option<Stone>; BOARD_AREA],
    current_player: Stone,
    ko: Option<Point>,
    last_move: Option<Point>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// An empty board with Black to play.
    pub fn new() -> Self {
        Self {
            cells: [None; BOARD_AREA],
            current_player: Stone::Black,
            ko: None,
            last_move: None,
        }
    }

    #[inline]
    fn idx(x: usize, y: usize) -> usize {
        x * N + y
    }

    #[inline]
    fn in_bounds(x: usize, y: usize) -> bool {
        x < N && y < N
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Stone> {
        if !Self::in_bounds(x, y) {
            return None;
        }
        self.cells[Self::idx(x, y)]
    }

    /// Put a stone (or nothing) directly on a cell, bypassing the rules.
    ///
    /// Meant for setting up positions; captures and ko are not evaluated.
    pub fn set_stone(&mut self, x: usize, y: usize, stone: Option<Stone>) {
        assert!(Self::in_bounds(x, y), "({x},{y}) is off the board");
        self.cells[Self::idx(x, y)] = stone;
        if stone.is_some() && self.ko == Some((x, y)) {
            self.ko = None;
        }
    }

    pub fn current_player(&self) -> Stone {
        self.current_player
    }

    pub fn set_current_player(&mut self, stone: Stone) {
        self.current_player = stone;
    }

    pub fn ko_position(&self) -> Option<Point> {
        self.ko
    }

    /// The move that produced this board state, if any.
    pub fn get_last_move(&self) -> Option<Point> {
        self.last_move
    }

    /// Independent deep copy of the grid and turn state.
    pub fn copy(&self) -> Self {
        self.clone()
    }

    fn neighbors(x: usize, y: usize) -> impl Iterator<Item = Point> {
        DELTA.into_iter().filter_map(move |(dx, dy)| {
            let nx = x.checked_add_signed(dx)?;
            let ny = y.checked_add_signed(dy)?;
            Self::in_bounds(nx, ny).then_some((nx, ny))
        })
    }

    /// All empty cells in row-major order.
    pub fn get_empty_positions(&self) -> Vec<Point> {
        (0..BOARD_AREA)
            .filter(|&i| self.cells[i].is_none())
            .map(|i| (i / N, i % N))
            .collect()
    }

    /// Empty cells the current player may actually play, row-major.
    ///
    /// Same as [`Board::get_empty_positions`] minus the ko point.
    pub fn legal_moves(&self) -> Vec<Point> {
        let mut moves = self.get_empty_positions();
        if let Some(ko) = self.ko {
            moves.retain(|&p| p != ko);
        }
        moves
    }

    pub fn stone_count(&self, stone: Stone) -> usize {
        self.cells.iter().filter(|&&c| c == Some(stone)).count()
    }

    /// True once no empty cell remains.
    pub fn is_game_over(&self) -> bool {
        self.cells.iter().all(|c| c.is_some())
    }

    /// Compare raw stone counts. Not territory scoring.
    pub fn calculate_winner(&self) -> Outcome {
        let black = self.stone_count(Stone::Black);
        let white = self.stone_count(Stone::White);
        match black.cmp(&white) {
            std::cmp::Ordering::Greater => Outcome::BlackWins,
            std::cmp::Ordering::Less => Outcome::WhiteWins,
            std::cmp::Ordering::Equal => Outcome::Draw,
        }
    }

    /// Hand the move to the other player.
    pub fn advance_turn(&mut self) {
        self.current_player = self.current_player.opponent();
    }

    /// Place a stone for the current player and then advance the turn.
    pub fn play(&mut self, x: usize, y: usize) -> Result<Placement, MoveError> {
        let placement = self.place_stone(x, y)?;
        self.advance_turn();
        Ok(placement)
    }

    /// Place a stone of the current player's color at `(x, y)`.
    ///
    /// Removes every adjacent opposing group left without liberties and
    /// updates the ko point. The turn is not advanced.
    pub fn place_stone(&mut self, x: usize, y: usize) -> Result<Placement, MoveError> {
        if !Self::in_bounds(x, y) {
            return Err(MoveError::OutOfBounds(x, y));
        }
        if self.get(x, y).is_some() {
            return Err(MoveError::Occupied(x, y));
        }
        if self.ko == Some((x, y)) {
            return Err(MoveError::Ko(x, y));
        }

        let color = self.current_player;
        let opp = color.opponent();
        let in_enemy_eye = self.surrounded_by(x, y, opp);

        self.cells[Self::idx(x, y)] = Some(color);
        self.last_move = Some((x, y));

        // Groups are found against the board as it is right after placement;
        // nothing is removed until every neighbor has been examined.
        let mut marked = [false; BOARD_AREA];
        let mut captured: Vec<Point> = Vec::new();
        for (nx, ny) in Self::neighbors(x, y) {
            if self.get(nx, ny) != Some(opp) || marked[Self::idx(nx, ny)] {
                continue;
            }
            if let Some((group, liberties)) = self.group_and_liberties(nx, ny) {
                if liberties == 0 {
                    for &(gx, gy) in &group {
                        marked[Self::idx(gx, gy)] = true;
                    }
                    captured.extend(group);
                }
            }
        }
        for &(cx, cy) in &captured {
            self.cells[Self::idx(cx, cy)] = None;
        }

        self.ko = if captured.len() == 1 && in_enemy_eye {
            Some(captured[0])
        } else {
            None
        };

        Ok(Placement {
            point: (x, y),
            stone: color,
            captured,
        })
    }

    /// True if every on-board orthogonal neighbor holds a `stone`.
    fn surrounded_by(&self, x: usize, y: usize, stone: Stone) -> bool {
        Self::neighbors(x, y).all(|(nx, ny)| self.get(nx, ny) == Some(stone))
    }

    /// Find the group containing `(x, y)` and count its liberties.
    ///
    /// Liberties are counted once per stone-to-empty edge, so an empty cell
    /// touching two stones of the group counts twice. Returns `None` on an
    /// empty cell.
    pub fn group_and_liberties(&self, x: usize, y: usize) -> Option<(Vec<Point>, usize)> {
        let color = self.get(x, y)?;
        let mut stack = vec![(x, y)];
        let mut visited = [false; BOARD_AREA];
        let mut group = Vec::new();

        while let Some((cx, cy)) = stack.pop() {
            let i = Self::idx(cx, cy);
            if visited[i] {
                continue;
            }
            visited[i] = true;
            group.push((cx, cy));
            for (nx, ny) in Self::neighbors(cx, cy) {
                if !visited[Self::idx(nx, ny)] && self.get(nx, ny) == Some(color) {
                    stack.push((nx, ny));
                }
            }
        }

        let liberties = group
            .iter()
            .map(|&(gx, gy)| {
                Self::neighbors(gx, gy)
                    .filter(|&(nx, ny)| self.get(nx, ny).is_none())
                    .count()
            })
            .sum();
        Some((group, liberties))
    }
}

/// Column letters, skipping 'I' as Go boards do.
pub const COLUMNS: &[u8] = b"ABCDEFGHJ";

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  ")?;
        for &c in &COLUMNS[..N] {
            write!(f, " {}", c as char)?;
        }
        writeln!(f)?;
        for x in 0..N {
            write!(f, "{:>2}", N - x)?;
            for y in 0..N {
                let ch = match self.get(x, y) {
                    Some(Stone::Black) => 'X',
                    Some(Stone::White) => 'O',
                    None => '.',
                };
                write!(f, " {ch}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
