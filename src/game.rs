//! A human-versus-computer game session.
//!
//! [`Game`] owns the live board and is the only thing a frontend talks to.
//! Frontends learn about changes through a [`BoardObserver`], which is told
//! about every placed and every captured stone.

use log::{info, warn};

use crate::board::{Board, MoveError, Outcome, Placement, Point, Stone};
use crate::mcts::{Mcts, SearchConfig};

/// Render callback for cell changes.
pub trait BoardObserver {
    fn cell_changed(&mut self, point: Point, stone: Option<Stone>);
}

/// Observer that ignores every change.
impl BoardObserver for () {
    fn cell_changed(&mut self, _point: Point, _stone: Option<Stone>) {}
}

/// What happened when the computer was asked to move.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AiMove {
    Played(Point),
    /// The search proposed a point that is not empty; nothing was played.
    Occupied(Point),
    /// The search proposed a point the rules refused for another reason.
    Rejected(Point),
    /// The search found no move.
    NoMove,
}

/// Turn the outcome of playing the searched point into an [`AiMove`],
/// logging what happened.
fn report_ai_placement(point: Point, result: Result<Placement, MoveError>) -> AiMove {
    match result {
        Ok(_) => AiMove::Played(point),
        Err(MoveError::Occupied(x, y)) => {
            info!("position already occupied: ({x},{y})");
            AiMove::Occupied(point)
        }
        Err(err) => {
            warn!("{err}");
            AiMove::Rejected(point)
        }
    }
}

pub struct Game {
    board: Board,
    human: Stone,
    config: SearchConfig,
}

impl Game {
    /// A new game on an empty board. The human plays Black.
    pub fn new(config: SearchConfig) -> Self {
        Self::with_board(Board::new(), Stone::Black, config)
    }

    pub fn with_board(board: Board, human: Stone, config: SearchConfig) -> Self {
        Self {
            board,
            human,
            config,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn human(&self) -> Stone {
        self.human
    }

    pub fn computer(&self) -> Stone {
        self.human.opponent()
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Start over on an empty board.
    pub fn reset(&mut self) {
        self.board = Board::new();
    }

    pub fn is_over(&self) -> bool {
        self.board.is_game_over()
    }

    pub fn winner(&self) -> Outcome {
        self.board.calculate_winner()
    }

    /// True while the side to move still has somewhere to play.
    pub fn has_legal_move(&self) -> bool {
        !self.board.legal_moves().is_empty()
    }

    fn apply(
        &mut self,
        x: usize,
        y: usize,
        observer: &mut impl BoardObserver,
    ) -> Result<Placement, MoveError> {
        if self.is_over() {
            return Err(MoveError::GameOver);
        }
        let placement = self.board.play(x, y)?;
        observer.cell_changed(placement.point, Some(placement.stone));
        for &point in &placement.captured {
            observer.cell_changed(point, None);
        }
        Ok(placement)
    }

    /// Play for whoever is to move, without checking sides.
    pub fn play(
        &mut self,
        x: usize,
        y: usize,
        observer: &mut impl BoardObserver,
    ) -> Result<Placement, MoveError> {
        self.apply(x, y, observer)
    }

    /// Play the human's stone at `(x, y)`.
    pub fn human_move(
        &mut self,
        x: usize,
        y: usize,
        observer: &mut impl BoardObserver,
    ) -> Result<Placement, MoveError> {
        if self.board.current_player() != self.human {
            return Err(MoveError::NotYourTurn);
        }
        self.apply(x, y, observer)
    }

    /// Search for and play a move for the side to move.
    ///
    /// A proposed point the rules refuse is reported and skipped; the search
    /// is never retried.
    pub fn ai_move(&mut self, observer: &mut impl BoardObserver) -> AiMove {
        let mut mcts = Mcts::new(&self.board, self.config.clone());
        let Some((x, y)) = mcts.search() else {
            info!("no best move found, game over");
            return AiMove::NoMove;
        };
        info!("best move chosen: ({x},{y})");

        let result = self.apply(x, y, observer);
        report_ai_placement((x, y), result)
    }

    /// Human move followed by the computer's reply.
    pub fn play_human_turn(
        &mut self,
        x: usize,
        y: usize,
        observer: &mut impl BoardObserver,
    ) -> Result<AiMove, MoveError> {
        self.human_move(x, y, observer)?;
        Ok(self.ai_move(observer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[derive(Default)]
    struct Recorder {
        changes: Vec<(Point, Option<Stone>)>,
    }

    impl BoardObserver for Recorder {
        fn cell_changed(&mut self, point: Point, stone: Option<Stone>) {
            self.changes.push((point, stone));
        }
    }

    fn config() -> SearchConfig {
        SearchConfig {
            seed: Some(17),
            ..SearchConfig::default()
        }
    }

    #[test]
    fn test_human_move_notifies_observer() {
        let mut game = Game::new(config());
        let mut rec = Recorder::default();
        game.human_move(4, 4, &mut rec).unwrap();
        assert_eq!(rec.changes, vec![((4, 4), Some(Stone::Black))]);
        assert_eq!(game.board().current_player(), Stone::White);
    }

    #[test]
    fn test_human_cannot_move_twice() {
        let mut game = Game::new(config());
        game.human_move(4, 4, &mut ()).unwrap();
        assert_eq!(game.human_move(3, 3, &mut ()), Err(MoveError::NotYourTurn));
    }

    #[test]
    fn test_occupied_human_move_changes_nothing() {
        let mut game = Game::new(config());
        game.human_move(4, 4, &mut ()).unwrap();
        game.ai_move(&mut ());
        let before = game.board().clone();
        let mut rec = Recorder::default();
        assert_matches!(game.human_move(4, 4, &mut rec), Err(MoveError::Occupied(4, 4)));
        assert!(rec.changes.is_empty());
        assert_eq!(game.board(), &before);
    }

    #[test]
    fn test_capture_notifies_removed_stones() {
        let mut board = Board::new();
        board.set_stone(4, 4, Some(Stone::White));
        board.set_stone(3, 4, Some(Stone::Black));
        board.set_stone(5, 4, Some(Stone::Black));
        board.set_stone(4, 3, Some(Stone::Black));
        let mut game = Game::with_board(board, Stone::Black, config());
        let mut rec = Recorder::default();
        game.human_move(4, 5, &mut rec).unwrap();
        assert_eq!(
            rec.changes,
            vec![((4, 5), Some(Stone::Black)), ((4, 4), None)]
        );
    }

    #[test]
    fn test_ai_reply_after_human_move() {
        let mut game = Game::new(config());
        let mut rec = Recorder::default();
        let reply = game.play_human_turn(4, 4, &mut rec).unwrap();
        match reply {
            AiMove::Played((x, y)) => {
                assert_ne!((x, y), (4, 4));
                assert_eq!(game.board().get(x, y), Some(Stone::White));
                assert_eq!(rec.changes.len(), 2);
            }
            other => panic!("expected a played move, got {other:?}"),
        }
        assert_eq!(game.board().current_player(), Stone::Black);
    }

    #[test]
    fn test_ai_placement_outcomes() {
        assert_eq!(
            report_ai_placement((2, 2), Err(MoveError::Occupied(2, 2))),
            AiMove::Occupied((2, 2))
        );
        assert_eq!(
            report_ai_placement((1, 1), Err(MoveError::Ko(1, 1))),
            AiMove::Rejected((1, 1))
        );
        assert_eq!(
            report_ai_placement((0, 0), Err(MoveError::GameOver)),
            AiMove::Rejected((0, 0))
        );
        let placement = Placement {
            point: (3, 3),
            stone: Stone::White,
            captured: Vec::new(),
        };
        assert_eq!(report_ai_placement((3, 3), Ok(placement)), AiMove::Played((3, 3)));
    }

    #[test]
    fn test_only_ko_point_left_means_no_legal_move() {
        let mut board = Board::new();
        for (x, y) in [(0, 1), (1, 0), (2, 1)] {
            board.set_stone(x, y, Some(Stone::Black));
        }
        for (x, y) in [(0, 2), (1, 1), (1, 3), (2, 2)] {
            board.set_stone(x, y, Some(Stone::White));
        }
        board.play(1, 2).unwrap();
        for (x, y) in board.get_empty_positions() {
            if (x, y) != (1, 1) {
                board.set_stone(x, y, Some(Stone::Black));
            }
        }

        let mut game = Game::with_board(board, Stone::White, config());
        assert!(!game.is_over());
        assert!(!game.has_legal_move());
        assert_eq!(game.human_move(1, 1, &mut ()), Err(MoveError::Ko(1, 1)));
        assert_eq!(game.ai_move(&mut ()), AiMove::NoMove);
    }

    #[test]
    fn test_ai_on_full_board() {
        let mut board = Board::new();
        for x in 0..crate::constants::N {
            for y in 0..crate::constants::N {
                board.set_stone(x, y, Some(Stone::Black));
            }
        }
        let mut game = Game::with_board(board, Stone::Black, config());
        assert!(game.is_over());
        assert_eq!(game.ai_move(&mut ()), AiMove::NoMove);
        assert_eq!(game.human_move(0, 0, &mut ()), Err(MoveError::GameOver));
    }
}
