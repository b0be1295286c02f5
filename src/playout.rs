//! Random play-outs used to evaluate search leaves.
//!
//! A play-out keeps placing stones on uniformly chosen legal points, with the
//! turn alternating after each one, until the board is full. The result is
//! read off with [`Board::calculate_winner`].

use crate::board::Board;
use crate::constants::MAX_ROLLOUT_LEN;

/// Random play-out until the board is full or no legal move remains.
///
/// Stops after [`MAX_ROLLOUT_LEN`] placements regardless. Returns the number
/// of stones placed.
pub fn rollout(board: &mut Board, rng: &mut fastrand::Rng) -> usize {
    let mut placed = 0;
    while !board.is_game_over() && placed < MAX_ROLLOUT_LEN {
        let moves = board.legal_moves();
        if moves.is_empty() {
            break;
        }
        let (x, y) = moves[rng.usize(..moves.len())];
        if board.play(x, y).is_err() {
            break;
        }
        placed += 1;
    }
    placed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Stone;
    use crate::constants::N;

    #[test]
    fn test_rollout_fills_board() {
        for seed in 0..64 {
            let mut board = Board::new();
            let mut rng = fastrand::Rng::with_seed(seed);
            let placed = rollout(&mut board, &mut rng);
            assert!(placed >= N * N, "seed {seed}: only {placed} stones placed");
            assert!(placed < MAX_ROLLOUT_LEN, "seed {seed}: hit the rollout cap");
            assert!(board.is_game_over(), "seed {seed}: board not full");
        }
    }

    #[test]
    fn test_rollout_on_full_board_is_noop() {
        let mut board = Board::new();
        for x in 0..N {
            for y in 0..N {
                board.set_stone(x, y, Some(Stone::Black));
            }
        }
        let before = board.clone();
        let mut rng = fastrand::Rng::with_seed(1);
        assert_eq!(rollout(&mut board, &mut rng), 0);
        assert_eq!(board, before);
    }
}
