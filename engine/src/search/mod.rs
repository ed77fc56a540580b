//! Depth limited minimax over a pluggable evaluator.
//!
//! Ratings are always from white's point of view. At each node the side to move
//! maximizes its own view of the rating (white the raw value, black the negation)
//! and every move reaching that maximum exactly is kept, so callers can break ties.

use crate::board::{Board, Move, Side};
use crate::evaluation::EvaluatePosition;
use crate::move_gen::KingSafety;

mod cooperative;

pub use self::cooperative::{
    best_moves_async, find_ai_move, pick_move_async, rate_at_depth_async, AsyncDepthRater,
};

/// Moves tied for the best rating at a node, in generation order.
#[derive(Clone, Debug, PartialEq)]
pub struct BestMoves {
    pub moves: Vec<Move>,
    /// Rating of the node from white's point of view.
    pub rating: f64,
}

impl BestMoves {
    /// Chooses `moves[floor(rand * len)]`, `rand` is expected in `[0, 1)`.
    pub fn pick(&self, rand: f64) -> Option<Move> {
        let len = self.moves.len();
        if len == 0 {
            return None;
        }
        let idx = ((rand * len as f64).floor() as usize).min(len - 1);
        self.moves.get(idx).copied()
    }

    fn collect(board: &Board, rated: impl IntoIterator<Item = (Move, f64)>, draw_score: f64) -> Self {
        let multiplier = side_multiplier(board.to_move());
        let mut moves = Vec::new();
        let mut best = f64::NEG_INFINITY;

        for (mve, rating) in rated {
            let relative = multiplier * rating;
            if relative > best {
                best = relative;
                moves.clear();
                moves.push(mve);
            } else if relative == best {
                moves.push(mve);
            }
        }

        if moves.is_empty() {
            return BestMoves {
                moves,
                rating: terminal_rating(board, draw_score),
            };
        }

        BestMoves {
            moves,
            rating: multiplier * best,
        }
    }
}

pub(crate) fn side_multiplier(side: Side) -> f64 {
    match side {
        Side::White => 1.0,
        Side::Black => -1.0,
    }
}

/// Rating of a board whose side to move has no legal move.
fn terminal_rating(board: &Board, draw_score: f64) -> f64 {
    match board.king_safety(board.to_move()) {
        KingSafety::Safe => draw_score,
        KingSafety::InCheck | KingSafety::NoKing => {
            side_multiplier(board.to_move()) * f64::NEG_INFINITY
        }
    }
}

/// An evaluator looking `depth` plies ahead before scoring with the wrapped one.
#[derive(Clone, Copy, Debug)]
pub struct DepthRater<E> {
    evaluator: E,
    depth: u8,
}

pub fn rate_at_depth<E: EvaluatePosition>(evaluator: E, depth: u8) -> DepthRater<E> {
    DepthRater { evaluator, depth }
}

impl<E: EvaluatePosition> EvaluatePosition for DepthRater<E> {
    fn evaluate(&self, board: &Board) -> f64 {
        rate_recursive(board, &self.evaluator, self.depth)
    }

    fn draw_score(&self) -> f64 {
        self.evaluator.draw_score()
    }
}

fn rate_recursive<E: EvaluatePosition + ?Sized>(board: &Board, evaluator: &E, depth: u8) -> f64 {
    if depth == 0 {
        return evaluator.evaluate(board);
    }
    best_moves_by(
        board,
        |child| rate_recursive(child, evaluator, depth - 1),
        evaluator.draw_score(),
    )
    .rating
}

fn best_moves_by(board: &Board, rate: impl Fn(&Board) -> f64, draw_score: f64) -> BestMoves {
    let rated = board
        .legal_moves()
        .map(|mve| (mve, rate(&board.apply_move(mve))));
    BestMoves::collect(board, rated, draw_score)
}

/// One ply of search: every legal move rated by `evaluator`, keeping the best.
pub fn best_moves<E: EvaluatePosition + ?Sized>(board: &Board, evaluator: &E) -> BestMoves {
    best_moves_by(board, |child| evaluator.evaluate(child), evaluator.draw_score())
}

/// Picks among the tied best moves with `rand` in `[0, 1)`. `None` when the game is over.
pub fn pick_move<E: EvaluatePosition + ?Sized>(board: &Board, evaluator: &E, rand: f64) -> Option<Move> {
    best_moves(board, evaluator).pick(rand)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitboard::Square::*;
    use crate::evaluation::{MaterialRater, RaterParams};
    use test_case::test_case;
    use testresult::TestResult;

    const FOOLS_MATE: [Move; 4] = [
        Move::new(F2, F3),
        Move::new(E7, E5),
        Move::new(G2, G4),
        Move::new(D8, H4),
    ];

    fn play(moves: &[Move]) -> Board {
        moves
            .iter()
            .fold(Board::initial(), |board, &mve| board.apply_move(mve))
    }

    #[test]
    fn test_best_moves_center_pawns() {
        let got = best_moves(&Board::initial(), &MaterialRater(RaterParams::MATERIAL_ONLY));
        assert_eq!(got.moves, vec![Move::new(D2, D4), Move::new(E2, E4)]);
        assert!((got.rating - 42.1 / 42.0).abs() < 1e-12);
    }

    #[test]
    fn test_ties_at_negative_infinity_are_kept() {
        let got = best_moves(&Board::initial(), &|_: &Board| f64::NEG_INFINITY);
        assert_eq!(got.moves.len(), 20);
        assert_eq!(got.rating, f64::NEG_INFINITY);
    }

    #[test]
    fn test_black_minimizes() -> TestResult {
        let board = Board::from_text(
            ". . . . K . . .
             . . . . . . . .
             . . . . . . . .
             . . . Q . . . .
             . . . . . . . .
             . p . . . r . .
             . . . . . . . .
             . . . . k . . .

             Black to move",
        )?;
        let got = best_moves(&board, &MaterialRater(RaterParams::MATERIAL_ONLY));
        assert_eq!(got.moves, vec![Move::new(D5, F3)]);
        assert_eq!(got.rating, (1.0 + 1.0) / (9.0 + 1.0));
        Ok(())
    }

    #[test_case(&FOOLS_MATE, 1, f64::NEG_INFINITY ; "white mated")]
    #[test_case(&FOOLS_MATE[..3], 2, f64::NEG_INFINITY ; "black mates in one")]
    fn test_checkmate_rating(moves: &[Move], depth: u8, want: f64) {
        let board = play(moves);
        let rater = rate_at_depth(MaterialRater::CHAMPION, depth);
        assert_eq!(rater.evaluate(&board), want);
    }

    #[test]
    fn test_black_mated() -> TestResult {
        let board = Board::from_text(
            "r . . . . . K .
             . . . . . P P P
             . . . . . . . .
             . . . . . . . .
             . . . . . . . .
             . . . . . . . .
             . . . . . . . .
             . . . . . . k .

             Black to move",
        )?;
        assert_eq!(
            best_moves(&board, &MaterialRater::CHAMPION),
            BestMoves {
                moves: vec![],
                rating: f64::INFINITY
            }
        );
        Ok(())
    }

    #[test]
    fn test_finds_mate_in_one() -> TestResult {
        let board = Board::from_text(
            ". . . . . . K .
             . . . . . P P P
             . . . . . . . .
             . . . . . . . .
             . . . . . . . .
             . . . . . . . .
             . . . . . p p p
             r . . . . . k .

             White to move",
        )?;
        let got = best_moves(&board, &rate_at_depth(MaterialRater::CHAMPION, 1));
        assert_eq!(got.moves, vec![Move::new(A1, A8)]);
        assert_eq!(got.rating, f64::INFINITY);
        Ok(())
    }

    struct HalfDraw;

    impl EvaluatePosition for HalfDraw {
        fn evaluate(&self, _board: &Board) -> f64 {
            1.0
        }

        fn draw_score(&self) -> f64 {
            0.5
        }
    }

    #[test]
    fn test_stalemate_uses_draw_score() -> TestResult {
        let board = Board::from_text(
            "K . . . . . . .
             . . p . . . . .
             . k . . . . . .
             . . . . . . . .
             . . . . . . . .
             . . . . . . . .
             . . . . . . . .
             . . . . . . . .

             Black to move",
        )?;
        assert_eq!(best_moves(&board, &MaterialRater::CHAMPION).rating, 1.0);
        assert_eq!(best_moves(&board, &HalfDraw).rating, 0.5);
        assert_eq!(rate_at_depth(HalfDraw, 3).evaluate(&board), 0.5);
        assert_eq!(rate_at_depth(HalfDraw, 3).draw_score(), 0.5);
        Ok(())
    }

    #[test]
    fn test_depth_zero_is_leaf() {
        let board = Board::initial().apply_move(Move::new(E2, E4));
        assert_eq!(
            rate_at_depth(MaterialRater::CHAMPION, 0).evaluate(&board),
            MaterialRater::CHAMPION.evaluate(&board)
        );
    }

    #[test_case(0.0, Some(Move::new(A2, A3)) ; "first")]
    #[test_case(0.5, Some(Move::new(F2, F3)) ; "middle")]
    #[test_case(0.999, Some(Move::new(G1, F3)) ; "last")]
    #[test_case(1.0, Some(Move::new(G1, F3)) ; "clamped")]
    fn test_pick_move(rand: f64, want: Option<Move>) {
        let constant = |_: &Board| 1.0;
        assert_eq!(pick_move(&Board::initial(), &constant, rand), want);
    }

    #[test]
    fn test_pick_move_game_over() {
        assert_eq!(
            pick_move(&play(&FOOLS_MATE), &MaterialRater::CHAMPION, 0.0),
            None
        );
    }
}
