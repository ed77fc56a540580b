use crate::bitboard::Square;
use crate::board::{Board, ColoredPiece, Side};

use super::Destinations;

/// (Δrow, Δcol) steps: east, west, south, north.
pub(super) const ROOK_DIRECTIONS: [(i8, i8); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

/// (Δrow, Δcol) steps: north-west, north-east, south-west, south-east.
pub(super) const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// Walks each direction until the edge or the first occupied square, which is
/// included when it holds a piece of the other side.
pub(super) fn gen_ray_moves(
    board: &Board,
    square: Square,
    side: Side,
    directions: &[(i8, i8)],
    moves: &mut Destinations,
) {
    for &(d_row, d_col) in directions {
        let mut curr = square;
        while let Some(next) = curr.offset(d_row, d_col) {
            match board.piece_at(next) {
                None => moves.push(next),
                Some(blocker) => {
                    if blocker.side != side {
                        moves.push(next);
                    }
                    break;
                }
            }
            curr = next;
        }
    }
}

/// The first piece met walking from `square` in one direction, if any.
pub(super) fn first_piece_along(
    board: &Board,
    square: Square,
    (d_row, d_col): (i8, i8),
) -> Option<ColoredPiece> {
    let mut curr = square;
    while let Some(next) = curr.offset(d_row, d_col) {
        if let Some(piece) = board.piece_at(next) {
            return Some(piece);
        }
        curr = next;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitboard::Square::*;
    use crate::board::Piece;
    use testresult::TestResult;

    #[test]
    fn test_rook_rays_stop_at_blockers() -> TestResult {
        let board = Board::from_text(
            ". . . . K . . .
             . . . . . . . .
             . . . P . . . .
             . . . . . . . .
             . p . r . . . P
             . . . . . . . .
             . . . . . . . .
             . . . . k . . .

             White to move",
        )?;

        let mut moves = Destinations::new();
        gen_ray_moves(&board, D4, Side::White, &ROOK_DIRECTIONS, &mut moves);

        // East to the capture on h4, west stops before the own pawn, south to the edge,
        // north stops on the capture at d6
        assert_eq!(
            moves.as_slice(),
            &[E4, F4, G4, H4, C4, D3, D2, D1, D5, D6]
        );
        Ok(())
    }

    #[test]
    fn test_first_piece_along() {
        let board = Board::initial();
        assert_eq!(
            first_piece_along(&board, D4, (-1, 0)),
            Some(ColoredPiece::new(Piece::Pawn, Side::Black))
        );
        assert_eq!(
            first_piece_along(&board, D4, (1, 1)),
            Some(ColoredPiece::new(Piece::Pawn, Side::White))
        );
        assert_eq!(first_piece_along(&board, A4, (0, -1)), None);
    }
}
