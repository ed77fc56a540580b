use strum_macros::Display;

use crate::bitboard::Square;
use crate::board::{Board, Piece, Side};

use super::leaping_pieces::{KING_OFFSETS, KNIGHT_OFFSETS};
use super::sliding_pieces::{first_piece_along, BISHOP_DIRECTIONS, ROOK_DIRECTIONS};

#[derive(Debug, PartialEq, Eq, Clone, Copy, Display)]
pub enum KingSafety {
    Safe,
    InCheck,
    /// The side has no king on the board, possible on hypothetical boards.
    NoKing,
}

/// Whether a `king_side` king standing on `king_square` would be attacked.
///
/// The square doesn't have to hold a king, so this also answers whether a king may
/// pass over a square while castling.
pub fn is_king_in_check(board: &Board, king_square: Square, king_side: Side) -> bool {
    let enemy = king_side.opposite_side();
    let enemy_on = |d_row: i8, d_col: i8, piece: Piece| {
        king_square
            .offset(d_row, d_col)
            .and_then(|sq| board.piece_at(sq))
            .is_some_and(|p| p.side == enemy && p.piece == piece)
    };

    if KING_OFFSETS
        .iter()
        .any(|&(d_row, d_col)| enemy_on(d_row, d_col, Piece::King))
    {
        return true;
    }

    if KNIGHT_OFFSETS
        .iter()
        .any(|&(d_row, d_col)| enemy_on(d_row, d_col, Piece::Knight))
    {
        return true;
    }

    // Enemy pawns attack from the row in front of the king
    let pawn_row = king_side.forward();
    if enemy_on(pawn_row, 1, Piece::Pawn) || enemy_on(pawn_row, -1, Piece::Pawn) {
        return true;
    }

    let ray_attack = |directions: &[(i8, i8)], slider: Piece| {
        directions.iter().any(|&dir| {
            first_piece_along(board, king_square, dir).is_some_and(|p| {
                p.side == enemy && (p.piece == slider || p.piece == Piece::Queen)
            })
        })
    };

    ray_attack(&ROOK_DIRECTIONS[..], Piece::Rook)
        || ray_attack(&BISHOP_DIRECTIONS[..], Piece::Bishop)
}

impl Board {
    pub fn king_safety(&self, side: Side) -> KingSafety {
        match self.king_square(side) {
            None => KingSafety::NoKing,
            Some(sq) if is_king_in_check(self, sq, side) => KingSafety::InCheck,
            Some(_) => KingSafety::Safe,
        }
    }

    pub fn is_in_check(&self, side: Side) -> bool {
        self.king_safety(side) == KingSafety::InCheck
    }
}
