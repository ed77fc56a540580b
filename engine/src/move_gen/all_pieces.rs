use crate::bitboard::Square;
use crate::board::{Board, Piece};

use super::leaping_pieces::{gen_king_moves, gen_offset_moves, gen_pawn_moves, KNIGHT_OFFSETS};
use super::sliding_pieces::{gen_ray_moves, BISHOP_DIRECTIONS, ROOK_DIRECTIONS};
use super::Destinations;

/// Destinations allowed by the movement rules of the piece on `origin`, before any
/// king safety filtering. Empty when `origin` is empty.
pub(super) fn gen_pseudo_legal(board: &Board, origin: Square) -> Destinations {
    let mut moves = Destinations::new();

    let Some(colored) = board.piece_at(origin) else {
        return moves;
    };
    let side = colored.side;

    match colored.piece {
        Piece::Rook => gen_ray_moves(board, origin, side, &ROOK_DIRECTIONS, &mut moves),
        Piece::Bishop => gen_ray_moves(board, origin, side, &BISHOP_DIRECTIONS, &mut moves),
        Piece::Queen => {
            gen_ray_moves(board, origin, side, &ROOK_DIRECTIONS, &mut moves);
            gen_ray_moves(board, origin, side, &BISHOP_DIRECTIONS, &mut moves);
        }
        Piece::Knight => gen_offset_moves(board, origin, side, &KNIGHT_OFFSETS, &mut moves),
        Piece::King => gen_king_moves(board, origin, side, &mut moves),
        Piece::Pawn => gen_pawn_moves(board, origin, side, &mut moves),
    }

    moves
}
