use crate::bitboard::Square;
use crate::board::{Board, Piece, Side};

use super::check::is_king_in_check;
use super::Destinations;

pub(super) const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (2, 1),
    (2, -1),
    (-2, 1),
    (-2, -1),
    (1, 2),
    (1, -2),
    (-1, 2),
    (-1, -2),
];

pub(super) const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

const KING_HOME_COL: u8 = 4;

pub(super) fn gen_offset_moves(
    board: &Board,
    square: Square,
    side: Side,
    offsets: &[(i8, i8)],
    moves: &mut Destinations,
) {
    for &(d_row, d_col) in offsets {
        let Some(dest) = square.offset(d_row, d_col) else {
            continue;
        };
        if board.piece_at(dest).map_or(true, |p| p.side != side) {
            moves.push(dest);
        }
    }
}

pub(super) fn gen_king_moves(board: &Board, square: Square, side: Side, moves: &mut Destinations) {
    gen_offset_moves(board, square, side, &KING_OFFSETS, moves);

    let home_row = side.home_row();
    if Square::from_row_col(home_row, KING_HOME_COL) != Some(square) {
        return;
    }
    let rights = board.castling_rights();
    if !rights.queen_side(side) && !rights.king_side(side) {
        return;
    }
    if is_king_in_check(board, square, side) {
        return;
    }

    // Queen side first, then king side
    let wings: [(bool, u8, &[u8], u8); 2] = [
        (rights.queen_side(side), 0, &[1, 2, 3], 3),
        (rights.king_side(side), 7, &[5, 6], 5),
    ];

    for (has_right, rook_col, between, passing_col) in wings {
        if !has_right || !has_rook(board, home_row, rook_col, side) {
            continue;
        }
        let path_clear = between.iter().all(|&col| {
            Square::from_row_col(home_row, col).is_some_and(|sq| board.piece_at(sq).is_none())
        });
        if !path_clear {
            continue;
        }
        let passes_attack = Square::from_row_col(home_row, passing_col)
            .map_or(true, |sq| is_king_in_check(board, sq, side));
        if passes_attack {
            continue;
        }

        let dest_col = if rook_col == 0 { 2 } else { 6 };
        if let Some(dest) = Square::from_row_col(home_row, dest_col) {
            moves.push(dest);
        }
    }
}

fn has_rook(board: &Board, row: u8, col: u8, side: Side) -> bool {
    Square::from_row_col(row, col)
        .and_then(|sq| board.piece_at(sq))
        .is_some_and(|p| p.piece == Piece::Rook && p.side == side)
}

pub(super) fn gen_pawn_moves(board: &Board, square: Square, side: Side, moves: &mut Destinations) {
    let dir = side.forward();
    let start_row = (side.home_row() as i8 + dir) as u8;

    if let Some(one) = square.offset(dir, 0) {
        if board.piece_at(one).is_none() {
            moves.push(one);

            if square.row() == start_row {
                if let Some(two) = one.offset(dir, 0) {
                    if board.piece_at(two).is_none() {
                        moves.push(two);
                    }
                }
            }
        }
    }

    let en_passant = if side == board.to_move() {
        board.en_passant_square()
    } else {
        None
    };

    for d_col in [1, -1] {
        let Some(target) = square.offset(dir, d_col) else {
            continue;
        };
        let captures = match board.piece_at(target) {
            Some(p) => p.side != side,
            None => en_passant == Some(target),
        };
        if captures {
            moves.push(target);
        }
    }
}
