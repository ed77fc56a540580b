use std::fmt;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString, FromRepr};

/// A square on the board, indexed row-major from the top-left of the text grid:
/// `A8` is 0, `H8` is 7, `A1` is 56, `H1` is 63.
#[allow(dead_code)]
#[rustfmt::skip]
#[repr(u8)]
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, EnumString, FromRepr, Display, PartialOrd, Ord, Hash,
    Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
pub enum Square {
    A8, B8, C8, D8, E8, F8, G8, H8,
    A7, B7, C7, D7, E7, F7, G7, H7,
    A6, B6, C6, D6, E6, F6, G6, H6,
    A5, B5, C5, D5, E5, F5, G5, H5,
    A4, B4, C4, D4, E4, F4, G4, H4,
    A3, B3, C3, D3, E3, F3, G3, H3,
    A2, B2, C2, D2, E2, F2, G2, H2,
    A1, B1, C1, D1, E1, F1, G1, H1,
}

impl Square {
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Row of the text grid, 0 is rank 8.
    pub const fn row(self) -> u8 {
        self as u8 / 8
    }

    /// Column of the text grid, 0 is the a-file.
    pub const fn col(self) -> u8 {
        self as u8 % 8
    }

    pub fn from_index(idx: u8) -> Option<Square> {
        Square::from_repr(idx)
    }

    pub fn from_row_col(row: u8, col: u8) -> Option<Square> {
        if row >= 8 || col >= 8 {
            return None;
        }
        Square::from_repr(row * 8 + col)
    }

    /// The square `d_row` rows and `d_col` columns away, if it is still on the board.
    /// Never wraps around an edge.
    pub fn offset(self, d_row: i8, d_col: i8) -> Option<Square> {
        let row = self.row() as i8 + d_row;
        let col = self.col() as i8 + d_col;
        if !(0..8).contains(&row) || !(0..8).contains(&col) {
            return None;
        }
        Square::from_repr((row * 8 + col) as u8)
    }

    pub(crate) const fn abs_diff(self, other: Square) -> u8 {
        (self as u8).abs_diff(other as u8)
    }
}

#[derive(PartialEq, Eq, Clone, Copy, Default, Hash)]
pub struct BitBoard(u64);

impl BitBoard {
    pub(crate) const fn empty() -> Self {
        BitBoard(0)
    }

    #[cfg(test)]
    pub(crate) fn from_squares(squares: &[Square]) -> Self {
        BitBoard(squares.iter().fold(0, |board, sq| board | 1 << (*sq as u8)))
    }

    pub(crate) fn set_square(&mut self, square: Square) {
        self.0 |= 1 << square as u64
    }

    pub(crate) fn clear_square(&mut self, square: Square) {
        self.0 &= !(1 << square as u64)
    }

    pub fn is_square_set(&self, square: Square) -> bool {
        self.0 & 1 << (square as u64) != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn num_squares_set(self) -> u32 {
        self.0.count_ones()
    }

    /// Lowest set square, i.e. the first one in board-scan order.
    pub fn first(self) -> Option<Square> {
        if self.0 == 0 {
            return None;
        }
        Square::from_repr(self.0.trailing_zeros() as u8)
    }
}

/// Yields the set squares in ascending index order, consuming them.
impl Iterator for BitBoard {
    type Item = Square;

    fn next(&mut self) -> Option<Square> {
        let sq = self.first()?;
        self.0 &= self.0 - 1;
        Some(sq)
    }
}

impl fmt::Debug for BitBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut board_str = String::with_capacity(64 + 7);

        for idx in 0..64u64 {
            let ch = if self.0 & (1 << idx) != 0 { 'X' } else { '.' };
            board_str.push(ch);
            if idx % 8 == 7 && idx != 63 {
                board_str.push('\n');
            }
        }

        write!(f, "{}", board_str)
    }
}
