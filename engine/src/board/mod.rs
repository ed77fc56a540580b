use std::fmt;

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

use crate::bitboard::{BitBoard, Square};

mod text;

pub use text::BoardTextError;

#[derive(Debug, PartialEq, Eq, EnumIter, Clone, Copy, Display, Hash, Deserialize, Serialize)]
pub enum Side {
    White,
    Black,
}

impl Side {
    pub fn opposite_side(self) -> Side {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }

    /// Row of this side's back rank in the text grid.
    pub(crate) const fn home_row(self) -> u8 {
        match self {
            Side::White => 7,
            Side::Black => 0,
        }
    }

    /// Row delta of a pawn advance.
    pub(crate) const fn forward(self) -> i8 {
        match self {
            Side::White => -1,
            Side::Black => 1,
        }
    }
}

#[derive(Debug, PartialEq, Eq, EnumIter, Clone, Copy, Display, Hash, Deserialize, Serialize)]
pub enum Piece {
    King,
    Queen,
    Rook,
    Knight,
    Bishop,
    Pawn,
}

impl From<Piece> for char {
    fn from(piece: Piece) -> char {
        match piece {
            Piece::King => 'k',
            Piece::Queen => 'q',
            Piece::Rook => 'r',
            Piece::Knight => 'n',
            Piece::Bishop => 'b',
            Piece::Pawn => 'p',
        }
    }
}

/// A piece identifier combining kind and color.
///
/// In the text format lowercase letters are white and uppercase letters are black.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct ColoredPiece {
    pub piece: Piece,
    pub side: Side,
}

impl ColoredPiece {
    pub const fn new(piece: Piece, side: Side) -> Self {
        Self { piece, side }
    }

    pub fn is_white(self) -> bool {
        self.side == Side::White
    }

    /// The same kind of piece in white.
    pub fn to_white(self) -> Self {
        Self::new(self.piece, Side::White)
    }

    pub fn to_char(self) -> char {
        let ch: char = self.piece.into();
        match self.side {
            Side::White => ch,
            Side::Black => ch.to_ascii_uppercase(),
        }
    }
}

impl TryFrom<char> for ColoredPiece {
    type Error = BoardTextError;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        let side = if value.is_ascii_lowercase() {
            Side::White
        } else {
            Side::Black
        };
        let piece = match value.to_ascii_lowercase() {
            'k' => Piece::King,
            'q' => Piece::Queen,
            'r' => Piece::Rook,
            'n' => Piece::Knight,
            'b' => Piece::Bishop,
            'p' => Piece::Pawn,
            _ => return Err(BoardTextError::UnknownPiece(value)),
        };
        Ok(Self::new(piece, side))
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub src: Square,
    pub dest: Square,
}

impl Move {
    pub const fn new(src: Square, dest: Square) -> Move {
        Self { src, dest }
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.src, self.dest)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.src, self.dest)
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum MoveError {
    #[error("no piece at {0}")]
    NoPiece(Square),

    #[error("illegal move: {0}")]
    Illegal(Move),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Sides {
    white: BitBoard,
    black: BitBoard,
}

impl Sides {
    const fn new() -> Self {
        Self {
            white: BitBoard::empty(),
            black: BitBoard::empty(),
        }
    }

    pub(crate) fn get(&self, side: Side) -> BitBoard {
        match side {
            Side::White => self.white,
            Side::Black => self.black,
        }
    }

    fn get_mut(&mut self, side: Side) -> &mut BitBoard {
        match side {
            Side::White => &mut self.white,
            Side::Black => &mut self.black,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Pieces {
    kings: Sides,
    queens: Sides,
    rooks: Sides,
    knights: Sides,
    bishops: Sides,
    pawns: Sides,
}

impl Pieces {
    const fn new() -> Self {
        Self {
            kings: Sides::new(),
            queens: Sides::new(),
            rooks: Sides::new(),
            knights: Sides::new(),
            bishops: Sides::new(),
            pawns: Sides::new(),
        }
    }

    pub(crate) fn get(&self, piece: Piece) -> &Sides {
        match piece {
            Piece::King => &self.kings,
            Piece::Queen => &self.queens,
            Piece::Rook => &self.rooks,
            Piece::Knight => &self.knights,
            Piece::Bishop => &self.bishops,
            Piece::Pawn => &self.pawns,
        }
    }

    fn get_mut(&mut self, piece: Piece) -> &mut Sides {
        match piece {
            Piece::King => &mut self.kings,
            Piece::Queen => &mut self.queens,
            Piece::Rook => &mut self.rooks,
            Piece::Knight => &mut self.knights,
            Piece::Bishop => &mut self.bishops,
            Piece::Pawn => &mut self.pawns,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Deserialize, Serialize)]
pub struct CastlingRights {
    pub white_king_side: bool,
    pub white_queen_side: bool,
    pub black_king_side: bool,
    pub black_queen_side: bool,
}

impl CastlingRights {
    pub const fn all() -> Self {
        Self {
            white_king_side: true,
            white_queen_side: true,
            black_king_side: true,
            black_queen_side: true,
        }
    }

    pub const fn none() -> Self {
        Self {
            white_king_side: false,
            white_queen_side: false,
            black_king_side: false,
            black_queen_side: false,
        }
    }

    pub fn king_side(&self, side: Side) -> bool {
        match side {
            Side::White => self.white_king_side,
            Side::Black => self.black_king_side,
        }
    }

    pub fn queen_side(&self, side: Side) -> bool {
        match side {
            Side::White => self.white_queen_side,
            Side::Black => self.black_queen_side,
        }
    }

    fn clear_king_side(&mut self, side: Side) {
        match side {
            Side::White => self.white_king_side = false,
            Side::Black => self.black_king_side = false,
        }
    }

    fn clear_queen_side(&mut self, side: Side) {
        match side {
            Side::White => self.white_queen_side = false,
            Side::Black => self.black_queen_side = false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct State {
    pub to_move: Side,
    pub castling_rights: CastlingRights,
    /// Column a pawn just passed over with a two-square advance.
    pub en_passant_file: Option<u8>,
}

impl State {
    const fn start() -> Self {
        Self {
            to_move: Side::White,
            castling_rights: CastlingRights::all(),
            en_passant_file: None,
        }
    }
}

/// Immutable snapshot of a game: piece placement, side to move, castling rights and
/// en passant target. Moves produce new boards, a board is never changed in place
/// once handed out.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Board {
    state: State,
    pub(crate) sides: Sides,
    pub(crate) pieces: Pieces,
}

impl Board {
    pub(crate) const fn empty(to_move: Side) -> Self {
        Self {
            state: State {
                to_move,
                castling_rights: CastlingRights::all(),
                en_passant_file: None,
            },
            sides: Sides::new(),
            pieces: Pieces::new(),
        }
    }

    /// Standard starting position, white to move.
    pub fn initial() -> Self {
        const BACK_RANK: [Piece; 8] = [
            Piece::Rook,
            Piece::Knight,
            Piece::Bishop,
            Piece::Queen,
            Piece::King,
            Piece::Bishop,
            Piece::Knight,
            Piece::Rook,
        ];

        let mut board = Self::empty(Side::White);
        board.state = State::start();
        for side in Side::iter() {
            let home_row = side.home_row();
            let pawn_row = (home_row as i8 + side.forward()) as u8;
            for (col, &piece) in BACK_RANK.iter().enumerate() {
                let col = col as u8;
                if let Some(sq) = Square::from_row_col(home_row, col) {
                    board.put(sq, ColoredPiece::new(piece, side));
                }
                if let Some(sq) = Square::from_row_col(pawn_row, col) {
                    board.put(sq, ColoredPiece::new(Piece::Pawn, side));
                }
            }
        }
        board
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn to_move(&self) -> Side {
        self.state.to_move
    }

    pub fn castling_rights(&self) -> CastlingRights {
        self.state.castling_rights
    }

    pub fn en_passant_file(&self) -> Option<u8> {
        self.state.en_passant_file
    }

    /// Square a pawn of the side to move would land on when capturing en passant.
    pub fn en_passant_square(&self) -> Option<Square> {
        let col = self.state.en_passant_file?;
        let row = match self.state.to_move {
            Side::White => 2,
            Side::Black => 5,
        };
        Square::from_row_col(row, col)
    }

    pub fn with_castling_rights(mut self, castling_rights: CastlingRights) -> Self {
        self.state.castling_rights = castling_rights;
        self
    }

    pub fn with_en_passant_file(mut self, en_passant_file: Option<u8>) -> Self {
        self.state.en_passant_file = en_passant_file;
        self
    }

    pub fn piece_at(&self, square: Square) -> Option<ColoredPiece> {
        let side = if self.sides.white.is_square_set(square) {
            Side::White
        } else if self.sides.black.is_square_set(square) {
            Side::Black
        } else {
            return None;
        };

        Piece::iter()
            .find(|&piece| self.pieces.get(piece).get(side).is_square_set(square))
            .map(|piece| ColoredPiece::new(piece, side))
    }

    /// Squares holding `side`'s pieces, in board-scan order.
    pub fn pieces_of(&self, side: Side) -> impl Iterator<Item = Square> {
        self.sides.get(side)
    }

    /// First king of `side` in board-scan order.
    pub fn king_square(&self, side: Side) -> Option<Square> {
        self.pieces.get(Piece::King).get(side).first()
    }

    pub fn num_pieces(&self, piece: Piece, side: Side) -> u32 {
        self.pieces.get(piece).get(side).num_squares_set()
    }

    pub(crate) fn put(&mut self, square: Square, colored: ColoredPiece) {
        self.remove(square);
        self.sides.get_mut(colored.side).set_square(square);
        self.pieces
            .get_mut(colored.piece)
            .get_mut(colored.side)
            .set_square(square);
    }

    pub(crate) fn remove(&mut self, square: Square) -> Option<ColoredPiece> {
        let colored = self.piece_at(square)?;
        self.sides.get_mut(colored.side).clear_square(square);
        self.pieces
            .get_mut(colored.piece)
            .get_mut(colored.side)
            .clear_square(square);
        Some(colored)
    }

    /// Applies `mve`, promoting to a queen.
    ///
    /// No legality check is made, callers taking outside input should check
    /// [`Board::is_legal`] first or use [`Board::try_apply_move`]. A move from an
    /// empty square only hands the turn over.
    pub fn apply_move(&self, mve: Move) -> Board {
        self.apply_move_with_promotion(mve, || Piece::Queen)
    }

    /// Applies `mve`, asking `promotion` for the piece kind if a pawn reaches the far row.
    pub fn apply_move_with_promotion(&self, mve: Move, promotion: impl FnOnce() -> Piece) -> Board {
        let mut next = *self;

        next.state.to_move = self.state.to_move.opposite_side();
        next.state.en_passant_file = None;

        let Some(moving) = next.remove(mve.src) else {
            return next;
        };
        let dest_was_empty = next.remove(mve.dest).is_none();
        next.put(mve.dest, moving);

        let side = moving.side;
        let home_row = side.home_row();

        match moving.piece {
            Piece::Pawn => {
                if mve.src.abs_diff(mve.dest) == 16 {
                    next.state.en_passant_file = Some(mve.src.col());
                } else if mve.src.col() != mve.dest.col() && dest_was_empty {
                    // En passant, the captured pawn sits beside the origin
                    if let Some(captured) = Square::from_row_col(mve.src.row(), mve.dest.col()) {
                        next.remove(captured);
                    }
                }

                if mve.dest.row() == 0 || mve.dest.row() == 7 {
                    next.put(mve.dest, ColoredPiece::new(promotion(), side));
                }
            }
            Piece::King => {
                next.state.castling_rights.clear_king_side(side);
                next.state.castling_rights.clear_queen_side(side);

                if mve.src.abs_diff(mve.dest) == 2 {
                    let rook_col = if mve.dest.col() == 2 { 0 } else { 7 };
                    let rook_to = Square::from_index((mve.src as u8 + mve.dest as u8) / 2);
                    let rook_from = Square::from_row_col(home_row, rook_col);
                    if let (Some(rook_from), Some(rook_to)) = (rook_from, rook_to) {
                        if let Some(rook) = next.remove(rook_from) {
                            next.put(rook_to, rook);
                        }
                    }
                }
            }
            Piece::Rook if mve.src.row() == home_row => match mve.src.col() {
                0 => next.state.castling_rights.clear_queen_side(side),
                7 => next.state.castling_rights.clear_king_side(side),
                _ => (),
            },
            _ => (),
        }

        next
    }

    /// Same placement and side to move, ignoring castling and en passant history.
    ///
    /// This is what the text format preserves.
    pub fn same_position(&self, other: &Board) -> bool {
        self.state.to_move == other.state.to_move
            && self.sides == other.sides
            && self.pieces == other.pieces
    }

    /// Checked variant of [`Board::apply_move`] for moves coming from outside the engine.
    pub fn try_apply_move(&self, mve: Move) -> Result<Board, MoveError> {
        if self.piece_at(mve.src).is_none() {
            return Err(MoveError::NoPiece(mve.src));
        }
        if !self.is_legal(mve) {
            return Err(MoveError::Illegal(mve));
        }
        Ok(self.apply_move(mve))
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::initial()
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}
