mod all_pieces;
mod check;
mod leaping_pieces;
mod sliding_pieces;

use arrayvec::ArrayVec;
use strum_macros::Display;

use crate::bitboard::Square;
use crate::board::{Board, Move};

pub use self::check::{is_king_in_check, KingSafety};

/// A queen in the middle of an empty board reaches 27 squares, a castling king 10.
pub(crate) type Destinations = ArrayVec<Square, 32>;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Display)]
pub enum EndState {
    Checkmate,
    Stalemate,
}

impl Board {
    /// Legal destinations of the piece on `origin`, in generation order.
    ///
    /// Each call generates afresh, there is no cursor shared between calls.
    pub fn legal_destinations(&self, origin: Square) -> impl Iterator<Item = Square> + '_ {
        all_pieces::gen_pseudo_legal(self, origin)
            .into_iter()
            .filter(move |&dest| self.leaves_king_safe(Move::new(origin, dest)))
    }

    /// Every legal move of the side to move, origins in square index order.
    pub fn legal_moves(&self) -> impl Iterator<Item = Move> + '_ {
        self.pieces_of(self.to_move()).flat_map(move |src| {
            self.legal_destinations(src)
                .map(move |dest| Move::new(src, dest))
        })
    }

    pub fn is_legal(&self, mve: Move) -> bool {
        self.piece_at(mve.src)
            .is_some_and(|p| p.side == self.to_move())
            && self.legal_destinations(mve.src).any(|dest| dest == mve.dest)
    }

    /// `None` while the side to move has a legal move.
    pub fn end_state(&self) -> Option<EndState> {
        if self.legal_moves().next().is_some() {
            return None;
        }
        match self.king_safety(self.to_move()) {
            KingSafety::Safe => Some(EndState::Stalemate),
            KingSafety::InCheck | KingSafety::NoKing => Some(EndState::Checkmate),
        }
    }

    fn leaves_king_safe(&self, mve: Move) -> bool {
        let Some(moving) = self.piece_at(mve.src) else {
            return false;
        };
        let next = self.apply_move(mve);
        match next.king_safety(moving.side) {
            KingSafety::Safe => true,
            KingSafety::InCheck => false,
            KingSafety::NoKing => {
                tracing::trace!(%mve, side = %moving.side, "no king after move, treating as legal");
                true
            }
        }
    }
}
