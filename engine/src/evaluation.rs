use futures::future::{BoxFuture, FutureExt};
use futures_lite::future::yield_now;
use serde::{Deserialize, Serialize};

use crate::bitboard::Square;
use crate::board::{Board, Piece, Side};

/// Score of a drawn position for evaluators that rate white material over black material.
pub const DRAW_RATIO: f64 = 1.0;

/// Scores a board, larger is better for white.
pub trait EvaluatePosition {
    fn evaluate(&self, board: &Board) -> f64;

    /// Score given to a stalemate.
    fn draw_score(&self) -> f64 {
        DRAW_RATIO
    }
}

impl<F> EvaluatePosition for F
where
    F: Fn(&Board) -> f64,
{
    fn evaluate(&self, board: &Board) -> f64 {
        self(board)
    }
}

/// Future returning counterpart of [`EvaluatePosition`].
pub trait AsyncEvaluatePosition: Sync {
    fn evaluate(&self, board: Board) -> BoxFuture<'_, f64>;

    fn draw_score(&self) -> f64 {
        DRAW_RATIO
    }
}

/// Runs a synchronous evaluator after handing control back to the executor once.
#[derive(Clone, Copy, Debug)]
pub struct Yielding<E>(pub E);

impl<E> AsyncEvaluatePosition for Yielding<E>
where
    E: EvaluatePosition + Sync,
{
    fn evaluate(&self, board: Board) -> BoxFuture<'_, f64> {
        async move {
            yield_now().await;
            self.0.evaluate(&board)
        }
        .boxed()
    }

    fn draw_score(&self) -> f64 {
        self.0.draw_score()
    }
}

/// Weights of [`MaterialRater`]. Pawns are always worth 1.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RaterParams {
    pub bishop: f64,
    pub knight: f64,
    pub rook: f64,
    pub queen: f64,
    /// Multiplier for pieces on d4, e4, d5 and e5.
    pub center_boost: f64,
    /// Added per row a piece stands away from its own back rank.
    pub piece_advancement_boost: f64,
    /// Added per step a pawn is past its fourth step from the start row.
    pub pawn_near_promotion_boost: f64,
}

impl RaterParams {
    pub const LEN: usize = 7;

    pub const CHAMPION: RaterParams = RaterParams {
        bishop: 3.5,
        knight: 3.5,
        rook: 5.0,
        queen: 9.0,
        center_boost: 1.1,
        piece_advancement_boost: 0.005,
        pawn_near_promotion_boost: 1.5,
    };

    pub const MATERIAL_ONLY: RaterParams = RaterParams {
        bishop: 3.5,
        knight: 3.5,
        rook: 5.0,
        queen: 9.0,
        center_boost: 1.1,
        piece_advancement_boost: 0.0,
        pawn_near_promotion_boost: 0.0,
    };

    pub fn to_array(self) -> [f64; Self::LEN] {
        self.into()
    }
}

impl Default for RaterParams {
    fn default() -> Self {
        Self::CHAMPION
    }
}

impl From<[f64; RaterParams::LEN]> for RaterParams {
    fn from(arr: [f64; RaterParams::LEN]) -> Self {
        let [bishop, knight, rook, queen, center_boost, piece_advancement_boost, pawn_near_promotion_boost] =
            arr;
        Self {
            bishop,
            knight,
            rook,
            queen,
            center_boost,
            piece_advancement_boost,
            pawn_near_promotion_boost,
        }
    }
}

impl From<RaterParams> for [f64; RaterParams::LEN] {
    fn from(params: RaterParams) -> Self {
        [
            params.bishop,
            params.knight,
            params.rook,
            params.queen,
            params.center_boost,
            params.piece_advancement_boost,
            params.pawn_near_promotion_boost,
        ]
    }
}

const CENTER: [Square; 4] = [Square::D5, Square::E5, Square::D4, Square::E4];

/// Rates a board by the ratio `(white material + 1) / (black material + 1)`.
///
/// A side without a king loses outright, `+inf` or `-inf`, unless neither side has one.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MaterialRater(pub RaterParams);

impl MaterialRater {
    pub const CHAMPION: MaterialRater = MaterialRater(RaterParams::CHAMPION);

    fn piece_value(&self, piece: Piece) -> f64 {
        let params = &self.0;
        match piece {
            Piece::Pawn => 1.0,
            Piece::Knight => params.knight,
            Piece::Bishop => params.bishop,
            Piece::Rook => params.rook,
            Piece::Queen => params.queen,
            Piece::King => 0.0,
        }
    }

    fn material(&self, board: &Board, side: Side) -> f64 {
        let params = &self.0;

        board
            .pieces_of(side)
            .filter_map(|sq| board.piece_at(sq).map(|p| (sq, p.piece)))
            .filter(|&(_, piece)| piece != Piece::King)
            .map(|(sq, piece)| {
                let mut value = self.piece_value(piece);
                if CENTER.contains(&sq) {
                    value *= params.center_boost;
                }

                let rel_row = f64::from(match side {
                    Side::White => 7 - sq.row(),
                    Side::Black => sq.row(),
                });

                if piece == Piece::Pawn {
                    let steps = rel_row - 1.0;
                    if steps >= 4.0 {
                        value += params.pawn_near_promotion_boost * (steps - 3.0);
                    }
                }

                value + params.piece_advancement_boost * rel_row
            })
            .sum()
    }
}

impl EvaluatePosition for MaterialRater {
    fn evaluate(&self, board: &Board) -> f64 {
        let white_king = board.king_square(Side::White).is_some();
        let black_king = board.king_square(Side::Black).is_some();

        if white_king != black_king {
            return if white_king {
                f64::INFINITY
            } else {
                f64::NEG_INFINITY
            };
        }

        (self.material(board, Side::White) + 1.0) / (self.material(board, Side::Black) + 1.0)
    }
}
