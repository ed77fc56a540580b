use std::fmt;

use futures::executor::block_on;
use minimax_chess::{find_ai_move, Board, EndState, MaterialRater, Move, RaterParams, Side};
use rand::{Rng, RngCore};
use serde::Serialize;
use tracing::{debug, trace};

/// Something that can choose a move for the side to move.
pub trait MoveStrategy {
    /// Returns `None` only when `board` has no legal move.
    fn choose_move(&self, board: &Board, rng: &mut dyn RngCore) -> Option<Move>;
}

/// Plays [`find_ai_move`] over a [`MaterialRater`] built from `params`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RaterStrategy {
    pub params: RaterParams,
    pub depth: u8,
}

impl RaterStrategy {
    pub fn new(params: RaterParams, depth: u8) -> Self {
        Self { params, depth }
    }
}

impl MoveStrategy for RaterStrategy {
    fn choose_move(&self, board: &Board, rng: &mut dyn RngCore) -> Option<Move> {
        let rand = rng.gen::<f64>();
        block_on(find_ai_move(board, MaterialRater(self.params), self.depth, rand))
    }
}

impl<F> MoveStrategy for F
where
    F: Fn(&Board) -> Option<Move>,
{
    fn choose_move(&self, board: &Board, _rng: &mut dyn RngCore) -> Option<Move> {
        self(board)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOutcome {
    Checkmate { winner: Side },
    Stalemate,
    MoveLimit,
}

impl fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameOutcome::Checkmate { winner } => write!(f, "{} wins by checkmate", winner),
            GameOutcome::Stalemate => write!(f, "stalemate"),
            GameOutcome::MoveLimit => write!(f, "move limit reached"),
        }
    }
}

/// A finished game: where it ended and how.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayedGame {
    pub outcome: GameOutcome,
    pub moves: Vec<Move>,
    pub final_board: Board,
}

/// Plays `board` out between two strategies.
///
/// `on_move` sees every position after a move is applied. The game stops after
/// `max_moves` plies with [`GameOutcome::MoveLimit`].
pub fn play_game_from(
    board: Board,
    white: &dyn MoveStrategy,
    black: &dyn MoveStrategy,
    max_moves: usize,
    rng: &mut dyn RngCore,
    mut on_move: impl FnMut(Move, &Board),
) -> PlayedGame {
    let mut board = board;
    let mut moves = Vec::new();

    let outcome = loop {
        if let Some(end_state) = board.end_state() {
            break match end_state {
                EndState::Checkmate => GameOutcome::Checkmate {
                    winner: board.to_move().opposite_side(),
                },
                EndState::Stalemate => GameOutcome::Stalemate,
            };
        }
        if moves.len() >= max_moves {
            break GameOutcome::MoveLimit;
        }

        let strategy = match board.to_move() {
            Side::White => white,
            Side::Black => black,
        };
        let Some(mve) = strategy.choose_move(&board, rng) else {
            break GameOutcome::Stalemate;
        };
        trace!(ply = moves.len(), %mve, "self-play move");

        board = board.apply_move(mve);
        moves.push(mve);
        on_move(mve, &board);
    };

    debug!(plies = moves.len(), %outcome, "game finished");
    PlayedGame {
        outcome,
        moves,
        final_board: board,
    }
}

/// Plays a game from the initial position.
pub fn play_game(
    white: &dyn MoveStrategy,
    black: &dyn MoveStrategy,
    max_moves: usize,
    rng: &mut dyn RngCore,
) -> GameOutcome {
    play_game_from(Board::initial(), white, black, max_moves, rng, |_, _| {}).outcome
}
