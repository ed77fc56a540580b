pub mod bitboard;
pub mod board;
pub mod evaluation;
pub mod move_gen;
pub mod perft;
pub mod search;

pub use bitboard::{BitBoard, Square};
pub use board::{
    Board, BoardTextError, CastlingRights, ColoredPiece, Move, MoveError, Piece, Side, State,
};
pub use evaluation::{
    AsyncEvaluatePosition, EvaluatePosition, MaterialRater, RaterParams, Yielding, DRAW_RATIO,
};
pub use move_gen::{is_king_in_check, EndState, KingSafety};
pub use perft::{perft, PerftDepthResult, PerftResult};
pub use search::{
    best_moves, best_moves_async, find_ai_move, pick_move, pick_move_async, rate_at_depth,
    rate_at_depth_async, AsyncDepthRater, BestMoves, DepthRater,
};
