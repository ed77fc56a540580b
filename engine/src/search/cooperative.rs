use futures::future::{join_all, BoxFuture, FutureExt};
use tracing::debug;

use super::{rate_at_depth, BestMoves};
use crate::board::{Board, Move};
use crate::evaluation::{AsyncEvaluatePosition, EvaluatePosition, Yielding};

/// Asynchronous counterpart of [`super::DepthRater`].
#[derive(Clone, Copy, Debug)]
pub struct AsyncDepthRater<E> {
    evaluator: E,
    depth: u8,
}

pub fn rate_at_depth_async<E: AsyncEvaluatePosition>(evaluator: E, depth: u8) -> AsyncDepthRater<E> {
    AsyncDepthRater { evaluator, depth }
}

impl<E: AsyncEvaluatePosition> AsyncEvaluatePosition for AsyncDepthRater<E> {
    fn evaluate(&self, board: Board) -> BoxFuture<'_, f64> {
        rate_recursive(&self.evaluator, board, self.depth)
    }

    fn draw_score(&self) -> f64 {
        self.evaluator.draw_score()
    }
}

fn rate_recursive<E>(evaluator: &E, board: Board, depth: u8) -> BoxFuture<'_, f64>
where
    E: AsyncEvaluatePosition + ?Sized,
{
    if depth == 0 {
        return evaluator.evaluate(board);
    }
    async move {
        best_moves_by(
            &board,
            |child| rate_recursive(evaluator, child, depth - 1),
            evaluator.draw_score(),
        )
        .await
        .rating
    }
    .boxed()
}

/// Rates all children together and waits for every rating before comparing them.
async fn best_moves_by<'a, F>(board: &Board, rate: F, draw_score: f64) -> BestMoves
where
    F: Fn(Board) -> BoxFuture<'a, f64>,
{
    let moves: Vec<Move> = board.legal_moves().collect();
    let ratings = join_all(moves.iter().map(|&mve| rate(board.apply_move(mve)))).await;
    BestMoves::collect(board, moves.into_iter().zip(ratings), draw_score)
}

pub async fn best_moves_async<E>(board: &Board, evaluator: &E) -> BestMoves
where
    E: AsyncEvaluatePosition + ?Sized,
{
    best_moves_by(board, |child| evaluator.evaluate(child), evaluator.draw_score()).await
}

pub async fn pick_move_async<E>(board: &Board, evaluator: &E, rand: f64) -> Option<Move>
where
    E: AsyncEvaluatePosition + ?Sized,
{
    let best = best_moves_async(board, evaluator).await;
    debug!(
        tied = best.moves.len(),
        rating = best.rating,
        side = %board.to_move(),
        "rated root moves"
    );
    best.pick(rand)
}

/// Chooses a move the way the self-play player does.
///
/// Depth 0 rates each move with `evaluator` directly. Otherwise each depth 1 subtree
/// is rated synchronously, with one suspension point per subtree, beneath
/// `depth - 1` asynchronous plies, so `depth + 1` plies are looked at in total.
pub async fn find_ai_move<E>(board: &Board, evaluator: E, depth: u8, rand: f64) -> Option<Move>
where
    E: EvaluatePosition + Sync,
{
    if depth == 0 {
        return pick_move_async(board, &Yielding(evaluator), rand).await;
    }

    let rate_shallow = Yielding(rate_at_depth(evaluator, 1));
    let rate_deep = rate_at_depth_async(rate_shallow, depth - 1);
    pick_move_async(board, &rate_deep, rand).await
}
