use std::fmt::Display;
use std::time::{Duration, Instant};

use tabled::{Table, Tabled};

use crate::board::{Board, Move, Piece};

/// Counts for the moves played at one ply of the tree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Tabled)]
pub struct PerftDepthResult {
    pub depth: usize,
    pub tot: u64,
    pub captures: u64,
    pub en_passants: u64,
    pub castles: u64,
    pub promotions: u64,
    pub checks: u64,
    pub checkmates: u64,
}

impl PerftDepthResult {
    fn empty(depth: usize) -> Self {
        PerftDepthResult {
            depth,
            ..PerftDepthResult::default()
        }
    }
}

pub struct PerftResult {
    pub depth_results: Vec<PerftDepthResult>,
    pub tot_nodes: u64,
    pub time_elapsed: Duration,
    pub nodes_per_second: f64,
}

impl Display for PerftResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "total nodes: {}", self.tot_nodes)?;
        writeln!(f, "time elapsed: {}", self.time_elapsed.as_secs_f32())?;
        writeln!(f, "nodes/s: {}", self.nodes_per_second)?;
        writeln!(f, "{}", Table::new(&self.depth_results))?;
        Ok(())
    }
}

pub fn perft(board: &Board, depth: usize) -> PerftResult {
    let mut depth_results: Vec<PerftDepthResult> =
        (1..=depth).map(PerftDepthResult::empty).collect();

    let start = Instant::now();

    perft_helper(&mut depth_results, board, 0);

    let time_elapsed = start.elapsed();

    let tot_nodes = depth_results.iter().fold(0, |tot, curr| tot + curr.tot);

    let nodes_per_second = tot_nodes as f64 / time_elapsed.as_secs_f64();

    PerftResult {
        depth_results,
        tot_nodes,
        time_elapsed,
        nodes_per_second,
    }
}

fn perft_helper(depth_results: &mut [PerftDepthResult], board: &Board, curr_depth: usize) {
    if curr_depth >= depth_results.len() {
        return;
    }

    let moves: Vec<Move> = board.legal_moves().collect();

    for mve in moves {
        let next = board.apply_move(mve);
        let curr_res = &mut depth_results[curr_depth];
        count_move(curr_res, board, mve);

        if next.is_in_check(next.to_move()) {
            curr_res.checks += 1;
            if next.legal_moves().next().is_none() {
                curr_res.checkmates += 1;
            }
        }

        perft_helper(depth_results, &next, curr_depth + 1);
    }
}

fn count_move(res: &mut PerftDepthResult, board: &Board, mve: Move) {
    res.tot += 1;

    let Some(moving) = board.piece_at(mve.src) else {
        return;
    };
    let captured = board.piece_at(mve.dest).is_some();

    match moving.piece {
        Piece::Pawn => {
            let en_passant = !captured && mve.src.col() != mve.dest.col();
            if captured || en_passant {
                res.captures += 1;
            }
            if en_passant {
                res.en_passants += 1;
            }
            if mve.dest.row() == 0 || mve.dest.row() == 7 {
                res.promotions += 1;
            }
        }
        Piece::King if mve.src.abs_diff(mve.dest) == 2 => res.castles += 1,
        _ if captured => res.captures += 1,
        _ => (),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;
    use testresult::TestResult;

    #[test_case(1, 20 ; "depth 1")]
    #[test_case(2, 400 ; "depth 2")]
    fn test_initial_node_counts(depth: usize, want: u64) {
        let res = perft(&Board::initial(), depth);
        assert_eq!(res.depth_results[depth - 1].tot, want);
        assert_eq!(res.depth_results[depth - 1].depth, depth);
    }

    #[test]
    fn test_count_en_passant() -> TestResult {
        let board = Board::from_text(
            ". . . . K . . .
             . . . . . . . .
             . . . . . . . .
             . . . P p . . .
             . . . . . . . .
             . . . . . . . .
             . . . . . . . .
             . . . . k . . .

             White to move",
        )?
        .with_en_passant_file(Some(3));

        let res = perft(&board, 1);
        assert_eq!(res.depth_results[0].en_passants, 1);
        assert_eq!(res.depth_results[0].captures, 1);
        Ok(())
    }

    #[test]
    fn test_count_promotions() -> TestResult {
        let board = Board::from_text(
            ". . . . K . . .
             p . . . . . . .
             . . . . . . . .
             . . . . . . . .
             . . . . . . . .
             . . . . . . . .
             . . . . . . . .
             . . . . . . . k

             White to move",
        )?;
        let res = perft(&board, 1);
        assert_eq!(res.depth_results[0].promotions, 1);
        // The new queen on a8 checks along the back rank
        assert_eq!(res.depth_results[0].checks, 1);
        Ok(())
    }

    #[test]
    fn test_display_has_table() {
        let out = perft(&Board::initial(), 1).to_string();
        assert!(out.contains("total nodes: 20"));
        assert!(out.contains("checkmates"));
    }
}
