use minimax_chess::Square::*;
use minimax_chess::{Board, Move, Side, Square};

use test_case::test_case;
use testresult::TestResult;

fn sorted(squares: impl Iterator<Item = Square>) -> Vec<Square> {
    let mut squares: Vec<Square> = squares.collect();
    squares.sort();
    squares
}

#[test_case(E2, vec![E4, E3] ; "pawn")]
#[test_case(B1, vec![A3, C3] ; "knight")]
#[test_case(E1, vec![] ; "boxed in king")]
#[test_case(E7, vec![] ; "piece of side not to move")]
fn test_initial_destinations(origin: Square, want: Vec<Square>) {
    let board = Board::initial();
    let legal: Vec<Move> = board.legal_moves().filter(|mve| mve.src == origin).collect();
    assert_eq!(
        sorted(legal.iter().map(|mve| mve.dest)),
        want,
        "{}",
        origin
    );
}

#[test]
fn test_legal_moves_enumeration_order() {
    let moves: Vec<String> = Board::initial()
        .legal_moves()
        .map(|mve| mve.to_string())
        .collect();

    assert_eq!(
        moves,
        vec![
            "a2a3", "a2a4", "b2b3", "b2b4", "c2c3", "c2c4", "d2d3", "d2d4", "e2e3", "e2e4",
            "f2f3", "f2f4", "g2g3", "g2g4", "h2h3", "h2h4", "b1c3", "b1a3", "g1h3", "g1f3",
        ]
    );
}

/// Walks a game choosing the move at a fixed stride through each move list.
fn walk(plies: usize, stride: usize) -> Vec<Board> {
    let mut boards = vec![Board::initial()];
    let mut board = Board::initial();

    for ply in 0..plies {
        let moves: Vec<Move> = board.legal_moves().collect();
        if moves.is_empty() {
            break;
        }
        board = board.apply_move(moves[(ply * stride) % moves.len()]);
        boards.push(board);
    }
    boards
}

#[test_case(3 ; "stride 3")]
#[test_case(7 ; "stride 7")]
#[test_case(11 ; "stride 11")]
fn test_text_round_trip_reachable(stride: usize) -> TestResult {
    for board in walk(60, stride) {
        let text = board.to_text();
        let parsed = Board::from_text(&text)?;
        assert!(parsed.same_position(&board), "{}", text);
        assert_eq!(parsed.to_text(), text);
    }
    Ok(())
}

#[test_case(3 ; "stride 3")]
#[test_case(5 ; "stride 5")]
fn test_no_legal_move_leaves_king_in_check(stride: usize) {
    for board in walk(60, stride) {
        let side = board.to_move();
        for mve in board.legal_moves() {
            assert!(
                !board.apply_move(mve).is_in_check(side),
                "{} leaves {} in check\n{}",
                mve,
                side,
                board
            );
        }
    }
}

#[test]
fn test_side_flips_every_move() {
    let boards = walk(20, 2);
    for (ply, board) in boards.iter().enumerate() {
        let want = if ply % 2 == 0 { Side::White } else { Side::Black };
        assert_eq!(board.to_move(), want);
    }
}
