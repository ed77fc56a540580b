use std::fmt;
use std::str::FromStr;

use crate::bitboard::Square;
use crate::board::{Board, ColoredPiece, Side};

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum BoardTextError {
    #[error("num rows: want 8 got {0}")]
    RowCount(usize),

    #[error("row {row}: want 8 squares got {width}")]
    RowWidth { row: usize, width: usize },

    #[error("unknown piece character: {0:?}")]
    UnknownPiece(char),

    #[error("side to move: want 'White to move'|'Black to move' got {0:?}")]
    SideToMove(String),
}

const WHITE_TO_MOVE: &str = "White to move";
const BLACK_TO_MOVE: &str = "Black to move";

impl Board {
    /// Parses the 8x8 grid followed by the side to move line.
    ///
    /// Lowercase letters are white, uppercase black, `.` empty. Castling rights
    /// aren't part of the format so every right is granted, and there is no
    /// en passant target.
    pub fn from_text(text: &str) -> Result<Self, BoardTextError> {
        let mut lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        let side_line = lines.pop().unwrap_or_default();
        if lines.len() != 8 {
            return Err(BoardTextError::RowCount(lines.len()));
        }

        let to_move = match side_line {
            WHITE_TO_MOVE => Side::White,
            BLACK_TO_MOVE => Side::Black,
            _ => return Err(BoardTextError::SideToMove(side_line.to_string())),
        };

        let mut board = Board::empty(to_move);

        for (row, line) in lines.into_iter().enumerate() {
            let cells: Vec<char> = line.chars().filter(|ch| !ch.is_whitespace()).collect();
            if cells.len() != 8 {
                return Err(BoardTextError::RowWidth {
                    row,
                    width: cells.len(),
                });
            }

            for (col, ch) in cells.into_iter().enumerate() {
                if ch == '.' {
                    continue;
                }
                let colored = ColoredPiece::try_from(ch)?;
                if let Some(sq) = Square::from_row_col(row as u8, col as u8) {
                    board.put(sq, colored);
                }
            }
        }

        Ok(board)
    }

    pub fn to_text(&self) -> String {
        self.to_string()
    }
}

impl FromStr for Board {
    type Err = BoardTextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Board::from_text(s)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..8u8 {
            let cells: Vec<String> = (0..8u8)
                .map(|col| {
                    Square::from_row_col(row, col)
                        .and_then(|sq| self.piece_at(sq))
                        .map_or('.', ColoredPiece::to_char)
                        .to_string()
                })
                .collect();
            writeln!(f, "{}", cells.join(" "))?;
        }

        let side_line = match self.to_move() {
            Side::White => WHITE_TO_MOVE,
            Side::Black => BLACK_TO_MOVE,
        };
        write!(f, "\n{}", side_line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitboard::Square::*;
    use crate::board::{CastlingRights, Move, Piece};
    use test_case::test_case;
    use testresult::TestResult;

    const INITIAL: &str = "R N B Q K B N R
P P P P P P P P
. . . . . . . .
. . . . . . . .
. . . . . . . .
. . . . . . . .
p p p p p p p p
r n b q k b n r

White to move";

    #[test]
    fn test_to_text_initial() {
        assert_eq!(Board::initial().to_text(), INITIAL);
    }

    #[test]
    fn test_from_text_initial() -> TestResult {
        assert_eq!(Board::from_text(INITIAL)?, Board::initial());
        Ok(())
    }

    #[test]
    fn test_from_text_grants_all_rights() -> TestResult {
        let board = Board::from_text(INITIAL)?;
        assert_eq!(board.castling_rights(), CastlingRights::all());
        assert_eq!(board.en_passant_file(), None);
        Ok(())
    }

    #[test]
    fn test_from_text_tolerates_indentation() -> TestResult {
        let indented = INITIAL
            .lines()
            .map(|line| format!("    {}  ", line))
            .collect::<Vec<_>>()
            .join("\n");
        let board: Board = format!("\n{}\n\n", indented).parse()?;
        assert_eq!(board, Board::initial());
        Ok(())
    }

    #[test_case(vec![Move::new(E2, E4)] ; "one move")]
    #[test_case(vec![Move::new(E2, E4), Move::new(D7, D5), Move::new(E4, D5)] ; "capture")]
    #[test_case(vec![Move::new(G1, F3), Move::new(B8, C6), Move::new(F3, G5), Move::new(C6, D4)] ; "knights")]
    fn test_round_trip_reachable(moves: Vec<Move>) -> TestResult {
        let board = moves
            .into_iter()
            .fold(Board::initial(), |board, mve| board.apply_move(mve));

        assert!(Board::from_text(&board.to_text())?.same_position(&board));
        Ok(())
    }

    #[test]
    fn test_round_trip_text() -> TestResult {
        let text = ". . . . K . . .
. . . . . . . .
. . . . . . . .
. . . . P p . .
. . . . . . . .
. . . . . . . .
. . . . . . . .
. . . . k . . .

Black to move";
        let board = Board::from_text(text)?;
        assert_eq!(board.to_text(), text);
        assert_eq!(
            board.piece_at(E5),
            Some(ColoredPiece::new(Piece::Pawn, Side::Black))
        );
        assert_eq!(
            board.piece_at(F5),
            Some(ColoredPiece::new(Piece::Pawn, Side::White))
        );
        Ok(())
    }

    #[test_case(
        "r n b q k b n r\n\nWhite to move",
        BoardTextError::RowCount(1) ;
        "too few rows"
    )]
    #[test_case(
        &INITIAL.replace("p p p p p p p p", "p p p p p p p"),
        BoardTextError::RowWidth { row: 6, width: 7 } ;
        "short row"
    )]
    #[test_case(
        &INITIAL.replace("r n b q", "r x b q"),
        BoardTextError::UnknownPiece('x') ;
        "unknown piece"
    )]
    #[test_case(
        &INITIAL.replace("White to move", "Red to move"),
        BoardTextError::SideToMove("Red to move".to_string()) ;
        "bad side"
    )]
    #[test_case("", BoardTextError::RowCount(0) ; "empty")]
    fn test_from_text_err(text: &str, want: BoardTextError) {
        assert_eq!(Board::from_text(text), Err(want));
    }
}
