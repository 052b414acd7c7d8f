//! Errors raised at the text boundary (FEN and UCI move parsing).
//!
//! The board itself never reports errors: illegal moves are a caller bug.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FenError {
    #[error("expected at least 4 fields, found {0}")]
    FieldCount(usize),
    #[error("expected 8 ranks, found {0}")]
    RankCount(usize),
    #[error("rank {rank} does not describe exactly 8 files")]
    RankWidth { rank: usize },
    #[error("invalid piece character '{0}'")]
    Piece(char),
    #[error("invalid side to move '{0}'")]
    SideToMove(String),
    #[error("invalid castling character '{0}'")]
    Castling(char),
    #[error("invalid en passant square '{0}'")]
    EnPassant(String),
    #[error("invalid move counter '{0}'")]
    Counter(String),
    #[error("each side needs exactly one king")]
    Kings,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveParseError {
    #[error("malformed move text '{0}'")]
    Syntax(String),
    #[error("'{0}' is not legal in this position")]
    Illegal(String),
}

/// Anything that can go wrong rebuilding a game from its start position and moves.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameSetupError {
    #[error("bad start position: {0}")]
    Fen(#[from] FenError),
    #[error("bad move #{index}: {source}")]
    Move {
        index: usize,
        #[source]
        source: MoveParseError,
    },
}
