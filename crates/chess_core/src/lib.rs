//! Board representation and rules for the PinChess engine.
//!
//! Everything here is engine-agnostic: position state with make/unmake,
//! hashing, draw detection, legal move generation and notation.

pub mod attacks;
pub mod bitboard;
pub mod board;
pub mod diagram;
pub mod error;
pub mod fen;
pub mod movegen;
pub mod perft;
pub mod time_control;
pub mod types;
pub mod uci;
pub mod zobrist;

pub use attacks::*;
pub use bitboard::*;
pub use board::*;
pub use diagram::DiagramOptions;
pub use error::{FenError, GameSetupError, MoveParseError};
pub use fen::STARTPOS_FEN;
pub use movegen::*;
pub use perft::{divide, perft};
pub use time_control::*;
pub use types::*;
pub use uci::*;
pub use zobrist::ZOBRIST;

// =============================================================================
// Engine trait
// =============================================================================

/// Outcome of one search.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// None when the side to move has no legal moves.
    pub best_move: Option<Move>,
    /// Centipawns from the side to move's point of view.
    pub score: i32,
    /// Deepest fully completed iteration.
    pub depth: u8,
    pub nodes: u64,
    /// True if the clock or a stop request cut the search short.
    pub stopped: bool,
}

/// Implemented by anything that can pick a move for the UCI front end.
pub trait Engine: Send {
    fn search(&mut self, pos: &Position, limits: SearchLimits) -> SearchResult;

    fn name(&self) -> &str;

    fn author(&self) -> &str {
        "PinChess developers"
    }

    /// Forget per-game state before a new game starts.
    fn new_game(&mut self) {}

    /// Applies a UCI option. Returns true if the option was recognized.
    fn set_option(&mut self, _name: &str, _value: &str) -> bool {
        false
    }
}
