//! UCI move text and `position` command handling.

use crate::board::Position;
use crate::error::{GameSetupError, MoveParseError};
use crate::fen::STARTPOS_FEN;
use crate::types::*;

pub fn move_to_uci(mv: Move) -> String {
    mv.to_string()
}

/// Resolves long-algebraic text ("e2e4", "e7e8q") against the legal moves of
/// `pos`, so the returned move carries correct capture/castle/ep flags.
pub fn parse_uci_move(pos: &Position, txt: &str) -> Result<Move, MoveParseError> {
    let syntax = || MoveParseError::Syntax(txt.to_string());
    if !(4..=5).contains(&txt.len()) || !txt.is_ascii() {
        return Err(syntax());
    }
    let from = coord_to_sq(&txt[0..2]).ok_or_else(syntax)?;
    let to = coord_to_sq(&txt[2..4]).ok_or_else(syntax)?;
    let promo = match txt[4..].chars().next() {
        None => None,
        Some(ch) => match PieceKind::from_symbol(ch) {
            Some(k @ (PieceKind::Queen | PieceKind::Rook | PieceKind::Bishop | PieceKind::Knight)) => {
                Some(k)
            }
            _ => return Err(syntax()),
        },
    };

    pos.legal_moves()
        .iter()
        .copied()
        .find(|m| m.from == from && m.to == to && m.promo == promo)
        .ok_or_else(|| MoveParseError::Illegal(txt.to_string()))
}

impl Position {
    /// Rebuilds a game from its starting FEN and the moves played since,
    /// then makes the final position the search root.
    ///
    /// Every move goes through `make_move`, so the repetition window covers
    /// the whole game rather than only the final position.
    pub fn from_game<S: AsRef<str>>(start_fen: &str, moves: &[S]) -> Result<Self, GameSetupError> {
        let mut pos = Position::from_fen(start_fen)?;
        for (index, text) in moves.iter().enumerate() {
            let mv = parse_uci_move(&pos, text.as_ref())
                .map_err(|source| GameSetupError::Move { index, source })?;
            pos.make_move(mv);
        }
        pos.mark_root();
        Ok(pos)
    }
}

/// Parses the arguments of a UCI `position` command:
/// `startpos [moves ...]` or `fen <6 fields> [moves ...]`.
pub fn position_from_uci(args: &[&str]) -> Result<Position, GameSetupError> {
    let moves_at = args.iter().position(|&a| a == "moves");
    let (setup, moves) = match moves_at {
        Some(i) => (&args[..i], &args[i + 1..]),
        None => (args, &[][..]),
    };

    let fen = match setup.split_first() {
        Some((&"fen", rest)) => rest.join(" "),
        _ => STARTPOS_FEN.to_string(),
    };
    Position::from_game(&fen, moves)
}

#[cfg(test)]
#[path = "uci_tests.rs"]
mod uci_tests;
