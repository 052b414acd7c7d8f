//! Forsyth-Edwards Notation in and out.

use crate::board::{CastlingRights, Position};
use crate::error::FenError;
use crate::types::*;

pub const STARTPOS_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

impl Position {
    /// Parses a FEN string. The halfmove and fullmove fields are optional.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.len() < 4 {
            return Err(FenError::FieldCount(parts.len()));
        }

        let mut pos = Position::empty();
        let ranks: Vec<&str> = parts[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::RankCount(ranks.len()));
        }
        for (rank_idx, rank_str) in ranks.iter().enumerate() {
            let rank = 7 - rank_idx as i8; // FEN lists rank 8 .. 1
            let mut file: i8 = 0;
            for ch in rank_str.chars() {
                if let Some(d) = ch.to_digit(10) {
                    file += d as i8;
                } else {
                    let kind = PieceKind::from_symbol(ch).ok_or(FenError::Piece(ch))?;
                    let color = if ch.is_ascii_uppercase() {
                        Color::White
                    } else {
                        Color::Black
                    };
                    let s = sq(file, rank).ok_or(FenError::RankWidth { rank: rank_idx })?;
                    pos.put_piece(s, Piece::new(color, kind));
                    file += 1;
                }
                if file > 8 {
                    return Err(FenError::RankWidth { rank: rank_idx });
                }
            }
            if file != 8 {
                return Err(FenError::RankWidth { rank: rank_idx });
            }
        }

        for c in [Color::White, Color::Black] {
            if pos.pieces().count(c, PieceKind::King) != 1 {
                return Err(FenError::Kings);
            }
        }

        let side_to_move = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::SideToMove(other.to_string())),
        };

        let mut castling = CastlingRights::default();
        if parts[2] != "-" {
            for c in parts[2].chars() {
                match c {
                    'K' => castling.wk = true,
                    'Q' => castling.wq = true,
                    'k' => castling.bk = true,
                    'q' => castling.bq = true,
                    _ => return Err(FenError::Castling(c)),
                }
            }
        }

        let en_passant = match parts[3] {
            "-" => None,
            s => Some(coord_to_sq(s).ok_or_else(|| FenError::EnPassant(s.to_string()))?),
        };

        let counter = |idx: usize, default: u32| -> Result<u32, FenError> {
            match parts.get(idx) {
                Some(s) => s.parse().map_err(|_| FenError::Counter(s.to_string())),
                None => Ok(default),
            }
        };
        let halfmove_clock = counter(4, 0)?;
        let fullmove_number = counter(5, 1)?;

        pos.finish_setup(
            side_to_move,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_number,
        );
        Ok(pos)
    }

    pub fn to_fen(&self) -> String {
        let mut out = String::with_capacity(90);
        for rank in (0..8i8).rev() {
            let mut empty = 0;
            for file in 0..8i8 {
                let s = (rank * 8 + file) as u8;
                match self.piece_at(s) {
                    Some(pc) => {
                        if empty > 0 {
                            out.push_str(&empty.to_string());
                            empty = 0;
                        }
                        out.push(pc.symbol());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                out.push_str(&empty.to_string());
            }
            if rank > 0 {
                out.push('/');
            }
        }

        out.push(' ');
        out.push(if self.is_white_to_move() { 'w' } else { 'b' });
        out.push(' ');

        let rights = self.castling();
        let mut any = false;
        for (has, ch) in [
            (rights.wk, 'K'),
            (rights.wq, 'Q'),
            (rights.bk, 'k'),
            (rights.bq, 'q'),
        ] {
            if has {
                out.push(ch);
                any = true;
            }
        }
        if !any {
            out.push('-');
        }

        out.push(' ');
        match self.en_passant() {
            Some(s) => out.push_str(&sq_to_coord(s)),
            None => out.push('-'),
        }
        out.push_str(&format!(
            " {} {}",
            self.halfmove_clock(),
            self.fullmove_number()
        ));
        out
    }
}

#[cfg(test)]
#[path = "fen_tests.rs"]
mod fen_tests;
