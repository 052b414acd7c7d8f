//! ASCII board rendering for debugging and the UCI `d` command.

use std::fmt;
use std::fmt::Write as _;

use crate::board::Position;
use crate::types::sq;

const SEPARATOR: &str = "+---+---+---+---+---+---+---+---+";

/// Rendering options for [`Position::diagram`].
#[derive(Clone, Copy, Debug)]
pub struct DiagramOptions {
    pub black_at_top: bool,
    pub include_fen: bool,
    pub include_hash: bool,
    /// Square drawn with parentheses around its piece.
    pub highlight: Option<u8>,
}

impl Default for DiagramOptions {
    fn default() -> Self {
        Self {
            black_at_top: true,
            include_fen: true,
            include_hash: true,
            highlight: None,
        }
    }
}

impl Position {
    /// Board picture with rank numbers on the right and files underneath.
    /// White pieces are uppercase.
    pub fn diagram(&self, opts: DiagramOptions) -> String {
        let mut out = String::with_capacity(1024);
        for y in 0..8i8 {
            let rank = if opts.black_at_top { 7 - y } else { y };
            out.push_str(SEPARATOR);
            out.push('\n');
            for x in 0..8i8 {
                let file = if opts.black_at_top { x } else { 7 - x };
                let Some(s) = sq(file, rank) else {
                    continue;
                };
                let symbol = self.piece_at(s).map_or(' ', |pc| pc.symbol());
                if opts.highlight == Some(s) {
                    let _ = write!(out, "|({symbol})");
                } else {
                    let _ = write!(out, "| {symbol} ");
                }
            }
            let _ = writeln!(out, "| {}", rank + 1);
        }
        out.push_str(SEPARATOR);
        out.push('\n');
        out.push_str(if opts.black_at_top {
            "  a   b   c   d   e   f   g   h\n"
        } else {
            "  h   g   f   e   d   c   b   a\n"
        });

        if opts.include_fen || opts.include_hash {
            out.push('\n');
        }
        if opts.include_fen {
            let _ = writeln!(out, "Fen  : {}", self.to_fen());
        }
        if opts.include_hash {
            let _ = writeln!(out, "Hash : {:016x}", self.hash());
        }
        out
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.diagram(DiagramOptions::default()))
    }
}
