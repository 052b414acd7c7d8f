//! Legal move generation.
//!
//! Pseudo-legal moves are generated from the mailbox, then filtered by
//! testing the mover's king against the occupancy the move would leave.
//! Nothing here mutates the position.

use crate::bitboard::Bitboard;
use crate::board::Position;
use crate::types::*;

/// Upper bound on legal moves in any chess position.
pub const MAX_MOVES: usize = 218;

const PROMOTIONS: [PieceKind; 4] = [
    PieceKind::Queen,
    PieceKind::Rook,
    PieceKind::Bishop,
    PieceKind::Knight,
];
const KNIGHT_DELTAS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (-1, 2),
    (-2, 1),
    (1, -2),
    (2, -1),
    (-1, -2),
    (-2, -1),
];
const KING_DELTAS: [(i8, i8); 8] = [
    (1, 1),
    (1, 0),
    (1, -1),
    (0, 1),
    (0, -1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];
const DIAGONALS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const ORTHOGONALS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Allocating convenience wrapper.
pub fn legal_moves(pos: &Position) -> Vec<Move> {
    let mut out = Vec::with_capacity(64);
    generate_legal_moves(pos, &mut out, true);
    out
}

/// Fills `out` with the legal moves of the side to move. With
/// `include_quiet == false` only captures (en passant included) are produced.
pub fn generate_legal_moves(pos: &Position, out: &mut Vec<Move>, include_quiet: bool) {
    out.clear();
    pseudo_moves(pos, out, include_quiet);
    out.retain(|&mv| is_legal(pos, mv));
}

/// Early-exit check used by checkmate/stalemate detection.
pub fn has_legal_move(pos: &Position) -> bool {
    let mut buf = Vec::with_capacity(64);
    pseudo_moves(pos, &mut buf, true);
    buf.into_iter().any(|mv| is_legal(pos, mv))
}

/// Does the mover's king survive `mv`?
fn is_legal(pos: &Position, mv: Move) -> bool {
    let us = pos.side_to_move();
    let king = if mv.piece == PieceKind::King {
        mv.to
    } else {
        match pos.king_square(us) {
            Some(k) => k,
            // Kingless positions only arise after a forced skip-turn.
            None => return true,
        }
    };

    let mut occupied = pos.pieces().occupied();
    occupied.clear(mv.from);
    occupied.set(mv.to);
    let mut removed = Bitboard::from_square(mv.to);
    if mv.is_en_passant {
        let cap = if us == Color::White { mv.to - 8 } else { mv.to + 8 };
        occupied.clear(cap);
        removed.set(cap);
    }
    !pos.attacked_with(king, us.other(), occupied, removed)
}

fn pseudo_moves(pos: &Position, out: &mut Vec<Move>, include_quiet: bool) {
    let us = pos.side_to_move();
    let mut own = pos.pieces().color(us);
    while let Some(from) = own.pop_lsb() {
        let Some(pc) = pos.piece_at(from) else {
            continue;
        };
        match pc.kind {
            PieceKind::Pawn => gen_pawn(pos, from, us, out, include_quiet),
            PieceKind::Knight => gen_steps(pos, from, pc, &KNIGHT_DELTAS, out, include_quiet),
            PieceKind::Bishop => gen_slider(pos, from, pc, &DIAGONALS, out, include_quiet),
            PieceKind::Rook => gen_slider(pos, from, pc, &ORTHOGONALS, out, include_quiet),
            PieceKind::Queen => {
                gen_slider(pos, from, pc, &DIAGONALS, out, include_quiet);
                gen_slider(pos, from, pc, &ORTHOGONALS, out, include_quiet);
            }
            PieceKind::King => {
                gen_steps(pos, from, pc, &KING_DELTAS, out, include_quiet);
                if include_quiet {
                    gen_castle(pos, from, us, out);
                }
            }
        }
    }
}

fn push_pawn_move(out: &mut Vec<Move>, mv: Move, promo_rank: i8) {
    if rank_of(mv.to) == promo_rank {
        for pk in PROMOTIONS {
            out.push(mv.with_promo(pk));
        }
    } else {
        out.push(mv);
    }
}

fn gen_pawn(pos: &Position, from: u8, c: Color, out: &mut Vec<Move>, include_quiet: bool) {
    let f = file_of(from);
    let r = rank_of(from);
    let (dir, start_rank, promo_rank): (i8, i8, i8) = match c {
        Color::White => (1, 1, 7),
        Color::Black => (-1, 6, 0),
    };

    if include_quiet
        && let Some(to) = sq(f, r + dir)
        && pos.piece_at(to).is_none()
    {
        push_pawn_move(out, Move::new(from, to, PieceKind::Pawn), promo_rank);
        if r == start_rank
            && let Some(to2) = sq(f, r + 2 * dir)
            && pos.piece_at(to2).is_none()
        {
            out.push(Move::new(from, to2, PieceKind::Pawn));
        }
    }

    for df in [-1, 1] {
        let Some(to) = sq(f + df, r + dir) else {
            continue;
        };
        match pos.piece_at(to) {
            Some(target) if target.color != c => {
                let mv = Move::new(from, to, PieceKind::Pawn).with_capture(Some(target.kind));
                push_pawn_move(out, mv, promo_rank);
            }
            None if pos.en_passant() == Some(to) => {
                let mut mv = Move::new(from, to, PieceKind::Pawn).with_capture(Some(PieceKind::Pawn));
                mv.is_en_passant = true;
                out.push(mv);
            }
            _ => {}
        }
    }
}

/// Single-step movers: knight and king.
fn gen_steps(
    pos: &Position,
    from: u8,
    pc: Piece,
    deltas: &[(i8, i8)],
    out: &mut Vec<Move>,
    include_quiet: bool,
) {
    let f = file_of(from);
    let r = rank_of(from);
    for (df, dr) in deltas {
        if let Some(to) = sq(f + df, r + dr) {
            match pos.piece_at(to) {
                None if include_quiet => out.push(Move::new(from, to, pc.kind)),
                Some(t) if t.color != pc.color => {
                    out.push(Move::new(from, to, pc.kind).with_capture(Some(t.kind)))
                }
                _ => {}
            }
        }
    }
}

fn gen_slider(
    pos: &Position,
    from: u8,
    pc: Piece,
    dirs: &[(i8, i8)],
    out: &mut Vec<Move>,
    include_quiet: bool,
) {
    let f0 = file_of(from);
    let r0 = rank_of(from);
    for (df, dr) in dirs {
        let mut f = f0 + df;
        let mut r = r0 + dr;
        while let Some(to) = sq(f, r) {
            match pos.piece_at(to) {
                None => {
                    if include_quiet {
                        out.push(Move::new(from, to, pc.kind));
                    }
                }
                Some(t) => {
                    if t.color != pc.color {
                        out.push(Move::new(from, to, pc.kind).with_capture(Some(t.kind)));
                    }
                    break;
                }
            }
            f += df;
            r += dr;
        }
    }
}

fn gen_castle(pos: &Position, from: u8, c: Color, out: &mut Vec<Move>) {
    let home = match c {
        Color::White => 4u8,
        Color::Black => 60u8,
    };
    if from != home || pos.in_check(c) {
        return;
    }
    let enemy = c.other();
    let empty = |squares: &[u8]| squares.iter().all(|&s| pos.piece_at(s).is_none());
    let safe = |squares: &[u8]| squares.iter().all(|&s| !pos.is_square_attacked(s, enemy));

    // King side: f and g empty and safe. Queen side: b, c, d empty; c, d safe.
    if pos.castling().kingside(c) && empty(&[home + 1, home + 2]) && safe(&[home + 1, home + 2]) {
        let mut mv = Move::new(home, home + 2, PieceKind::King);
        mv.is_castle = true;
        out.push(mv);
    }
    if pos.castling().queenside(c)
        && empty(&[home - 1, home - 2, home - 3])
        && safe(&[home - 1, home - 2])
    {
        let mut mv = Move::new(home, home - 2, PieceKind::King);
        mv.is_castle = true;
        out.push(mv);
    }
}

#[cfg(test)]
#[path = "movegen_tests.rs"]
mod movegen_tests;
