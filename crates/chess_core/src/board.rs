use std::cell::{Cell, OnceCell};
use std::ops::{Deref, DerefMut};

use crate::attacks::{bishop_attacks, king_attacks, knight_attacks, pawn_attacks, rook_attacks};
use crate::bitboard::{Bitboard, PieceSets};
use crate::movegen::{MAX_MOVES, generate_legal_moves, has_legal_move};
use crate::types::*;
use crate::zobrist::ZOBRIST;

const WK: u8 = 1;
const WQ: u8 = 2;
const BK: u8 = 4;
const BQ: u8 = 8;

/// Rights that survive a move touching each square (ANDed for `from` and `to`).
static CASTLE_KEEP: [u8; 64] = {
    let mut keep = [0xFu8; 64];
    keep[0] = !WQ & 0xF;
    keep[4] = !(WK | WQ) & 0xF;
    keep[7] = !WK & 0xF;
    keep[56] = !BQ & 0xF;
    keep[60] = !(BK | BQ) & 0xF;
    keep[63] = !BK & 0xF;
    keep
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CastlingRights {
    pub wk: bool,
    pub wq: bool,
    pub bk: bool,
    pub bq: bool,
}

impl CastlingRights {
    pub const ALL: CastlingRights = CastlingRights {
        wk: true,
        wq: true,
        bk: true,
        bq: true,
    };

    pub fn bits(self) -> u8 {
        (self.wk as u8) * WK | (self.wq as u8) * WQ | (self.bk as u8) * BK | (self.bq as u8) * BQ
    }

    pub fn from_bits(bits: u8) -> Self {
        Self {
            wk: bits & WK != 0,
            wq: bits & WQ != 0,
            bk: bits & BK != 0,
            bq: bits & BQ != 0,
        }
    }

    pub fn kingside(self, c: Color) -> bool {
        match c {
            Color::White => self.wk,
            Color::Black => self.bk,
        }
    }

    pub fn queenside(self, c: Color) -> bool {
        match c {
            Color::White => self.wq,
            Color::Black => self.bq,
        }
    }
}

/// Irreversible state saved by `make_move`/`skip_turn`, restored on undo.
#[derive(Clone, Debug)]
struct Undo {
    mv: Option<Move>,
    captured: Option<(Piece, u8)>,
    castling: CastlingRights,
    en_passant: Option<u8>,
    halfmove_clock: u32,
    fullmove_number: u32,
    hash: u64,
    repetition_start: usize,
}

#[derive(Clone, Debug, Default)]
struct MoveCache {
    legal: OnceCell<Vec<Move>>,
    captures: OnceCell<Vec<Move>>,
    legal_count: Cell<Option<usize>>,
}

/// Mutable board state shared by the whole search.
///
/// Moves are applied and reverted in place. `make_move`/`unmake_move` must
/// nest strictly; nothing is validated. Prefer [`Position::play`], which
/// reverts the move when the guard drops.
#[derive(Clone, Debug)]
pub struct Position {
    board: [Option<Piece>; 64],
    sets: PieceSets,
    side_to_move: Color,
    castling: CastlingRights,
    en_passant: Option<u8>, // square behind a pawn that just advanced 2
    halfmove_clock: u32,
    fullmove_number: u32,
    hash: u64,
    /// Hashes of every position reached; only `repetition[repetition_start..]`
    /// is reachable again (pawn moves and captures reset the window).
    repetition: Vec<u64>,
    repetition_start: usize,
    game_history: Vec<u64>,
    search_ply: u32,
    game_ply: u32,
    undo_stack: Vec<Undo>,
    cache: MoveCache,
}

impl Position {
    pub(crate) fn empty() -> Self {
        Position {
            board: [None; 64],
            sets: PieceSets::default(),
            side_to_move: Color::White,
            castling: CastlingRights::default(),
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            hash: 0,
            repetition: Vec::with_capacity(128),
            repetition_start: 0,
            game_history: Vec::new(),
            search_ply: 0,
            game_ply: 0,
            undo_stack: Vec::with_capacity(64),
            cache: MoveCache::default(),
        }
    }

    /// Finishes construction once pieces and state fields are placed.
    pub(crate) fn finish_setup(
        &mut self,
        side_to_move: Color,
        castling: CastlingRights,
        en_passant: Option<u8>,
        halfmove_clock: u32,
        fullmove_number: u32,
    ) {
        self.side_to_move = side_to_move;
        self.castling = castling;
        self.en_passant = en_passant;
        self.halfmove_clock = halfmove_clock;
        self.fullmove_number = fullmove_number.max(1);
        self.hash = self.compute_hash();
        self.repetition.clear();
        self.repetition.push(self.hash);
        self.repetition_start = 0;
        self.undo_stack.clear();
        self.invalidate_cache();
        self.mark_root();
    }

    pub fn startpos() -> Self {
        let mut p = Position::empty();
        let back = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        for (f, &kind) in back.iter().enumerate() {
            p.put_piece(f as u8, Piece::new(Color::White, kind));
            p.put_piece(8 + f as u8, Piece::new(Color::White, PieceKind::Pawn));
            p.put_piece(48 + f as u8, Piece::new(Color::Black, PieceKind::Pawn));
            p.put_piece(56 + f as u8, Piece::new(Color::Black, kind));
        }
        p.finish_setup(Color::White, CastlingRights::ALL, None, 0, 1);
        p
    }

    /// Declares the current position as the search root.
    ///
    /// Resets the search ply, records the game ply and snapshots the game's
    /// repetition window. Moves made before this call can no longer be unmade.
    pub fn mark_root(&mut self) {
        self.search_ply = 0;
        self.game_ply =
            (self.fullmove_number - 1) * 2 + u32::from(self.side_to_move == Color::Black);
        self.game_history = self.repetition[self.repetition_start..].to_vec();
        self.undo_stack.clear();
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    #[inline]
    pub fn piece_at(&self, sq: u8) -> Option<Piece> {
        self.board[sq as usize]
    }

    #[inline]
    pub fn pieces(&self) -> &PieceSets {
        &self.sets
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn is_white_to_move(&self) -> bool {
        self.side_to_move == Color::White
    }

    #[inline]
    pub fn castling(&self) -> CastlingRights {
        self.castling
    }

    pub fn has_kingside_castle_right(&self, c: Color) -> bool {
        self.castling.kingside(c)
    }

    pub fn has_queenside_castle_right(&self, c: Color) -> bool {
        self.castling.queenside(c)
    }

    #[inline]
    pub fn en_passant(&self) -> Option<u8> {
        self.en_passant
    }

    /// Plies since the last pawn move or capture.
    #[inline]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    #[inline]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// Incrementally maintained Zobrist hash.
    #[inline]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// Moves made since the search root.
    #[inline]
    pub fn search_ply(&self) -> u32 {
        self.search_ply
    }

    /// Plies played in the real game up to the search root.
    #[inline]
    pub fn game_ply(&self) -> u32 {
        self.game_ply
    }

    /// Hashes still reachable from the current position, oldest first.
    pub fn repetition_history(&self) -> &[u64] {
        &self.repetition[self.repetition_start..]
    }

    /// Repetition window as it stood at the search root. Positions visited
    /// while searching are not included.
    pub fn game_repetition_history(&self) -> &[u64] {
        &self.game_history
    }

    pub fn king_square(&self, c: Color) -> Option<u8> {
        self.sets.pieces(c, PieceKind::King).lsb()
    }

    // -------------------------------------------------------------------------
    // Hashing
    // -------------------------------------------------------------------------

    /// Full hash recomputation. The search never calls this; it exists to
    /// seed new positions and to verify the incremental hash.
    pub fn compute_hash(&self) -> u64 {
        let mut h = 0u64;
        for sq in 0..64u8 {
            if let Some(pc) = self.piece_at(sq) {
                h ^= ZOBRIST.piece_key(pc, sq);
            }
        }
        if self.side_to_move == Color::Black {
            h ^= ZOBRIST.black_to_move;
        }
        h ^= ZOBRIST.castling_key(self.castling.bits());
        h ^= ZOBRIST.ep_key(self.en_passant);
        h
    }

    // -------------------------------------------------------------------------
    // Attacks and check
    // -------------------------------------------------------------------------

    pub fn is_square_attacked(&self, target: u8, by: Color) -> bool {
        self.attacked_with(target, by, self.sets.occupied(), Bitboard::EMPTY)
    }

    /// Is `sq` attacked by the side not to move?
    pub fn square_is_attacked_by_opponent(&self, sq: u8) -> bool {
        self.is_square_attacked(sq, self.side_to_move.other())
    }

    /// Attack test against a hypothetical occupancy. Pieces of `by` on
    /// `removed` are ignored (they were just captured).
    pub(crate) fn attacked_with(
        &self,
        target: u8,
        by: Color,
        occupied: Bitboard,
        removed: Bitboard,
    ) -> bool {
        let theirs = |kind| self.sets.pieces(by, kind) & !removed;
        let queens = theirs(PieceKind::Queen);

        !(pawn_attacks(target, by.other()) & theirs(PieceKind::Pawn)).is_empty()
            || !(knight_attacks(target) & theirs(PieceKind::Knight)).is_empty()
            || !(king_attacks(target) & theirs(PieceKind::King)).is_empty()
            || !(bishop_attacks(target, occupied) & (theirs(PieceKind::Bishop) | queens)).is_empty()
            || !(rook_attacks(target, occupied) & (theirs(PieceKind::Rook) | queens)).is_empty()
    }

    pub fn in_check(&self, c: Color) -> bool {
        match self.king_square(c) {
            Some(ksq) => self.is_square_attacked(ksq, c.other()),
            None => false,
        }
    }

    /// Is the side to move in check?
    pub fn is_in_check(&self) -> bool {
        self.in_check(self.side_to_move)
    }

    // -------------------------------------------------------------------------
    // Legal moves (memoized until the next mutation)
    // -------------------------------------------------------------------------

    pub fn legal_moves(&self) -> &[Move] {
        self.cache.legal.get_or_init(|| {
            let mut out = Vec::with_capacity(MAX_MOVES);
            generate_legal_moves(self, &mut out, true);
            self.cache.legal_count.set(Some(out.len()));
            out
        })
    }

    pub fn capture_moves(&self) -> &[Move] {
        self.cache.captures.get_or_init(|| {
            let mut out = Vec::with_capacity(MAX_MOVES);
            generate_legal_moves(self, &mut out, false);
            out
        })
    }

    /// Non-caching variant writing into a caller-owned buffer.
    pub fn legal_moves_into(&self, out: &mut Vec<Move>, captures_only: bool) {
        generate_legal_moves(self, out, !captures_only);
        if !captures_only {
            self.cache.legal_count.set(Some(out.len()));
        }
    }

    fn has_zero_legal_moves(&self) -> bool {
        match self.cache.legal_count.get() {
            Some(n) => n == 0,
            None => !has_legal_move(self),
        }
    }

    fn invalidate_cache(&mut self) {
        self.cache.legal.take();
        self.cache.captures.take();
        self.cache.legal_count.set(None);
    }

    // -------------------------------------------------------------------------
    // Game-state queries
    // -------------------------------------------------------------------------

    pub fn is_in_checkmate(&self) -> bool {
        self.is_in_check() && self.has_zero_legal_moves()
    }

    pub fn is_in_stalemate(&self) -> bool {
        !self.is_in_check() && self.has_zero_legal_moves()
    }

    pub fn is_fifty_move_draw(&self) -> bool {
        self.halfmove_clock >= 100
    }

    /// True if the current position already occurred since the last
    /// irreversible move, counting positions reached during the search.
    ///
    /// A single earlier occurrence is enough; this steers the search away
    /// from repeating lines long before the real threefold rule applies.
    /// Always false at the search root.
    pub fn is_repeated_position(&self) -> bool {
        if self.search_ply == 0 {
            return false;
        }
        let window = &self.repetition[self.repetition_start..self.repetition.len() - 1];
        window.contains(&self.hash)
    }

    /// The real game-ending rule: the current position occurred three times.
    pub fn is_threefold_repetition(&self) -> bool {
        self.repetition_history()
            .iter()
            .filter(|&&h| h == self.hash)
            .count()
            >= 3
    }

    pub fn is_insufficient_material(&self) -> bool {
        let any = |kind| {
            self.sets.count(Color::White, kind) + self.sets.count(Color::Black, kind) > 0
        };
        if any(PieceKind::Pawn) || any(PieceKind::Rook) || any(PieceKind::Queen) {
            return false;
        }

        let knights = self.sets.pieces(Color::White, PieceKind::Knight)
            | self.sets.pieces(Color::Black, PieceKind::Knight);
        let bishops = self.sets.pieces(Color::White, PieceKind::Bishop)
            | self.sets.pieces(Color::Black, PieceKind::Bishop);
        let minors = knights.popcount() + bishops.popcount();
        if minors <= 1 {
            return true;
        }

        // Any number of bishops all on one square colour cannot mate.
        knights.is_empty()
            && ((bishops & Bitboard::LIGHT_SQUARES).is_empty()
                || (bishops & !Bitboard::LIGHT_SQUARES).is_empty())
    }

    pub fn is_draw(&self) -> bool {
        self.is_fifty_move_draw()
            || self.is_insufficient_material()
            || self.is_in_stalemate()
            || self.is_repeated_position()
    }

    // -------------------------------------------------------------------------
    // Material
    // -------------------------------------------------------------------------

    /// Sum of piece values for `c`, king excluded.
    pub fn count_material(&self, c: Color) -> i32 {
        PieceKind::ALL[..5]
            .iter()
            .map(|&kind| self.sets.count(c, kind) as i32 * kind.value())
            .sum()
    }

    /// Value of the piece `mv` captures, signed for `side` (negative for Black).
    pub fn captured_material(&self, mv: Move, side: Color) -> i32 {
        mv.captured.map_or(0, |kind| kind.value()) * side.sign()
    }

    // -------------------------------------------------------------------------
    // Make / unmake
    // -------------------------------------------------------------------------

    #[inline]
    pub(crate) fn put_piece(&mut self, sq: u8, pc: Piece) {
        self.board[sq as usize] = Some(pc);
        self.sets.add(pc, sq);
    }

    #[inline]
    fn take_piece(&mut self, sq: u8) -> Option<Piece> {
        let pc = self.board[sq as usize].take()?;
        self.sets.remove(pc, sq);
        Some(pc)
    }

    /// Applies a legal move. Undefined results for moves not generated from
    /// this exact position.
    pub fn make_move(&mut self, mv: Move) {
        let us = self.side_to_move;
        let moved = Piece::new(us, mv.piece);
        let mut hash = self.hash
            ^ ZOBRIST.castling_key(self.castling.bits())
            ^ ZOBRIST.ep_key(self.en_passant);

        let captured_sq = if mv.is_en_passant {
            match us {
                Color::White => mv.to - 8,
                Color::Black => mv.to + 8,
            }
        } else {
            mv.to
        };
        let captured = self.take_piece(captured_sq).map(|pc| (pc, captured_sq));
        if let Some((pc, s)) = captured {
            hash ^= ZOBRIST.piece_key(pc, s);
        }

        self.take_piece(mv.from);
        hash ^= ZOBRIST.piece_key(moved, mv.from);
        let placed = match mv.promo {
            Some(kind) => Piece::new(us, kind),
            None => moved,
        };
        self.put_piece(mv.to, placed);
        hash ^= ZOBRIST.piece_key(placed, mv.to);

        if mv.is_castle
            && let Some((rf, rt)) = castle_rook_squares(mv.to)
            && let Some(rook) = self.take_piece(rf)
        {
            self.put_piece(rt, rook);
            hash ^= ZOBRIST.piece_key(rook, rf) ^ ZOBRIST.piece_key(rook, rt);
        }

        let undo = Undo {
            mv: Some(mv),
            captured,
            castling: self.castling,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
            hash: self.hash,
            repetition_start: self.repetition_start,
        };

        self.castling = CastlingRights::from_bits(
            self.castling.bits() & CASTLE_KEEP[mv.from as usize] & CASTLE_KEEP[mv.to as usize],
        );

        self.en_passant = None;
        if mv.piece == PieceKind::Pawn && mv.from.abs_diff(mv.to) == 16 {
            self.en_passant = Some((mv.from + mv.to) / 2);
        }

        let irreversible = mv.piece == PieceKind::Pawn || captured.is_some();
        self.halfmove_clock = if irreversible {
            0
        } else {
            self.halfmove_clock + 1
        };
        if us == Color::Black {
            self.fullmove_number += 1;
        }
        self.side_to_move = us.other();

        hash ^= ZOBRIST.black_to_move
            ^ ZOBRIST.castling_key(self.castling.bits())
            ^ ZOBRIST.ep_key(self.en_passant);
        self.hash = hash;

        if irreversible {
            self.repetition_start = self.repetition.len();
        }
        self.repetition.push(hash);
        self.undo_stack.push(undo);
        self.search_ply += 1;
        self.invalidate_cache();
    }

    /// Reverts the most recent `make_move`, which must have been `mv`.
    pub fn unmake_move(&mut self, mv: Move) {
        let Some(undo) = self.undo_stack.pop() else {
            return;
        };
        debug_assert_eq!(undo.mv, Some(mv), "unmake_move out of order");

        let us = self.side_to_move.other();
        self.side_to_move = us;

        if mv.is_castle
            && let Some((rf, rt)) = castle_rook_squares(mv.to)
            && let Some(rook) = self.take_piece(rt)
        {
            self.put_piece(rf, rook);
        }
        self.take_piece(mv.to);
        self.put_piece(mv.from, Piece::new(us, mv.piece));
        if let Some((pc, s)) = undo.captured {
            self.put_piece(s, pc);
        }

        self.castling = undo.castling;
        self.en_passant = undo.en_passant;
        self.halfmove_clock = undo.halfmove_clock;
        self.fullmove_number = undo.fullmove_number;
        self.hash = undo.hash;
        self.repetition.pop();
        self.repetition_start = undo.repetition_start;
        self.search_ply -= 1;
        self.invalidate_cache();
    }

    /// Makes `mv` and returns a guard that unmakes it when dropped.
    pub fn play(&mut self, mv: Move) -> MoveGuard<'_> {
        self.make_move(mv);
        MoveGuard { pos: self, mv }
    }

    // -------------------------------------------------------------------------
    // Skipping turns (search technique only, never a legal game action)
    // -------------------------------------------------------------------------

    /// Passes the turn unless the side to move is in check.
    /// Returns false and leaves the position untouched when in check.
    pub fn try_skip_turn(&mut self) -> bool {
        if self.is_in_check() {
            return false;
        }
        self.force_skip_turn();
        true
    }

    /// Passes the turn even when in check.
    ///
    /// Unsafe in the chess sense: after skipping out of check, the side now to
    /// move can "legally" capture the opposing king, which breaks the one-king
    /// invariant until the capture is unmade.
    pub fn force_skip_turn(&mut self) {
        self.undo_stack.push(Undo {
            mv: None,
            captured: None,
            castling: self.castling,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
            hash: self.hash,
            repetition_start: self.repetition_start,
        });
        self.hash ^= ZOBRIST.ep_key(self.en_passant) ^ ZOBRIST.black_to_move;
        self.en_passant = None;
        self.halfmove_clock += 1;
        if self.side_to_move == Color::Black {
            self.fullmove_number += 1;
        }
        self.side_to_move = self.side_to_move.other();
        self.invalidate_cache();
    }

    /// Reverts a turn skipped with `try_skip_turn` or `force_skip_turn`.
    pub fn undo_skip_turn(&mut self) {
        let Some(undo) = self.undo_stack.pop() else {
            return;
        };
        debug_assert!(undo.mv.is_none(), "undo_skip_turn after a real move");
        self.side_to_move = self.side_to_move.other();
        self.en_passant = undo.en_passant;
        self.halfmove_clock = undo.halfmove_clock;
        self.fullmove_number = undo.fullmove_number;
        self.hash = undo.hash;
        self.invalidate_cache();
    }
}

/// Rook (from, to) for a castling king landing on `king_to`.
fn castle_rook_squares(king_to: u8) -> Option<(u8, u8)> {
    match king_to {
        6 => Some((7, 5)),
        2 => Some((0, 3)),
        62 => Some((63, 61)),
        58 => Some((56, 59)),
        _ => None,
    }
}

/// A move made through [`Position::play`]; unmade when dropped, on every
/// exit path including early returns and unwinding.
pub struct MoveGuard<'a> {
    pos: &'a mut Position,
    mv: Move,
}

impl MoveGuard<'_> {
    pub fn mv(&self) -> Move {
        self.mv
    }
}

impl Deref for MoveGuard<'_> {
    type Target = Position;

    fn deref(&self) -> &Position {
        &*self.pos
    }
}

impl DerefMut for MoveGuard<'_> {
    fn deref_mut(&mut self) -> &mut Position {
        &mut *self.pos
    }
}

impl Drop for MoveGuard<'_> {
    fn drop(&mut self) {
        self.pos.unmake_move(self.mv);
    }
}

#[cfg(test)]
#[path = "board_tests.rs"]
mod board_tests;
