//! Zobrist keys for incremental position hashing.
//!
//! A position hash is the XOR of:
//! - one key per (color, kind, square) occupied
//! - the side key when Black is to move
//! - one key per castling-rights combination (16 entries, indexed by the rights bitmask)
//! - one key per en-passant file when an en-passant square is set

use crate::types::Piece;

pub struct ZobristKeys {
    /// Indexed by [color][piece_kind][square]
    pub pieces: [[[u64; 64]; 6]; 2],
    pub black_to_move: u64,
    /// Indexed by `CastlingRights::bits()`; entry 0 is zero so "no rights" hashes to nothing.
    pub castling: [u64; 16],
    pub en_passant: [u64; 8],
}

const fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

impl ZobristKeys {
    /// Deterministic key generation; every build hashes identically.
    pub const fn new() -> Self {
        let mut state = 0x5EED_C0DE_1234_ABCDu64;

        let mut pieces = [[[0u64; 64]; 6]; 2];
        let mut color = 0;
        while color < 2 {
            let mut kind = 0;
            while kind < 6 {
                let mut sq = 0;
                while sq < 64 {
                    pieces[color][kind][sq] = splitmix64(&mut state);
                    sq += 1;
                }
                kind += 1;
            }
            color += 1;
        }

        let black_to_move = splitmix64(&mut state);

        // Combination keys are XORs of four single-right keys so toggling one
        // right stays consistent with recomputing from scratch.
        let single = [
            splitmix64(&mut state),
            splitmix64(&mut state),
            splitmix64(&mut state),
            splitmix64(&mut state),
        ];
        let mut castling = [0u64; 16];
        let mut mask = 0;
        while mask < 16 {
            let mut key = 0u64;
            let mut bit = 0;
            while bit < 4 {
                if mask & (1 << bit) != 0 {
                    key ^= single[bit];
                }
                bit += 1;
            }
            castling[mask] = key;
            mask += 1;
        }

        let mut en_passant = [0u64; 8];
        let mut file = 0;
        while file < 8 {
            en_passant[file] = splitmix64(&mut state);
            file += 1;
        }

        ZobristKeys {
            pieces,
            black_to_move,
            castling,
            en_passant,
        }
    }

    #[inline(always)]
    pub fn piece_key(&self, piece: Piece, sq: u8) -> u64 {
        self.pieces[piece.color.idx()][piece.kind.idx()][sq as usize]
    }

    #[inline(always)]
    pub fn castling_key(&self, bits: u8) -> u64 {
        self.castling[(bits & 0xF) as usize]
    }

    #[inline(always)]
    pub fn ep_key(&self, ep_square: Option<u8>) -> u64 {
        match ep_square {
            Some(s) => self.en_passant[(s % 8) as usize],
            None => 0,
        }
    }
}

impl Default for ZobristKeys {
    fn default() -> Self {
        Self::new()
    }
}

/// Global keys, computed at compile time.
pub static ZOBRIST: ZobristKeys = ZobristKeys::new();

#[cfg(test)]
#[path = "zobrist_tests.rs"]
mod zobrist_tests;
