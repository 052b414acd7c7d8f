use super::*;
use crate::types::{Color, PieceKind};

#[test]
fn test_zobrist_keys_unique() {
    let mut seen = std::collections::HashSet::new();

    for color in 0..2 {
        for kind in 0..6 {
            for sq in 0..64 {
                assert!(seen.insert(ZOBRIST.pieces[color][kind][sq]), "Duplicate piece key");
            }
        }
    }
    assert!(seen.insert(ZOBRIST.black_to_move), "Side key collision");
    for mask in 1..16 {
        assert!(seen.insert(ZOBRIST.castling[mask]), "Castling key collision");
    }
    for file in 0..8 {
        assert!(seen.insert(ZOBRIST.en_passant[file]), "En passant key collision");
    }
}

#[test]
fn test_castling_keys_compose() {
    assert_eq!(ZOBRIST.castling_key(0), 0);
    let all = ZOBRIST.castling_key(0b1111);
    let composed = ZOBRIST.castling_key(0b0001)
        ^ ZOBRIST.castling_key(0b0010)
        ^ ZOBRIST.castling_key(0b0100)
        ^ ZOBRIST.castling_key(0b1000);
    assert_eq!(all, composed);
}

#[test]
fn test_ep_key_depends_on_file_only() {
    assert_eq!(ZOBRIST.ep_key(None), 0);
    assert_eq!(ZOBRIST.ep_key(Some(20)), ZOBRIST.ep_key(Some(44))); // e3, e6
    assert_ne!(ZOBRIST.ep_key(Some(20)), ZOBRIST.ep_key(Some(21)));
}

#[test]
fn test_zobrist_piece_key() {
    let piece = Piece::new(Color::White, PieceKind::Pawn);
    assert_ne!(ZOBRIST.piece_key(piece, 0), ZOBRIST.piece_key(piece, 1));
}
