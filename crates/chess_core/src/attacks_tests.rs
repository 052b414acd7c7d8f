use super::*;

#[test]
fn test_leaper_counts() {
    assert_eq!(knight_attacks(28).popcount(), 8); // e4
    assert_eq!(knight_attacks(0).popcount(), 2); // a1
    assert!(knight_attacks(0).contains(10)); // c2
    assert!(knight_attacks(0).contains(17)); // b3
    assert_eq!(king_attacks(28).popcount(), 8);
    assert_eq!(king_attacks(0).popcount(), 3);
}

#[test]
fn test_pawn_attacks_by_color() {
    let white = pawn_attacks(28, Color::White);
    assert!(white.contains(35) && white.contains(37)); // d5, f5
    let black = pawn_attacks(28, Color::Black);
    assert!(black.contains(19) && black.contains(21)); // d3, f3
    assert_eq!(pawn_attacks(8, Color::White), Bitboard::from_square(17)); // a2 -> b3
}

#[test]
fn test_sliders_on_empty_board() {
    assert_eq!(rook_attacks(28, Bitboard::EMPTY).popcount(), 14);
    assert_eq!(bishop_attacks(28, Bitboard::EMPTY).popcount(), 13);
    assert_eq!(queen_attacks(28, Bitboard::EMPTY).popcount(), 27);
}

#[test]
fn test_rook_stops_at_blockers_both_ways() {
    // Rook on d4 with blockers on d6 and b4
    let occupied = Bitboard::from_square(43) | Bitboard::from_square(25);
    let attacks = rook_attacks(27, occupied);
    assert!(attacks.contains(35)); // d5
    assert!(attacks.contains(43)); // d6 blocker
    assert!(!attacks.contains(51)); // d7 behind blocker
    assert!(attacks.contains(26)); // c4
    assert!(attacks.contains(25)); // b4 blocker
    assert!(!attacks.contains(24)); // a4 behind blocker
    assert!(attacks.contains(3)); // d1
}

#[test]
fn test_bishop_stops_at_blocker_south_west() {
    // Bishop on e5, blocker on c3
    let occupied = Bitboard::from_square(18);
    let attacks = bishop_attacks(36, occupied);
    assert!(attacks.contains(27)); // d4
    assert!(attacks.contains(18)); // c3
    assert!(!attacks.contains(9)); // b2
}
