use super::*;

#[test]
fn piece_values_follow_kind_order() {
    assert_eq!(PieceKind::Pawn.value(), 100);
    assert_eq!(PieceKind::Knight.value(), 300);
    assert_eq!(PieceKind::Bishop.value(), 320);
    assert_eq!(PieceKind::Rook.value(), 500);
    assert_eq!(PieceKind::Queen.value(), 900);
    assert_eq!(PieceKind::King.value(), 10000);
}

#[test]
fn coords_round_trip_corners() {
    assert_eq!(sq_to_coord(0), "a1");
    assert_eq!(sq_to_coord(63), "h8");
    assert_eq!(coord_to_sq("e4"), Some(28));
    assert_eq!(coord_to_sq("i1"), None);
    assert_eq!(coord_to_sq("e"), None);
}

#[test]
fn move_classification() {
    let quiet = Move::new(6, 21, PieceKind::Knight);
    assert!(!quiet.is_capture());
    assert!(!quiet.is_irreversible());

    let push = Move::new(12, 28, PieceKind::Pawn);
    assert!(push.is_irreversible());

    let capture = Move::new(3, 59, PieceKind::Queen).with_capture(Some(PieceKind::Queen));
    assert!(capture.is_capture());
    assert!(capture.is_irreversible());

    let promo = Move::new(52, 60, PieceKind::Pawn).with_promo(PieceKind::Knight);
    assert!(promo.is_promotion());
    assert_eq!(promo.to_string(), "e7e8n");
}

#[test]
fn color_sign_and_other() {
    assert_eq!(Color::White.sign(), 1);
    assert_eq!(Color::Black.sign(), -1);
    assert_eq!(Color::White.other(), Color::Black);
}
