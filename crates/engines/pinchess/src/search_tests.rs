use super::*;
use chess_core::{Position, parse_uci_move};

fn pos(fen: &str) -> Position {
    Position::from_fen(fen).expect("valid FEN")
}

fn run(p: &mut Position, depth: u8, params: SearchParams) -> RootOutcome {
    let tc = TimeControl::new(None);
    let mut searcher = Searcher::new(params, Phase::Middlegame, 0.0, &tc);
    searcher.search_root(p, depth)
}

const ALL_PARAMS: [SearchParams; 4] = [
    SearchParams {
        alpha_beta: true,
        order_moves: true,
        mate_short_circuit: true,
    },
    SearchParams {
        alpha_beta: true,
        order_moves: false,
        mate_short_circuit: false,
    },
    SearchParams {
        alpha_beta: false,
        order_moves: true,
        mate_short_circuit: false,
    },
    SearchParams {
        alpha_beta: false,
        order_moves: false,
        mate_short_circuit: true,
    },
];

#[test]
fn test_finds_back_rank_mate_at_every_depth() {
    for (fen, mate) in [
        ("6k1/5ppp/8/8/8/8/5PPP/4Q1K1 w - - 0 1", "e1e8"),
        ("4q1k1/5ppp/8/8/8/8/5PPP/6K1 b - - 0 1", "e8e1"),
    ] {
        let mut p = pos(fen);
        let expected = parse_uci_move(&p, mate).unwrap();
        for depth in 1..=3 {
            for params in ALL_PARAMS {
                let outcome = run(&mut p, depth, params);
                assert_eq!(outcome.best_move, Some(expected), "{fen} depth {depth} {params:?}");
                assert_eq!(mate_distance(outcome.score), Some(1));
            }
        }
    }
}

#[test]
fn test_search_leaves_position_untouched() {
    let mut p = pos("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
    let fen = p.to_fen();
    let hash = p.hash();
    run(&mut p, 2, SearchParams::default());
    assert_eq!(p.to_fen(), fen);
    assert_eq!(p.hash(), hash);
    assert_eq!(p.search_ply(), 0);
}

#[test]
fn test_takes_hanging_queen() {
    let mut p = pos("4k3/8/8/3q4/4P3/8/8/4K3 w - - 0 1");
    let capture = parse_uci_move(&p, "e4d5").unwrap();
    for depth in 1..=3 {
        assert_eq!(run(&mut p, depth, SearchParams::default()).best_move, Some(capture));
    }
}

#[test]
fn test_terminal_roots_have_no_move() {
    let mut stalemate = pos("k7/2K5/1Q6/8/8/8/8/8 b - - 0 1");
    let outcome = run(&mut stalemate, 3, SearchParams::default());
    assert_eq!(outcome.best_move, None);
    assert_eq!(outcome.score, 0);

    let mut mated = pos("r1bqkb1r/pppp1Qpp/2n2n2/4p3/2B1P3/8/PPPP1PPP/RNB1K1NR b KQkq - 0 4");
    let outcome = run(&mut mated, 3, SearchParams::default());
    assert_eq!(outcome.best_move, None);
    assert_eq!(outcome.score, -MATE);
}

#[test]
fn test_prefers_mate_to_stalemate() {
    // Qb6 stalemates while several queen moves mate
    let mut p = pos("k7/2K5/8/1Q6/8/8/8/8 w - - 0 1");
    let outcome = run(&mut p, 2, SearchParams::default());
    let mv = outcome.best_move.expect("a move");
    let mut after = p.clone();
    after.make_move(mv);
    assert!(after.is_in_checkmate(), "played {mv}");
}

#[test]
fn test_stopped_search_reports_incomplete() {
    let mut tc = TimeControl::new(None);
    tc.start();
    tc.stop();
    let mut p = Position::startpos();
    let mut searcher = Searcher::new(SearchParams::default(), Phase::Opening, 0.0, &tc);
    let (outcome, reached) = searcher.iterative_deepening(&mut p, 4);
    assert!(!outcome.completed);
    assert_eq!(reached, 0);
    assert!(searcher.stopped());
    assert_eq!(p.search_ply(), 0);
}

#[test]
fn test_iterative_deepening_reaches_requested_depth() {
    let tc = TimeControl::new(None);
    let mut p = Position::startpos();
    let mut searcher = Searcher::new(SearchParams::default(), Phase::Opening, 0.0, &tc);
    let (outcome, reached) = searcher.iterative_deepening(&mut p, 3);
    assert_eq!(reached, 3);
    assert!(outcome.completed);
    assert!(outcome.best_move.is_some());
    assert!(searcher.nodes() > 20);
}

#[test]
fn test_mate_distance_ignores_table_bonuses() {
    assert_eq!(mate_distance(mate_in(3) - 640), Some(3));
    assert_eq!(mate_distance(mate_in(1) + 80), Some(1));
    assert_eq!(mate_distance(-mate_in(2) + 500), Some(-2));
    assert_eq!(mate_distance(-MATE), Some(0));
    assert_eq!(mate_distance(900), None);
    // Two plies apart always outweighs what a line can collect
    assert!(mate_in(3) - 8 * 80 > mate_in(5) + 8 * 80);
}
