//! Pruning must never change the root decision.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use chess_core::{Move, Position, TimeControl};
use pinchess_engine::search::is_mate_score;
use pinchess_engine::{Phase, SearchParams, Searcher};

const MAX_ROOT_MOVES: usize = 20;

/// Random positions a few moves into a game with at most 20 legal moves.
fn sample_positions(seed: u64, wanted: usize) -> Vec<Position> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut out = Vec::new();
    while out.len() < wanted {
        let mut p = Position::startpos();
        for _ in 0..60 {
            let Some(&mv) = p.legal_moves().choose(&mut rng) else {
                break;
            };
            p.make_move(mv);
            let n = p.legal_moves().len();
            if n > 0 && n <= MAX_ROOT_MOVES && !p.is_draw() {
                p.mark_root();
                out.push(p);
                break;
            }
        }
    }
    out
}

fn search(
    p: &Position,
    depth: u8,
    params: SearchParams,
    phase: Phase,
    weight: f32,
) -> (Option<Move>, i32) {
    let tc = TimeControl::new(None);
    let mut root = p.clone();
    let outcome = Searcher::new(params, phase, weight, &tc).search_root(&mut root, depth);
    (outcome.best_move, outcome.score)
}

#[test]
fn pruned_and_full_width_agree() {
    let phases = [
        (Phase::Opening, 0.0),
        (Phase::Middlegame, 1.5),
        (Phase::Endgame, 4.0),
    ];
    for (i, p) in sample_positions(2024, 12).iter().enumerate() {
        let (phase, weight) = phases[i % phases.len()];
        for order_moves in [true, false] {
            let pruned = SearchParams {
                alpha_beta: true,
                order_moves,
                mate_short_circuit: true,
            };
            let full = SearchParams {
                alpha_beta: false,
                ..pruned
            };
            for depth in 1..=3 {
                assert_eq!(
                    search(p, depth, pruned, phase, weight),
                    search(p, depth, full, phase, weight),
                    "{} depth {depth} ordered {order_moves}",
                    p.to_fen()
                );
            }
        }
    }
}

/// Black king in a two-queen mating net, where mate scores meet the
/// bonus-shifted windows several plies down.
const MATING_NETS: [&str; 2] = [
    "8/8/5k2/8/8/5K2/8/1Q2Q3 b - - 7 4",
    "8/1Q3k2/8/8/8/3Q4/8/4K3 b - - 7 4",
];

#[test]
fn pruned_and_full_width_agree_in_mating_nets() {
    let pruned = SearchParams::default();
    let full = SearchParams {
        alpha_beta: false,
        ..pruned
    };
    for fen in MATING_NETS {
        let mut p = Position::from_fen(fen).unwrap();
        p.mark_root();
        assert!(p.legal_moves().len() <= MAX_ROOT_MOVES);
        for depth in 5..=6 {
            let expected = search(&p, depth, full, Phase::Endgame, 7.45);
            assert_eq!(
                search(&p, depth, pruned, Phase::Endgame, 7.45),
                expected,
                "{fen} depth {depth}"
            );
            if depth == 6 {
                assert!(is_mate_score(expected.1), "{fen} {expected:?}");
            }
        }
    }
}
