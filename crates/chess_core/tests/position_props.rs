//! Random-playout properties of the position state.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use chess_core::{Move, Position};

const GAMES: usize = 40;
const MAX_PLIES: usize = 120;

fn observable(p: &Position) -> (String, u64, Vec<u64>, u32) {
    (
        p.to_fen(),
        p.hash(),
        p.repetition_history().to_vec(),
        p.search_ply(),
    )
}

fn random_line(rng: &mut StdRng, start: &mut Position) -> Vec<Move> {
    let mut played = Vec::new();
    for _ in 0..MAX_PLIES {
        let Some(&mv) = start.legal_moves().choose(rng) else {
            break;
        };
        start.make_move(mv);
        played.push(mv);
    }
    played
}

#[test]
fn incremental_hash_matches_recomputation() {
    let mut rng = StdRng::seed_from_u64(0x5EED);
    for _ in 0..GAMES {
        let mut p = Position::startpos();
        for _ in 0..MAX_PLIES {
            let Some(&mv) = p.legal_moves().choose(&mut rng) else {
                break;
            };
            p.make_move(mv);
            assert_eq!(p.hash(), p.compute_hash(), "after {mv} in {}", p.to_fen());
        }
    }
}

#[test]
fn unmake_is_exact_inverse_along_random_games() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..GAMES {
        let mut p = Position::startpos();
        let mut states = vec![observable(&p)];
        let mut played = Vec::new();
        for _ in 0..MAX_PLIES {
            let Some(&mv) = p.legal_moves().choose(&mut rng) else {
                break;
            };
            p.make_move(mv);
            played.push(mv);
            states.push(observable(&p));
        }
        // Walk back, comparing against the states recorded on the way out
        for &mv in played.iter().rev() {
            assert_eq!(observable(&p), states.pop().expect("state per move"));
            p.unmake_move(mv);
        }
        assert_eq!(observable(&p), states.pop().expect("root state"));
        assert!(states.is_empty());
    }
}

#[test]
fn skip_turn_round_trips_anywhere() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..GAMES {
        let mut p = Position::startpos();
        random_line(&mut rng, &mut p);
        let before = observable(&p);
        if p.try_skip_turn() {
            assert_eq!(p.hash(), p.compute_hash());
            p.undo_skip_turn();
        } else {
            assert!(p.is_in_check());
        }
        assert_eq!(observable(&p), before);
    }
}

#[test]
fn from_game_matches_direct_play() {
    let mut rng = StdRng::seed_from_u64(99);
    for _ in 0..10 {
        let mut p = Position::startpos();
        let played = random_line(&mut rng, &mut p);
        let texts: Vec<String> = played.iter().map(|m| m.to_string()).collect();
        let rebuilt = Position::from_game(chess_core::STARTPOS_FEN, &texts).expect("replayable");
        assert_eq!(rebuilt.to_fen(), p.to_fen());
        assert_eq!(rebuilt.hash(), p.hash());
        assert_eq!(rebuilt.game_repetition_history(), p.repetition_history());
    }
}
