use std::time::Duration;

use chess_core::{Engine, Position, STARTPOS_FEN, SearchLimits, parse_uci_move};
use pinchess_engine::{EngineConfig, PinAgent, mate_distance};

#[test]
fn think_returns_a_legal_move() {
    let mut agent = PinAgent::default();
    let pos = Position::startpos();
    let mv = agent.think(&pos, Duration::from_secs(10)).expect("a move");
    assert!(pos.legal_moves().contains(&mv));
    assert!(agent.nodes() > 0);
}

#[test]
fn think_returns_none_without_legal_moves() {
    let mut agent = PinAgent::default();
    let mated =
        Position::from_fen("r1bqkb1r/pppp1Qpp/2n2n2/4p3/2B1P3/8/PPPP1PPP/RNB1K1NR b KQkq - 0 4")
            .unwrap();
    assert_eq!(agent.think(&mated, Duration::from_secs(1)), None);
}

#[test]
fn agent_plays_mate_in_one() {
    let mut agent = PinAgent::new(EngineConfig {
        depth: 3,
        ..Default::default()
    });
    let pos = Position::from_fen("6k1/5ppp/8/8/8/8/5PPP/4Q1K1 w - - 0 1").unwrap();
    let result = agent.search(&pos, SearchLimits::depth(3));
    assert_eq!(result.best_move, parse_uci_move(&pos, "e1e8").ok());
    assert_eq!(mate_distance(result.score), Some(1));
    assert!(!result.stopped);
}

#[test]
fn search_from_game_history() {
    let pos = Position::from_game(STARTPOS_FEN, &["e2e4", "e7e5", "g1f3", "b8c6"]).unwrap();
    let mut agent = PinAgent::default();
    let result = agent.search(&pos, SearchLimits::depth(2));
    let mv = result.best_move.expect("a move");
    assert!(pos.legal_moves().contains(&mv));
    assert_eq!(result.depth, 2);
    // The caller's position is never touched
    assert_eq!(
        pos.to_fen(),
        "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3"
    );
}

#[test]
fn zero_budget_still_moves() {
    let mut agent = PinAgent::new(EngineConfig {
        depth: 8,
        ..Default::default()
    });
    let pos = Position::startpos();
    let mv = agent.think(&pos, Duration::ZERO).expect("fallback move");
    assert!(pos.legal_moves().contains(&mv));
}

#[test]
fn endgame_weight_accumulates_and_resets() {
    let mut agent = PinAgent::default();
    let queenless = Position::from_fen("4k3/pppp4/8/8/8/8/PPPP4/4K3 w - - 0 30").unwrap();
    agent.search(&queenless, SearchLimits::depth(1));
    let first = agent.endgame_weight();
    agent.search(&queenless, SearchLimits::depth(1));
    assert!(agent.endgame_weight() > first);
    agent.new_game();
    assert_eq!(agent.endgame_weight(), 0.0);
}

#[test]
fn options_update_config() {
    let mut agent = PinAgent::default();
    assert!(agent.set_option("Depth", "5"));
    assert_eq!(agent.config().depth, 5);
    assert!(agent.set_option("depth", "99"));
    assert_eq!(agent.config().depth, 8);
    assert!(!agent.set_option("Depth", "deep"));
    assert!(agent.set_option("MoveTime", "300"));
    assert_eq!(agent.config().move_time_ms, Some(300));
    assert!(!agent.set_option("Hash", "16"));
}
