//! PinChess engine
//!
//! Negamax with alpha-beta pruning over a phase-aware evaluation: material,
//! piece-square tables chosen by game phase, and a king-confinement term that
//! grows as the game heads into the endgame.

pub mod config;
pub mod eval;
mod pst;
pub mod search;

use std::time::Duration;

use chess_core::{Engine, Move, Position, SearchLimits, SearchResult};
use tracing::{debug, info};

pub use config::{ConfigError, EngineConfig};
pub use eval::{EndgameWeight, Phase, evaluate};
pub use search::{MATE, SearchParams, Searcher, mate_distance};

/// The playing agent. Holds the configuration and the endgame weight, which
/// accumulates over the real game and is fixed for the length of a search.
#[derive(Debug, Clone, Default)]
pub struct PinAgent {
    config: EngineConfig,
    weight: EndgameWeight,
    nodes: u64,
}

impl PinAgent {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            weight: EndgameWeight::default(),
            nodes: 0,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn endgame_weight(&self) -> f32 {
        self.weight.value()
    }

    /// Nodes visited by the most recent search.
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Picks a move for the side to move within `budget`.
    /// `None` only when the position has no legal moves.
    pub fn think(&mut self, pos: &Position, budget: Duration) -> Option<Move> {
        let limits = SearchLimits::depth_and_time(self.config.depth, budget);
        self.search(pos, limits).best_move
    }

    /// White-relative static evaluation with the agent's current weight.
    pub fn evaluate(&self, pos: &Position) -> i32 {
        evaluate(pos, self.weight.value())
    }
}

impl Engine for PinAgent {
    fn search(&mut self, pos: &Position, mut limits: SearchLimits) -> SearchResult {
        if !limits.time_control.is_started() {
            limits.start();
        }
        info!(ply = pos.game_ply(), "thinking");

        let weight = self.weight.update(pos);
        let phase = Phase::select(pos.game_ply(), weight);
        debug!(?phase, weight, "evaluation inputs");

        let mut root = pos.clone();
        root.mark_root();
        let mut searcher = Searcher::new(
            self.config.search_params(),
            phase,
            weight,
            &limits.time_control,
        );
        let (mut outcome, depth) = searcher.iterative_deepening(&mut root, limits.depth);
        self.nodes = searcher.nodes();

        // Out of time before anything was searched: any legal move beats none
        if outcome.best_move.is_none() {
            outcome.best_move = root.legal_moves().first().copied();
        }

        match outcome.best_move {
            Some(mv) => info!(
                best = %mv,
                piece = ?mv.piece,
                eval = outcome.score,
                depth,
                nodes = self.nodes,
                elapsed_ms = limits.time_control.elapsed().as_millis() as u64,
                "move chosen"
            ),
            None => info!(nodes = self.nodes, "no legal moves"),
        }

        SearchResult {
            best_move: outcome.best_move,
            score: outcome.score,
            depth,
            nodes: self.nodes,
            stopped: searcher.stopped(),
        }
    }

    fn name(&self) -> &str {
        "PinChess 0.1"
    }

    fn new_game(&mut self) {
        self.weight.reset();
        self.nodes = 0;
    }

    fn set_option(&mut self, name: &str, value: &str) -> bool {
        match name.to_ascii_lowercase().as_str() {
            "depth" => match value.parse::<u8>() {
                Ok(d) => {
                    self.config.depth = d.clamp(1, config::MAX_DEPTH);
                    true
                }
                Err(_) => false,
            },
            "movetime" => match value.parse::<u64>() {
                Ok(ms) => {
                    self.config.move_time_ms = (ms > 0).then_some(ms);
                    true
                }
                Err(_) => false,
            },
            _ => false,
        }
    }
}
