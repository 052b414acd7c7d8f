//! Negamax search with alpha-beta pruning.
//!
//! Scores inside the search are relative to the side to move. The static
//! evaluation is White-relative and gets its sign flipped at the leaves.
//! Each move's destination-square table bonus is added to every child
//! result, mate scores included, so the child window is shifted by that
//! bonus and cutoffs stay exact. Mates are spaced `MATE_PLY` apart, far more
//! than the bonuses a line can collect, so a shorter mate always wins.

use std::cmp::Reverse;

use chess_core::{Move, Position, TimeControl};
use tracing::debug;

use crate::eval::{Phase, evaluate, table_evaluation};

/// Size of a mate score at the root. Mate at ply `n` scores `MATE - n * MATE_PLY`.
pub const MATE: i32 = 100_000_000;
/// Gap between mates one ply apart.
pub const MATE_PLY: i32 = 10_000;
const INF: i32 = 10 * MATE;
const MATE_BOUND: i32 = MATE - 1_000 * MATE_PLY;

/// Score of delivering mate `ply` plies below the root, before table bonuses.
pub const fn mate_in(ply: i32) -> i32 {
    MATE - ply * MATE_PLY
}

pub fn is_mate_score(score: i32) -> bool {
    score.abs() >= MATE_BOUND
}

/// Plies to mate for a mate score, negative when the side to move is mated.
pub fn mate_distance(score: i32) -> Option<i32> {
    if !is_mate_score(score) {
        return None;
    }
    let plies = (MATE - score.abs() + MATE_PLY / 2) / MATE_PLY;
    Some(if score > 0 { plies } else { -plies })
}

/// Switches for the individual search techniques.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchParams {
    pub alpha_beta: bool,
    pub order_moves: bool,
    pub mate_short_circuit: bool,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            alpha_beta: true,
            order_moves: true,
            mate_short_circuit: true,
        }
    }
}

/// Outcome of one fixed-depth search from the root.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RootOutcome {
    pub best_move: Option<Move>,
    /// Side-to-move relative score of `best_move`.
    pub score: i32,
    /// False when the clock stopped the search part way.
    pub completed: bool,
}

/// One search over a position. Evaluation inputs stay fixed for its lifetime.
pub struct Searcher<'a> {
    params: SearchParams,
    phase: Phase,
    endgame_weight: f32,
    tc: &'a TimeControl,
    nodes: u64,
    stopped: bool,
}

impl<'a> Searcher<'a> {
    pub fn new(
        params: SearchParams,
        phase: Phase,
        endgame_weight: f32,
        tc: &'a TimeControl,
    ) -> Self {
        Self {
            params,
            phase,
            endgame_weight,
            tc,
            nodes: 0,
            stopped: false,
        }
    }

    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    pub fn stopped(&self) -> bool {
        self.stopped
    }

    /// Fixed-depth search of the root. `pos` comes back unchanged.
    pub fn search_root(&mut self, pos: &mut Position, depth: u8) -> RootOutcome {
        let (score, best_move) = self.negamax(pos, depth.max(1), -INF, INF);
        RootOutcome {
            best_move,
            score,
            completed: !self.stopped,
        }
    }

    /// Iterative deepening from depth 1 to `max_depth`. Keeps the move of the
    /// deepest iteration that finished before the clock ran out; if none did,
    /// whatever the interrupted first iteration had found.
    pub fn iterative_deepening(
        &mut self,
        pos: &mut Position,
        max_depth: u8,
    ) -> (RootOutcome, u8) {
        let mut best = RootOutcome {
            best_move: None,
            score: 0,
            completed: false,
        };
        let mut reached = 0;

        for depth in 1..=max_depth.max(1) {
            let outcome = self.search_root(pos, depth);
            if !outcome.completed {
                if best.best_move.is_none() {
                    best.best_move = outcome.best_move;
                    best.score = outcome.score;
                }
                break;
            }
            best = outcome;
            reached = depth;
            debug!(
                depth,
                score = outcome.score,
                best = %outcome.best_move.map_or_else(|| "none".to_string(), |m| m.to_string()),
                nodes = self.nodes,
                "iteration complete"
            );
            // A forced mate will not improve with depth
            if is_mate_score(outcome.score) {
                break;
            }
        }
        (best, reached)
    }

    fn negamax(
        &mut self,
        pos: &mut Position,
        depth: u8,
        mut alpha: i32,
        beta: i32,
    ) -> (i32, Option<Move>) {
        self.nodes += 1;
        if self.tc.should_stop_at(self.nodes) {
            self.stopped = true;
            return (0, None);
        }

        let ply = pos.search_ply() as i32;
        if pos.is_in_checkmate() {
            return (-mate_in(ply), None);
        }
        if pos.search_ply() > 0 && pos.is_draw() {
            return (0, None);
        }
        if pos.is_in_stalemate() {
            return (0, None);
        }
        if depth == 0 {
            let score = evaluate(pos, self.endgame_weight) * pos.side_to_move().sign();
            return (score, None);
        }

        let us = pos.side_to_move();
        let mut moves: Vec<Move> = pos.legal_moves().to_vec();

        if self.params.order_moves || self.params.mate_short_circuit {
            let mut keys = Vec::with_capacity(moves.len());
            for &mv in &moves {
                let bonus = table_evaluation(mv, us, self.phase) * us.sign();
                let child = pos.play(mv);
                if self.params.mate_short_circuit && child.is_in_checkmate() {
                    return (mate_in(ply + 1) + bonus, Some(mv));
                }
                if self.params.order_moves {
                    keys.push(evaluate(&child, self.endgame_weight) * us.sign() + bonus);
                }
            }
            if self.params.order_moves {
                let mut keyed: Vec<(i32, Move)> = keys.into_iter().zip(moves).collect();
                keyed.sort_by_key(|&(key, _)| Reverse(key));
                moves = keyed.into_iter().map(|(_, mv)| mv).collect();
            }
        }

        let mut best_value = -INF;
        let mut best_move = None;
        for mv in moves {
            let bonus = table_evaluation(mv, us, self.phase) * us.sign();
            let (child_alpha, child_beta) = if self.params.alpha_beta {
                (-(beta - bonus), -(alpha - bonus))
            } else {
                (-INF, INF)
            };

            let value = {
                let mut child = pos.play(mv);
                -self.negamax(&mut child, depth - 1, child_alpha, child_beta).0
            } + bonus;
            if self.stopped {
                return (best_value, best_move);
            }

            if value > best_value || best_move.is_none() {
                best_value = value;
                best_move = Some(mv);
            }
            if value > alpha {
                alpha = value;
            }
            if self.params.alpha_beta && alpha >= beta {
                break;
            }
        }

        (best_value, best_move)
    }
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod search_tests;
