//! Static evaluation: material, piece-square tables and endgame king
//! confinement. Scores are centipawns from White's point of view.

use chess_core::{Color, Move, PieceKind, Position, file_of, rank_of};
use tracing::debug;

use crate::pst;

/// Which set of piece-square tables applies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Opening = 0,
    Middlegame = 1,
    Endgame = 2,
}

impl Phase {
    /// Last game ply still scored with the opening tables.
    pub const OPENING_PLIES: u32 = 5;
    /// Endgame weight at which the endgame tables take over.
    pub const ENDGAME_WEIGHT: f32 = 3.0;

    pub fn select(game_ply: u32, endgame_weight: f32) -> Phase {
        if game_ply <= Self::OPENING_PLIES {
            Phase::Opening
        } else if endgame_weight >= Self::ENDGAME_WEIGHT {
            Phase::Endgame
        } else {
            Phase::Middlegame
        }
    }
}

/// White material minus Black material.
pub fn material_evaluation(pos: &Position) -> i32 {
    pos.count_material(Color::White) - pos.count_material(Color::Black)
}

/// Table value of the moved piece on its destination square, negated when
/// `side` is Black.
pub fn table_evaluation(mv: Move, side: Color, phase: Phase) -> i32 {
    match side {
        Color::White => pst::white_value(phase, mv.piece, mv.to),
        Color::Black => -pst::black_value(phase, mv.piece, mv.to),
    }
}

/// Rewards `perspective` for pushing the enemy king away from the centre
/// and walking its own king towards it. Zero without the endgame weight.
pub fn endgame_king_confinement(pos: &Position, perspective: Color, endgame_weight: f32) -> i32 {
    let (Some(own), Some(enemy)) = (
        pos.king_square(perspective),
        pos.king_square(perspective.other()),
    ) else {
        return 0;
    };

    let (ef, er) = (file_of(enemy), rank_of(enemy));
    let centre_distance = (3 - ef).max(ef - 4) + (3 - er).max(er - 4);
    let kings_distance = (file_of(own) - ef).abs() + (rank_of(own) - er).abs();
    let raw = i32::from(centre_distance) + 14 - i32::from(kings_distance);

    (raw as f32 * 10.0 * endgame_weight) as i32
}

/// Full static evaluation: material, plus king confinement for whichever
/// side is ahead in material.
pub fn evaluate(pos: &Position, endgame_weight: f32) -> i32 {
    let material = material_evaluation(pos);
    let confinement = match material.signum() {
        1 => endgame_king_confinement(pos, Color::White, endgame_weight),
        -1 => -endgame_king_confinement(pos, Color::Black, endgame_weight),
        _ => 0,
    };
    material + confinement
}

// =============================================================================
// Endgame weight
// =============================================================================

struct Trigger {
    name: &'static str,
    increment: f32,
    fires: fn(&Position, Color) -> bool,
}

/// Checked in this order; at most one new trigger fires per update.
const TRIGGERS: [Trigger; 5] = [
    Trigger {
        name: "pawns",
        increment: 1.525,
        fires: |pos, c| pos.pieces().count(c, PieceKind::Pawn) <= 4,
    },
    Trigger {
        name: "knights",
        increment: 1.225,
        fires: |pos, c| pos.pieces().count(c, PieceKind::Knight) <= 1,
    },
    Trigger {
        name: "bishops",
        increment: 1.225,
        fires: |pos, c| pos.pieces().count(c, PieceKind::Bishop) <= 1,
    },
    Trigger {
        name: "rooks",
        increment: 1.225,
        fires: |pos, c| pos.pieces().count(c, PieceKind::Rook) <= 1,
    },
    Trigger {
        name: "queens",
        increment: 2.25,
        fires: |pos, c| pos.pieces().count(c, PieceKind::Queen) == 0,
    },
];

/// How far the real game has drifted into the endgame.
///
/// Owned by the agent across turns and only ever grows: each material
/// threshold adds its increment once, the first time either side crosses it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EndgameWeight {
    value: f32,
    fired: [bool; 5],
}

impl EndgameWeight {
    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn has_fired(&self, trigger: usize) -> bool {
        self.fired.get(trigger).copied().unwrap_or(false)
    }

    /// Fires the first not-yet-fired trigger that `pos` satisfies, if any.
    /// Call once per turn with the real game position.
    pub fn update(&mut self, pos: &Position) -> f32 {
        for (i, trigger) in TRIGGERS.iter().enumerate() {
            if self.fired[i] {
                continue;
            }
            if (trigger.fires)(pos, Color::White) || (trigger.fires)(pos, Color::Black) {
                self.fired[i] = true;
                self.value += trigger.increment;
                debug!(trigger = trigger.name, weight = self.value, "endgame trigger fired");
                break;
            }
        }

        for kind in &PieceKind::ALL[..5] {
            debug!(
                piece = ?kind,
                white = pos.pieces().count(Color::White, *kind),
                black = pos.pieces().count(Color::Black, *kind),
                "piece count"
            );
        }
        self.value
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
#[path = "eval_tests.rs"]
mod eval_tests;
