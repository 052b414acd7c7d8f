use crate::{board::Position, types::Move};

/// Counts leaf nodes of the legal move tree to `depth`.
/// Used to verify move generation and make/unmake against known totals.
pub fn perft(pos: &mut Position, depth: u8) -> u64 {
    fn inner(pos: &mut Position, layers: &mut [Vec<Move>]) -> u64 {
        let Some((buf, rest)) = layers.split_first_mut() else {
            return 1;
        };
        pos.legal_moves_into(buf, false);
        if rest.is_empty() {
            return buf.len() as u64;
        }

        let mut nodes = 0u64;
        for &mv in buf.iter() {
            pos.make_move(mv);
            nodes += inner(pos, rest);
            pos.unmake_move(mv);
        }
        nodes
    }

    let mut layers = vec![Vec::with_capacity(64); depth as usize];
    inner(pos, &mut layers)
}

/// Per-root-move node counts, sorted by move text.
pub fn divide(pos: &mut Position, depth: u8) -> Vec<(Move, u64)> {
    if depth == 0 {
        return Vec::new();
    }
    let moves = pos.legal_moves().to_vec();
    let mut out: Vec<(Move, u64)> = moves
        .into_iter()
        .map(|mv| {
            let mut child = pos.play(mv);
            (mv, perft(&mut child, depth - 1))
        })
        .collect();
    out.sort_by_key(|(mv, _)| mv.to_string());
    out
}
