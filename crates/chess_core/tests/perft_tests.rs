use std::time::Instant;

use rayon::prelude::*;

use chess_core::{Position, divide, perft};

const FULL_PERFT_ENV: &str = "FULL_PERFT";
const NODE_LIMIT: u64 = 1_000_000;

/// Reference counts from the chess programming wiki perft pages.
const CASES: &[(&str, &[u64])] = &[
    (
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        &[20, 400, 8_902, 197_281, 4_865_609],
    ),
    (
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        &[48, 2_039, 97_862, 4_085_603],
    ),
    (
        "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        &[14, 191, 2_812, 43_238, 674_624],
    ),
    (
        "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
        &[6, 264, 9_467, 422_333],
    ),
    (
        "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
        &[44, 1_486, 62_379, 2_103_487],
    ),
    (
        "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10",
        &[46, 2_079, 89_890, 3_894_594],
    ),
];

#[test]
fn perft_reference_positions() {
    let full = std::env::var(FULL_PERFT_ENV).is_ok();

    CASES.par_iter().enumerate().for_each(|(idx, (fen, counts))| {
        let start = Instant::now();
        let mut total_nodes = 0u64;

        for (i, &expected) in counts.iter().enumerate() {
            let depth = i as u8 + 1;
            if !full && expected > NODE_LIMIT {
                eprintln!(
                    "Skipping depth {depth} for case {} ({expected} nodes), set {FULL_PERFT_ENV}=1 to run all.",
                    idx + 1
                );
                continue;
            }
            let mut pos = Position::from_fen(fen).expect("valid FEN");
            let before = pos.to_fen();
            let got = perft(&mut pos, depth);
            assert_eq!(
                got, expected,
                "perft mismatch for '{fen}' at depth {depth}"
            );
            assert_eq!(pos.to_fen(), before, "perft left the position modified");
            total_nodes += got;
        }

        println!(
            "Case {:02} done: {total_nodes} nodes in {:.3?}",
            idx + 1,
            start.elapsed()
        );
    });
}

#[test]
fn divide_sums_to_perft() {
    let (fen, counts) = CASES[1];
    let mut pos = Position::from_fen(fen).expect("valid FEN");
    let split = divide(&mut pos, 2);
    assert_eq!(split.len(), counts[0] as usize);
    assert_eq!(split.iter().map(|(_, n)| n).sum::<u64>(), counts[1]);
}
