use piesearch::{CozyPosition, Position};

/// Leaf count through the search-facing make/unmake interface, so packed
/// castling, en passant and promotion moves must all undo cleanly.
fn perft(pos: &mut CozyPosition, depth: u32) -> u64 {
    let mut moves = Vec::new();
    pos.legal_moves(&mut moves);
    if depth == 1 { return moves.len() as u64; }
    let mut total = 0;
    for mv in moves {
        let key = pos.key();
        pos.make(mv);
        total += perft(pos, depth - 1);
        pos.unmake(mv);
        assert_eq!(pos.key(), key, "unmake of {mv} did not restore the position");
    }
    total
}

#[test]
fn perft_startpos_small_depths() {
    let mut pos = CozyPosition::startpos();
    assert_eq!(perft(&mut pos, 1), 20);
    assert_eq!(perft(&mut pos, 2), 400);
    assert_eq!(perft(&mut pos, 3), 8902);
}

#[test]
fn perft_kiwipete_exercises_special_moves() {
    let mut pos = CozyPosition::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1").unwrap();
    assert_eq!(perft(&mut pos, 1), 48);
    assert_eq!(perft(&mut pos, 2), 2039);
    assert_eq!(perft(&mut pos, 3), 97862);
}

#[test]
fn perft_promotions_and_en_passant() {
    // position 4 from the usual perft suite
    let mut pos = CozyPosition::from_fen("r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1").unwrap();
    assert_eq!(perft(&mut pos, 1), 6);
    assert_eq!(perft(&mut pos, 2), 264);
    assert_eq!(perft(&mut pos, 3), 9467);
}
