use piesearch::search::alphabeta::Worker;
use piesearch::search::context::{SearchContext, SharedState};
use piesearch::search::eval::{Evaluator, PstEvaluator, INFINITY};
use piesearch::CozyPosition;

fn qsearch(fen: &str) -> (i32, i32, u64) {
    let pos = CozyPosition::from_fen(fen).expect("valid fen");
    let stand_pat = PstEvaluator.evaluate(&pos);
    let shared = SharedState::default();
    let mut ctx = SearchContext::new();
    let mut worker = Worker::helper(pos, &shared, &PstEvaluator, &mut ctx);
    let value = worker.quiescence(0, -INFINITY, INFINITY);
    (value, stand_pat, shared.stats.nodes())
}

#[test]
fn qsearch_terminates_on_tactical_positions() {
    let fens = [
        "r1bqkbnr/pppp1ppp/2n5/4p3/3PP3/5N2/PPP2PPP/RNBQKB1R b KQkq - 0 3",
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    ];
    for fen in fens {
        let (value, stand_pat, nodes) = qsearch(fen);
        assert!(value >= stand_pat, "qsearch {value} below stand pat {stand_pat} for {fen}");
        assert!(nodes >= 1, "qsearch visited no nodes for {fen}");
    }
}

#[test]
fn bare_kings_stand_pat() {
    let (value, stand_pat, nodes) = qsearch("4k3/8/8/8/8/8/8/4K3 w - - 0 1");
    assert_eq!(value, stand_pat);
    assert_eq!(nodes, 1);
}

#[test]
fn hanging_piece_improves_on_stand_pat() {
    // black rook on d5 is free for the white knight
    let (value, stand_pat, _) = qsearch("4k3/8/8/3r4/8/4N3/8/4K3 w - - 0 1");
    assert!(value >= stand_pat + 400, "expected rook win: value {value}, stand pat {stand_pat}");
}
