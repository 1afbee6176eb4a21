use piesearch::search::eval::CHECKMATE_VALUE;
use piesearch::search::output::{is_mate, moves_to_mate};
use piesearch::{CozyPosition, Engine, Restrictions};

struct MateCase {
    fen: &'static str,
    moves: i32,
    first: Option<&'static str>,
}

const CASES: [MateCase; 4] = [
    MateCase { fen: "r1bqkbnr/pppp1ppp/2n5/4p3/2B1P3/5Q2/PPPP1PPP/RNB1K1NR w KQkq - 0 1", moves: 1, first: Some("f3f7") },
    MateCase { fen: "6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1", moves: 1, first: Some("a1a8") },
    MateCase { fen: "7k/8/8/8/8/8/R7/1R4K1 w - - 0 1", moves: 2, first: None },
    MateCase { fen: "1r4k1/r7/8/8/8/8/8/7K b - - 0 1", moves: 2, first: None },
];

#[test]
fn finds_short_mates() {
    let mut engine = Engine::new();
    engine.set_info_sink(|_| {});
    for case in CASES {
        engine.reset();
        let pos = CozyPosition::from_fen(case.fen).unwrap();
        let result = engine.search(&pos, &Restrictions::depth(5));
        assert!(is_mate(result.value), "no mate found in {}: value {}", case.fen, result.value);
        assert_eq!(moves_to_mate(result.value), case.moves, "mate length for {}", case.fen);
        assert_eq!(result.value, CHECKMATE_VALUE - (2 * case.moves - 1));
        if let Some(first) = case.first {
            assert_eq!(result.best_move.map(|m| m.to_string()).as_deref(), Some(first), "{}", case.fen);
        }
    }
}
