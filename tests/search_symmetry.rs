use piesearch::search::alphabeta::Worker;
use piesearch::search::context::{SearchContext, SharedState};
use piesearch::search::eval::{Evaluator, PstEvaluator, INFINITY};
use piesearch::{CozyPosition, Engine, Position, Restrictions};

/// Colour-flipped FEN: ranks reversed, piece case swapped, side to move,
/// castling rights and en passant square mirrored.
fn mirror_fen(fen: &str) -> String {
    let fields: Vec<&str> = fen.split_whitespace().collect();
    let swap = |s: &str| -> String {
        s.chars().map(|c| if c.is_ascii_uppercase() { c.to_ascii_lowercase() } else { c.to_ascii_uppercase() }).collect()
    };
    let board = fields[0].split('/').rev().map(swap).collect::<Vec<_>>().join("/");
    let side = if fields[1] == "w" { "b" } else { "w" };
    let castling = if fields[2] == "-" {
        "-".to_string()
    } else {
        let swapped = swap(fields[2]);
        let mut rights: Vec<char> = swapped.chars().collect();
        rights.sort_by_key(|c| (c.is_ascii_lowercase(), match c.to_ascii_lowercase() { 'k' => 0, _ => 1 }));
        rights.into_iter().collect()
    };
    let ep = mirror_square(fields[3]);
    format!("{} {} {} {} {} {}", board, side, castling, ep, fields[4], fields[5])
}

fn mirror_square(sq: &str) -> String {
    if sq == "-" { return sq.to_string(); }
    let mut chars = sq.chars();
    let file = chars.next().unwrap();
    let rank = chars.next().unwrap().to_digit(10).unwrap();
    format!("{}{}", file, 9 - rank)
}

fn mirror_move(uci: &str) -> String {
    format!("{}{}{}", mirror_square(&uci[0..2]), mirror_square(&uci[2..4]), &uci[4..])
}

fn quiescence(fen: &str) -> i32 {
    let shared = SharedState::default();
    let mut ctx = SearchContext::new();
    let mut worker = Worker::helper(CozyPosition::from_fen(fen).unwrap(), &shared, &PstEvaluator, &mut ctx);
    worker.quiescence(0, -INFINITY, INFINITY)
}

fn search_value(fen: &str, depth: i32) -> i32 {
    let shared = SharedState::default();
    let mut ctx = SearchContext::new();
    let pos = CozyPosition::from_fen(fen).unwrap();
    let in_check = pos.in_check(pos.side_to_move());
    let mut worker = Worker::helper(pos, &shared, &PstEvaluator, &mut ctx);
    worker.search(depth, 0, -INFINITY, INFINITY, in_check, true).unwrap()
}

const POSITIONS: [&str; 4] = [
    "r1bqkbnr/pppp1ppp/2n5/4p3/3PP3/5N2/PPP2PPP/RNBQKB1R b KQkq - 0 3",
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    "4k3/8/4p3/3p4/8/8/8/3QK3 w - - 0 1",
    "4k3/8/8/3r4/8/4N3/8/4K3 w - - 0 1",
];

#[test]
fn mirror_helper_is_an_involution() {
    for fen in POSITIONS {
        assert_eq!(mirror_fen(&mirror_fen(fen)), fen);
    }
}

#[test]
fn evaluation_and_quiescence_are_colour_symmetric() {
    for fen in POSITIONS {
        let mirrored = mirror_fen(fen);
        let a = CozyPosition::from_fen(fen).unwrap();
        let b = CozyPosition::from_fen(&mirrored).unwrap();
        assert_eq!(PstEvaluator.evaluate(&a), PstEvaluator.evaluate(&b), "eval differs for {fen}");
        assert_eq!(quiescence(fen), quiescence(&mirrored), "qsearch differs for {fen}");
    }
}

#[test]
fn full_width_search_is_colour_symmetric() {
    // white has castled, black keeps both rights
    let castling = "r3k2r/ppp2ppp/2n1bn2/3pp3/4P3/2NP1N2/PPP2PPP/R4RK1 b kq - 0 9";
    for fen in POSITIONS.into_iter().chain([castling]) {
        let mirrored = mirror_fen(fen);
        for depth in 1..=4 {
            assert_eq!(search_value(fen, depth), search_value(&mirrored, depth), "depth {depth} differs for {fen}");
        }
    }
}

#[test]
fn mirrored_tactic_picks_mirrored_move() {
    let fen = "k7/8/8/8/8/8/3qQ3/7K w - - 0 1";
    let mut engine = Engine::new();
    engine.set_info_sink(|_| {});
    let white = engine.search(&CozyPosition::from_fen(fen).unwrap(), &Restrictions::depth(3));
    engine.reset();
    let black = engine.search(&CozyPosition::from_fen(&mirror_fen(fen)).unwrap(), &Restrictions::depth(3));
    let white_move = white.best_move.unwrap().to_string();
    assert_eq!(black.best_move.unwrap().to_string(), mirror_move(&white_move));
}
