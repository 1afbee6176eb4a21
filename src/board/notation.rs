//! Standard algebraic notation for move sequences.

use crate::board::moves::{piece_char, square_name, Move};
use crate::board::{Piece, Position};

/// Renders `moves`, played in order from `position`, as space separated SAN.
pub fn algebraic<P: Position>(position: &P, moves: &[Move]) -> String {
    let mut pos = position.clone();
    let mut out = Vec::with_capacity(moves.len());
    for &mv in moves {
        out.push(san(&pos, mv));
        pos.make(mv);
    }
    out.join(" ")
}

/// SAN for a single move in `pos`.
pub fn san<P: Position>(pos: &P, mv: Move) -> String {
    if mv.is_null() { return "--".to_string(); }

    let mut s = String::with_capacity(8);
    if mv.is_castle() {
        s.push_str(if mv.to() > mv.from() { "O-O" } else { "O-O-O" });
    } else {
        let piece = mv.piece();
        if piece == Piece::Pawn {
            if mv.is_capture() { s.push(square_name(mv.from()).as_bytes()[0] as char); }
        } else {
            s.push(piece_char(piece));
            s.push_str(&disambiguation(pos, mv));
        }
        if mv.is_capture() { s.push('x'); }
        s.push_str(&square_name(mv.to()));
        if let Some(p) = mv.promotion() {
            s.push('=');
            s.push(piece_char(p));
        }
    }

    let mut next = pos.clone();
    let mover = pos.side_to_move();
    next.make(mv);
    if next.in_check(!mover) {
        let mut replies = Vec::new();
        next.legal_moves(&mut replies);
        s.push(if replies.is_empty() { '#' } else { '+' });
    }
    s
}

fn disambiguation<P: Position>(pos: &P, mv: Move) -> String {
    let mut legal = Vec::new();
    pos.legal_moves(&mut legal);
    let rivals: Vec<Move> = legal.into_iter()
        .filter(|m| m.piece() == mv.piece() && m.to() == mv.to() && m.from() != mv.from() && !m.is_castle())
        .collect();
    if rivals.is_empty() { return String::new(); }

    let name = square_name(mv.from());
    let same_file = rivals.iter().any(|m| m.from() & 7 == mv.from() & 7);
    let same_rank = rivals.iter().any(|m| m.from() >> 3 == mv.from() >> 3);
    match (same_file, same_rank) {
        (false, _) => name[..1].to_string(),
        (true, false) => name[1..].to_string(),
        (true, true) => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::cozy::CozyPosition;

    fn line(fen: &str, uci: &[&str]) -> String {
        let mut pos = CozyPosition::from_fen(fen).unwrap();
        let start = pos.clone();
        let moves: Vec<Move> = uci.iter().map(|m| pos.play_uci(m).unwrap()).collect();
        start.format_algebraic(&moves)
    }

    #[test]
    fn opening_line() {
        let pos = CozyPosition::startpos();
        let mut play = pos.clone();
        let moves: Vec<Move> = ["e2e4", "e7e5", "g1f3", "b8c6", "f1b5"].iter().map(|m| play.play_uci(m).unwrap()).collect();
        assert_eq!(pos.format_algebraic(&moves), "e4 e5 Nf3 Nc6 Bb5");
    }

    #[test]
    fn captures_promotions_and_mate() {
        assert_eq!(line("4k3/1P6/8/8/8/8/8/4K3 w - - 0 1", &["b7b8q"]), "b8=Q+");
        assert_eq!(line("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1", &["a1a8"]), "Ra8#");
        assert_eq!(line("4k3/8/8/3p4/4P3/8/8/4K3 w - - 0 1", &["e4d5"]), "exd5");
    }

    #[test]
    fn castling_and_disambiguation() {
        assert_eq!(line("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1", &["e1g1"]), "O-O");
        assert_eq!(line("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1", &["e8c8"]), "O-O-O");
        assert_eq!(line("4k3/8/8/8/8/8/4K3/R6R w - - 0 1", &["a1d1"]), "Rad1");
        assert_eq!(line("4k3/8/8/8/8/8/8/1N2KN2 w - - 0 1", &["b1d2"]), "Nbd2");
    }
}
