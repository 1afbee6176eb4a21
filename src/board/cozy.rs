use cozy_chess::{Board as CozyBoard, Color, Move as CozyMove, Piece, Square};

use crate::board::bitboard::Bitboard;
use crate::board::moves::{Move, Special};
use crate::board::{notation, Position};
use crate::error::EngineError;

/// `Position` backed by cozy-chess. Keeps a board stack for unmake and the
/// key history for repetition detection.
#[derive(Clone, Debug)]
pub struct CozyPosition {
    board: CozyBoard,
    stack: Vec<CozyBoard>,
    keys: Vec<u64>,
    /// Key history length at each null move still on the stack; repetition
    /// never looks back past the last one.
    null_marks: Vec<usize>,
}

impl CozyPosition {
    pub fn startpos() -> Self {
        Self::from_board(CozyBoard::default())
    }

    pub fn from_fen(fen: &str) -> Result<Self, EngineError> {
        CozyBoard::from_fen(fen, false)
            .map(Self::from_board)
            .map_err(|e| EngineError::InvalidFen(format!("{fen}: {e:?}")))
    }

    pub fn from_board(board: CozyBoard) -> Self {
        Self { board, stack: Vec::with_capacity(256), keys: Vec::with_capacity(256), null_marks: Vec::new() }
    }

    pub fn board(&self) -> &CozyBoard { &self.board }

    /// Plays a move given in protocol notation (e.g. `e2e4`, `e1g1`, `e7e8q`).
    pub fn play_uci(&mut self, uci: &str) -> Result<Move, EngineError> {
        let mut moves = Vec::with_capacity(64);
        self.legal_moves(&mut moves);
        let mv = moves.into_iter().find(|m| m.to_string() == uci)
            .ok_or_else(|| EngineError::IllegalMove(uci.to_string()))?;
        self.make(mv);
        Ok(mv)
    }

    pub fn from_fen_and_moves(fen: Option<&str>, moves: &[String]) -> Result<Self, EngineError> {
        let mut pos = match fen { Some(f) if f != "startpos" => Self::from_fen(f)?, _ => Self::startpos() };
        for m in moves { pos.play_uci(m)?; }
        Ok(pos)
    }

    pub fn fen(&self) -> String { format!("{}", self.board) }

    fn pack(&self, mv: CozyMove) -> Move {
        let from = mv.from as usize;
        let to = mv.to as usize;
        let piece = self.board.piece_on(mv.from).unwrap_or(Piece::Pawn);
        let stm = self.board.side_to_move();
        if piece == Piece::King && self.board.color_on(mv.to) == Some(stm) {
            // cozy encodes castling as king-takes-rook
            let rank = to & !7;
            let king_to = if to > from { rank + 6 } else { rank + 2 };
            return Move::new(from, king_to, piece, None, Special::Castle);
        }
        if piece == Piece::Pawn && (from & 7) != (to & 7) && self.board.piece_on(mv.to).is_none() {
            return Move::new(from, to, piece, Some(Piece::Pawn), Special::EnPassant);
        }
        let captured = self.board.piece_on(mv.to);
        let special = mv.promotion.map_or(Special::None, Special::Promotion);
        Move::new(from, to, piece, captured, special)
    }

    fn unpack(&self, mv: Move) -> CozyMove {
        let from = Square::index(mv.from());
        if mv.is_castle() {
            let rank = mv.to() & !7;
            let rook = if mv.to() > mv.from() { rank + 7 } else { rank };
            return CozyMove { from, to: Square::index(rook), promotion: None };
        }
        CozyMove { from, to: Square::index(mv.to()), promotion: mv.promotion() }
    }
}

impl Default for CozyPosition {
    fn default() -> Self { Self::startpos() }
}

impl Position for CozyPosition {
    fn side_to_move(&self) -> Color { self.board.side_to_move() }

    fn key(&self) -> u64 { self.board.hash() }

    fn half_moves_played(&self) -> u32 {
        let full = self.board.fullmove_number().max(1) as u32;
        (full - 1) * 2 + if self.board.side_to_move() == Color::Black { 1 } else { 0 }
    }

    fn fifty_moves_clock(&self) -> u32 { self.board.halfmove_clock() as u32 }

    fn legal_moves(&self, out: &mut Vec<Move>) {
        self.board.generate_moves(|pm| {
            for mv in pm { out.push(self.pack(mv)); }
            false
        });
    }

    fn quiescence_moves(&self, out: &mut Vec<Move>) {
        let enemy = self.board.colors(!self.board.side_to_move());
        self.board.generate_moves(|mut pm| {
            if pm.piece != Piece::Pawn { pm.to &= enemy; }
            for mv in pm {
                let m = self.pack(mv);
                if m.is_capture() || m.promotion().is_some() { out.push(m); }
            }
            false
        });
    }

    fn make(&mut self, mv: Move) {
        let cm = self.unpack(mv);
        self.keys.push(self.board.hash());
        self.stack.push(self.board.clone());
        self.board.play_unchecked(cm);
    }

    fn unmake(&mut self, _mv: Move) {
        if let Some(prev) = self.stack.pop() {
            self.board = prev;
            self.keys.pop();
        }
    }

    fn make_null(&mut self) {
        self.keys.push(self.board.hash());
        self.stack.push(self.board.clone());
        if let Some(next) = self.board.null_move() { self.board = next; }
        self.null_marks.push(self.keys.len());
    }

    fn unmake_null(&mut self) {
        self.null_marks.pop();
        self.unmake(Move::NULL);
    }

    fn pieces(&self, color: Color, piece: Piece) -> Bitboard { self.board.colored_pieces(color, piece).0 }

    fn colors(&self, color: Color) -> Bitboard { self.board.colors(color).0 }

    fn occupied(&self) -> Bitboard { self.board.occupied().0 }

    fn has_repeated(&self, times: usize) -> bool {
        let key = self.board.hash();
        let since_null = self.keys.len() - self.null_marks.last().copied().unwrap_or(0);
        let window = (self.board.halfmove_clock() as usize).min(since_null);
        let earlier = self.keys.iter().rev().take(window).skip(1).step_by(2).filter(|&&k| k == key).count();
        earlier + 1 >= times
    }

    fn insufficient_material(&self) -> bool {
        let heavy = self.board.pieces(Piece::Pawn) | self.board.pieces(Piece::Rook) | self.board.pieces(Piece::Queen);
        if !heavy.is_empty() { return false; }
        let minors = self.board.pieces(Piece::Knight) | self.board.pieces(Piece::Bishop);
        minors.len() <= 1
    }

    fn format_algebraic(&self, moves: &[Move]) -> String { notation::algebraic(self, moves) }

    fn in_check(&self, color: Color) -> bool {
        if color == self.board.side_to_move() { return !self.board.checkers().is_empty(); }
        let king = self.pieces(color, Piece::King);
        if king == 0 { return false; }
        let tables = crate::board::attack::tables();
        let square = crate::board::bitboard::scan(king);
        self.attackers_to(tables, square, self.occupied()) & self.colors(!color) != 0
    }

    fn causes_check(&self, mv: Move) -> bool {
        let mut next = self.board.clone();
        next.play_unchecked(self.unpack(mv));
        !next.checkers().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startpos_has_twenty_moves() {
        let p = CozyPosition::startpos();
        let mut moves = Vec::new();
        p.legal_moves(&mut moves);
        assert_eq!(moves.len(), 20);
        assert!(moves.iter().all(|m| !m.is_capture()));
    }

    #[test]
    fn castling_is_reported_as_king_two_squares() {
        let mut p = CozyPosition::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let mut moves = Vec::new();
        p.legal_moves(&mut moves);
        let castles: Vec<String> = moves.iter().filter(|m| m.is_castle()).map(|m| m.to_string()).collect();
        assert!(castles.contains(&"e1g1".to_string()));
        assert!(castles.contains(&"e1c1".to_string()));
        p.play_uci("e1g1").unwrap();
        assert_eq!(p.board().piece_on(Square::F1), Some(Piece::Rook));
        assert_eq!(p.board().piece_on(Square::G1), Some(Piece::King));
    }

    #[test]
    fn en_passant_captures_a_pawn() {
        let p = CozyPosition::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2").unwrap();
        let mut moves = Vec::new();
        p.quiescence_moves(&mut moves);
        let ep = moves.iter().find(|m| m.is_en_passant()).expect("e5d6 en passant");
        assert_eq!(ep.captured(), Some(Piece::Pawn));
        assert_eq!(ep.to_string(), "e5d6");
    }

    #[test]
    fn unmake_restores_position() {
        let mut p = CozyPosition::startpos();
        let key = p.key();
        let mv = p.play_uci("e2e4").unwrap();
        assert_ne!(p.key(), key);
        p.unmake(mv);
        assert_eq!(p.key(), key);
    }

    #[test]
    fn repetition_counts_earlier_occurrences() {
        let mut p = CozyPosition::startpos();
        assert!(!p.has_repeated(2));
        for m in ["g1f3", "g8f6", "f3g1", "f6g8"] { p.play_uci(m).unwrap(); }
        assert!(p.has_repeated(2));
        assert!(!p.has_repeated(3));
        for m in ["g1f3", "g8f6", "f3g1", "f6g8"] { p.play_uci(m).unwrap(); }
        assert!(p.has_repeated(3));
    }

    #[test]
    fn repetition_does_not_reach_across_null_moves() {
        let mut p = CozyPosition::startpos();
        for m in ["g1f3", "g8f6", "f3g1", "f6g8"] { p.play_uci(m).unwrap(); }
        assert!(p.has_repeated(2));
        // two passes give back the same position with the same side to move
        p.make_null();
        p.make_null();
        assert!(!p.has_repeated(2));
        p.unmake_null();
        p.unmake_null();
        assert!(p.has_repeated(2));
    }

    #[test]
    fn lone_minor_is_insufficient() {
        assert!(CozyPosition::from_fen("4k3/8/8/8/8/8/8/4KB2 w - - 0 1").unwrap().insufficient_material());
        assert!(!CozyPosition::from_fen("4k3/8/8/8/8/8/8/4KR2 w - - 0 1").unwrap().insufficient_material());
    }

    #[test]
    fn check_detection_for_both_sides() {
        let p = CozyPosition::from_fen("k7/8/8/8/8/8/8/R3K3 b - - 0 1").unwrap();
        assert!(p.in_check(Color::Black));
        assert!(!p.in_check(Color::White));
    }
}
