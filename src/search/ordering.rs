use cozy_chess::{Color, Piece};

use crate::board::bitboard::{square_bb, Bitboard, NOT_A_FILE, NOT_H_FILE};
use crate::board::moves::Move;
use crate::board::Position;
use crate::search::eval::{captured_value, piece_value};

pub const KILLER_MOVES: usize = 2;
pub const KILLER_MOVE_VALUE: f32 = 10.0;
pub const KILLER_MOVE_SLOT_VALUE: f32 = -0.01;
pub const HASH_MOVE_VALUE: f32 = 60.0;
pub const QUEEN_PROMOTION_MOVE_VALUE: f32 = 1.0;

/// Immediate threat of a move: captured value over mover value, plus a
/// bonus for queening. Quiet moves score zero.
pub fn move_ordering_value(mv: Move) -> f32 {
    let mut value = captured_value(mv) as f32 / piece_value(mv.piece()) as f32;
    if mv.is_queen_promotion() { value += QUEEN_PROMOTION_MOVE_VALUE; }
    value
}

/// Moves every positively valued move to the front and insertion-sorts that
/// prefix in descending order. Returns the prefix length; the rest keep
/// their generation order.
pub fn sort(moves: &mut [Move], values: &mut [f32]) -> usize {
    let mut positive = 0;
    for i in 0..moves.len() {
        if values[i] > 0.0 {
            values.swap(positive, i);
            moves.swap(positive, i);
            positive += 1;
        }
    }
    for i in 1..positive {
        let mut j = i;
        while j > 0 && values[j] > values[j - 1] {
            values.swap(j - 1, j);
            moves.swap(j - 1, j);
            j -= 1;
        }
    }
    positive
}

/// Squares the enemy pawns could ever block or capture on: their files
/// filled towards the side to move's home rank, plus the diagonals below.
pub fn passed_pawn_prevention<P: Position>(position: &P) -> Bitboard {
    let stm = position.side_to_move();
    let mut bb = position.pieces(!stm, Piece::Pawn);
    if stm == Color::White {
        bb |= bb >> 8;
        bb |= bb >> 16;
        bb |= bb >> 32;
        bb |= (bb & NOT_A_FILE) >> 9;
        bb |= (bb & NOT_H_FILE) >> 7;
    } else {
        bb |= bb << 8;
        bb |= bb << 16;
        bb |= bb << 32;
        bb |= (bb & NOT_A_FILE) << 7;
        bb |= (bb & NOT_H_FILE) << 9;
    }
    bb
}

/// A pawn push onto a square no enemy pawn can ever contest.
#[inline]
pub fn is_dangerous_pawn_advance(mv: Move, prevention: Bitboard) -> bool {
    mv.is_pawn_advance() && square_bb(mv.to()) & prevention == 0
}

/// Most-recently-used refutations per ply.
#[derive(Clone, Debug)]
pub struct KillerTable {
    slots: Vec<[Option<Move>; KILLER_MOVES]>,
}

impl KillerTable {
    pub fn new(plies: usize) -> Self { Self { slots: vec![[None; KILLER_MOVES]; plies] } }

    pub fn get(&self, ply: usize) -> &[Option<Move>; KILLER_MOVES] { &self.slots[ply] }

    /// Puts `mv` in front, shifting the others back by one slot.
    pub fn promote(&mut self, ply: usize, mv: Move) {
        let slot = &mut self.slots[ply];
        if slot[0] == Some(mv) { return; }
        let end = slot.iter().position(|&k| k == Some(mv)).unwrap_or(KILLER_MOVES - 1);
        slot.copy_within(0..end, 1);
        slot[0] = Some(mv);
    }

    pub fn clear(&mut self) {
        for slot in &mut self.slots { *slot = [None; KILLER_MOVES]; }
    }
}
