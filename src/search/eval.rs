use cozy_chess::{Color, Piece};

use crate::board::bitboard::squares;
use crate::board::moves::Move;
use crate::board::Position;

pub const INFINITY: i32 = 32_000;
pub const CHECKMATE_VALUE: i32 = 30_000;
pub const NEAR_CHECKMATE_VALUE: i32 = 29_000;
pub const DRAW_VALUE: i32 = 0;

/// Centipawn values indexed by `Piece as usize`.
pub const PIECE_VALUE: [i32; 6] = [100, 320, 330, 500, 900, 20_000];

#[inline]
pub fn piece_value(piece: Piece) -> i32 { PIECE_VALUE[piece as usize] }

/// Value of the piece a move captures, zero for quiet moves.
#[inline]
pub fn captured_value(mv: Move) -> i32 { mv.captured().map_or(0, piece_value) }

/// Static evaluation from the perspective of the side to move.
pub trait Evaluator: Send + Sync {
    fn evaluate<P: Position>(&self, position: &P) -> i32;
}

/// Material plus piece-square tables. Black reads the tables through a
/// vertical flip so mirrored positions score identically.
#[derive(Clone, Copy, Debug, Default)]
pub struct PstEvaluator;

// Tables are written rank 8 first, as seen from White's side of the board.
#[rustfmt::skip]
const PAWN_PST: [i32; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
    50, 50, 50, 50, 50, 50, 50, 50,
    10, 10, 20, 30, 30, 20, 10, 10,
     5,  5, 10, 25, 25, 10,  5,  5,
     0,  0,  0, 20, 20,  0,  0,  0,
     5, -5,-10,  0,  0,-10, -5,  5,
     5, 10, 10,-20,-20, 10, 10,  5,
     0,  0,  0,  0,  0,  0,  0,  0,
];

#[rustfmt::skip]
const KNIGHT_PST: [i32; 64] = [
    -50,-40,-30,-30,-30,-30,-40,-50,
    -40,-20,  0,  0,  0,  0,-20,-40,
    -30,  0, 10, 15, 15, 10,  0,-30,
    -30,  5, 15, 20, 20, 15,  5,-30,
    -30,  0, 15, 20, 20, 15,  0,-30,
    -30,  5, 10, 15, 15, 10,  5,-30,
    -40,-20,  0,  5,  5,  0,-20,-40,
    -50,-40,-30,-30,-30,-30,-40,-50,
];

#[rustfmt::skip]
const BISHOP_PST: [i32; 64] = [
    -20,-10,-10,-10,-10,-10,-10,-20,
    -10,  0,  0,  0,  0,  0,  0,-10,
    -10,  0,  5, 10, 10,  5,  0,-10,
    -10,  5,  5, 10, 10,  5,  5,-10,
    -10,  0, 10, 10, 10, 10,  0,-10,
    -10, 10, 10, 10, 10, 10, 10,-10,
    -10,  5,  0,  0,  0,  0,  5,-10,
    -20,-10,-10,-10,-10,-10,-10,-20,
];

#[rustfmt::skip]
const ROOK_PST: [i32; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
     5, 10, 10, 10, 10, 10, 10,  5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
     0,  0,  0,  5,  5,  0,  0,  0,
];

#[rustfmt::skip]
const QUEEN_PST: [i32; 64] = [
    -20,-10,-10, -5, -5,-10,-10,-20,
    -10,  0,  0,  0,  0,  0,  0,-10,
    -10,  0,  5,  5,  5,  5,  0,-10,
     -5,  0,  5,  5,  5,  5,  0, -5,
      0,  0,  5,  5,  5,  5,  0, -5,
    -10,  5,  5,  5,  5,  5,  0,-10,
    -10,  0,  5,  0,  0,  0,  0,-10,
    -20,-10,-10, -5, -5,-10,-10,-20,
];

#[rustfmt::skip]
const KING_PST: [i32; 64] = [
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -20,-30,-30,-40,-40,-30,-30,-20,
    -10,-20,-20,-20,-20,-20,-20,-10,
     20, 20,  0,  0,  0,  0, 20, 20,
     20, 30, 10,  0,  0, 10, 30, 20,
];

const PST: [&[i32; 64]; 6] = [&PAWN_PST, &KNIGHT_PST, &BISHOP_PST, &ROOK_PST, &QUEEN_PST, &KING_PST];

impl PstEvaluator {
    fn side_score<P: Position>(position: &P, color: Color) -> i32 {
        let flip = if color == Color::White { 56 } else { 0 };
        let mut score = 0;
        for piece in Piece::ALL {
            let table = PST[piece as usize];
            for sq in squares(position.pieces(color, piece)) {
                score += piece_value(piece) + table[sq ^ flip];
            }
        }
        score
    }
}

impl Evaluator for PstEvaluator {
    fn evaluate<P: Position>(&self, position: &P) -> i32 {
        let stm = position.side_to_move();
        Self::side_score(position, stm) - Self::side_score(position, !stm)
    }
}
