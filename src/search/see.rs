use cozy_chess::Piece;

use crate::board::attack::tables;
use crate::board::bitboard::{scan, square_bb, Bitboard};
use crate::board::moves::Move;
use crate::board::{Color, Position};
use crate::search::eval::{captured_value, piece_value};

const MAX_EXCHANGES: usize = 32;

/// Net material won by the side to move if `mv` starts a full exchange on
/// its destination square, both sides always recapturing with their least
/// valuable attacker and stopping when continuing would lose material.
pub fn evaluate_static_exchange<P: Position>(position: &P, mv: Move) -> i32 {
    let promotion = mv.promotion();
    if !mv.is_capture() && promotion.is_none() { return 0; }
    let t = tables();
    let to = mv.to();
    let mut occupied = position.occupied() ^ square_bb(mv.from());
    if mv.is_en_passant() {
        let victim = if position.side_to_move() == Color::White { to - 8 } else { to + 8 };
        occupied ^= square_bb(victim);
    }

    let mut gain = [0i32; MAX_EXCHANGES];
    let mut d = 0;
    gain[0] = captured_value(mv) + promotion.map_or(0, |p| piece_value(p) - piece_value(Piece::Pawn));
    let mut on_square = promotion.map_or(piece_value(mv.piece()), piece_value);
    let mut side = !position.side_to_move();

    while d + 1 < MAX_EXCHANGES {
        let attackers = position.attackers_to(t, to, occupied) & position.colors(side);
        let Some((square, piece)) = least_valuable(position, side, attackers) else { break };
        d += 1;
        gain[d] = on_square - gain[d - 1];
        if (-gain[d - 1]).max(gain[d]) < 0 { break; }
        occupied ^= square_bb(square);
        on_square = piece_value(piece);
        side = !side;
    }
    while d > 0 {
        gain[d - 1] = -(-gain[d - 1]).max(gain[d]);
        d -= 1;
    }
    gain[0]
}

fn least_valuable<P: Position>(position: &P, side: Color, attackers: Bitboard) -> Option<(usize, Piece)> {
    Piece::ALL.iter().find_map(|&piece| {
        let bb = attackers & position.pieces(side, piece);
        (bb != 0).then(|| (scan(bb), piece))
    })
}
