pub mod attack;
pub mod bitboard;
pub mod cozy;
pub mod moves;
pub mod notation;

pub use cozy_chess::{Color, Piece};

use attack::AttackTables;
use bitboard::Bitboard;
use moves::Move;

/// What the search needs from a board representation. Implementations own
/// legality, hashing and notation; the search only consumes them.
pub trait Position: Clone + Send {
    fn side_to_move(&self) -> Color;

    /// Position identity used for the transposition table and repetition.
    fn key(&self) -> u64;

    /// Plies played since the start of the game.
    fn half_moves_played(&self) -> u32;

    fn fifty_moves_clock(&self) -> u32;

    /// Appends all legal moves to `out`.
    fn legal_moves(&self, out: &mut Vec<Move>);

    /// Appends the tactically forcing moves (captures and promotions) to
    /// `out`. These may be pseudo-legal; the caller checks legality after
    /// making them.
    fn quiescence_moves(&self, out: &mut Vec<Move>);

    fn make(&mut self, mv: Move);
    fn unmake(&mut self, mv: Move);
    fn make_null(&mut self);
    fn unmake_null(&mut self);

    /// Occupancy of one (colour, piece) pair.
    fn pieces(&self, color: Color, piece: Piece) -> Bitboard;

    fn colors(&self, color: Color) -> Bitboard;

    /// Whether the current position has occurred at least `times` times,
    /// counting the current occurrence.
    fn has_repeated(&self, times: usize) -> bool;

    fn insufficient_material(&self) -> bool;

    /// Standard algebraic rendering of a move sequence played from here.
    fn format_algebraic(&self, moves: &[Move]) -> String;

    /// Protocol (long algebraic) rendering of a move sequence.
    fn format_protocol(&self, moves: &[Move]) -> String {
        moves.iter().map(|m| m.to_string()).collect::<Vec<_>>().join(" ")
    }

    fn occupied(&self) -> Bitboard {
        self.colors(Color::White) | self.colors(Color::Black)
    }

    /// All pieces of either colour attacking `square` given `occupied`.
    fn attackers_to(&self, tables: &AttackTables, square: usize, occupied: Bitboard) -> Bitboard {
        let diagonal = self.pieces(Color::White, Piece::Bishop) | self.pieces(Color::Black, Piece::Bishop)
            | self.pieces(Color::White, Piece::Queen) | self.pieces(Color::Black, Piece::Queen);
        let straight = self.pieces(Color::White, Piece::Rook) | self.pieces(Color::Black, Piece::Rook)
            | self.pieces(Color::White, Piece::Queen) | self.pieces(Color::Black, Piece::Queen);
        let attackers = (tables.pawn(square, Color::Black) & self.pieces(Color::White, Piece::Pawn))
            | (tables.pawn(square, Color::White) & self.pieces(Color::Black, Piece::Pawn))
            | (tables.knight(square) & (self.pieces(Color::White, Piece::Knight) | self.pieces(Color::Black, Piece::Knight)))
            | (tables.king(square) & (self.pieces(Color::White, Piece::King) | self.pieces(Color::Black, Piece::King)))
            | (tables.bishop(square, occupied) & diagonal)
            | (tables.rook(square, occupied) & straight);
        attackers & occupied
    }

    /// Whether `color`'s king is attacked.
    fn in_check(&self, color: Color) -> bool {
        let king = self.pieces(color, Piece::King);
        if king == 0 { return false; }
        let tables = attack::tables();
        let square = bitboard::scan(king);
        self.attackers_to(tables, square, self.occupied()) & self.colors(!color) != 0
    }

    /// Whether playing `mv` gives check to the opponent.
    fn causes_check(&self, mv: Move) -> bool {
        let mut copy = self.clone();
        let mover = self.side_to_move();
        copy.make(mv);
        copy.in_check(!mover)
    }
}
