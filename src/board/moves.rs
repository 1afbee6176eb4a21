use std::fmt;

use cozy_chess::Piece;

const SQUARE_MASK: u32 = 0x3F;
const PIECE_MASK: u32 = 0x7;
const TO_SHIFT: u32 = 6;
const PIECE_SHIFT: u32 = 12;
const CAPTURE_SHIFT: u32 = 15;
const SPECIAL_SHIFT: u32 = 18;
const NO_PIECE: u32 = 7;

/// Special flag stored in the top bits of a packed move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Special {
    None,
    Promotion(Piece),
    Castle,
    EnPassant,
    Null,
}

impl Special {
    fn encode(self) -> u32 {
        match self {
            Special::None => 0,
            Special::Promotion(Piece::Knight) => 1,
            Special::Promotion(Piece::Bishop) => 2,
            Special::Promotion(Piece::Rook) => 3,
            Special::Promotion(_) => 4,
            Special::Castle => 5,
            Special::EnPassant => 6,
            Special::Null => 7,
        }
    }

    fn decode(bits: u32) -> Self {
        match bits {
            1 => Special::Promotion(Piece::Knight),
            2 => Special::Promotion(Piece::Bishop),
            3 => Special::Promotion(Piece::Rook),
            4 => Special::Promotion(Piece::Queen),
            5 => Special::Castle,
            6 => Special::EnPassant,
            7 => Special::Null,
            _ => Special::None,
        }
    }
}

/// Immutable packed move: origin, destination, moving piece, captured piece
/// and special flag. Equality is by raw value.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move(u32);

impl Move {
    pub const NULL: Move = Move((NO_PIECE << CAPTURE_SHIFT) | (7 << SPECIAL_SHIFT));

    pub fn new(from: usize, to: usize, piece: Piece, captured: Option<Piece>, special: Special) -> Self {
        let cap = captured.map_or(NO_PIECE, |p| p as u32);
        Move((from as u32 & SQUARE_MASK)
            | ((to as u32 & SQUARE_MASK) << TO_SHIFT)
            | ((piece as u32) << PIECE_SHIFT)
            | (cap << CAPTURE_SHIFT)
            | (special.encode() << SPECIAL_SHIFT))
    }

    /// Rebuilds a move from its raw encoding. Zero is reserved for "no move".
    #[inline]
    pub fn from_raw(raw: u32) -> Option<Self> { if raw == 0 { None } else { Some(Move(raw)) } }

    #[inline]
    pub fn raw(self) -> u32 { self.0 }

    #[inline]
    pub fn from(self) -> usize { (self.0 & SQUARE_MASK) as usize }

    #[inline]
    pub fn to(self) -> usize { ((self.0 >> TO_SHIFT) & SQUARE_MASK) as usize }

    #[inline]
    pub fn piece(self) -> Piece { piece_from_bits((self.0 >> PIECE_SHIFT) & PIECE_MASK).unwrap_or(Piece::Pawn) }

    #[inline]
    pub fn captured(self) -> Option<Piece> { piece_from_bits((self.0 >> CAPTURE_SHIFT) & PIECE_MASK) }

    #[inline]
    pub fn special(self) -> Special { Special::decode((self.0 >> SPECIAL_SHIFT) & PIECE_MASK) }

    #[inline]
    pub fn promotion(self) -> Option<Piece> {
        match self.special() { Special::Promotion(p) => Some(p), _ => None }
    }

    #[inline]
    pub fn is_capture(self) -> bool { self.captured().is_some() }

    #[inline]
    pub fn is_castle(self) -> bool { self.special() == Special::Castle }

    #[inline]
    pub fn is_en_passant(self) -> bool { self.special() == Special::EnPassant }

    #[inline]
    pub fn is_null(self) -> bool { self.special() == Special::Null }

    #[inline]
    pub fn is_queen_promotion(self) -> bool { self.promotion() == Some(Piece::Queen) }

    /// Non-capturing pawn push.
    #[inline]
    pub fn is_pawn_advance(self) -> bool { self.piece() == Piece::Pawn && !self.is_capture() && !self.is_null() }
}

fn piece_from_bits(bits: u32) -> Option<Piece> { Piece::ALL.get(bits as usize).copied() }

/// Upper-case piece letter as used in algebraic notation.
pub fn piece_char(piece: Piece) -> char {
    match piece {
        Piece::Pawn => 'P',
        Piece::Knight => 'N',
        Piece::Bishop => 'B',
        Piece::Rook => 'R',
        Piece::Queen => 'Q',
        Piece::King => 'K',
    }
}

pub fn square_name(sq: usize) -> String {
    let file = (b'a' + (sq & 7) as u8) as char;
    let rank = (b'1' + (sq >> 3) as u8) as char;
    format!("{file}{rank}")
}

impl fmt::Display for Move {
    /// Raw coordinate form, e.g. `e2e4`, `e7e8q`, `0000` for the null move.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() { return write!(f, "0000"); }
        write!(f, "{}{}", square_name(self.from()), square_name(self.to()))?;
        if let Some(p) = self.promotion() { write!(f, "{}", piece_char(p).to_ascii_lowercase())?; }
        Ok(())
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({self} {:?}x{:?} {:?})", self.piece(), self.captured(), self.special())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_survive_packing() {
        let m = Move::new(52, 60, Piece::Pawn, Some(Piece::Rook), Special::Promotion(Piece::Queen));
        assert_eq!(m.from(), 52);
        assert_eq!(m.to(), 60);
        assert_eq!(m.piece(), Piece::Pawn);
        assert_eq!(m.captured(), Some(Piece::Rook));
        assert!(m.is_queen_promotion());
        assert!(!m.is_pawn_advance());
        assert_eq!(m.to_string(), "e7e8q");
    }

    #[test]
    fn quiet_pawn_push_is_advance() {
        let m = Move::new(12, 28, Piece::Pawn, None, Special::None);
        assert!(m.is_pawn_advance());
        assert!(!m.is_capture());
        assert_eq!(Move::from_raw(m.raw()), Some(m));
        assert_eq!(Move::from_raw(0), None);
    }

    #[test]
    fn null_move_is_flagged() {
        assert!(Move::NULL.is_null());
        assert_eq!(Move::NULL.to_string(), "0000");
        assert!(!Move::NULL.is_pawn_advance());
    }
}
