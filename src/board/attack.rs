//! Precomputed attack bitboards. Built once and shared by immutable reference.

use std::sync::OnceLock;

use cozy_chess::Color;

use crate::board::bitboard::{self, scan, scan_reverse, try_get_bitboard, Bitboard};

/// Ray directions. `N`, `NE`, `E` and `NW` walk towards higher square
/// indices, the rest towards lower ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction { N, NE, E, SE, S, SW, W, NW }

impl Direction {
    pub const ALL: [Direction; 8] = [Direction::N, Direction::NE, Direction::E, Direction::SE, Direction::S, Direction::SW, Direction::W, Direction::NW];
    pub const ROOK: [Direction; 4] = [Direction::N, Direction::E, Direction::S, Direction::W];
    pub const BISHOP: [Direction; 4] = [Direction::NE, Direction::SE, Direction::SW, Direction::NW];

    fn delta(self) -> (i32, i32) {
        match self {
            Direction::N => (0, 1),
            Direction::NE => (1, 1),
            Direction::E => (1, 0),
            Direction::SE => (1, -1),
            Direction::S => (0, -1),
            Direction::SW => (-1, -1),
            Direction::W => (-1, 0),
            Direction::NW => (-1, 1),
        }
    }

    #[inline]
    fn increasing(self) -> bool {
        matches!(self, Direction::N | Direction::NE | Direction::E | Direction::NW)
    }
}

pub struct AttackTables {
    king: [Bitboard; 64],
    knight: [Bitboard; 64],
    pawn: [[Bitboard; 64]; 2],
    ray: [[Bitboard; 64]; 8],
}

impl AttackTables {
    pub fn new() -> Self {
        let mut t = Self { king: [0; 64], knight: [0; 64], pawn: [[0; 64]; 2], ray: [[0; 64]; 8] };
        for square in 0..64 {
            let file = bitboard::file(square);
            let rank = bitboard::rank(square);

            for a in -1..=1 {
                for b in -1..=1 {
                    if a != 0 || b != 0 { t.king[square] |= try_get_bitboard(file + a, rank + b); }
                }
            }
            for a in -2i32..=2 {
                for b in -2i32..=2 {
                    if a.abs() + b.abs() == 3 { t.knight[square] |= try_get_bitboard(file + a, rank + b); }
                }
            }
            t.pawn[Color::White as usize][square] = try_get_bitboard(file - 1, rank + 1) | try_get_bitboard(file + 1, rank + 1);
            t.pawn[Color::Black as usize][square] = try_get_bitboard(file - 1, rank - 1) | try_get_bitboard(file + 1, rank - 1);

            for (d, dir) in Direction::ALL.iter().enumerate() {
                let (df, dr) = dir.delta();
                let (mut f, mut r) = (file + df, rank + dr);
                loop {
                    let bb = try_get_bitboard(f, r);
                    if bb == 0 { break; }
                    t.ray[d][square] |= bb;
                    f += df;
                    r += dr;
                }
            }
        }
        t
    }

    #[inline]
    pub fn king(&self, square: usize) -> Bitboard { self.king[square] }

    #[inline]
    pub fn knight(&self, square: usize) -> Bitboard { self.knight[square] }

    #[inline]
    pub fn pawn(&self, square: usize, color: Color) -> Bitboard { self.pawn[color as usize][square] }

    /// Full-length ray from `square` (exclusive) to the board edge.
    #[inline]
    pub fn ray(&self, dir: Direction, square: usize) -> Bitboard { self.ray[dir as usize][square] }

    /// Ray from `square` cut immediately past the nearest blocker in `occupied`.
    #[inline]
    pub fn ray_attack(&self, dir: Direction, square: usize, occupied: Bitboard) -> Bitboard {
        let ray = self.ray(dir, square);
        let blockers = ray & occupied;
        if blockers == 0 { return ray; }
        let nearest = if dir.increasing() { scan(blockers) } else { scan_reverse(blockers) };
        ray ^ self.ray(dir, nearest)
    }

    pub fn rook(&self, square: usize, occupied: Bitboard) -> Bitboard {
        Direction::ROOK.iter().fold(0, |acc, &d| acc | self.ray_attack(d, square, occupied))
    }

    pub fn bishop(&self, square: usize, occupied: Bitboard) -> Bitboard {
        Direction::BISHOP.iter().fold(0, |acc, &d| acc | self.ray_attack(d, square, occupied))
    }

    pub fn queen(&self, square: usize, occupied: Bitboard) -> Bitboard {
        self.rook(square, occupied) | self.bishop(square, occupied)
    }

    /// Squares reachable from `square` in at most `moves` knight jumps.
    pub fn knight_fill(&self, square: usize, moves: u32) -> Bitboard {
        let mut reached = 0;
        let mut frontier = bitboard::square_bb(square);
        for _ in 0..moves {
            let mut next = 0;
            for sq in bitboard::squares(frontier) { next |= self.knight[sq]; }
            frontier = next & !reached;
            reached |= next;
            if frontier == 0 { break; }
        }
        reached
    }
}

impl Default for AttackTables {
    fn default() -> Self { Self::new() }
}

static TABLES: OnceLock<AttackTables> = OnceLock::new();

/// Process-wide tables, built on first use.
pub fn tables() -> &'static AttackTables {
    TABLES.get_or_init(AttackTables::new)
}
