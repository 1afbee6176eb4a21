/// 64-bit occupancy mask, one bit per square, indexed `file + rank * 8`.
pub type Bitboard = u64;

pub const EMPTY: Bitboard = 0;
pub const NOT_A_FILE: Bitboard = 0xFEFE_FEFE_FEFE_FEFE;
pub const NOT_H_FILE: Bitboard = 0x7F7F_7F7F_7F7F_7F7F;

#[inline]
pub fn file(square: usize) -> i32 { (square & 7) as i32 }

#[inline]
pub fn rank(square: usize) -> i32 { (square >> 3) as i32 }

/// Single-square bitboard for the given coordinates, or the empty bitboard
/// when the coordinates fall off the board.
#[inline]
pub fn try_get_bitboard(file: i32, rank: i32) -> Bitboard {
    if !(0..8).contains(&file) || !(0..8).contains(&rank) { return EMPTY; }
    1u64 << (file + rank * 8)
}

#[inline]
pub fn square_bb(square: usize) -> Bitboard { 1u64 << square }

/// Index of the lowest set bit. The bitboard must be non-empty.
#[inline]
pub fn scan(bb: Bitboard) -> usize {
    debug_assert!(bb != 0);
    bb.trailing_zeros() as usize
}

/// Index of the highest set bit. The bitboard must be non-empty.
#[inline]
pub fn scan_reverse(bb: Bitboard) -> usize {
    debug_assert!(bb != 0);
    63 - bb.leading_zeros() as usize
}

/// Removes and returns the lowest set bit.
#[inline]
pub fn pop(bb: &mut Bitboard) -> usize {
    let sq = scan(*bb);
    *bb &= *bb - 1;
    sq
}

#[inline]
pub fn count(bb: Bitboard) -> u32 { bb.count_ones() }

/// Iterates the squares of a bitboard from lowest to highest.
pub fn squares(mut bb: Bitboard) -> impl Iterator<Item = usize> {
    std::iter::from_fn(move || if bb == 0 { None } else { Some(pop(&mut bb)) })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn off_board_coordinates_are_empty() {
        assert_eq!(try_get_bitboard(-1, 0), EMPTY);
        assert_eq!(try_get_bitboard(0, 8), EMPTY);
        assert_eq!(try_get_bitboard(8, 3), EMPTY);
        assert_eq!(try_get_bitboard(7, 7), 1u64 << 63);
    }

    #[test]
    fn scans_find_extreme_bits() {
        let bb = square_bb(3) | square_bb(40);
        assert_eq!(scan(bb), 3);
        assert_eq!(scan_reverse(bb), 40);
        let mut c = bb;
        assert_eq!(pop(&mut c), 3);
        assert_eq!(c, square_bb(40));
        assert_eq!(squares(bb).collect::<Vec<_>>(), vec![3, 40]);
    }
}
