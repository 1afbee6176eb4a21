use piesearch::search::tt::{Bound, Entry, TranspositionTable};
use piesearch::search::eval::CHECKMATE_VALUE;

#[test]
fn deeper_bound_is_not_replaced_by_shallower_bound() {
    let tt = TranspositionTable::new(1);
    tt.store(Entry::new(42, 6, 0, None, 10, Bound::Lower));
    tt.store(Entry::new(42, 2, 0, None, 99, Bound::Upper));
    let e = tt.lookup(42).unwrap();
    assert_eq!(e.depth, 6, "shallower non-exact store should be skipped");
    assert_eq!(e.value(0), 10);
}

#[test]
fn exact_result_always_replaces() {
    let tt = TranspositionTable::new(1);
    tt.store(Entry::new(42, 6, 0, None, 10, Bound::Lower));
    tt.store(Entry::new(42, 2, 0, None, 99, Bound::Exact));
    let e = tt.lookup(42).unwrap();
    assert_eq!((e.depth, e.bound, e.value(0)), (2, Bound::Exact, 99));
}

#[test]
fn mate_scores_are_stored_relative_to_the_node() {
    let tt = TranspositionTable::new(1);
    // mate found 7 plies from the root, stored at a node 3 plies deep
    tt.store(Entry::new(7, 4, 3, None, CHECKMATE_VALUE - 7, Bound::Exact));
    let e = tt.lookup(7).unwrap();
    assert_eq!(e.value(3), CHECKMATE_VALUE - 7);
    // the same node reached 5 plies deep is two plies further from mate
    assert_eq!(e.value(5), CHECKMATE_VALUE - 9);
    tt.store(Entry::new(8, 4, 3, None, -(CHECKMATE_VALUE - 7), Bound::Exact));
    assert_eq!(tt.lookup(8).unwrap().value(1), -(CHECKMATE_VALUE - 5));
}

#[test]
fn capacity_is_a_power_of_two_and_clear_empties() {
    let mut tt = TranspositionTable::new(3);
    assert!(tt.capacity().is_power_of_two());
    for key in 0..2000u64 {
        tt.store(Entry::new(key.wrapping_mul(0x9E37_79B9_7F4A_7C15), 1, 0, None, 0, Bound::Exact));
    }
    assert!(tt.hashfull() > 0);
    tt.clear();
    assert_eq!(tt.hashfull(), 0);
}
