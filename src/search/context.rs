use std::sync::atomic::{AtomicBool, AtomicI32, AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::board::moves::Move;
use crate::search::ordering::KillerTable;
use crate::search::tt::TranspositionTable;
use crate::search::MAX_PLY;

/// Scratch state owned by exactly one search thread.
pub struct SearchContext {
    pub(crate) moves: Vec<Vec<Move>>,
    pub(crate) values: Vec<Vec<f32>>,
    pub(crate) killers: KillerTable,
    pv: Vec<Vec<Move>>,
}

impl SearchContext {
    pub fn new() -> Self {
        Self {
            moves: (0..=MAX_PLY).map(|_| Vec::with_capacity(64)).collect(),
            values: (0..=MAX_PLY).map(|_| Vec::with_capacity(64)).collect(),
            killers: KillerTable::new(MAX_PLY + 1),
            pv: (0..=MAX_PLY + 1).map(|_| Vec::with_capacity(16)).collect(),
        }
    }

    #[inline]
    pub(crate) fn clear_pv(&mut self, ply: usize) { self.pv[ply].clear(); }

    /// `pv[ply] = mv :: pv[ply + 1]`
    pub(crate) fn prepend_pv(&mut self, mv: Move, ply: usize) {
        let (head, tail) = self.pv.split_at_mut(ply + 1);
        let line = &mut head[ply];
        line.clear();
        line.push(mv);
        line.extend_from_slice(&tail[0]);
    }

    pub fn principal_variation(&self) -> &[Move] { &self.pv[0] }

    pub fn reset(&mut self) {
        self.killers.clear();
        for line in &mut self.pv { line.clear(); }
    }
}

impl Default for SearchContext {
    fn default() -> Self { Self::new() }
}

/// Counters shared by every search thread. Diagnostics only, apart from
/// the node count driving the periodic clock check.
#[derive(Default)]
pub struct SearchStats {
    pub(crate) nodes: AtomicU64,
    pub(crate) quiescence_nodes: AtomicU64,
    pub(crate) hash_lookups: AtomicU64,
    pub(crate) hash_cutoffs: AtomicU64,
    pub(crate) hash_move_checks: AtomicU64,
    pub(crate) hash_move_matches: AtomicU64,
    pub(crate) killer_move_checks: AtomicU64,
    pub(crate) killer_move_matches: AtomicU64,
    pub(crate) futile_moves: AtomicU64,
    pub(crate) moves_searched: AtomicU64,
}

#[inline]
pub(crate) fn bump(counter: &AtomicU64) { counter.fetch_add(1, Ordering::Relaxed); }

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    pub nodes: u64,
    pub quiescence_nodes: u64,
    pub hash_lookups: u64,
    pub hash_cutoffs: u64,
    pub hash_move_checks: u64,
    pub hash_move_matches: u64,
    pub killer_move_checks: u64,
    pub killer_move_matches: u64,
    pub futile_moves: u64,
    pub moves_searched: u64,
}

impl SearchStats {
    pub fn nodes(&self) -> u64 { self.nodes.load(Ordering::Relaxed) }

    pub fn snapshot(&self) -> Statistics {
        let load = |c: &AtomicU64| c.load(Ordering::Relaxed);
        Statistics {
            nodes: load(&self.nodes),
            quiescence_nodes: load(&self.quiescence_nodes),
            hash_lookups: load(&self.hash_lookups),
            hash_cutoffs: load(&self.hash_cutoffs),
            hash_move_checks: load(&self.hash_move_checks),
            hash_move_matches: load(&self.hash_move_matches),
            killer_move_checks: load(&self.killer_move_checks),
            killer_move_matches: load(&self.killer_move_matches),
            futile_moves: load(&self.futile_moves),
            moves_searched: load(&self.moves_searched),
        }
    }

    pub fn reset(&self) {
        for c in [
            &self.nodes, &self.quiescence_nodes, &self.hash_lookups, &self.hash_cutoffs,
            &self.hash_move_checks, &self.hash_move_matches, &self.killer_move_checks,
            &self.killer_move_matches, &self.futile_moves, &self.moves_searched,
        ] {
            c.store(0, Ordering::Relaxed);
        }
    }
}

/// Root bookkeeping written by the coordinator and read by everyone.
pub struct RootContext {
    alpha: AtomicI32,
    reference_alpha: AtomicI32,
    abort: Arc<AtomicBool>,
    depth_finished: AtomicBool,
}

impl RootContext {
    pub fn new() -> Self {
        Self { alpha: AtomicI32::new(0), reference_alpha: AtomicI32::new(0), abort: Arc::new(AtomicBool::new(false)), depth_finished: AtomicBool::new(false) }
    }

    /// Best root value found so far.
    #[inline]
    pub fn alpha(&self) -> i32 { self.alpha.load(Ordering::Relaxed) }

    #[inline]
    pub(crate) fn set_alpha(&self, value: i32) { self.alpha.store(value, Ordering::Relaxed); }

    /// Root value at the end of the last completed depth.
    #[inline]
    pub fn reference_alpha(&self) -> i32 { self.reference_alpha.load(Ordering::Relaxed) }

    #[inline]
    pub(crate) fn set_reference_alpha(&self, value: i32) { self.reference_alpha.store(value, Ordering::Relaxed); }

    #[inline]
    pub fn is_aborted(&self) -> bool { self.abort.load(Ordering::Relaxed) }

    #[inline]
    pub fn abort(&self) { self.abort.store(true, Ordering::Relaxed); }

    pub(crate) fn rearm(&self) { self.abort.store(false, Ordering::Relaxed); }

    pub fn stop_handle(&self) -> StopHandle { StopHandle(Arc::clone(&self.abort)) }

    /// Set once the coordinator has finished the current depth; helpers
    /// still searching it stop at their next node.
    #[inline]
    pub fn depth_finished(&self) -> bool { self.depth_finished.load(Ordering::Relaxed) }

    pub(crate) fn set_depth_finished(&self, finished: bool) { self.depth_finished.store(finished, Ordering::Relaxed); }

    pub(crate) fn reset(&self) {
        self.set_alpha(0);
        self.set_reference_alpha(0);
        self.set_depth_finished(false);
        self.rearm();
    }
}

impl Default for RootContext {
    fn default() -> Self { Self::new() }
}

/// Raises the abort flag of a running search from any thread.
#[derive(Clone, Debug)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) { self.0.store(true, Ordering::Relaxed); }
}

/// Everything the search threads share.
#[derive(Default)]
pub struct SharedState {
    pub tt: TranspositionTable,
    pub stats: SearchStats,
    pub root: RootContext,
}
