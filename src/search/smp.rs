//! Lazy SMP: helper threads re-search the coordinator's root move list on
//! their own position copies. They share nothing but the transposition
//! table, the counters and the abort flag.

use log::trace;
use rayon::ThreadPool;

use crate::board::moves::Move;
use crate::board::Position;
use crate::search::alphabeta::{Aborted, Worker};
use crate::search::context::{bump, SearchContext, SharedState};
use crate::search::eval::{Evaluator, INFINITY};

/// Depths up to this one are searched by the coordinator alone.
pub const SINGLE_THREAD_DEPTH: i32 = 4;

impl<'a, P: Position, E: Evaluator> Worker<'a, P, E> {
    /// Root iteration without output, clock or root bookkeeping.
    pub(crate) fn search_helper_root(&mut self, moves: &[Move], depth: i32) -> Result<(), Aborted> {
        let mut alpha = -INFINITY;
        for (i, &mv) in moves.iter().enumerate() {
            bump(&self.shared.stats.moves_searched);
            let causes_check = self.position.causes_check(mv);
            self.position.make(mv);
            let value = self.search_root_move(i, depth, alpha, causes_check);
            self.position.unmake(mv);
            alpha = alpha.max(value?);
        }
        Ok(())
    }
}

/// Runs `coordinator` on the calling thread while, for depths above
/// `SINGLE_THREAD_DEPTH`, one helper per context searches `moves` on the
/// pool. Helpers are told to stop once the coordinator is done with the
/// depth; returns only after every helper has finished.
#[allow(clippy::too_many_arguments)]
pub(crate) fn search_depth<P, E, R>(
    pool: Option<&ThreadPool>,
    helpers: &mut [SearchContext],
    position: &P,
    moves: &[Move],
    depth: i32,
    shared: &SharedState,
    evaluator: &E,
    coordinator: impl FnOnce() -> R,
) -> R
where
    P: Position,
    E: Evaluator,
{
    let pool = match pool {
        Some(pool) if depth > SINGLE_THREAD_DEPTH && !helpers.is_empty() => pool,
        _ => return coordinator(),
    };
    shared.root.set_depth_finished(false);
    pool.in_place_scope(|scope| {
        for (id, ctx) in helpers.iter_mut().enumerate() {
            let position = position.clone();
            scope.spawn(move |_| {
                trace!("helper {} starting depth {depth}", id + 1);
                let mut worker = Worker::helper(position, shared, evaluator, ctx);
                let outcome = worker.search_helper_root(moves, depth);
                trace!("helper {} finished depth {depth}: {outcome:?}", id + 1);
            });
        }
        let result = coordinator();
        // helpers are cut off here rather than left to finish the depth
        shared.root.set_depth_finished(true);
        result
    })
}
