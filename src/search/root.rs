use std::time::{Duration, Instant};

use log::{debug, warn};
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::board::moves::Move;
use crate::board::Position;
use crate::config::{OutputMode, Restrictions};
use crate::error::EngineError;
use crate::search::alphabeta::{Aborted, Worker};
use crate::search::context::{bump, SearchContext, SharedState, Statistics, StopHandle};
use crate::search::eval::{Evaluator, PstEvaluator, CHECKMATE_VALUE, DRAW_VALUE, INFINITY};
use crate::search::output::{self, InfoSink};
use crate::search::smp;
use crate::search::time::TimeManager;
use crate::search::DEPTH_LIMIT;

/// Depths up to this one print a single line once completed; deeper ones
/// print every root improvement.
pub const SINGLE_VARIATION_DEPTH: i32 = 5;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchResult {
    /// `None` only when the position has no legal move.
    pub best_move: Option<Move>,
    pub value: i32,
    /// Last fully completed depth.
    pub depth: i32,
    pub nodes: u64,
    pub pv: Vec<Move>,
    pub elapsed: Duration,
}

/// Iterative deepening driver. Owns the shared table, per-thread contexts
/// and the helper pool.
pub struct Engine<E: Evaluator = PstEvaluator> {
    shared: SharedState,
    evaluator: E,
    main_context: SearchContext,
    helper_contexts: Vec<SearchContext>,
    pool: Option<ThreadPool>,
    sink: InfoSink,
    final_alpha: i32,
}

impl Engine<PstEvaluator> {
    pub fn new() -> Self { Self::with_evaluator(PstEvaluator) }
}

impl Default for Engine<PstEvaluator> {
    fn default() -> Self { Self::new() }
}

impl<E: Evaluator> Engine<E> {
    pub fn with_evaluator(evaluator: E) -> Self {
        Self {
            shared: SharedState::default(),
            evaluator,
            main_context: SearchContext::new(),
            helper_contexts: Vec::new(),
            pool: None,
            sink: output::stdout_sink(),
            final_alpha: 0,
        }
    }

    /// Total search threads, the calling thread included.
    pub fn threads(&self) -> usize { self.helper_contexts.len() + 1 }

    pub fn set_threads(&mut self, threads: usize) -> Result<(), EngineError> {
        let helpers = threads.max(1) - 1;
        if helpers == self.helper_contexts.len() { return Ok(()); }
        self.pool = if helpers == 0 {
            None
        } else {
            Some(ThreadPoolBuilder::new()
                .num_threads(helpers)
                .thread_name(|i| format!("search-helper-{}", i + 1))
                .build()?)
        };
        self.helper_contexts.resize_with(helpers, SearchContext::new);
        debug!("search threads set to {}", self.threads());
        Ok(())
    }

    pub fn set_tt_capacity_mb(&mut self, mb: usize) {
        if mb == 0 { warn!("hash size of 0 MB requested, using the minimum table"); }
        self.shared.tt.set_capacity_mb(mb);
    }

    pub fn set_info_sink(&mut self, sink: impl Fn(&str) + Send + Sync + 'static) {
        self.sink = Box::new(sink);
    }

    /// Forgets everything learned in previous searches.
    pub fn reset(&mut self) {
        self.shared.tt.clear();
        self.shared.root.reset();
        self.main_context.reset();
        for ctx in &mut self.helper_contexts { ctx.reset(); }
        self.final_alpha = 0;
    }

    /// Counters of the most recent search.
    pub fn statistics(&self) -> Statistics { self.shared.stats.snapshot() }

    pub fn hashfull(&self) -> usize { self.shared.tt.hashfull() }

    /// Handle for stopping a search running on another thread. The search
    /// finishes at its next node with the last completed depth's result. A
    /// stop raised between searches applies to the next one.
    pub fn stop_handle(&self) -> StopHandle { self.shared.root.stop_handle() }

    pub fn search<P: Position>(&mut self, position: &P, restrictions: &Restrictions) -> SearchResult {
        let result = self.run(position, restrictions);
        // the flag is consumed by the search it stopped
        self.shared.root.rearm();
        result
    }

    fn run<P: Position>(&mut self, position: &P, restrictions: &Restrictions) -> SearchResult {
        let start = Instant::now();
        self.shared.stats.reset();

        let mut moves = Vec::with_capacity(64);
        position.legal_moves(&mut moves);
        if moves.is_empty() {
            let value = if position.in_check(position.side_to_move()) { -CHECKMATE_VALUE } else { DRAW_VALUE };
            debug!("no legal moves, terminal value {value}");
            return SearchResult { value, elapsed: start.elapsed(), ..SearchResult::default() };
        }
        if restrictions.use_time_controls && moves.len() == 1 {
            debug!("single legal move {}, not searching", moves[0]);
            return SearchResult {
                best_move: Some(moves[0]),
                value: self.final_alpha,
                pv: vec![moves[0]],
                elapsed: start.elapsed(),
                ..SearchResult::default()
            };
        }

        let mut clock = TimeManager::started_at(start, restrictions, position.side_to_move(), position.half_moves_played());
        let depth_limit = DEPTH_LIMIT.min(restrictions.depth_limit).max(1);
        let mut pv = Vec::new();
        let mut completed = 0;
        // best move, value and line of the last completed depth
        let mut settled: Option<(Move, i32, Vec<Move>)> = None;

        self.shared.root.set_alpha(self.final_alpha);
        self.shared.root.set_reference_alpha(self.final_alpha);

        for depth in 1..=depth_limit {
            let Self { shared, evaluator, main_context, helper_contexts, pool, sink, .. } = self;
            let shared = &*shared;
            let evaluator = &*evaluator;
            let snapshot = moves.clone();
            let clock_ref = &mut clock;
            let moves_ref = &mut moves;
            let pv_ref = &mut pv;
            let sink = &*sink;

            let outcome = smp::search_depth(pool.as_ref(), helper_contexts, position, &snapshot, depth, shared, evaluator, || {
                let mut worker = Worker::coordinator(position.clone(), shared, evaluator, main_context, clock_ref, restrictions.node_limit);
                iterate_root(&mut worker, moves_ref, depth, pv_ref, restrictions.output, start, sink)
            });

            let alpha = match outcome {
                Ok(alpha) => alpha,
                Err(Aborted) => {
                    debug!("depth {depth} aborted after {:.0} ms", clock.elapsed_ms());
                    break;
                }
            };
            completed = depth;
            settled = Some((moves[0], alpha, pv.clone()));
            self.shared.root.set_reference_alpha(alpha);
            debug!("depth {depth} done: value {alpha}, best {}, {} nodes, {:.0} ms",
                   moves[0], self.shared.stats.nodes(), clock.elapsed_ms());

            if depth <= SINGLE_VARIATION_DEPTH {
                self.emit(position, restrictions.output, depth, alpha, &pv, start);
            }
            if !clock.should_continue() {
                debug!("stopping before depth {}: {:.0} of {:.0} ms used", depth + 1, clock.elapsed_ms(), clock.limit_ms());
                self.shared.root.abort();
                break;
            }
        }

        let (best, value, mut pv) = settled.unwrap_or_else(|| (moves[0], self.shared.root.alpha(), pv));
        if pv.first() != Some(&best) { pv = vec![best]; }
        self.final_alpha = value;
        SearchResult {
            best_move: Some(best),
            value,
            depth: completed,
            nodes: self.shared.stats.nodes(),
            pv,
            elapsed: start.elapsed(),
        }
    }

    fn emit<P: Position>(&self, position: &P, mode: OutputMode, depth: i32, value: i32, pv: &[Move], start: Instant) {
        if let Some(line) = output::pv_line(position, mode, depth, value, pv, start.elapsed(), self.shared.stats.nodes()) {
            (self.sink)(&line);
        }
    }
}

/// Coordinator pass over the root moves. Improvements move to the front of
/// the list, update the shared root value and rebuild the variation.
fn iterate_root<P: Position, E: Evaluator>(worker: &mut Worker<'_, P, E>, moves: &mut Vec<Move>, depth: i32,
                                            pv: &mut Vec<Move>, mode: OutputMode, start: Instant,
                                            sink: &InfoSink) -> Result<i32, Aborted> {
    let mut alpha = -INFINITY;
    for i in 0..moves.len() {
        bump(&worker.shared.stats.moves_searched);
        let mv = moves[i];
        let causes_check = worker.position.causes_check(mv);
        worker.position.make(mv);
        let value = worker.search_root_move(i, depth, alpha, causes_check);
        worker.position.unmake(mv);
        let value = value?;

        if value > alpha {
            alpha = value;
            worker.shared.root.set_alpha(value);
            moves.remove(i);
            moves.insert(0, mv);
            worker.ctx.prepend_pv(mv, 0);
            pv.clear();
            pv.extend_from_slice(worker.ctx.principal_variation());

            if depth > SINGLE_VARIATION_DEPTH {
                let nodes = worker.shared.stats.nodes();
                if let Some(line) = output::pv_line(&worker.position, mode, depth, alpha, pv, start.elapsed(), nodes) {
                    sink(&line);
                }
            }
        }
    }
    Ok(alpha)
}
