use std::mem;

use cozy_chess::Piece;
use log::debug;
use thiserror::Error;

use crate::board::moves::Move;
use crate::board::Position;
use crate::search::context::{bump, SearchContext, SharedState};
use crate::search::eval::{captured_value, Evaluator, CHECKMATE_VALUE, DRAW_VALUE, INFINITY, NEAR_CHECKMATE_VALUE};
use crate::search::ordering::{self, HASH_MOVE_VALUE, KILLER_MOVE_SLOT_VALUE, KILLER_MOVE_VALUE};
use crate::search::see::evaluate_static_exchange;
use crate::search::time::{TimeManager, RESEARCH_EXTENSION, RESEARCH_THRESHOLD};
use crate::search::tt::{Bound, Entry};
use crate::search::MAX_PLY;

pub const ASPIRATION_WINDOW: i32 = 100;
pub const NULL_MOVE_REDUCTION: i32 = 3;
pub const NULL_MOVE_AGGRESSIVE_DEPTH: i32 = 7;
pub const NULL_MOVE_AGGRESSIVE_DIVISOR: i32 = 5;
pub const LATE_MOVE_REDUCTION: i32 = 2;
pub const FUTILITY_MARGIN: [i32; 5] = [0, 104, 190, 260, 330];
/// Nodes between two clock checks on the coordinating thread.
pub const NODE_RESOLUTION: u64 = 1000;

/// The search was cancelled. Carries no value; callers unwind with `?`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("search aborted")]
pub struct Aborted;

pub type SearchOutcome = Result<i32, Aborted>;

/// One search thread: its own position copy and scratch context, borrowing
/// the shared table, counters and root bookkeeping. Only the coordinator
/// carries the clock, which also makes it the thread that collects the
/// principal variation and polls for time.
pub struct Worker<'a, P: Position, E: Evaluator> {
    pub(crate) position: P,
    pub(crate) shared: &'a SharedState,
    evaluator: &'a E,
    pub(crate) ctx: &'a mut SearchContext,
    clock: Option<&'a mut TimeManager>,
    node_limit: u64,
    reference_nodes: u64,
}

impl<'a, P: Position, E: Evaluator> Worker<'a, P, E> {
    pub fn coordinator(position: P, shared: &'a SharedState, evaluator: &'a E, ctx: &'a mut SearchContext,
                       clock: &'a mut TimeManager, node_limit: u64) -> Self {
        let reference_nodes = shared.stats.nodes();
        Self { position, shared, evaluator, ctx, clock: Some(clock), node_limit, reference_nodes }
    }

    pub fn helper(position: P, shared: &'a SharedState, evaluator: &'a E, ctx: &'a mut SearchContext) -> Self {
        Self { position, shared, evaluator, ctx, clock: None, node_limit: u64::MAX, reference_nodes: 0 }
    }

    #[inline]
    pub fn is_main(&self) -> bool { self.clock.is_some() }

    #[inline]
    fn evaluate(&self) -> i32 { self.evaluator.evaluate(&self.position) }

    /// Coordinator only: every `NODE_RESOLUTION` nodes, grant a loss
    /// extension if the root value is falling and raise the abort flag once
    /// the time or node budget is spent.
    fn poll_clock(&mut self) {
        let Some(clock) = self.clock.as_deref_mut() else { return };
        let nodes = self.shared.stats.nodes();
        if nodes <= self.reference_nodes { return; }
        self.reference_nodes += NODE_RESOLUTION;

        let root = &self.shared.root;
        let loss = root.reference_alpha() - root.alpha();
        if clock.try_loss_extension(loss) {
            debug!("loss of {loss} at {:.0} ms, extension now {:.0} ms", clock.elapsed_ms(), clock.extension_ms());
        }
        if clock.out_of_time() || nodes >= self.node_limit {
            if !root.is_aborted() { debug!("aborting search after {nodes} nodes, {:.0} ms", clock.elapsed_ms()); }
            root.abort();
        }
    }

    /// Searches one root move already made on the position. Move 0 gets an
    /// aspiration window around the current root value, the rest a zero
    /// window with a re-search when they beat `alpha`.
    pub(crate) fn search_root_move(&mut self, index: usize, depth: i32, alpha: i32, causes_check: bool) -> SearchOutcome {
        if index == 0 {
            let centre = self.shared.root.alpha();
            let lower = centre - ASPIRATION_WINDOW;
            let upper = centre + ASPIRATION_WINDOW;
            let mut value = -self.search(depth - 1, 1, -upper, -lower, causes_check, true)?;
            if value <= lower || value >= upper {
                if let Some(clock) = self.clock.as_deref_mut() {
                    if clock.try_extension(RESEARCH_THRESHOLD, RESEARCH_EXTENSION) {
                        debug!("aspiration miss at depth {depth}, extension now {:.0} ms", clock.extension_ms());
                    }
                }
                value = -self.search(depth - 1, 1, -INFINITY, INFINITY, causes_check, true)?;
            }
            Ok(value)
        } else {
            let mut value = -self.search(depth - 1, 1, -alpha - 1, -alpha, causes_check, true)?;
            if value > alpha {
                value = -self.search(depth - 1, 1, -INFINITY, -alpha, causes_check, true)?;
            }
            Ok(value)
        }
    }

    /// Negamax with principal variation search.
    pub fn search(&mut self, depth: i32, ply: usize, mut alpha: i32, mut beta: i32, in_check: bool, allow_null: bool) -> SearchOutcome {
        if self.is_main() { self.ctx.clear_pv(ply); }
        if depth <= 0 && !in_check { return Ok(self.quiescence(ply, alpha, beta)); }

        bump(&self.shared.stats.nodes);
        self.poll_clock();
        // helpers also stop once the coordinator has finished this depth
        if self.shared.root.is_aborted() || (!self.is_main() && self.shared.root.depth_finished()) {
            return Err(Aborted);
        }
        if ply >= MAX_PLY { return Ok(self.evaluate()); }

        let draw_value = if ply & 1 == 0 { DRAW_VALUE } else { -DRAW_VALUE };
        let repetitions = if ply > 2 { 2 } else { 3 };
        if self.position.fifty_moves_clock() >= 100 || self.position.insufficient_material() || self.position.has_repeated(repetitions) {
            return Ok(draw_value);
        }

        // mate distance pruning
        alpha = alpha.max(-(CHECKMATE_VALUE - ply as i32));
        beta = beta.min(CHECKMATE_VALUE - (ply as i32 + 1));
        if alpha >= beta { return Ok(alpha); }

        bump(&self.shared.stats.hash_lookups);
        let key = self.position.key();
        let mut hash_move = None;
        if let Some(entry) = self.shared.tt.lookup(key) {
            hash_move = entry.best;
            if entry.depth >= depth {
                let value = entry.value(ply);
                if (entry.bound == Bound::Lower && value >= beta) || (entry.bound == Bound::Upper && value <= alpha) {
                    bump(&self.shared.stats.hash_cutoffs);
                    return Ok(value);
                }
            }
        }

        let stm = self.position.side_to_move();
        let own = self.position.colors(stm);
        let kings_and_pawns = self.position.pieces(stm, Piece::King) | self.position.pieces(stm, Piece::Pawn);
        if allow_null && !in_check && own != kings_and_pawns {
            let reduction = NULL_MOVE_REDUCTION + if depth >= NULL_MOVE_AGGRESSIVE_DEPTH { depth / NULL_MOVE_AGGRESSIVE_DIVISOR } else { 0 };
            self.position.make_null();
            let value = self.search(depth - 1 - reduction, ply + 1, -beta, -beta + 1, false, false);
            self.position.unmake_null();
            let value = -value?;
            if value >= beta { return Ok(value); }
        }

        let mut moves = mem::take(&mut self.ctx.moves[ply]);
        let mut values = mem::take(&mut self.ctx.values[ply]);
        moves.clear();
        self.position.legal_moves(&mut moves);
        let result = if moves.is_empty() {
            Ok(if in_check { -(CHECKMATE_VALUE - ply as i32) } else { draw_value })
        } else {
            self.search_moves(&mut moves, &mut values, key, hash_move, depth, ply, alpha, beta, in_check)
        };
        self.ctx.moves[ply] = moves;
        self.ctx.values[ply] = values;
        result
    }

    #[allow(clippy::too_many_arguments)]
    fn search_moves(&mut self, moves: &mut [Move], values: &mut Vec<f32>, key: u64, hash_move: Option<Move>,
                    mut depth: i32, ply: usize, mut alpha: i32, beta: i32, in_check: bool) -> SearchOutcome {
        let shared = self.shared;
        let stats = &shared.stats;
        values.clear();
        values.extend(moves.iter().map(|&m| ordering::move_ordering_value(m)));

        // single reply and check extensions
        if moves.len() == 1 || in_check { depth += 1; }

        bump(&stats.killer_move_checks);
        let mut killer_found = false;
        for (slot, killer) in self.ctx.killers.get(ply).iter().enumerate() {
            let Some(killer) = killer else { continue };
            if let Some(i) = moves.iter().position(|m| m == killer) {
                values[i] = KILLER_MOVE_VALUE + slot as f32 * KILLER_MOVE_SLOT_VALUE;
                if !killer_found { bump(&stats.killer_move_matches); }
                killer_found = true;
            }
        }

        bump(&stats.hash_move_checks);
        if let Some(hash_move) = hash_move {
            if let Some(i) = moves.iter().position(|&m| m == hash_move) {
                values[i] = HASH_MOVE_VALUE;
                bump(&stats.hash_move_matches);
            }
        }

        let mut futile_node = false;
        let mut futility_value = 0;
        if !in_check && depth >= 0 && (depth as usize) < FUTILITY_MARGIN.len() {
            futility_value = self.evaluate() + FUTILITY_MARGIN[depth as usize];
            futile_node = futility_value <= alpha;
        }

        let irreducible = ordering::sort(moves, values);
        let prevention = ordering::passed_pawn_prevention(&self.position);
        let mut best_bound = Bound::Upper;
        let mut best_move = moves[0];

        for (i, &mv) in moves.iter().enumerate() {
            bump(&stats.moves_searched);
            let causes_check = self.position.causes_check(mv);
            let dangerous = in_check || causes_check || alpha < -NEAR_CHECKMATE_VALUE
                || ordering::is_dangerous_pawn_advance(mv, prevention);
            let reducible = i + 1 > irreducible;

            if futile_node && !dangerous && futility_value + captured_value(mv) <= alpha {
                bump(&stats.futile_moves);
                continue;
            }

            self.position.make(mv);
            let value = self.search_child(i, depth, ply, alpha, beta, causes_check, reducible && !dangerous);
            self.position.unmake(mv);
            let value = value?;

            if value >= beta {
                shared.tt.store(Entry::new(key, depth, ply, Some(mv), value, Bound::Lower));
                if reducible { self.ctx.killers.promote(ply, mv); }
                return Ok(value);
            }
            if value > alpha {
                alpha = value;
                best_move = mv;
                best_bound = Bound::Exact;
                if self.is_main() { self.ctx.prepend_pv(mv, ply); }
            }
        }

        shared.tt.store(Entry::new(key, depth, ply, Some(best_move), alpha, best_bound));
        Ok(alpha)
    }

    /// Late move reduction or zero-window search, then a full re-search if
    /// the result beats `alpha`.
    #[allow(clippy::too_many_arguments)]
    fn search_child(&mut self, index: usize, depth: i32, ply: usize, alpha: i32, beta: i32,
                    causes_check: bool, reduce: bool) -> SearchOutcome {
        let mut value = alpha + 1;
        if reduce {
            value = -self.search(depth - 1 - LATE_MOVE_REDUCTION, ply + 1, -alpha - 1, -alpha, causes_check, true)?;
        } else if index > 0 {
            value = -self.search(depth - 1, ply + 1, -alpha - 1, -alpha, causes_check, true)?;
        }
        if value > alpha {
            value = -self.search(depth - 1, ply + 1, -beta, -alpha, causes_check, true)?;
        }
        Ok(value)
    }

    /// Capture search from a stand-pat lower bound. Only captures that do
    /// not lose material by static exchange are tried.
    pub fn quiescence(&mut self, ply: usize, mut alpha: i32, beta: i32) -> i32 {
        bump(&self.shared.stats.nodes);
        bump(&self.shared.stats.quiescence_nodes);

        let stand_pat = self.evaluate();
        if stand_pat >= beta { return stand_pat; }
        if stand_pat > alpha { alpha = stand_pat; }
        if ply >= MAX_PLY { return alpha; }

        let mut moves = mem::take(&mut self.ctx.moves[ply]);
        let mut values = mem::take(&mut self.ctx.values[ply]);
        moves.clear();
        self.position.quiescence_moves(&mut moves);
        values.clear();
        values.extend(moves.iter().map(|&m| ordering::move_ordering_value(m)));
        ordering::sort(&mut moves, &mut values);

        let colour = self.position.side_to_move();
        for &mv in moves.iter() {
            bump(&self.shared.stats.moves_searched);
            if evaluate_static_exchange(&self.position, mv) < 0 { continue; }

            self.position.make(mv);
            if !self.position.in_check(colour) {
                let value = -self.quiescence(ply + 1, -beta, -alpha);
                if value >= beta {
                    self.position.unmake(mv);
                    alpha = value;
                    break;
                }
                if value > alpha { alpha = value; }
            }
            self.position.unmake(mv);
        }

        self.ctx.moves[ply] = moves;
        self.ctx.values[ply] = values;
        alpha
    }
}
