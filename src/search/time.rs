use std::time::{Duration, Instant};

use cozy_chess::Color;

use crate::config::Restrictions;

/// Milliseconds subtracted from every clock-based budget for I/O latency.
pub const EXPECTED_LATENCY_MS: f64 = 55.0;
/// Fraction of the budget after which a new depth is not started.
pub const CONTINUATION_THRESHOLD: f64 = 0.6;
pub const RESEARCH_THRESHOLD: f64 = 0.5;
pub const RESEARCH_EXTENSION: f64 = 0.8;
pub const LOSS_RESOLUTION: i32 = 40;
pub const LOSS_THRESHOLD: f64 = 0.4;
pub const LOSS_EXTENSION: [f64; 6] = [0.0, 0.1, 0.3, 0.5, 0.8, 1.0];

/// Per-move budget and extension bookkeeping. Owned by the coordinating
/// thread only.
#[derive(Clone, Debug)]
pub struct TimeManager {
    start: Instant,
    use_time_controls: bool,
    limit: f64,
    extension: f64,
    extension_limit: f64,
}

impl TimeManager {
    /// Base allocation for one move: the clock divided by an expected number
    /// of remaining moves that shrinks as the game goes on, never below 20.
    pub fn allocation(clock_ms: f64, half_moves_played: u32) -> f64 {
        let expected = (60.0 * (-0.007 * half_moves_played as f64).exp()).ceil().max(20.0);
        clock_ms / expected
    }

    pub fn new(restrictions: &Restrictions, side: Color, half_moves_played: u32) -> Self {
        Self::started_at(Instant::now(), restrictions, side, half_moves_played)
    }

    pub fn started_at(start: Instant, restrictions: &Restrictions, side: Color, half_moves_played: u32) -> Self {
        let mut tm = Self {
            start,
            use_time_controls: restrictions.use_time_controls,
            limit: restrictions.fixed_move_time.map_or(f64::INFINITY, |ms| ms as f64),
            extension: 0.0,
            extension_limit: 0.0,
        };
        if restrictions.use_time_controls {
            let clock = restrictions.time_control[side as usize] as f64;
            let increment = restrictions.time_increment[side as usize] as f64;
            let allocation = Self::allocation(clock, half_moves_played);
            tm.limit = (allocation + increment - EXPECTED_LATENCY_MS).max(1.0);
            tm.extension_limit = (0.3 * clock - allocation).max(0.0);
        }
        tm
    }

    pub fn elapsed(&self) -> Duration { self.start.elapsed() }

    pub fn elapsed_ms(&self) -> f64 { self.start.elapsed().as_secs_f64() * 1000.0 }

    pub fn limit_ms(&self) -> f64 { self.limit }

    pub fn extension_ms(&self) -> f64 { self.extension }

    pub fn extension_limit_ms(&self) -> f64 { self.extension_limit }

    /// Grants `coefficient * limit` extra time (capped by the extension
    /// limit) when playing on a clock, the grant beats the current one, and
    /// more than `threshold` of the budget is already used.
    pub fn try_extension(&mut self, threshold: f64, coefficient: f64) -> bool {
        let candidate = (coefficient * self.limit).min(self.extension_limit);
        if self.use_time_controls && candidate > self.extension && self.elapsed_ms() / self.limit > threshold {
            self.extension = candidate;
            return true;
        }
        false
    }

    /// Extension for a root value that dropped by `loss` centipawns.
    pub fn try_loss_extension(&mut self, loss: i32) -> bool {
        if loss < LOSS_RESOLUTION { return false; }
        let band = ((loss / LOSS_RESOLUTION) as usize).min(LOSS_EXTENSION.len() - 1);
        self.try_extension(LOSS_THRESHOLD, LOSS_EXTENSION[band])
    }

    pub fn out_of_time(&self) -> bool { self.elapsed_ms() >= self.limit + self.extension }

    /// Whether another depth is worth starting.
    pub fn should_continue(&self) -> bool {
        !(self.use_time_controls && self.extension <= 0.0 && self.elapsed_ms() / self.limit > CONTINUATION_THRESHOLD)
    }
}
