use std::time::Duration;

use crate::board::moves::Move;
use crate::board::Position;
use crate::config::OutputMode;
use crate::search::eval::{CHECKMATE_VALUE, NEAR_CHECKMATE_VALUE};

/// Receives principal variation lines as they are produced.
pub type InfoSink = Box<dyn Fn(&str) + Send + Sync>;

pub fn stdout_sink() -> InfoSink { Box::new(|line| println!("{line}")) }

#[inline]
pub fn is_mate(value: i32) -> bool { value.abs() > NEAR_CHECKMATE_VALUE }

/// Full moves until mate for a mate score.
#[inline]
pub fn moves_to_mate(value: i32) -> i32 { (CHECKMATE_VALUE - value.abs() + 1) / 2 }

/// `+1.25`, `-0.40`, `+Mate 3`.
pub fn value_string(value: i32) -> String {
    if is_mate(value) {
        format!("{}Mate {}", if value > 0 { '+' } else { '-' }, moves_to_mate(value))
    } else {
        format!("{:+.2}", value as f64 / 100.0)
    }
}

/// Renders one principal variation line in the requested format, `None`
/// when output is disabled.
pub fn pv_line<P: Position>(position: &P, mode: OutputMode, depth: i32, value: i32, pv: &[Move],
                            elapsed: Duration, nodes: u64) -> Option<String> {
    match mode {
        OutputMode::None => None,
        OutputMode::Standard => Some(format!("{:<6}{:<8}{}", depth, value_string(value), position.format_algebraic(pv))),
        OutputMode::Protocol => {
            let score = if is_mate(value) {
                format!("mate {}{}", if value < 0 { "-" } else { "" }, moves_to_mate(value))
            } else {
                format!("cp {value}")
            };
            let ms = elapsed.as_secs_f64() * 1000.0;
            let nps = if ms > 0.0 { (1000.0 * nodes as f64 / ms) as u64 } else { 0 };
            Some(format!("info depth {depth} score {score} time {} nodes {nodes} nps {nps} pv {}",
                         ms as u64, position.format_protocol(pv)))
        }
    }
}
