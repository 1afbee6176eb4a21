use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::search::DEPTH_LIMIT;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    #[default]
    None,
    /// Depth, pawn-unit value and algebraic moves.
    Standard,
    /// `info depth .. score .. pv ..` lines.
    Protocol,
}

/// Limits for a single search. Times are in milliseconds and indexed by
/// `Color as usize`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Restrictions {
    pub use_time_controls: bool,
    pub time_control: [u64; 2],
    pub time_increment: [u64; 2],
    pub fixed_move_time: Option<u64>,
    pub depth_limit: i32,
    pub node_limit: u64,
    pub output: OutputMode,
}

impl Default for Restrictions {
    fn default() -> Self {
        Self {
            use_time_controls: false,
            time_control: [0; 2],
            time_increment: [0; 2],
            fixed_move_time: None,
            depth_limit: DEPTH_LIMIT,
            node_limit: u64::MAX,
            output: OutputMode::None,
        }
    }
}

impl Restrictions {
    pub fn depth(depth: i32) -> Self { Self { depth_limit: depth, ..Self::default() } }

    pub fn move_time(ms: u64) -> Self { Self { fixed_move_time: Some(ms), ..Self::default() } }

    pub fn nodes(nodes: u64) -> Self { Self { node_limit: nodes, ..Self::default() } }

    pub fn time_controls(clock: [u64; 2], increment: [u64; 2]) -> Self {
        Self { use_time_controls: true, time_control: clock, time_increment: increment, ..Self::default() }
    }

    pub fn with_output(mut self, output: OutputMode) -> Self {
        self.output = output;
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self, EngineError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}
