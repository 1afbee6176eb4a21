// Parallel alpha-beta search over a bitboard position layer
pub mod board;
pub mod config;
pub mod error;
pub mod search;

pub use board::cozy::CozyPosition;
pub use board::moves::Move;
pub use board::Position;
pub use config::{OutputMode, Restrictions};
pub use error::EngineError;
pub use search::{Engine, SearchResult, Statistics, StopHandle};
