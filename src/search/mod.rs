pub mod alphabeta;
pub mod context;
pub mod eval;
pub mod ordering;
pub mod output;
pub mod root;
pub mod see;
pub mod smp;
pub mod time;
pub mod tt;

/// Deepest iteration the driver will start.
pub const DEPTH_LIMIT: i32 = 64;
/// Plies below the root for which per-ply buffers exist.
pub const MAX_PLY: usize = 128;

pub use alphabeta::Aborted;
pub use context::{Statistics, StopHandle};
pub use root::{Engine, SearchResult};
