use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid FEN: {0}")]
    InvalidFen(String),
    #[error("illegal move: {0}")]
    IllegalMove(String),
    #[error("failed to build search thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
