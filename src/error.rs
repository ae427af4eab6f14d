use thiserror::Error;

/// Errors surfaced by the assignment engine.
///
/// Only `InvalidInput`, `Parse` and `Io` abort a call. `UnresolvedColor` is raised by
/// [`ColorTable::resolve`](crate::catalog::ColorTable::resolve) and absorbed by the
/// pipeline stages, which pass the raw code through instead.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("unresolved color code: {0}")]
    UnresolvedColor(String),

    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
