use gw_core::{Cell, CoreError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PathError {
    #[error("no route from {from} to {to}")]
    NoRoute { from: Cell, to: Cell },

    #[error("gave up routing {from} to {to} after expanding {expanded} cells")]
    BudgetExhausted { from: Cell, to: Cell, expanded: u32 },

    #[error("cell {0} is outside the terrain")]
    OutOfBounds(Cell),

    #[error("retraced route is broken: {0}")]
    InvalidTrace(#[source] CoreError),

    #[error("terrain error: {0}")]
    Terrain(String),

    #[error("invalid pool configuration: {0}")]
    Config(#[source] CoreError),

    #[error("could not start search threads: {0}")]
    ThreadPool(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type PathResult<T> = Result<T, PathError>;
