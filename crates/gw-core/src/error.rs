//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]`.

use thiserror::Error;

use crate::Cell;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("cells {from} and {to} are not adjacent")]
    NotAdjacent { from: Cell, to: Cell },

    #[error("invalid footprint: {0}")]
    InvalidFootprint(String),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `gw-core`.
pub type CoreResult<T> = Result<T, CoreError>;
