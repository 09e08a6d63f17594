use gw_core::{AgentId, Cell};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GridError {
    #[error("cell {0} is outside the grid")]
    OutOfBounds(Cell),

    #[error("cell {cell} is already held by {holder}")]
    Blocked { cell: Cell, holder: AgentId },
}

pub type GridResult<T> = Result<T, GridError>;
