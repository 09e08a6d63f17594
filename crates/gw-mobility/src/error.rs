use gw_core::AgentId;
use gw_grid::GridError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MobilityError {
    #[error("{0} does not exist")]
    UnknownAgent(AgentId),

    #[error("grid error: {0}")]
    Grid(#[from] GridError),
}

pub type MobilityResult<T> = Result<T, MobilityError>;
