use gw_core::{Cell, CoreError};
use gw_mobility::MobilityError;
use gw_path::PathError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(#[from] CoreError),

    #[error("destination {0} is outside the grid")]
    GoalOutOfBounds(Cell),

    #[error("mobility error: {0}")]
    Mobility(#[from] MobilityError),

    #[error("path pool error: {0}")]
    Path(#[from] PathError),
}

pub type SimResult<T> = Result<T, SimError>;
