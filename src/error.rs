//! Errors surfaced by the ride controller.

use thiserror::Error;

use crate::position::PositionError;

/// A ride cannot start in the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PreconditionError {
    #[error("no destination selected")]
    MissingDestination,

    #[error("current position unknown")]
    MissingPosition,

    #[error("a ride is already in progress")]
    AlreadyRiding,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RideError {
    #[error(transparent)]
    Precondition(#[from] PreconditionError),

    #[error(transparent)]
    Position(#[from] PositionError),
}
