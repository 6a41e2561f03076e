use thiserror::Error;

use crate::Phase;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Cell code is neither a demon nor a rune")]
    InvalidCellCode,
    #[error("Rune type must be between 1 and 6")]
    InvalidRune,
    #[error("Board shape does not match declared size")]
    InvalidBoardShape,
    #[error("Invalid configuration: {0}")]
    InvalidConfig(&'static str),
    #[error("Action requires the {expected:?} phase, current phase is {actual:?}")]
    WrongPhase { expected: Phase, actual: Phase },
}

pub type Result<T> = core::result::Result<T, GameError>;
