use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Position is not a finite point on the globe")]
    InvalidPosition,
    #[error("Position jumped {cells} cells in a single fix")]
    PositionJump { cells: u32 },
    #[error("Position source is unavailable")]
    SourceUnavailable,
    #[error("Invalid configuration: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = core::result::Result<T, GameError>;
