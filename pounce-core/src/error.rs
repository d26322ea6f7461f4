//! Error types returned by the engine

use thiserror::Error;

/// Why a move request was ignored. State is unchanged in every case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("the game is over")]
    GameOver,

    #[error("a move is still resolving")]
    Busy,

    #[error("target coordinate is not finite")]
    InvalidCoordinate,

    #[error("it is not this piece's turn")]
    NotYourTurn,

    #[error("piece cannot move now")]
    PieceUnavailable,
}

/// Why a save blob was refused. The live game is unchanged in every case.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("malformed save data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("not a save file (format tag {0:?})")]
    UnsupportedFormat(String),

    #[error("unsupported save version {0}")]
    UnsupportedVersion(u32),

    #[error("invalid game state: {0}")]
    Invalid(String),
}
