use thiserror::Error;

use crate::types::Position;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("game is already over")]
    GameOver,
    #[error("it is not {0}'s turn")]
    NotYourTurn(&'static str),
    #[error("position out of range: col={}, row={}", .0.col, .0.row)]
    InvalidPosition(Position),
    #[error("illegal move at col={}, row={}", .0.col, .0.row)]
    IllegalMove(Position),
    #[error("no legal moves for the side to move")]
    NoLegalMoves,
    #[error("move selector could not pick a move")]
    NoSelection,
    #[error("game state lock poisoned")]
    StatePoisoned,
}
