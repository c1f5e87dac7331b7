use crate::logic::board::Cell;
use crate::logic::game::{Action, GameState, Player};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    /// The target is not among the active player's liberties.
    #[error("action {action} is not legal for {player}")]
    InvalidAction { action: Action, player: Player },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("a {width}x{height} board does not fit a 128-bit padded layout")]
    InvalidDimensions { width: u8, height: u8 },
    #[error("cell {0} is off the board")]
    OutOfBounds(Cell),
}

/// Checks that `action` is one of the active player's liberties.
pub fn is_valid_action(state: &GameState, action: Action) -> Result<(), MoveError> {
    let board = state.board();
    let reachable = board
        .index(action)
        .is_some_and(|sq| state.liberty_mask(state.player()) & (1u128 << sq) != 0);

    if reachable {
        Ok(())
    } else {
        Err(MoveError::InvalidAction {
            action,
            player: state.player(),
        })
    }
}
