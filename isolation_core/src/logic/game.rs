use crate::engine::{Score, LOSS, WIN};
use crate::logic::board::{Bitboard, Board, Cell};
use crate::logic::generator::{liberties, liberty_mask};
use crate::logic::rules::{is_valid_action, MoveError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An action names the cell the active token moves (or is placed) to.
pub type Action = Cell;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    First,
    Second,
}

impl Player {
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::First => Self::Second,
            Self::Second => Self::First,
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Self::First => 0,
            Self::Second => 1,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player {}", self.index())
    }
}

/// A position. Values are small and `Copy`; `result` hands back a new one
/// and never touches the receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    locations: [Option<Cell>; 2],
    turn: Player,
    ply: u32,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(Board::default())
    }
}

impl GameState {
    /// Empty position on `board`, first player to move, no token placed.
    #[must_use]
    pub const fn new(board: Board) -> Self {
        Self {
            board,
            locations: [None, None],
            turn: Player::First,
            ply: 0,
        }
    }

    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// The player to move.
    pub const fn player(&self) -> Player {
        self.turn
    }

    pub const fn ply(&self) -> u32 {
        self.ply
    }

    pub const fn location(&self, player: Player) -> Option<Cell> {
        self.locations[player.index()]
    }

    pub fn liberty_mask(&self, player: Player) -> Bitboard {
        liberty_mask(&self.board, self.location(player))
    }

    pub fn liberties(&self, from: Option<Cell>) -> Vec<Cell> {
        liberties(&self.board, from)
    }

    pub fn open_cells(&self) -> Vec<Cell> {
        self.board.open_cells()
    }

    pub fn actions(&self) -> Vec<Action> {
        self.liberties(self.location(self.turn))
    }

    /// Applies `action` for the active player.
    pub fn result(&self, action: Action) -> Result<Self, MoveError> {
        is_valid_action(self, action)?;
        Ok(self.play(action))
    }

    /// `result` without the legality check; `action` must come from
    /// `actions()`.
    pub(crate) fn play(&self, action: Action) -> Self {
        let mut next = *self;
        if let Some(sq) = next.board.index(action) {
            next.board.block_square(sq);
        }
        next.locations[self.turn.index()] = Some(action);
        next.turn = self.turn.opposite();
        next.ply += 1;
        next
    }

    /// True when either player, to move or not, has no liberties.
    pub fn terminal_test(&self) -> bool {
        self.liberty_mask(Player::First) == 0 || self.liberty_mask(Player::Second) == 0
    }

    /// The side that has lost, if the position is terminal.
    ///
    /// The active player loses when it has no liberties; otherwise the waiting
    /// player does. When both are blocked the active player is the loser.
    pub fn loser(&self) -> Option<Player> {
        if !self.terminal_test() {
            return None;
        }
        if self.liberty_mask(self.turn) == 0 {
            Some(self.turn)
        } else {
            Some(self.turn.opposite())
        }
    }

    pub fn winner(&self) -> Option<Player> {
        self.loser().map(Player::opposite)
    }

    /// `WIN` or `LOSS` for `player` at a terminal position, 0 elsewhere.
    pub fn utility(&self, player: Player) -> Score {
        match self.loser() {
            Some(loser) if loser == player => LOSS,
            Some(_) => WIN,
            None => 0,
        }
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in (0..self.board.height()).rev() {
            for x in 0..self.board.width() {
                let cell = Cell::new(x, y);
                let glyph = if self.locations[0] == Some(cell) {
                    '1'
                } else if self.locations[1] == Some(cell) {
                    '2'
                } else if self.board.is_open(cell) {
                    '.'
                } else {
                    '#'
                };
                write!(f, "{glyph}")?;
            }
            writeln!(f)?;
        }
        write!(f, "ply {}, {} to move", self.ply, self.turn)
    }
}
