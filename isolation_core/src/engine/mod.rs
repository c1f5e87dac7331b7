use crate::logic::game::{Action, GameState, Player};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod config;
pub mod eval;
pub mod limits;
pub mod minimax;
pub mod search;


pub type Score = i32;

/// Exact value of a won position. Heuristics stay strictly inside
/// `LOSS..WIN`.
pub const WIN: Score = Score::MAX;
pub const LOSS: Score = -WIN;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchLimit {
    Depth(u8),
    Time(u64), // milliseconds
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Deepest fully completed iteration.
    pub depth: u8,
    pub nodes: u64,
    pub terminal_tests: u64,
    pub evaluations: u64,
    pub cutoffs: u64,
    pub time_ms: u64,
    /// Root value of the published action at `depth`.
    pub score: Score,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("no legal actions: the position is terminal")]
    NoLegalActions,
    #[error("search cancelled")]
    Cancelled,
    #[error("search worker could not be started")]
    WorkerUnavailable,
    #[error("search worker panicked")]
    WorkerPanicked,
}

/// Scores a non-terminal position for `perspective`.
pub trait Evaluator {
    fn evaluate(&self, state: &GameState, perspective: Player) -> Score;
}

pub trait Searcher {
    fn search(
        &mut self,
        state: &GameState,
        limit: SearchLimit,
    ) -> Result<(Action, SearchStats), SearchError>;
}
