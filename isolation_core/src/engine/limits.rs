use crate::engine::{Evaluator, Score, SearchError, SearchStats, LOSS, WIN};
use crate::logic::game::{GameState, Player};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Shared stop signal: an explicit flag, an optional deadline, or both.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            flag: Arc::default(),
            deadline: Some(deadline),
        }
    }

    pub fn with_budget(budget: Duration) -> Self {
        Self::with_deadline(Instant::now() + budget)
    }

    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire) || self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}

/// Per-search bookkeeping threaded through the recursion: the fixed
/// maximizing player and evaluator, the statistics, and the cancellation poll.
pub struct SearchContext<'a> {
    evaluator: &'a dyn Evaluator,
    maximizer: Player,
    stats: SearchStats,
    cancel: Option<&'a CancelToken>,
    check_interval: u64,
}

impl<'a> SearchContext<'a> {
    pub fn new(evaluator: &'a dyn Evaluator, maximizer: Player) -> Self {
        Self {
            evaluator,
            maximizer,
            stats: SearchStats::default(),
            cancel: None,
            check_interval: 1024,
        }
    }

    #[must_use]
    pub fn with_cancel(mut self, token: &'a CancelToken, check_interval: u64) -> Self {
        self.cancel = Some(token);
        self.check_interval = check_interval.max(1);
        self
    }

    pub const fn maximizer(&self) -> Player {
        self.maximizer
    }

    pub const fn stats(&self) -> &SearchStats {
        &self.stats
    }

    pub(crate) fn stats_mut(&mut self) -> &mut SearchStats {
        &mut self.stats
    }

    pub fn into_stats(self) -> SearchStats {
        self.stats
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_some_and(CancelToken::is_cancelled)
    }

    /// Counts a node and polls the token every `check_interval` nodes.
    pub(crate) fn enter(&mut self) -> Result<(), SearchError> {
        self.stats.nodes += 1;
        if self.stats.nodes % self.check_interval == 0 && self.is_cancelled() {
            return Err(SearchError::Cancelled);
        }
        Ok(())
    }

    pub(crate) fn terminal_test(&mut self, state: &GameState) -> bool {
        self.stats.terminal_tests += 1;
        state.terminal_test()
    }

    pub(crate) fn utility(&self, state: &GameState) -> Score {
        state.utility(self.maximizer)
    }

    /// Heuristic value for the maximizer, kept off the win/loss sentinels.
    pub(crate) fn evaluate(&mut self, state: &GameState) -> Score {
        self.stats.evaluations += 1;
        self.evaluator
            .evaluate(state, self.maximizer)
            .clamp(LOSS + 1, WIN - 1)
    }

    pub(crate) fn cutoff(&mut self) {
        self.stats.cutoffs += 1;
    }
}
