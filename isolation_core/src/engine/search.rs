use crate::engine::config::{EngineConfig, SearchAlgorithm};
use crate::engine::limits::{CancelToken, SearchContext};
use crate::engine::minimax::minimax_decision;
use crate::engine::{Score, SearchError, SearchLimit, SearchStats, Searcher, LOSS, WIN};
use crate::logic::game::{Action, GameState};
use std::sync::Arc;
use std::time::{Duration, Instant};

pub fn min_value(
    ctx: &mut SearchContext<'_>,
    state: &GameState,
    alpha: Score,
    mut beta: Score,
    depth: u8,
) -> Result<Score, SearchError> {
    ctx.enter()?;
    if ctx.terminal_test(state) {
        return Ok(ctx.utility(state));
    }
    if depth == 0 {
        return Ok(ctx.evaluate(state));
    }

    let mut value = WIN;
    for action in state.actions() {
        value = value.min(max_value(ctx, &state.play(action), alpha, beta, depth - 1)?);
        if value <= alpha {
            ctx.cutoff();
            return Ok(value);
        }
        beta = beta.min(value);
    }
    Ok(value)
}

pub fn max_value(
    ctx: &mut SearchContext<'_>,
    state: &GameState,
    mut alpha: Score,
    beta: Score,
    depth: u8,
) -> Result<Score, SearchError> {
    ctx.enter()?;
    if ctx.terminal_test(state) {
        return Ok(ctx.utility(state));
    }
    if depth == 0 {
        return Ok(ctx.evaluate(state));
    }

    let mut value = LOSS;
    for action in state.actions() {
        value = value.max(min_value(ctx, &state.play(action), alpha, beta, depth - 1)?);
        if value >= beta {
            ctx.cutoff();
            return Ok(value);
        }
        alpha = alpha.max(value);
    }
    Ok(value)
}

/// Root of the pruned search. Raising alpha across root children keeps the
/// value of the chosen action exact: a child can only displace the current
/// best by beating alpha, and values above alpha are not bounds.
pub fn alpha_beta_decision(
    ctx: &mut SearchContext<'_>,
    state: &GameState,
    depth: u8,
) -> Result<(Action, Score), SearchError> {
    let mut alpha = LOSS;
    let mut best: Option<(Action, Score)> = None;

    for action in state.actions() {
        let value = min_value(ctx, &state.play(action), alpha, WIN, depth.saturating_sub(1))?;
        if best.map_or(true, |(_, score)| value > score) {
            best = Some((action, value));
        }
        alpha = alpha.max(value);
    }
    best.ok_or(SearchError::NoLegalActions)
}

/// Iterative-deepening driver over minimax or alpha-beta.
pub struct AlphaBetaEngine {
    config: Arc<EngineConfig>,
}

impl AlphaBetaEngine {
    pub const fn new(config: Arc<EngineConfig>) -> Self {
        Self { config }
    }

    pub fn update_config(&mut self, config: Arc<EngineConfig>) {
        self.config = config;
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn decide(
        &self,
        ctx: &mut SearchContext<'_>,
        state: &GameState,
        depth: u8,
    ) -> Result<(Action, Score), SearchError> {
        match self.config.algorithm {
            SearchAlgorithm::Minimax => minimax_decision(ctx, state, depth),
            SearchAlgorithm::AlphaBeta => alpha_beta_decision(ctx, state, depth),
        }
    }

    /// Searches depth 1, 2, ... `max_depth`, calling `publish` after every
    /// completed depth with that depth's action.
    ///
    /// Before depth 1 the first legal action is published at depth 0 so a
    /// caller always has an answer. A depth interrupted by `cancel` is thrown
    /// away and the previous depth's action is returned. The loop also ends
    /// once a depth proves a win or loss, or completes without evaluating a
    /// single position at the horizon.
    pub fn iterative_deepening<F>(
        &self,
        state: &GameState,
        max_depth: u8,
        cancel: Option<&CancelToken>,
        mut publish: F,
    ) -> Result<(Action, SearchStats), SearchError>
    where
        F: FnMut(Action, &SearchStats),
    {
        let start = Instant::now();
        let maximizer = state.player();
        let evaluator = self.config.heuristic;

        let mut ctx = SearchContext::new(&evaluator, maximizer);
        if let Some(token) = cancel {
            ctx = ctx.with_cancel(token, self.config.check_interval);
        }

        let mut best = *state
            .actions()
            .first()
            .ok_or(SearchError::NoLegalActions)?;
        let mut completed = SearchStats::default();
        publish(best, &completed);

        for depth in 1..=max_depth {
            if ctx.is_cancelled() {
                log::trace!("cancelled before depth {depth}");
                break;
            }

            let evaluations_before = ctx.stats().evaluations;
            match self.decide(&mut ctx, state, depth) {
                Ok((action, score)) => {
                    best = action;
                    let stats = ctx.stats_mut();
                    stats.depth = depth;
                    stats.score = score;
                    stats.time_ms = elapsed_ms(start);
                    completed = *stats;

                    log::debug!(
                        "depth {depth}: {action} score {score} nodes {} in {} ms",
                        completed.nodes,
                        completed.time_ms
                    );
                    publish(best, &completed);

                    let exhausted = ctx.stats().evaluations == evaluations_before;
                    if score == WIN || score == LOSS || exhausted {
                        break;
                    }
                }
                Err(SearchError::Cancelled) => {
                    log::trace!("depth {depth} abandoned");
                    break;
                }
                Err(err) => return Err(err),
            }
        }

        // Keep the completed depth's score, but report the work actually done.
        let spent = ctx.into_stats();
        completed.nodes = spent.nodes;
        completed.terminal_tests = spent.terminal_tests;
        completed.evaluations = spent.evaluations;
        completed.cutoffs = spent.cutoffs;
        completed.time_ms = elapsed_ms(start);
        Ok((best, completed))
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

impl Searcher for AlphaBetaEngine {
    fn search(
        &mut self,
        state: &GameState,
        limit: SearchLimit,
    ) -> Result<(Action, SearchStats), SearchError> {
        match limit {
            SearchLimit::Depth(d) => self.iterative_deepening(state, d, None, |_, _| {}),
            SearchLimit::Time(ms) => {
                let token = CancelToken::with_budget(Duration::from_millis(ms));
                self.iterative_deepening(state, self.config.max_depth, Some(&token), |_, _| {})
            }
        }
    }
}
