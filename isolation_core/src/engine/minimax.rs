//! Exhaustive depth-limited minimax, the reference the pruned search is
//! checked against.

use crate::engine::limits::SearchContext;
use crate::engine::{Score, SearchError, LOSS, WIN};
use crate::logic::game::{Action, GameState};

pub fn min_value(
    ctx: &mut SearchContext<'_>,
    state: &GameState,
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
        value = value.min(max_value(ctx, &state.play(action), depth - 1)?);
    }
    Ok(value)
}

pub fn max_value(
    ctx: &mut SearchContext<'_>,
    state: &GameState,
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
        value = value.max(min_value(ctx, &state.play(action), depth - 1)?);
    }
    Ok(value)
}

/// Best root action and its value; the first of equally valued actions wins.
pub fn minimax_decision(
    ctx: &mut SearchContext<'_>,
    state: &GameState,
    depth: u8,
) -> Result<(Action, Score), SearchError> {
    let mut best: Option<(Action, Score)> = None;
    for action in state.actions() {
        let value = min_value(ctx, &state.play(action), depth.saturating_sub(1))?;
        if best.map_or(true, |(_, score)| value > score) {
            best = Some((action, value));
        }
    }
    best.ok_or(SearchError::NoLegalActions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::eval::Heuristic;
    use crate::logic::board::{Board, Cell};
    use crate::logic::game::Player;

    #[test]
    fn test_depth_zero_calls_evaluator() {
        let heuristic = Heuristic::LibertyDifference;
        let mut ctx = SearchContext::new(&heuristic, Player::First);
        let state = GameState::new(Board::toy()).play(Cell::new(1, 1));

        let value = max_value(&mut ctx, &state, 0).unwrap();
        assert_eq!(value, 0);
        assert_eq!(ctx.stats().evaluations, 1);
    }

    #[test]
    fn test_terminal_scored_exactly_not_heuristically() {
        // Second player is walled in on a 3x1 strip.
        let state = GameState::new(Board::new(3, 1).unwrap())
            .play(Cell::new(1, 0))
            .play(Cell::new(0, 0));
        let heuristic = Heuristic::LibertyDifference;
        let mut ctx = SearchContext::new(&heuristic, Player::First);

        assert_eq!(min_value(&mut ctx, &state, 0).unwrap(), WIN);
        assert_eq!(max_value(&mut ctx, &state, 3).unwrap(), WIN);
        assert_eq!(ctx.stats().evaluations, 0);
    }

    #[test]
    fn test_no_legal_actions_is_an_error() {
        let state = GameState::new(Board::new(2, 1).unwrap())
            .play(Cell::new(0, 0))
            .play(Cell::new(1, 0));
        let heuristic = Heuristic::LibertyDifference;
        let mut ctx = SearchContext::new(&heuristic, Player::First);
        assert_eq!(
            minimax_decision(&mut ctx, &state, 2),
            Err(SearchError::NoLegalActions)
        );
    }

    #[test]
    fn test_toy_board_opening_is_solved() {
        // Full-depth search on the exercise board.
        let heuristic = Heuristic::LibertyDifference;
        let mut ctx = SearchContext::new(&heuristic, Player::First);
        let state = GameState::new(Board::toy());
        let (action, value) = minimax_decision(&mut ctx, &state, 10).unwrap();

        assert!(state.actions().contains(&action));
        assert_eq!(value, WIN);
        assert_eq!(ctx.stats().evaluations, 0);
    }
}
