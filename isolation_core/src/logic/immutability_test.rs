use crate::logic::board::Board;
use crate::logic::game::GameState;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

#[test]
fn test_result_leaves_receiver_untouched() {
    let mut rng = StdRng::seed_from_u64(17);

    for _ in 0..20 {
        let mut state = GameState::new(Board::new(6, 5).unwrap());
        while !state.terminal_test() {
            let actions = state.actions();
            let player = state.player();
            let cells = state.open_cells();
            let snapshot = state;

            // Every successor, not just the one we continue with.
            for &action in &actions {
                let next = state.result(action).unwrap();
                assert_ne!(next, state);
            }

            assert_eq!(state, snapshot);
            assert_eq!(state.actions(), actions);
            assert_eq!(state.player(), player);
            assert_eq!(state.open_cells(), cells);

            let &action = actions.choose(&mut rng).unwrap();
            state = state.result(action).unwrap();
        }
    }
}

#[test]
fn test_visited_cells_stay_blocked() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut state = GameState::new(Board::new(5, 5).unwrap());
    let mut visited = Vec::new();

    while !state.terminal_test() {
        let &action = state.actions().choose(&mut rng).unwrap();
        visited.push(action);
        state = state.result(action).unwrap();

        for cell in &visited {
            assert!(!state.board().is_open(*cell));
            assert!(state.result(*cell).is_err());
        }
    }
    assert_eq!(state.ply() as usize, visited.len());
}
