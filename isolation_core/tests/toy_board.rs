use isolation_core::engine::{LOSS, WIN};
use isolation_core::logic::board::{Board, Cell};
use isolation_core::logic::game::{GameState, Player};
use isolation_core::logic::rules::MoveError;

fn c(x: u8, y: u8) -> Cell {
    Cell::new(x, y)
}

fn sorted(mut cells: Vec<Cell>) -> Vec<Cell> {
    cells.sort();
    cells
}

#[test]
fn test_second_move_from_center() {
    let state = GameState::new(Board::toy()).result(c(1, 1)).unwrap();
    assert_eq!(
        sorted(state.actions()),
        sorted(vec![c(0, 0), c(1, 0), c(2, 0), c(0, 1)])
    );

    let state = state.result(c(1, 0)).unwrap();
    assert_eq!(state.player(), Player::First);
    assert_eq!(sorted(state.actions()), vec![c(0, 0), c(0, 1), c(2, 0)]);
}

#[test]
fn test_regression_sequence() {
    let start = GameState::new(Board::toy());
    let s1 = start.result(c(1, 1)).unwrap();
    assert_eq!(
        s1.result(c(1, 1)),
        Err(MoveError::InvalidAction {
            action: c(1, 1),
            player: Player::Second,
        })
    );

    let s2 = s1.result(c(2, 0)).unwrap();
    assert!(!s2.terminal_test());
    assert_eq!(s2.actions(), vec![c(0, 1), c(0, 0), c(1, 0)]);

    // First player takes (1, 0) and walls the second player in.
    let s3 = s2.result(c(1, 0)).unwrap();
    assert!(s3.terminal_test());
    assert_eq!(s3.player(), Player::Second);
    assert!(s3.actions().is_empty());
    assert_eq!(s3.winner(), Some(Player::First));
    assert_eq!(s3.utility(Player::Second), LOSS);
    assert_eq!(s3.utility(Player::First), WIN);

    // The fourth placement of the fixture is no longer reachable.
    assert!(matches!(
        s3.result(c(0, 1)),
        Err(MoveError::InvalidAction { .. })
    ));
}

/// Walks every position reachable from `state`, checking the terminal and
/// utility conventions at each one.
fn check_all(state: GameState, visited: &mut usize) {
    *visited += 1;

    let first_stuck = state.liberties(state.location(Player::First)).is_empty();
    let second_stuck = state.liberties(state.location(Player::Second)).is_empty();
    assert_eq!(state.terminal_test(), first_stuck || second_stuck, "\n{state}");

    if !state.terminal_test() {
        assert_eq!(state.utility(Player::First), 0);
        assert_eq!(state.utility(Player::Second), 0);
        for action in state.actions() {
            check_all(state.result(action).unwrap(), visited);
        }
        return;
    }

    let active = state.player();
    let expected_loser = if state.actions().is_empty() {
        active
    } else {
        active.opposite()
    };
    assert_eq!(state.utility(expected_loser), LOSS, "\n{state}");
    assert_eq!(state.utility(expected_loser.opposite()), WIN, "\n{state}");
}

#[test]
fn test_terminal_symmetry_toy_board() {
    let mut visited = 0;
    check_all(GameState::new(Board::toy()), &mut visited);
    assert!(visited > 20);
}

#[test]
fn test_terminal_symmetry_three_by_three() {
    let mut visited = 0;
    check_all(GameState::new(Board::new(3, 3).unwrap()), &mut visited);
    assert!(visited > 1000);
}
