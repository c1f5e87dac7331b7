use crate::logic::board::{Bitboard, BitboardIterator, Board, Cell};

/// Ray directions as `(dx, dy)`, counter-clockwise from east.
pub const DIRECTIONS: [(i8, i8); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

/// Slides outward from `from` along every ray, calling `visit` with each open
/// square until the ray reaches a blocked square, a sentinel, or the end of
/// the padded layout.
fn slide(board: &Board, from: usize, mut visit: impl FnMut(usize)) {
    let stride = board.stride() as isize;
    let size = board.size() as isize;

    for (dx, dy) in DIRECTIONS {
        let step = isize::from(dy) * stride + isize::from(dx);
        let mut sq = from as isize + step;
        while (0..size).contains(&sq) && board.is_open_square(sq as usize) {
            visit(sq as usize);
            sq += step;
        }
    }
}

/// Liberties as a mask. An unplaced token (`None`) may go to any open cell.
pub fn liberty_mask(board: &Board, from: Option<Cell>) -> Bitboard {
    let Some(cell) = from else {
        return board.open_mask();
    };
    let Some(sq) = board.index(cell) else {
        return 0;
    };

    let mut mask: Bitboard = 0;
    slide(board, sq, |to| mask |= 1 << to);
    mask
}

/// Liberties in ray order: each direction of [`DIRECTIONS`] in turn, nearest
/// cell first.
pub fn liberties(board: &Board, from: Option<Cell>) -> Vec<Cell> {
    let Some(cell) = from else {
        return board.open_cells();
    };
    let Some(sq) = board.index(cell) else {
        return Vec::new();
    };

    let mut cells = Vec::with_capacity(32);
    slide(board, sq, |to| {
        if let Some(to) = board.cell_at(to) {
            cells.push(to);
        }
    });
    cells
}

/// Cells reachable in one or two moves, as a set union.
pub fn two_hop_mask(board: &Board, from: Option<Cell>) -> Bitboard {
    let first = liberty_mask(board, from);
    if from.is_none() {
        return first;
    }

    let mut reach = first;
    for sq in BitboardIterator::new(first) {
        slide(board, sq, |to| reach |= 1 << to);
    }
    reach
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn sorted(mut cells: Vec<Cell>) -> Vec<Cell> {
        cells.sort();
        cells
    }

    /// Every cell on the eight rays of `from` for an unobstructed board.
    fn expected_rays(width: u8, height: u8, from: Cell) -> Vec<Cell> {
        let mut cells = Vec::new();
        for (dx, dy) in DIRECTIONS {
            let (mut x, mut y) = (i16::from(from.x), i16::from(from.y));
            loop {
                x += i16::from(dx);
                y += i16::from(dy);
                if x < 0 || y < 0 || x >= i16::from(width) || y >= i16::from(height) {
                    break;
                }
                cells.push(Cell::new(x as u8, y as u8));
            }
        }
        sorted(cells)
    }

    #[test]
    fn test_open_board_rays_from_every_cell() {
        let board = Board::standard();
        for y in 0..board.height() {
            for x in 0..board.width() {
                let from = Cell::new(x, y);
                // The origin would be blocked after a real move; liberties
                // never include it either way.
                let board = board.with_blocked(from).unwrap();
                let got = liberties(&board, Some(from));
                let unique: HashSet<_> = got.iter().copied().collect();
                assert_eq!(unique.len(), got.len(), "duplicates from {from}");
                assert_eq!(sorted(got), expected_rays(11, 9, from), "from {from}");
            }
        }
    }

    #[test]
    fn test_mask_matches_list() {
        let board = Board::new(5, 4)
            .unwrap()
            .with_blocked(Cell::new(2, 2))
            .unwrap()
            .with_blocked(Cell::new(3, 0))
            .unwrap();
        for from in board.open_cells() {
            let mask = liberty_mask(&board, Some(from));
            assert_eq!(board.cells(mask), sorted_by_square(&board, liberties(&board, Some(from))));
        }
    }

    fn sorted_by_square(board: &Board, mut cells: Vec<Cell>) -> Vec<Cell> {
        cells.sort_by_key(|c| board.index(*c));
        cells
    }

    #[test]
    fn test_sliding_stops_at_first_obstacle() {
        let board = Board::new(5, 1)
            .unwrap()
            .with_blocked(Cell::new(3, 0))
            .unwrap();
        let got = liberties(&board, Some(Cell::new(0, 0)));
        assert_eq!(got, vec![Cell::new(1, 0), Cell::new(2, 0)]);
    }

    #[test]
    fn test_unplaced_token_sees_every_open_cell() {
        let board = Board::toy();
        let got = liberties(&board, None);
        assert_eq!(got.len(), 5);
        assert!(!got.contains(&Cell::new(2, 1)));
        assert_eq!(liberty_mask(&board, None), board.open_mask());
    }

    #[test]
    fn test_enclosed_cell_has_no_liberties() {
        let mut board = Board::new(3, 3).unwrap();
        for cell in [(0, 0), (1, 0), (2, 0), (0, 1), (2, 1), (0, 2), (1, 2), (2, 2)] {
            board = board.with_blocked(Cell::new(cell.0, cell.1)).unwrap();
        }
        assert!(liberties(&board, Some(Cell::new(1, 1))).is_empty());
        assert_eq!(liberty_mask(&board, Some(Cell::new(1, 1))), 0);
    }

    #[test]
    fn test_two_hop_reach() {
        // 4x1 strip, token on the end: one hop sees all three cells already.
        let board = Board::new(4, 1)
            .unwrap()
            .with_blocked(Cell::new(0, 0))
            .unwrap();
        let one = liberty_mask(&board, Some(Cell::new(0, 0)));
        assert_eq!(two_hop_mask(&board, Some(Cell::new(0, 0))), one);

        // A wall splits the row; the far side is only two hops away
        // through the diagonal.
        let board = Board::new(3, 2)
            .unwrap()
            .with_blocked(Cell::new(0, 0))
            .unwrap()
            .with_blocked(Cell::new(1, 0))
            .unwrap();
        let from = Some(Cell::new(0, 0));
        let two = two_hop_mask(&board, from);
        assert!(board.cells(two).contains(&Cell::new(2, 0)));
        assert!(!board.cells(liberty_mask(&board, from)).contains(&Cell::new(2, 0)));
    }
}
