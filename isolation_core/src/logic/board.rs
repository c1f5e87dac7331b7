use crate::logic::rules::BoardError;
use serde::{Deserialize, Serialize};
use std::fmt;

pub type Bitboard = u128;

const MAX_SQUARES: usize = Bitboard::BITS as usize;

/// A board coordinate, `x` across the width and `y` across the height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub x: u8,
    pub y: u8,
}

impl Cell {
    #[must_use]
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Open/blocked state of every cell.
///
/// Cells are laid out row by row with a stride of `width + 2`. The two extra
/// columns of each row are sentinels that are always blocked, so a ray that
/// leaves the board sideways lands on a sentinel and a ray that leaves it
/// vertically falls outside `0..size`. The final row's sentinels are dropped,
/// giving `(width + 2) * height - 2` squares in total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    width: u8,
    height: u8,
    blocked: Bitboard,
    playable: Bitboard,
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

impl Board {
    pub fn new(width: u8, height: u8) -> Result<Self, BoardError> {
        let size = (usize::from(width) + 2) * usize::from(height);
        if width == 0 || height == 0 || size - 2 > MAX_SQUARES {
            return Err(BoardError::InvalidDimensions { width, height });
        }
        Ok(Self::padded(width, height))
    }

    /// The 3x2 exercise board with the lower-right corner blocked.
    #[must_use]
    pub fn toy() -> Self {
        let mut board = Self::padded(3, 2);
        board.block_square(board.square_of(Cell::new(2, 1)));
        board
    }

    /// The 11x9 tournament board with no pre-blocked cell.
    #[must_use]
    pub fn standard() -> Self {
        Self::padded(11, 9)
    }

    // Callers have validated the dimensions.
    fn padded(width: u8, height: u8) -> Self {
        let stride = usize::from(width) + 2;
        let size = stride * usize::from(height) - 2;

        let mut playable: Bitboard = 0;
        for y in 0..usize::from(height) {
            for x in 0..usize::from(width) {
                playable |= 1 << (y * stride + x);
            }
        }

        let all = if size == MAX_SQUARES {
            Bitboard::MAX
        } else {
            (1 << size) - 1
        };

        Self {
            width,
            height,
            blocked: all & !playable,
            playable,
        }
    }

    /// Returns a copy with `cell` blocked as well.
    pub fn with_blocked(mut self, cell: Cell) -> Result<Self, BoardError> {
        let sq = self.index(cell).ok_or(BoardError::OutOfBounds(cell))?;
        self.block_square(sq);
        Ok(self)
    }

    pub const fn width(&self) -> u8 {
        self.width
    }

    pub const fn height(&self) -> u8 {
        self.height
    }

    pub const fn stride(&self) -> usize {
        self.width as usize + 2
    }

    /// Number of squares in the padded layout, sentinels included.
    pub const fn size(&self) -> usize {
        self.stride() * self.height as usize - 2
    }

    pub const fn cell_count(&self) -> u32 {
        self.width as u32 * self.height as u32
    }

    pub fn index(&self, cell: Cell) -> Option<usize> {
        (cell.x < self.width && cell.y < self.height).then(|| self.square_of(cell))
    }

    const fn square_of(&self, cell: Cell) -> usize {
        cell.y as usize * self.stride() + cell.x as usize
    }

    pub fn cell_at(&self, sq: usize) -> Option<Cell> {
        let stride = self.stride();
        let (x, y) = (sq % stride, sq / stride);
        if x < usize::from(self.width) && y < usize::from(self.height) {
            Some(Cell::new(u8::try_from(x).ok()?, u8::try_from(y).ok()?))
        } else {
            None
        }
    }

    pub fn is_open(&self, cell: Cell) -> bool {
        self.index(cell).is_some_and(|sq| self.is_open_square(sq))
    }

    pub const fn is_open_square(&self, sq: usize) -> bool {
        sq < self.size() && self.blocked & (1 << sq) == 0
    }

    pub(crate) fn block_square(&mut self, sq: usize) {
        if sq < self.size() {
            self.blocked |= 1 << sq;
        }
    }

    pub const fn open_mask(&self) -> Bitboard {
        self.playable & !self.blocked
    }

    pub const fn open_count(&self) -> u32 {
        self.open_mask().count_ones()
    }

    pub fn open_cells(&self) -> Vec<Cell> {
        self.cells(self.open_mask())
    }

    /// Converts the squares of `mask` back into cells, lowest square first.
    pub fn cells(&self, mask: Bitboard) -> Vec<Cell> {
        BitboardIterator::new(mask & self.playable)
            .filter_map(|sq| self.cell_at(sq))
            .collect()
    }

    /// Manhattan distance from `cell` to the geometric center, doubled so that
    /// boards with an even side keep an integral center.
    pub fn center_distance2(&self, cell: Cell) -> u32 {
        let dx = (2 * i32::from(cell.x) - (i32::from(self.width) - 1)).unsigned_abs();
        let dy = (2 * i32::from(cell.y) - (i32::from(self.height) - 1)).unsigned_abs();
        dx + dy
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in (0..self.height).rev() {
            for x in 0..self.width {
                let glyph = if self.is_open(Cell::new(x, y)) { '.' } else { '#' };
                write!(f, "{glyph}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

pub struct BitboardIterator {
    bb: Bitboard,
}

impl BitboardIterator {
    pub const fn new(bb: Bitboard) -> Self {
        Self { bb }
    }
}

impl Iterator for BitboardIterator {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        if self.bb == 0 {
            None
        } else {
            let lsb = self.bb.trailing_zeros() as usize;
            self.bb &= self.bb - 1;
            Some(lsb)
        }
    }
}
