//! Grid geometry: cell indices and the nine touch points.
//!
//! The capture surface is divided into a fixed 9x9 grid of cells. Nine of
//! those cells are selectable touch points arranged in a 3x3 layout:
//!
//! ```text
//!  cell   10  13  16        ordinal  1  2  3
//!         37  40  43                 4  5  6
//!         64  67  70                 7  8  9
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::PatternError;

pub const GRID_ROWS: usize = 9;
pub const GRID_COLS: usize = 9;
pub const GRID_CELLS: usize = GRID_ROWS * GRID_COLS;

/// Number of selectable touch points; also the longest possible pattern.
pub const TOUCH_POINT_COUNT: usize = 9;

/// Touch point cells in canonical ordinal order.
pub const TOUCH_POINT_CELLS: [usize; TOUCH_POINT_COUNT] = [10, 13, 16, 37, 40, 43, 64, 67, 70];

/// Index of one cell in the 9x9 grid, row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellIndex(usize);

impl CellIndex {
    /// Returns `None` when `index` is outside the grid.
    #[must_use]
    pub const fn new(index: usize) -> Option<Self> {
        if index < GRID_CELLS {
            Some(Self(index))
        } else {
            None
        }
    }

    /// Cell at zero-based `row` and `col`, or `None` outside the grid.
    #[must_use]
    pub const fn from_row_col(row: usize, col: usize) -> Option<Self> {
        if row < GRID_ROWS && col < GRID_COLS {
            Some(Self(row * GRID_COLS + col))
        } else {
            None
        }
    }

    #[must_use]
    pub const fn value(self) -> usize {
        self.0
    }

    /// Zero-based grid row.
    #[must_use]
    pub const fn row(self) -> usize {
        self.0 / GRID_COLS
    }

    /// Zero-based grid column.
    #[must_use]
    pub const fn col(self) -> usize {
        self.0 % GRID_COLS
    }
}

impl fmt::Display for CellIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One of the nine selectable targets, identified by its 1-based ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct TouchPoint(u8);

impl TouchPoint {
    /// The middle of the layout (ordinal 5, cell 40).
    pub const CENTER: TouchPoint = TouchPoint(5);

    pub fn from_ordinal(ordinal: u8) -> Result<Self, PatternError> {
        if (1..=TOUCH_POINT_COUNT as u8).contains(&ordinal) {
            Ok(Self(ordinal))
        } else {
            Err(PatternError::InvalidOrdinal(ordinal))
        }
    }

    /// The touch point occupying `cell`, if any.
    #[must_use]
    pub fn from_cell(cell: CellIndex) -> Option<Self> {
        TOUCH_POINT_CELLS
            .iter()
            .position(|&c| c == cell.value())
            .map(|pos| Self(pos as u8 + 1))
    }

    /// Only called with a row and column taken from an existing touch point.
    const fn at(row: u8, column: u8) -> Self {
        Self((row - 1) * 3 + column)
    }

    #[must_use]
    pub const fn ordinal(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn cell(self) -> CellIndex {
        CellIndex(TOUCH_POINT_CELLS[(self.0 - 1) as usize])
    }

    /// 1-based logical row in the 3x3 layout.
    #[must_use]
    pub const fn row(self) -> u8 {
        (self.0 - 1) / 3 + 1
    }

    /// 1-based logical column in the 3x3 layout.
    #[must_use]
    pub const fn column(self) -> u8 {
        (self.0 - 1) % 3 + 1
    }

    /// Middle point of the row this point sits in.
    #[must_use]
    pub const fn row_middle(self) -> Self {
        Self::at(self.row(), 2)
    }

    /// Middle point of the column this point sits in.
    #[must_use]
    pub const fn column_middle(self) -> Self {
        Self::at(2, self.column())
    }
}

impl TryFrom<u8> for TouchPoint {
    type Error = PatternError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_ordinal(value)
    }
}

impl From<TouchPoint> for u8 {
    fn from(value: TouchPoint) -> Self {
        value.0
    }
}

// A wiped point holds ordinal 0 and must not be used afterwards.
impl Zeroize for TouchPoint {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

impl fmt::Display for TouchPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touch_point_cells_round_trip_through_ordinals() {
        for (pos, &cell) in TOUCH_POINT_CELLS.iter().enumerate() {
            let point = TouchPoint::from_cell(CellIndex::new(cell).unwrap()).unwrap();
            assert_eq!(point.ordinal() as usize, pos + 1);
            assert_eq!(point.cell().value(), cell);
        }
    }

    #[test]
    fn logical_rows_and_columns_match_grid_layout() {
        let first = TouchPoint::from_ordinal(1).unwrap();
        assert_eq!((first.row(), first.column()), (1, 1));
        let sixth = TouchPoint::from_ordinal(6).unwrap();
        assert_eq!((sixth.row(), sixth.column()), (2, 3));
        let last = TouchPoint::from_ordinal(9).unwrap();
        assert_eq!((last.row(), last.column()), (3, 3));
        assert_eq!(TouchPoint::CENTER.cell().value(), 40);
    }

    #[test]
    fn middles_pick_the_expected_cells() {
        let point = |n| TouchPoint::from_ordinal(n).unwrap();
        assert_eq!(point(1).row_middle().cell().value(), 13);
        assert_eq!(point(9).row_middle().cell().value(), 67);
        assert_eq!(point(7).column_middle().cell().value(), 37);
        assert_eq!(point(3).column_middle().cell().value(), 43);
        assert_eq!(point(4).row_middle(), TouchPoint::CENTER);
    }

    #[test]
    fn non_touch_cells_have_no_touch_point() {
        assert!(TouchPoint::from_cell(CellIndex::new(0).unwrap()).is_none());
        assert!(TouchPoint::from_cell(CellIndex::new(11).unwrap()).is_none());
        assert!(CellIndex::new(GRID_CELLS).is_none());
    }

    #[test]
    fn ordinals_outside_one_to_nine_are_rejected() {
        assert!(matches!(
            TouchPoint::from_ordinal(0),
            Err(PatternError::InvalidOrdinal(0))
        ));
        assert!(TouchPoint::from_ordinal(10).is_err());
    }

    #[test]
    fn cell_index_splits_into_row_and_col() {
        let cell = CellIndex::new(43).unwrap();
        assert_eq!((cell.row(), cell.col()), (4, 7));
        assert_eq!(CellIndex::from_row_col(4, 7), Some(cell));
        assert!(CellIndex::from_row_col(9, 0).is_none());
    }
}
