//! Screen-space hit testing for the 9x9 capture grid.

use lattice_types::{CellIndex, GRID_COLS, GRID_ROWS, TouchPoint};

/// Maps surface coordinates to grid cells.
///
/// The surface is split into `GRID_ROWS x GRID_COLS` equal rectangles using
/// integer division of the current size, so a strip of up to eight pixels on
/// the right and bottom edges belongs to no cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TouchGrid {
    width: u32,
    height: u32,
}

impl TouchGrid {
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    const fn cell_width(&self) -> u32 {
        self.width / GRID_COLS as u32
    }

    const fn cell_height(&self) -> u32 {
        self.height / GRID_ROWS as u32
    }

    /// The cell containing `(x, y)`; cells are half-open on the right and bottom.
    #[must_use]
    pub fn locate(&self, x: f32, y: f32) -> Option<CellIndex> {
        let (cell_w, cell_h) = (self.cell_width(), self.cell_height());
        if cell_w == 0 || cell_h == 0 {
            return None;
        }
        // Also rejects NaN.
        if !(x >= 0.0 && y >= 0.0) {
            return None;
        }
        let col = (x / cell_w as f32).floor() as usize;
        let row = (y / cell_h as f32).floor() as usize;
        CellIndex::from_row_col(row, col)
    }

    /// The touch point under `(x, y)`, if the containing cell is one.
    #[must_use]
    pub fn touch_point_at(&self, x: f32, y: f32) -> Option<TouchPoint> {
        self.locate(x, y).and_then(TouchPoint::from_cell)
    }

    #[must_use]
    pub fn cell_center(&self, cell: CellIndex) -> (f32, f32) {
        let (cell_w, cell_h) = (self.cell_width() as f32, self.cell_height() as f32);
        (
            cell.col() as f32 * cell_w + cell_w / 2.0,
            cell.row() as f32 * cell_h + cell_h / 2.0,
        )
    }

    #[must_use]
    pub fn is_touch_point(cell: CellIndex) -> bool {
        TouchPoint::from_cell(cell).is_some()
    }

    /// Logical row (1..=3) of a touch point cell.
    ///
    /// # Panics
    ///
    /// Panics when `cell` is not a touch point. Callers only pass cells that
    /// already passed [`TouchGrid::is_touch_point`].
    #[must_use]
    pub fn row_of(cell: CellIndex) -> u8 {
        expect_touch_point(cell).row()
    }

    /// Logical column (1..=3) of a touch point cell.
    ///
    /// # Panics
    ///
    /// Panics when `cell` is not a touch point.
    #[must_use]
    pub fn column_of(cell: CellIndex) -> u8 {
        expect_touch_point(cell).column()
    }
}

fn expect_touch_point(cell: CellIndex) -> TouchPoint {
    TouchPoint::from_cell(cell)
        .unwrap_or_else(|| panic!("cell {cell} is not a touch point"))
}
