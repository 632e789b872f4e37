//! Core domain types for Lattice.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer of the application.

mod capture;
mod grid;
mod pattern;

pub use capture::{
    CaptureResult, CaptureState, CaptureStatus, Mode, PointerAction, PointerEvent, ShapeVerdict,
};
pub use grid::{
    CellIndex, GRID_CELLS, GRID_COLS, GRID_ROWS, TOUCH_POINT_CELLS, TOUCH_POINT_COUNT, TouchPoint,
};
pub use pattern::{Pattern, PatternError};
