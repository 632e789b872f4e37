//! Gesture capture logic for Lattice.
//!
//! This crate contains the synchronous pieces of pattern capture: mapping
//! surface coordinates onto the capture grid, turning pointer movement into an
//! ordered list of touch points, and local shape checks for new patterns.
//! Nothing here owns a thread or a timer; see `lattice-engine` for that.

mod gesture;
mod grid;
mod shape;
mod stroke;

pub use gesture::{GestureStep, GestureTracker};
pub use grid::TouchGrid;
pub use shape::{DEFAULT_MAX_POINTS, DEFAULT_MIN_POINTS, ShapePolicy};
pub use stroke::StrokeTracker;
