//! Accumulation of touch points across one gesture.
//!
//! A straight segment between two touch points that jumps over a third one
//! picks up that midpoint:
//!
//! ```text
//!  1 ── 2 ── 3     1 -> 3 records 1, 2, 3
//!  │ ╲       │     1 -> 7 records 1, 4, 7
//!  4    5    6     1 -> 9 records 1, 5, 9
//!  │       ╲ │     3 -> 7 records 3, 5, 7
//!  7 ── 8 ── 9
//! ```

use zeroize::Zeroize;

use lattice_types::{Pattern, TouchPoint};

/// Ordered touch points visited during the current gesture.
#[derive(Debug, Clone, Default)]
pub struct StrokeTracker {
    visited: Vec<TouchPoint>,
}

impl StrokeTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the first point of a stroke.
    pub fn add_first(&mut self, point: TouchPoint) {
        self.add_if_unvisited(point);
    }

    /// Record a segment from `from` to `to`, inferring a skipped midpoint.
    ///
    /// Only the inferred midpoint is deduplicated; `to` is always appended.
    /// Callers check `contains(to)` before recording a transition.
    pub fn add_transition(&mut self, from: TouchPoint, to: TouchPoint) {
        let row_distance = from.row().abs_diff(to.row());
        let column_distance = from.column().abs_diff(to.column());

        match (row_distance, column_distance) {
            (2, 2) => self.add_if_unvisited(TouchPoint::CENTER),
            (2, 0) => self.add_if_unvisited(from.column_middle()),
            (0, 2) => self.add_if_unvisited(from.row_middle()),
            _ => {}
        }
        self.visited.push(to);
    }

    #[must_use]
    pub fn contains(&self, point: TouchPoint) -> bool {
        self.visited.contains(&point)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.visited.is_empty()
    }

    #[must_use]
    pub fn visited(&self) -> &[TouchPoint] {
        &self.visited
    }

    #[must_use]
    pub fn to_pattern(&self) -> Pattern {
        Pattern::from_visits(self.visited.iter().copied())
    }

    /// Forget the stroke, overwriting the recorded points.
    pub fn reset(&mut self) {
        self.visited.zeroize();
    }

    fn add_if_unvisited(&mut self, point: TouchPoint) {
        if !self.contains(point) {
            self.visited.push(point);
        }
    }
}
