//! Pointer event routing for a single gesture.

use lattice_types::{Pattern, PointerAction, PointerEvent, TouchPoint};

use crate::grid::TouchGrid;
use crate::stroke::StrokeTracker;

/// What a pointer event did to the gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GestureStep {
    /// Nothing was recorded and the gesture has not ended.
    Ignored,
    /// The event extended the stroke or moved the rubber band.
    Tracking,
    /// The gesture is over; the pattern may be empty.
    Ended(Pattern),
}

/// Feeds pointer events through a [`TouchGrid`] into a [`StrokeTracker`].
///
/// The trace survives the end of a gesture so a host can keep drawing it
/// during feedback; [`GestureTracker::reset`] clears it.
#[derive(Debug, Clone, Default)]
pub struct GestureTracker {
    stroke: StrokeTracker,
    current: Option<TouchPoint>,
    cursor: Option<(f32, f32)>,
    finished: bool,
}

impl GestureTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&mut self, grid: &TouchGrid, event: PointerEvent) -> GestureStep {
        if self.finished {
            return GestureStep::Ignored;
        }

        let Some(cell) = grid.locate(event.x, event.y) else {
            // Leaving the grid ends a stroke that has started.
            if self.stroke.is_empty() {
                return GestureStep::Ignored;
            }
            return self.finish();
        };
        let point = TouchPoint::from_cell(cell);

        match event.action {
            PointerAction::Down => {
                if let Some(point) = point {
                    self.stroke.add_first(point);
                    self.current = Some(point);
                    self.cursor = None;
                    return GestureStep::Tracking;
                }
                GestureStep::Ignored
            }
            PointerAction::Move => {
                if let Some(point) = point.filter(|p| !self.stroke.contains(*p)) {
                    self.record(point);
                    self.cursor = None;
                    return GestureStep::Tracking;
                }
                if self.current.is_some() {
                    self.cursor = Some((event.x, event.y));
                    return GestureStep::Tracking;
                }
                GestureStep::Ignored
            }
            PointerAction::Up => {
                if let Some(point) = point.filter(|p| !self.stroke.contains(*p)) {
                    self.record(point);
                }
                self.finish()
            }
        }
    }

    /// Points visited so far, in order.
    #[must_use]
    pub fn trace(&self) -> &[TouchPoint] {
        self.stroke.visited()
    }

    /// Loose end of the trace: the last recorded point and the pointer position.
    #[must_use]
    pub fn rubber_band(&self) -> Option<(TouchPoint, (f32, f32))> {
        self.current.zip(self.cursor)
    }

    pub fn reset(&mut self) {
        self.stroke.reset();
        self.current = None;
        self.cursor = None;
        self.finished = false;
    }

    fn record(&mut self, point: TouchPoint) {
        match self.current {
            Some(from) => self.stroke.add_transition(from, point),
            None => self.stroke.add_first(point),
        }
        self.current = Some(point);
    }

    fn finish(&mut self) -> GestureStep {
        self.cursor = None;
        let pattern = self.stroke.to_pattern();
        // An empty gesture leaves the tracker ready for the next one.
        self.finished = !pattern.is_empty();
        tracing::debug!(points = pattern.len(), "Gesture ended");
        GestureStep::Ended(pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIZE: u32 = 900;

    fn grid() -> TouchGrid {
        TouchGrid::new(SIZE, SIZE)
    }

    /// Center of the touch point with `ordinal` on a 900x900 grid.
    fn at(ordinal: u8) -> (f32, f32) {
        let point = TouchPoint::from_ordinal(ordinal).unwrap();
        grid().cell_center(point.cell())
    }

    fn ended(step: GestureStep) -> Vec<u8> {
        match step {
            GestureStep::Ended(pattern) => pattern.to_ordinals(),
            other => panic!("expected Ended, got {other:?}"),
        }
    }

    #[test]
    fn straight_horizontal_swipe_infers_middle_point() {
        let grid = grid();
        let mut gesture = GestureTracker::new();
        let (x1, y1) = at(1);
        let (x3, y3) = at(3);
        assert_eq!(
            gesture.handle(&grid, PointerEvent::down(x1, y1)),
            GestureStep::Tracking
        );
        // Sliding through non-touch cells only moves the rubber band.
        gesture.handle(&grid, PointerEvent::moved(x1 + 120.0, y1));
        assert_eq!(
            gesture.rubber_band(),
            Some((TouchPoint::from_ordinal(1).unwrap(), (x1 + 120.0, y1)))
        );
        assert_eq!(
            ended(gesture.handle(&grid, PointerEvent::up(x3, y3))),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn moves_record_each_new_point_once() {
        let grid = grid();
        let mut gesture = GestureTracker::new();
        let path = [1, 2, 2, 5, 2, 9];
        let (x, y) = at(path[0]);
        gesture.handle(&grid, PointerEvent::down(x, y));
        for &ordinal in &path[1..] {
            let (x, y) = at(ordinal);
            gesture.handle(&grid, PointerEvent::moved(x, y));
        }
        let (x, y) = at(9);
        assert_eq!(
            ended(gesture.handle(&grid, PointerEvent::up(x, y))),
            vec![1, 2, 5, 9]
        );
    }

    #[test]
    fn down_outside_touch_point_starts_on_first_point_reached() {
        let grid = grid();
        let mut gesture = GestureTracker::new();
        assert_eq!(
            gesture.handle(&grid, PointerEvent::down(50.0, 50.0)),
            GestureStep::Ignored
        );
        let (x, y) = at(4);
        gesture.handle(&grid, PointerEvent::moved(x, y));
        let (x, y) = at(6);
        assert_eq!(
            ended(gesture.handle(&grid, PointerEvent::up(x, y))),
            vec![4, 5, 6]
        );
    }

    #[test]
    fn up_without_prior_point_records_the_release_point() {
        let grid = grid();
        let mut gesture = GestureTracker::new();
        let (x, y) = at(7);
        assert_eq!(
            ended(gesture.handle(&grid, PointerEvent::up(x, y))),
            vec![7]
        );
    }

    #[test]
    fn leaving_the_grid_ends_a_started_stroke() {
        let grid = grid();
        let mut gesture = GestureTracker::new();
        let (x, y) = at(5);
        gesture.handle(&grid, PointerEvent::down(x, y));
        let (x, y) = at(6);
        gesture.handle(&grid, PointerEvent::moved(x, y));
        assert_eq!(
            ended(gesture.handle(&grid, PointerEvent::moved(950.0, y))),
            vec![5, 6]
        );
        // The finished trace ignores input until reset.
        assert_eq!(
            gesture.handle(&grid, PointerEvent::down(x, y)),
            GestureStep::Ignored
        );
        assert_eq!(gesture.trace().len(), 2);
        gesture.reset();
        assert!(gesture.trace().is_empty());
        assert_eq!(
            gesture.handle(&grid, PointerEvent::down(x, y)),
            GestureStep::Tracking
        );
    }

    #[test]
    fn leaving_before_any_point_is_ignored() {
        let grid = grid();
        let mut gesture = GestureTracker::new();
        assert_eq!(
            gesture.handle(&grid, PointerEvent::moved(-5.0, 10.0)),
            GestureStep::Ignored
        );
    }

    #[test]
    fn empty_release_keeps_tracker_open() {
        let grid = grid();
        let mut gesture = GestureTracker::new();
        gesture.handle(&grid, PointerEvent::down(50.0, 50.0));
        assert_eq!(
            ended(gesture.handle(&grid, PointerEvent::up(60.0, 60.0))),
            Vec::<u8>::new()
        );
        let (x, y) = at(2);
        assert_eq!(
            gesture.handle(&grid, PointerEvent::down(x, y)),
            GestureStep::Tracking
        );
    }
}
