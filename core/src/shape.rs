//! Local structural checks on candidate enrollment patterns.

use lattice_types::{Pattern, ShapeVerdict, TOUCH_POINT_COUNT, TouchPoint};

pub const DEFAULT_MIN_POINTS: usize = 4;
pub const DEFAULT_MAX_POINTS: usize = TOUCH_POINT_COUNT;

/// Length and strength limits for a new pattern.
///
/// A weak pattern is one whose points all lie on a single straight line of
/// the layout, or whose ordinals form one consecutive run such as `1-2-3-4`
/// or `9-8-7-6`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapePolicy {
    min_points: usize,
    max_points: usize,
    reject_weak: bool,
}

impl Default for ShapePolicy {
    fn default() -> Self {
        Self {
            min_points: DEFAULT_MIN_POINTS,
            max_points: DEFAULT_MAX_POINTS,
            reject_weak: true,
        }
    }
}

impl ShapePolicy {
    /// `max_points` is clamped to at least `min_points`.
    #[must_use]
    pub fn new(min_points: usize, max_points: usize, reject_weak: bool) -> Self {
        Self {
            min_points,
            max_points: max_points.max(min_points),
            reject_weak,
        }
    }

    #[must_use]
    pub const fn min_points(&self) -> usize {
        self.min_points
    }

    #[must_use]
    pub const fn max_points(&self) -> usize {
        self.max_points
    }

    #[must_use]
    pub fn check(&self, pattern: &Pattern) -> ShapeVerdict {
        if pattern.len() < self.min_points {
            return ShapeVerdict::TooShort;
        }
        if pattern.len() > self.max_points {
            return ShapeVerdict::TooLong;
        }
        if self.reject_weak && is_weak(pattern.points()) {
            return ShapeVerdict::Weak;
        }
        ShapeVerdict::Ok
    }
}

fn is_weak(points: &[TouchPoint]) -> bool {
    is_single_line(points) || is_consecutive_run(points)
}

fn is_single_line(points: &[TouchPoint]) -> bool {
    let Some(first) = points.first() else {
        return false;
    };
    let (row, column) = (first.row(), first.column());
    points.iter().all(|p| p.row() == row)
        || points.iter().all(|p| p.column() == column)
        || points.iter().all(|p| p.row() == p.column())
        || points.iter().all(|p| p.row() + p.column() == 4)
}

fn is_consecutive_run(points: &[TouchPoint]) -> bool {
    if points.len() < 3 {
        return false;
    }
    let steps: Vec<i16> = points
        .windows(2)
        .map(|pair| i16::from(pair[1].ordinal()) - i16::from(pair[0].ordinal()))
        .collect();
    steps.iter().all(|&step| step == 1) || steps.iter().all(|&step| step == -1)
}
