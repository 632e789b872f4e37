//! Gesture credentials.

use std::fmt;

use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::grid::{TOUCH_POINT_COUNT, TouchPoint};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("touch point ordinal {0} is outside 1..=9")]
    InvalidOrdinal(u8),
    #[error("touch point {0} appears more than once")]
    DuplicatePoint(TouchPoint),
}

/// Ordered sequence of touch points forming a gesture credential.
///
/// Patterns are secrets: `Debug` only reveals the length, and the ordinals are
/// overwritten when the value is dropped.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Pattern(Vec<TouchPoint>);

impl Pattern {
    /// Build a pattern from 1-based ordinals, rejecting repeats.
    pub fn from_ordinals(ordinals: &[u8]) -> Result<Self, PatternError> {
        let mut points = Vec::with_capacity(ordinals.len().min(TOUCH_POINT_COUNT));
        for &ordinal in ordinals {
            let point = TouchPoint::from_ordinal(ordinal)?;
            if points.contains(&point) {
                return Err(PatternError::DuplicatePoint(point));
            }
            points.push(point);
        }
        Ok(Self(points))
    }

    /// Build a pattern from points in visit order. Revisits are dropped, so
    /// each point keeps the position of its first visit.
    #[must_use]
    pub fn from_visits(visits: impl IntoIterator<Item = TouchPoint>) -> Self {
        let mut points = Vec::with_capacity(TOUCH_POINT_COUNT);
        for point in visits {
            if !points.contains(&point) {
                points.push(point);
            }
        }
        Self(points)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn points(&self) -> &[TouchPoint] {
        &self.0
    }

    pub fn ordinals(&self) -> impl ExactSizeIterator<Item = u8> + '_ {
        self.0.iter().map(|point| point.ordinal())
    }

    #[must_use]
    pub fn to_ordinals(&self) -> Vec<u8> {
        self.ordinals().collect()
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pattern")
            .field("len", &self.0.len())
            .finish_non_exhaustive()
    }
}

impl Zeroize for Pattern {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

impl Drop for Pattern {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl ZeroizeOnDrop for Pattern {}
