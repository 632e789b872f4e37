//! Capture modes, feedback states and the results reported to hosts.

use std::fmt;

use serde::{Deserialize, Serialize};

/// What a capture session is collecting the pattern for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Collect a new pattern and have the user confirm it.
    Enroll,
    /// Check a pattern against the stored credential.
    Authenticate,
}

impl Mode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Mode::Enroll => "enroll",
            Mode::Authenticate => "authenticate",
        }
    }

    /// Parse a mode name, accepting a few common spellings.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "enroll" | "enrol" | "register" => Some(Mode::Enroll),
            "authenticate" | "auth" | "verify" => Some(Mode::Authenticate),
            _ => None,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Feedback state of the capture surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureState {
    #[default]
    Capture,
    FeedbackPositive,
    FeedbackInvalid,
}

/// Outcome reported to the result sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureStatus {
    FirstEnrollmentComplete,
    ConfirmationMismatch,
    Verified,
    NotVerified,
    TooShort,
    TooLong,
    WeakPattern,
}

impl CaptureStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            CaptureStatus::FirstEnrollmentComplete => "first_enrollment_complete",
            CaptureStatus::ConfirmationMismatch => "confirmation_mismatch",
            CaptureStatus::Verified => "verified",
            CaptureStatus::NotVerified => "not_verified",
            CaptureStatus::TooShort => "too_short",
            CaptureStatus::TooLong => "too_long",
            CaptureStatus::WeakPattern => "weak_pattern",
        }
    }
}

impl fmt::Display for CaptureStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureResult {
    pub mode: Mode,
    pub status: CaptureStatus,
}

impl CaptureResult {
    #[must_use]
    pub const fn new(mode: Mode, status: CaptureStatus) -> Self {
        Self { mode, status }
    }
}

/// Result of a local structural check on a candidate pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeVerdict {
    Ok,
    TooShort,
    TooLong,
    Weak,
}

impl ShapeVerdict {
    /// The status to report when the verdict rejects the pattern.
    #[must_use]
    pub const fn rejection(self) -> Option<CaptureStatus> {
        match self {
            ShapeVerdict::Ok => None,
            ShapeVerdict::TooShort => Some(CaptureStatus::TooShort),
            ShapeVerdict::TooLong => Some(CaptureStatus::TooLong),
            ShapeVerdict::Weak => Some(CaptureStatus::WeakPattern),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerAction {
    Down,
    Move,
    Up,
}

/// A raw pointer event in surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub action: PointerAction,
    pub x: f32,
    pub y: f32,
}

impl PointerEvent {
    #[must_use]
    pub const fn down(x: f32, y: f32) -> Self {
        Self {
            action: PointerAction::Down,
            x,
            y,
        }
    }

    #[must_use]
    pub const fn moved(x: f32, y: f32) -> Self {
        Self {
            action: PointerAction::Move,
            x,
            y,
        }
    }

    #[must_use]
    pub const fn up(x: f32, y: f32) -> Self {
        Self {
            action: PointerAction::Up,
            x,
            y,
        }
    }
}
