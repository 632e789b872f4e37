//! Capabilities the engine consumes from its host.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::BoxFuture;
use thiserror::Error;
use tokio::sync::mpsc;

use lattice_types::{CaptureResult, Mode, Pattern, ShapeVerdict};

/// Credential backend for pattern capture.
///
/// Which methods a caller may use depends on the capture mode: `store` only
/// while enrolling, `validate` only while authenticating. `check_shape` is a
/// local structural check and must not consult any stored credential.
pub trait Validator: Send + Sync {
    /// Persist a confirmed pattern.
    fn store(&self, pattern: &Pattern);

    /// Compare a candidate against the stored credential.
    ///
    /// The future may take arbitrarily long; the engine applies no timeout.
    fn validate(&self, pattern: Pattern) -> BoxFuture<'static, bool>;

    fn check_shape(&self, pattern: &Pattern) -> ShapeVerdict;
}

#[derive(Debug, Error)]
pub enum HapticError {
    #[error("haptic feedback is unavailable")]
    Unavailable,
    #[error("haptic pulse failed: {0}")]
    Failed(String),
}

/// Best-effort vibration.
pub trait HapticFeedback: Send + Sync {
    fn pulse(&self, duration: Duration) -> Result<(), HapticError>;
}

/// Haptics for hosts without a vibration motor.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHaptics;

impl HapticFeedback for NoHaptics {
    fn pulse(&self, _duration: Duration) -> Result<(), HapticError> {
        Err(HapticError::Unavailable)
    }
}

/// Receives the outcome of each processed gesture.
pub trait ResultSink: Send + Sync {
    fn report(&self, result: CaptureResult);
}

impl ResultSink for mpsc::UnboundedSender<CaptureResult> {
    fn report(&self, result: CaptureResult) {
        if self.send(result).is_err() {
            tracing::debug!("Result receiver dropped; discarding {}", result.status);
        }
    }
}

/// Adapts a closure into a [`ResultSink`].
pub struct FnSink<F>(pub F);

impl<F> ResultSink for FnSink<F>
where
    F: Fn(CaptureResult) + Send + Sync,
{
    fn report(&self, result: CaptureResult) {
        (self.0)(result);
    }
}

/// Host validator restricted to the calls its capture mode allows.
///
/// Calling a method the mode forbids is a programming error and panics.
pub(crate) struct ModeGuard {
    mode: Mode,
    inner: Arc<dyn Validator>,
}

impl ModeGuard {
    pub(crate) fn new(mode: Mode, inner: Arc<dyn Validator>) -> Self {
        Self { mode, inner }
    }
}

impl Validator for ModeGuard {
    fn store(&self, pattern: &Pattern) {
        assert!(
            self.mode == Mode::Enroll,
            "store() is not permitted while authenticating"
        );
        self.inner.store(pattern);
    }

    fn validate(&self, pattern: Pattern) -> BoxFuture<'static, bool> {
        assert!(
            self.mode == Mode::Authenticate,
            "validate() is not permitted while enrolling"
        );
        self.inner.validate(pattern)
    }

    fn check_shape(&self, pattern: &Pattern) -> ShapeVerdict {
        self.inner.check_shape(pattern)
    }
}
