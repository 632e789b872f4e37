//! Capture engine for Lattice - state machine and session orchestration.
//!
//! [`PatternEngine`] decides what a finished gesture means for the current
//! mode. [`CaptureSession`] wraps it in a tokio task together with the grid and
//! gesture tracker, and carries out the engine's effects: reporting results,
//! haptic pulses, the delayed reset and asynchronous validation.

mod machine;
mod pending;
mod session;
mod validator;

pub use machine::{Effect, InputGate, PatternEngine};
pub use session::{CaptureRequest, CaptureSession, SessionError, SessionHandle, SessionSnapshot};
pub use validator::{FnSink, HapticError, HapticFeedback, NoHaptics, ResultSink, Validator};

pub use lattice_config::CaptureParameters;
pub use lattice_types::{CaptureResult, CaptureState, CaptureStatus, Mode, Pattern, PointerEvent};
