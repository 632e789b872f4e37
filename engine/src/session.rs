//! Single-owner capture session.
//!
//! One tokio task owns the grid, the gesture tracker and the state machine.
//! Hosts talk to it through a [`SessionHandle`]; timers and validation futures
//! run in their own tasks and report back through the same command queue, so
//! every state change happens on the session task.

use std::fmt;
use std::future::Future;
use std::ops::ControlFlow;
use std::sync::Arc;

use futures_util::future::{AbortHandle, Abortable};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

use lattice_config::CaptureParameters;
use lattice_core::{GestureStep, GestureTracker, TouchGrid};
use lattice_types::{CaptureState, Mode, PointerEvent, TouchPoint};

use crate::machine::{Effect, InputGate, PatternEngine};
use crate::validator::{HapticFeedback, ModeGuard, NoHaptics, ResultSink, Validator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("capture session has shut down")]
    Closed,
}

/// Everything a capture needs from its host.
pub struct CaptureRequest {
    pub mode: Mode,
    pub sink: Arc<dyn ResultSink>,
    pub parameters: CaptureParameters,
    pub validator: Arc<dyn Validator>,
    pub haptics: Arc<dyn HapticFeedback>,
}

impl CaptureRequest {
    /// A request with default parameters and no haptics.
    #[must_use]
    pub fn new(mode: Mode, sink: Arc<dyn ResultSink>, validator: Arc<dyn Validator>) -> Self {
        Self {
            mode,
            sink,
            parameters: CaptureParameters::default(),
            validator,
            haptics: Arc::new(NoHaptics),
        }
    }

    #[must_use]
    pub fn with_parameters(mut self, parameters: CaptureParameters) -> Self {
        self.parameters = parameters;
        self
    }

    #[must_use]
    pub fn with_haptics(mut self, haptics: Arc<dyn HapticFeedback>) -> Self {
        self.haptics = haptics;
        self
    }
}

impl fmt::Debug for CaptureRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaptureRequest")
            .field("mode", &self.mode)
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

/// Point-in-time view of a session, for hosts that render feedback.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    /// `None` until the first capture is started.
    pub mode: Option<Mode>,
    pub state: CaptureState,
    pub gate: InputGate,
    pub has_pending: bool,
    pub validating: bool,
    pub trace: Vec<TouchPoint>,
    /// Last recorded point and the pointer position while dragging.
    pub rubber_band: Option<(TouchPoint, (f32, f32))>,
}

#[derive(Debug)]
enum Command {
    Start(Box<CaptureRequest>),
    Pointer(PointerEvent),
    Resize { width: u32, height: u32 },
    /// Loopback messages carry the epoch of the capture that sent them.
    ValidationFinished { epoch: u64, ticket: u64, valid: bool },
    ResetElapsed { epoch: u64, generation: u64 },
    Snapshot(oneshot::Sender<SessionSnapshot>),
    Shutdown(oneshot::Sender<()>),
}

/// Cloneable sender side of a capture session.
///
/// The session tears itself down once every handle is dropped.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    commands: mpsc::UnboundedSender<Command>,
}

impl SessionHandle {
    /// Begin a fresh capture, discarding any previous one.
    pub fn start_capture(&self, request: CaptureRequest) -> Result<(), SessionError> {
        self.send(Command::Start(Box::new(request)))
    }

    pub fn pointer(&self, event: PointerEvent) -> Result<(), SessionError> {
        self.send(Command::Pointer(event))
    }

    pub fn resize(&self, width: u32, height: u32) -> Result<(), SessionError> {
        self.send(Command::Resize { width, height })
    }

    /// Resolves once every command sent before it has been processed.
    pub async fn snapshot(&self) -> Result<SessionSnapshot, SessionError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Snapshot(tx))?;
        rx.await.map_err(|_| SessionError::Closed)
    }

    /// Stop the session: cancels timers and validations and wipes the pending pattern.
    pub async fn shutdown(&self) -> Result<(), SessionError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Shutdown(tx))?;
        rx.await.map_err(|_| SessionError::Closed)
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }

    fn send(&self, command: Command) -> Result<(), SessionError> {
        self.commands
            .send(command)
            .map_err(|_| SessionError::Closed)
    }
}

/// The capture currently being driven, with its outstanding tasks.
struct ActiveCapture {
    epoch: u64,
    engine: PatternEngine,
    validator: ModeGuard,
    sink: Arc<dyn ResultSink>,
    haptics: Arc<dyn HapticFeedback>,
    reset_task: Option<(u64, AbortHandle)>,
    validation_task: Option<(u64, AbortHandle)>,
}

impl ActiveCapture {
    fn new(epoch: u64, request: CaptureRequest) -> Self {
        let CaptureRequest {
            mode,
            sink,
            parameters,
            validator,
            haptics,
        } = request;
        Self {
            epoch,
            engine: PatternEngine::new(mode, parameters),
            validator: ModeGuard::new(mode, validator),
            sink,
            haptics,
            reset_task: None,
            validation_task: None,
        }
    }

    fn apply(&mut self, effects: Vec<Effect>, loopback: &mpsc::WeakUnboundedSender<Command>) {
        let epoch = self.epoch;
        for effect in effects {
            match effect {
                Effect::Report(result) => self.sink.report(result),
                Effect::Haptic(duration) => {
                    if let Err(err) = self.haptics.pulse(duration) {
                        tracing::debug!("Haptic pulse skipped: {err}");
                    }
                }
                Effect::ScheduleReset { generation, delay } => {
                    if let Some((_, previous)) = self.reset_task.take() {
                        previous.abort();
                    }
                    let loopback = loopback.clone();
                    let handle = spawn_abortable(async move {
                        tokio::time::sleep(delay).await;
                        send_loopback(&loopback, Command::ResetElapsed { epoch, generation });
                    });
                    self.reset_task = Some((generation, handle));
                }
                Effect::Validate { ticket, pattern } => {
                    let verdict = self.validator.validate(pattern);
                    let loopback = loopback.clone();
                    let handle = spawn_abortable(async move {
                        let valid = verdict.await;
                        send_loopback(
                            &loopback,
                            Command::ValidationFinished {
                                epoch,
                                ticket,
                                valid,
                            },
                        );
                    });
                    if let Some((_, previous)) = self.validation_task.replace((ticket, handle)) {
                        previous.abort();
                    }
                }
            }
        }
    }

    fn cancel_tasks(&mut self) {
        if let Some((_, handle)) = self.reset_task.take() {
            handle.abort();
        }
        if let Some((_, handle)) = self.validation_task.take() {
            handle.abort();
        }
    }
}

impl Drop for ActiveCapture {
    fn drop(&mut self) {
        self.cancel_tasks();
        self.engine.teardown();
    }
}

fn spawn_abortable<F>(task: F) -> AbortHandle
where
    F: Future<Output = ()> + Send + 'static,
{
    let (abort_handle, abort_registration) = AbortHandle::new_pair();
    tokio::spawn(async move {
        let _ = Abortable::new(task, abort_registration).await;
    });
    abort_handle
}

fn send_loopback(loopback: &mpsc::WeakUnboundedSender<Command>, command: Command) {
    // The session is gone once no strong sender remains.
    if let Some(sender) = loopback.upgrade() {
        let _ = sender.send(command);
    }
}

/// The active capture, if it is the one started at `epoch`.
fn current_capture(active: Option<&mut ActiveCapture>, epoch: u64) -> Option<&mut ActiveCapture> {
    let active = active.filter(|active| active.epoch == epoch);
    if active.is_none() {
        tracing::debug!(epoch, "Discarding message from a previous capture");
    }
    active
}

/// The session task state.
pub struct CaptureSession {
    grid: TouchGrid,
    gesture: GestureTracker,
    active: Option<ActiveCapture>,
    /// Bumped on every start so a new capture ignores its predecessor's tasks.
    epoch: u64,
    commands: mpsc::UnboundedReceiver<Command>,
    loopback: mpsc::WeakUnboundedSender<Command>,
}

impl CaptureSession {
    /// Spawn a session for a capture surface of `width` x `height`.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn spawn(width: u32, height: u32) -> SessionHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        let session = Self {
            grid: TouchGrid::new(width, height),
            gesture: GestureTracker::new(),
            active: None,
            epoch: 0,
            commands: rx,
            loopback: tx.downgrade(),
        };
        tokio::spawn(session.run());
        SessionHandle { commands: tx }
    }

    async fn run(mut self) {
        while let Some(command) = self.commands.recv().await {
            if self.handle(command).is_break() {
                return;
            }
        }
        self.teardown();
        tracing::debug!("All session handles dropped");
    }

    fn handle(&mut self, command: Command) -> ControlFlow<()> {
        match command {
            Command::Start(request) => self.start(*request),
            Command::Pointer(event) => self.pointer(event),
            Command::Resize { width, height } => {
                tracing::debug!(width, height, "Capture surface resized");
                self.grid.resize(width, height);
            }
            Command::ValidationFinished {
                epoch,
                ticket,
                valid,
            } => {
                let Some(active) = current_capture(self.active.as_mut(), epoch) else {
                    return ControlFlow::Continue(());
                };
                if active
                    .validation_task
                    .as_ref()
                    .is_some_and(|(current, _)| *current == ticket)
                {
                    active.validation_task = None;
                }
                let effects = active.engine.finish_validation(ticket, valid);
                active.apply(effects, &self.loopback);
            }
            Command::ResetElapsed { epoch, generation } => {
                let Some(active) = current_capture(self.active.as_mut(), epoch) else {
                    return ControlFlow::Continue(());
                };
                if active
                    .reset_task
                    .as_ref()
                    .is_some_and(|(current, _)| *current == generation)
                {
                    active.reset_task = None;
                }
                if active.engine.reset_elapsed(generation) {
                    self.gesture.reset();
                    tracing::debug!("Capture surface reset");
                }
            }
            Command::Snapshot(reply) => {
                let _ = reply.send(self.snapshot());
            }
            Command::Shutdown(done) => {
                self.teardown();
                tracing::debug!("Capture session shut down");
                let _ = done.send(());
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }

    fn start(&mut self, request: CaptureRequest) {
        self.teardown();
        self.epoch = self.epoch.wrapping_add(1);
        tracing::info!(mode = %request.mode, epoch = self.epoch, "Starting pattern capture");
        self.active = Some(ActiveCapture::new(self.epoch, request));
    }

    fn pointer(&mut self, event: PointerEvent) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        if !active.engine.accepts_input() {
            return;
        }
        if let GestureStep::Ended(pattern) = self.gesture.handle(&self.grid, event) {
            let effects = active.engine.complete_capture(pattern, &active.validator);
            active.apply(effects, &self.loopback);
        }
    }

    fn teardown(&mut self) {
        // Dropping the capture aborts its tasks and wipes the pending pattern.
        self.active = None;
        self.gesture.reset();
    }

    fn snapshot(&self) -> SessionSnapshot {
        let (mode, state, gate, has_pending, validating) = match &self.active {
            Some(active) => (
                Some(active.engine.mode()),
                active.engine.state(),
                active.engine.gate(),
                active.engine.has_pending(),
                active.engine.is_validating(),
            ),
            None => (None, CaptureState::Capture, InputGate::Locked, false, false),
        };
        SessionSnapshot {
            mode,
            state,
            gate,
            has_pending,
            validating,
            trace: self.gesture.trace().to_vec(),
            rubber_band: self.gesture.rubber_band(),
        }
    }
}
