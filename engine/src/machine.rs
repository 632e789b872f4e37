//! Capture state machine.
//!
//! ```text
//!                 complete_capture
//!   Capture ───────────────────────────┬──────────────────────────┐
//!      ▲                               ▼                          ▼
//!      │   reset elapsed      FeedbackPositive            FeedbackInvalid
//!      └───────────────────────────────┴──────────────────────────┘
//!
//!   Enroll confirmation success: FeedbackPositive, input locked, no reset.
//! ```
//!
//! The machine is synchronous. Work that has to happen elsewhere (reporting,
//! haptics, timers, asynchronous validation) is returned as [`Effect`]s for
//! the owning session to carry out.

use std::time::Duration;

use lattice_config::CaptureParameters;
use lattice_types::{CaptureResult, CaptureState, CaptureStatus, Mode, Pattern};

use crate::pending::PendingSlot;
use crate::validator::Validator;

/// Whether the capture surface accepts pointer input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputGate {
    #[default]
    Open,
    /// Feedback is showing or a validation is in flight.
    Suspended,
    /// Enrollment finished; input never re-opens.
    Locked,
}

/// Side effect requested by the state machine.
#[derive(Debug)]
pub enum Effect {
    Report(CaptureResult),
    Haptic(Duration),
    /// Start the one-shot reset timer. Only the latest generation counts.
    ScheduleReset { generation: u64, delay: Duration },
    /// Run the host validator and feed the answer to `finish_validation`.
    Validate { ticket: u64, pattern: Pattern },
}

#[derive(Debug)]
pub struct PatternEngine {
    mode: Mode,
    params: CaptureParameters,
    state: CaptureState,
    gate: InputGate,
    pending: PendingSlot,
    mismatches: u32,
    generation: u64,
    next_ticket: u64,
    in_flight: Option<u64>,
}

impl PatternEngine {
    #[must_use]
    pub fn new(mode: Mode, params: CaptureParameters) -> Self {
        Self {
            mode,
            params,
            state: CaptureState::Capture,
            gate: InputGate::Open,
            pending: PendingSlot::default(),
            mismatches: 0,
            generation: 0,
            next_ticket: 0,
            in_flight: None,
        }
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn state(&self) -> CaptureState {
        self.state
    }

    #[must_use]
    pub fn gate(&self) -> InputGate {
        self.gate
    }

    #[must_use]
    pub fn accepts_input(&self) -> bool {
        self.gate == InputGate::Open
    }

    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending.is_set()
    }

    #[must_use]
    pub fn is_validating(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Process a finished gesture. Empty patterns are ignored.
    pub fn complete_capture(&mut self, pattern: Pattern, validator: &dyn Validator) -> Vec<Effect> {
        if pattern.is_empty() {
            tracing::debug!("Ignoring empty gesture");
            return Vec::new();
        }
        if !self.accepts_input() {
            tracing::debug!(gate = ?self.gate, "Ignoring gesture while input is closed");
            return Vec::new();
        }

        match self.mode {
            Mode::Authenticate => self.begin_validation(pattern),
            Mode::Enroll if self.pending.is_set() => self.confirm_enrollment(&pattern, validator),
            Mode::Enroll => self.first_enrollment(&pattern, validator),
        }
    }

    /// Apply the answer for validation `ticket`. Stale tickets are ignored.
    pub fn finish_validation(&mut self, ticket: u64, valid: bool) -> Vec<Effect> {
        if self.in_flight != Some(ticket) {
            tracing::debug!(ticket, "Discarding stale validation result");
            return Vec::new();
        }
        self.in_flight = None;

        if valid {
            tracing::info!("Pattern verified");
            self.state = CaptureState::FeedbackPositive;
            let mut effects = vec![self.report(CaptureStatus::Verified)];
            effects.push(self.schedule_reset());
            effects
        } else {
            tracing::info!("Pattern not verified");
            self.reject(CaptureStatus::NotVerified)
        }
    }

    /// Timer for `generation` fired. Returns true when the trace should be cleared.
    pub fn reset_elapsed(&mut self, generation: u64) -> bool {
        if generation != self.generation || self.gate != InputGate::Suspended {
            return false;
        }
        if self.in_flight.is_some() {
            return false;
        }
        self.gate = InputGate::Open;
        self.state = CaptureState::Capture;
        true
    }

    /// Wipe the pending pattern and invalidate outstanding timers and validations.
    pub fn teardown(&mut self) {
        self.pending.wipe();
        self.mismatches = 0;
        self.in_flight = None;
        self.generation = self.generation.wrapping_add(1);
    }

    fn begin_validation(&mut self, pattern: Pattern) -> Vec<Effect> {
        let ticket = self.next_ticket;
        self.next_ticket = self.next_ticket.wrapping_add(1);
        self.in_flight = Some(ticket);
        self.gate = InputGate::Suspended;
        tracing::debug!(ticket, points = pattern.len(), "Validating pattern");
        vec![Effect::Validate { ticket, pattern }]
    }

    fn first_enrollment(&mut self, pattern: &Pattern, validator: &dyn Validator) -> Vec<Effect> {
        if let Some(status) = validator.check_shape(pattern).rejection() {
            tracing::info!(%status, points = pattern.len(), "Enrollment pattern rejected");
            return self.reject(status);
        }

        self.pending.hold(pattern);
        self.mismatches = 0;
        self.state = CaptureState::FeedbackPositive;
        tracing::info!("First enrollment pattern accepted; awaiting confirmation");
        let mut effects = vec![self.report(CaptureStatus::FirstEnrollmentComplete)];
        effects.push(self.schedule_reset());
        effects
    }

    fn confirm_enrollment(&mut self, pattern: &Pattern, validator: &dyn Validator) -> Vec<Effect> {
        if self.pending.matches(pattern) {
            self.pending.wipe();
            self.mismatches = 0;
            validator.store(pattern);
            self.gate = InputGate::Locked;
            self.state = CaptureState::FeedbackPositive;
            tracing::info!("Enrollment confirmed");
            return Vec::new();
        }

        self.mismatches = self.mismatches.saturating_add(1);
        if let Some(limit) = self.params.max_confirmation_attempts
            && self.mismatches >= limit.get()
        {
            tracing::info!(
                attempts = self.mismatches,
                "Confirmation attempts exhausted; restarting enrollment"
            );
            self.pending.wipe();
            self.mismatches = 0;
        }
        self.reject(CaptureStatus::ConfirmationMismatch)
    }

    fn reject(&mut self, status: CaptureStatus) -> Vec<Effect> {
        self.state = CaptureState::FeedbackInvalid;
        let mut effects = Vec::with_capacity(3);
        if self.params.vibrate_on_invalid {
            effects.push(Effect::Haptic(self.params.invalid_vibrate));
        }
        effects.push(self.report(status));
        effects.push(self.schedule_reset());
        effects
    }

    fn report(&self, status: CaptureStatus) -> Effect {
        Effect::Report(CaptureResult::new(self.mode, status))
    }

    fn schedule_reset(&mut self) -> Effect {
        self.gate = InputGate::Suspended;
        self.generation = self.generation.wrapping_add(1);
        Effect::ScheduleReset {
            generation: self.generation,
            delay: self.params.delay_between_capture,
        }
    }

    #[cfg(test)]
    pub(crate) fn pending_slot(&self) -> &PendingSlot {
        &self.pending
    }
}
