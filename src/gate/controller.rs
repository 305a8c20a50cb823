//! Gate state machine.
//!
//! The controller does no I/O. It consumes [`GateEvent`]s and returns the
//! [`Effect`]s the caller has to perform: resolve a PIN status, submit a
//! code, or navigate. Results come back as further events. This keeps the
//! routing policy testable and makes the re-entrancy and cancellation rules
//! explicit:
//!
//! - key presses while a verification is pending are dropped, so a full
//!   buffer is submitted once;
//! - every submission carries a [`Ticket`]; outcomes for any other ticket,
//!   or arriving after the gate was left, are ignored.

use super::{
    buffer::{Key, PinBuffer},
    error::{GateError, Rejection, StatusResolutionError},
    identifier::Identifier,
    resolver::PinStatus,
    route::Route,
    verifier::VerificationOutcome,
};
use secrecy::SecretString;
use tracing::{debug, error, info, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateState {
    Resolving,
    CreatingPin,
    AwaitingCode,
    Verifying,
    Authenticated,
    ErrorSurface,
    /// The caller left the gate; nothing else is processed.
    Closed,
}

impl GateState {
    /// No further input changes the state.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::CreatingPin | Self::Authenticated | Self::ErrorSurface | Self::Closed
        )
    }
}

/// Identifies one verification submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

#[derive(Clone, Debug)]
pub enum GateEvent {
    StatusResolved(Result<PinStatus, StatusResolutionError>),
    Key(Key),
    Verified {
        ticket: Ticket,
        outcome: VerificationOutcome,
    },
}

#[derive(Clone, Debug)]
pub enum Effect {
    ResolveStatus(Identifier),
    Verify {
        ticket: Ticket,
        identifier: Identifier,
        code: SecretString,
    },
    Navigate(Route),
}

#[derive(Debug)]
pub struct GateController {
    state: GateState,
    identifier: Option<Identifier>,
    buffer: PinBuffer,
    pending: Option<Ticket>,
    next_ticket: u64,
    failed_attempts: u32,
    last_rejection: Option<Rejection>,
    error: Option<GateError>,
}

impl Default for GateController {
    fn default() -> Self {
        Self::new()
    }
}

impl GateController {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: GateState::Resolving,
            identifier: None,
            buffer: PinBuffer::new(),
            pending: None,
            next_ticket: 0,
            failed_attempts: 0,
            last_rejection: None,
            error: None,
        }
    }

    #[must_use]
    pub fn state(&self) -> GateState {
        self.state
    }

    #[must_use]
    pub fn identifier(&self) -> Option<&Identifier> {
        self.identifier.as_ref()
    }

    #[must_use]
    pub fn buffer(&self) -> &PinBuffer {
        &self.buffer
    }

    /// Rejected submissions so far. Reporting only; there is no lockout.
    #[must_use]
    pub fn failed_attempts(&self) -> u32 {
        self.failed_attempts
    }

    /// Why the most recent submission was turned down, cleared by the next key.
    #[must_use]
    pub fn last_rejection(&self) -> Option<Rejection> {
        self.last_rejection
    }

    /// The failure that put the gate on the error surface.
    #[must_use]
    pub fn error(&self) -> Option<&GateError> {
        self.error.as_ref()
    }

    /// Starts the gate. An absent identifier fails immediately without any
    /// network effect. Only the first call has an effect.
    pub fn enter(&mut self, raw_identifier: Option<&str>) -> Vec<Effect> {
        if self.state != GateState::Resolving || self.identifier.is_some() {
            warn!(state = ?self.state, "Gate already entered");
            return Vec::new();
        }

        match Identifier::parse(raw_identifier) {
            Some(identifier) => {
                debug!(identifier = %identifier.masked(), "Resolving PIN status");
                self.identifier = Some(identifier.clone());
                vec![Effect::ResolveStatus(identifier)]
            }
            None => {
                error!("Identifier is missing, redirecting to error page");
                self.fail(GateError::MissingIdentifier)
            }
        }
    }

    pub fn handle(&mut self, event: GateEvent) -> Vec<Effect> {
        match event {
            GateEvent::StatusResolved(result) => self.on_status(result),
            GateEvent::Key(key) => self.on_key(key),
            GateEvent::Verified { ticket, outcome } => self.on_verified(ticket, outcome),
        }
    }

    /// Leaves the gate: the buffer is discarded and any pending verification
    /// outcome will be ignored.
    pub fn leave(&mut self) {
        if self.pending.take().is_some() {
            info!("Leaving gate with a verification in flight");
        }
        self.buffer.reset();
        self.state = GateState::Closed;
    }

    fn on_status(&mut self, result: Result<PinStatus, StatusResolutionError>) -> Vec<Effect> {
        if self.state != GateState::Resolving {
            debug!(state = ?self.state, "Ignoring PIN status outside of resolution");
            return Vec::new();
        }
        let Some(identifier) = self.identifier.clone() else {
            return Vec::new();
        };

        match result {
            Ok(PinStatus::Set) => {
                self.state = GateState::AwaitingCode;
                self.buffer.reset();
                vec![Effect::Navigate(Route::EnterPin(identifier))]
            }
            Ok(PinStatus::Unset) => {
                self.state = GateState::CreatingPin;
                vec![Effect::Navigate(Route::CreatePin(identifier))]
            }
            Err(err) => {
                error!("Error fetching PIN status: {}", err);
                self.fail(GateError::StatusResolution(err))
            }
        }
    }

    fn on_key(&mut self, key: Key) -> Vec<Effect> {
        match self.state {
            GateState::AwaitingCode => {}
            GateState::Verifying => {
                debug!("Ignoring key while verification is pending");
                return Vec::new();
            }
            state => {
                debug!(?state, "Ignoring key outside of PIN entry");
                return Vec::new();
            }
        }

        self.last_rejection = None;

        match key {
            Key::RemoveLast => {
                self.buffer.remove_last();
                Vec::new()
            }
            Key::Digit(digit) => {
                self.buffer.append_digit(digit);
                self.submit()
            }
        }
    }

    fn submit(&mut self) -> Vec<Effect> {
        let (Some(code), Some(identifier)) = (self.buffer.code(), self.identifier.clone()) else {
            return Vec::new();
        };

        let ticket = Ticket(self.next_ticket);
        self.next_ticket += 1;
        self.pending = Some(ticket);
        self.state = GateState::Verifying;

        vec![Effect::Verify {
            ticket,
            identifier,
            code,
        }]
    }

    fn on_verified(&mut self, ticket: Ticket, outcome: VerificationOutcome) -> Vec<Effect> {
        if self.state != GateState::Verifying || self.pending != Some(ticket) {
            debug!(?ticket, state = ?self.state, "Discarding stale verification outcome");
            return Vec::new();
        }
        self.pending = None;

        match outcome {
            VerificationOutcome::Success { redirect } => {
                self.buffer.reset();
                self.state = GateState::Authenticated;
                vec![Effect::Navigate(redirect)]
            }
            VerificationOutcome::InvalidPin(rejection) => {
                self.failed_attempts = self.failed_attempts.saturating_add(1);
                self.last_rejection = Some(rejection);
                self.buffer.reset();
                self.state = GateState::AwaitingCode;
                info!(
                    failed_attempts = self.failed_attempts,
                    "PIN rejected, waiting for a new code"
                );
                Vec::new()
            }
            VerificationOutcome::TransportError(err) => {
                self.buffer.reset();
                self.fail(GateError::VerificationTransport(err))
            }
        }
    }

    fn fail(&mut self, err: GateError) -> Vec<Effect> {
        self.state = GateState::ErrorSurface;
        self.error = Some(err);
        vec![Effect::Navigate(Route::Error)]
    }
}
