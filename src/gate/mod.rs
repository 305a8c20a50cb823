//! PIN authentication gate.
//!
//! Given an identifier, the gate asks the backend whether a PIN exists,
//! routes to PIN creation or PIN entry, collects four digits, submits them
//! once, and routes to the protected area, back to entry, or to the error
//! page. See [`controller`] for the state machine and [`Gate`] for the
//! async driver.

pub mod backend;
pub mod buffer;
pub mod controller;
pub mod driver;
pub mod error;
pub mod http;
pub mod identifier;
pub mod resolver;
pub mod route;
pub mod verifier;

#[cfg(test)]
pub(crate) mod testing;

pub use backend::Backend;
pub use buffer::{Digit, Key, PinBuffer, PIN_LENGTH};
pub use controller::{Effect, GateController, GateEvent, GateState, Ticket};
pub use driver::Gate;
pub use error::{GateError, HttpError, KeyError, Rejection, StatusResolutionError};
pub use http::{HttpClient, HttpResponse, ReqwestClient, APP_USER_AGENT, DEFAULT_TIMEOUT};
pub use identifier::Identifier;
pub use resolver::{PinStatus, PinStatusResolver};
pub use route::{Navigator, RecordingNavigator, Route};
pub use verifier::{SessionVerifier, VerificationOutcome};
