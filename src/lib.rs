//! # pingate
//!
//! Client for a per-identifier PIN gate. An identifier (usually the last
//! segment of a link sent to the user) is checked against the backend:
//!
//! 1. `GET /api/v1/auth/check-pin-status/{identifier}` decides between PIN
//!    creation and PIN entry.
//! 2. PIN entry collects four digits and posts them once to
//!    `POST /api/v1/auth/login`; the response may set a session cookie.
//! 3. A 2xx response routes to `/events/{identifier}`, a rejection clears the
//!    digits and waits for a new code, transport failures route to `/error`.
//!
//! There is no lockout and no retry: each full buffer is one request.
//!
//! The [`gate`] module holds the state machine and its collaborators; the
//! [`cli`] module wires it to a terminal.

pub mod cli;
pub mod gate;
