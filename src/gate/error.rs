use thiserror::Error;

/// Transport failures reported by an [`HttpClient`](super::http::HttpClient).
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum HttpError {
    #[error("request timed out")]
    Timeout,
    #[error("unable to reach the server: {0}")]
    Network(String),
    #[error("failed to build request: {0}")]
    Request(String),
}

/// Input that cannot be mapped onto a keypad key.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    #[error("unsupported key {0:?}, only digits 0-9 are accepted")]
    Unsupported(char),
}

/// Why the PIN status of an identifier could not be determined.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum StatusResolutionError {
    #[error("pin status request failed: {0}")]
    Transport(#[from] HttpError),
    #[error("pin status request returned HTTP {status}")]
    UnexpectedStatus { status: u16 },
    #[error("malformed pin status response: {0}")]
    MalformedResponse(String),
}

/// How the backend turned down a verification attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejection {
    /// The credentials were evaluated and refused.
    Credentials { status: u16 },
    /// The backend failed while handling the request.
    Server { status: u16 },
    /// Any other non-success status.
    Unrecognized { status: u16 },
}

impl Rejection {
    #[must_use]
    pub fn from_status(status: u16) -> Self {
        match status {
            400 | 401 | 403 | 422 => Self::Credentials { status },
            500..=599 => Self::Server { status },
            _ => Self::Unrecognized { status },
        }
    }

    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            Self::Credentials { status } | Self::Server { status } | Self::Unrecognized { status } => {
                *status
            }
        }
    }
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Credentials { .. } => write!(formatter, "Incorrect PIN"),
            Self::Server { status } => {
                write!(formatter, "The server could not check the PIN ({status})")
            }
            Self::Unrecognized { status } => write!(formatter, "PIN not accepted ({status})"),
        }
    }
}

/// Failures the gate can land on.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GateError {
    #[error("no identifier was supplied")]
    MissingIdentifier,
    #[error(transparent)]
    StatusResolution(#[from] StatusResolutionError),
    #[error("pin rejected: {0}")]
    InvalidPin(Rejection),
    #[error("pin verification failed: {0}")]
    VerificationTransport(HttpError),
}
