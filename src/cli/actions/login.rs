use crate::gate::{Backend, Gate, GateState, HttpClient, Key, Navigator, ReqwestClient, Route};
use anyhow::{anyhow, bail, Context, Result};
use secrecy::{ExposeSecret, SecretString};
use std::{future::Future, time::Duration};
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

#[derive(Debug)]
pub struct Args {
    pub identifier: Option<String>,
    pub backend: Backend,
    pub timeout: Duration,
    pub pin: Option<SecretString>,
}

/// Prints each route on its own line to stdout.
#[derive(Debug, Default)]
pub struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn navigate(&self, route: &Route) {
        println!("{route}");
    }
}

/// Run the gate against the configured backend.
/// # Errors
/// Returns an error if the gate lands on the error page, the user interrupts,
/// or input ends before a PIN is accepted.
pub async fn execute(args: Args) -> Result<()> {
    info!(backend = %args.backend.base_url(), "Starting PIN gate");

    let client = ReqwestClient::new(args.timeout).context("failed to build HTTP client")?;
    let mut gate = Gate::new(client, args.backend, TerminalNavigator);
    let interrupt = tokio::signal::ctrl_c();

    let state = if let Some(pin) = &args.pin {
        drive(
            &mut gate,
            args.identifier.as_deref(),
            pin.expose_secret().as_bytes(),
            interrupt,
        )
        .await?
    } else {
        drive(
            &mut gate,
            args.identifier.as_deref(),
            BufReader::new(io::stdin()),
            interrupt,
        )
        .await?
    };

    debug!(?state, "Gate finished");
    Ok(())
}

/// Feed keys from `input` into the gate until it settles.
///
/// Each line is split into keys; `-` or `<` removes the last digit. Keys left
/// on a line after a submission are dropped, like key presses during an
/// in-flight verification. `interrupt` completing leaves the gate.
pub async fn drive<C, N, R, I>(
    gate: &mut Gate<C, N>,
    identifier: Option<&str>,
    input: R,
    interrupt: I,
) -> Result<GateState>
where
    C: HttpClient,
    N: Navigator,
    R: AsyncBufRead + Unpin,
    I: Future,
{
    tokio::pin!(interrupt);

    let entered = tokio::select! {
        state = gate.enter(identifier) => Some(state),
        _ = &mut interrupt => None,
    };
    let Some(state) = entered else {
        gate.leave();
        bail!("interrupted");
    };

    match state {
        GateState::AwaitingCode => eprintln!("Enter your {}-digit PIN", crate::gate::PIN_LENGTH),
        GateState::ErrorSurface => return Err(failure(gate)),
        _ => return Ok(state),
    }

    let mut lines = input.lines();
    loop {
        let next = tokio::select! {
            line = lines.next_line() => Some(line),
            _ = &mut interrupt => None,
        };
        let Some(line) = next else {
            gate.leave();
            bail!("interrupted");
        };
        let Some(line) = line.context("failed to read keys")? else {
            gate.leave();
            bail!("input closed before a PIN was accepted");
        };

        for value in line.chars().filter(|value| !value.is_whitespace()) {
            let key = match Key::try_from(value) {
                Ok(key) => key,
                Err(err) => {
                    warn!("{err}");
                    eprintln!("{err}");
                    continue;
                }
            };

            let failed_before = gate.controller().failed_attempts();
            let pressed = tokio::select! {
                state = gate.press(key) => Some(state),
                _ = &mut interrupt => None,
            };
            let Some(state) = pressed else {
                gate.leave();
                bail!("interrupted");
            };

            match state {
                GateState::AwaitingCode if gate.controller().failed_attempts() > failed_before => {
                    if let Some(rejection) = gate.controller().last_rejection() {
                        eprintln!("{rejection}, try again");
                    }
                    break;
                }
                GateState::AwaitingCode => eprintln!("PIN {}", gate.controller().buffer().mask()),
                GateState::ErrorSurface => return Err(failure(gate)),
                _ => return Ok(state),
            }
        }
    }
}

fn failure<C: HttpClient, N: Navigator>(gate: &Gate<C, N>) -> anyhow::Error {
    gate.controller()
        .error()
        .map_or_else(|| anyhow!("authentication failed"), |err| anyhow::Error::new(err.clone()))
}
