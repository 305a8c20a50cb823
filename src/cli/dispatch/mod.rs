use crate::{
    cli::{
        actions::{login::Args, Action},
        commands::{backend, ARG_IDENTIFIER, ARG_PIN},
    },
    gate::Backend,
};
use anyhow::{Context, Result};
use secrecy::SecretString;
use std::time::Duration;

/// # Errors
/// Returns an error if required arguments are missing or invalid.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let backend_url = matches
        .get_one::<String>(backend::ARG_BACKEND_URL)
        .context("missing required argument: --backend-url")?;
    let backend = Backend::parse(backend_url).context("invalid PINGATE_BACKEND_URL")?;

    let timeout = matches
        .get_one::<u64>(backend::ARG_TIMEOUT)
        .copied()
        .map_or(crate::gate::DEFAULT_TIMEOUT, Duration::from_secs);

    Ok(Action::Login(Args {
        identifier: matches.get_one::<String>(ARG_IDENTIFIER).cloned(),
        backend,
        timeout,
        pin: matches
            .get_one::<String>(ARG_PIN)
            .map(|pin| SecretString::from(pin.clone())),
    }))
}
