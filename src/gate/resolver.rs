use super::{
    backend::Backend,
    error::StatusResolutionError,
    http::HttpClient,
    identifier::Identifier,
};
use serde::Deserialize;
use tracing::{error, instrument};

/// Whether a PIN has been provisioned for an identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PinStatus {
    Unset,
    Set,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PinStatusResponse {
    is_pin_set: bool,
}

/// Looks up the PIN status of an identifier, once per gate entry.
pub struct PinStatusResolver<'a, C> {
    client: &'a C,
    backend: &'a Backend,
}

impl<'a, C: HttpClient> PinStatusResolver<'a, C> {
    #[must_use]
    pub fn new(client: &'a C, backend: &'a Backend) -> Self {
        Self { client, backend }
    }

    /// Issues a single uncached status read. Never guesses a status on failure.
    ///
    /// # Errors
    /// Returns an error on transport failure, a non-success status, or a body
    /// that is not `{ "isPinSet": bool }`.
    #[instrument(skip(self, identifier), fields(identifier = %identifier.masked()))]
    pub async fn resolve(&self, identifier: &Identifier) -> Result<PinStatus, StatusResolutionError> {
        let url = self.backend.pin_status_url(identifier);
        let response = self.client.get_no_store(&url).await?;

        if !response.is_success() {
            error!(
                status = response.status,
                body = %response.sanitized_body(),
                "Failed to fetch PIN status"
            );
            return Err(StatusResolutionError::UnexpectedStatus {
                status: response.status,
            });
        }

        let payload: PinStatusResponse = response
            .json()
            .map_err(|err| StatusResolutionError::MalformedResponse(err.to_string()))?;

        Ok(if payload.is_pin_set {
            PinStatus::Set
        } else {
            PinStatus::Unset
        })
    }
}
