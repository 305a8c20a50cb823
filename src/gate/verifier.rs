use super::{
    backend::Backend,
    error::{HttpError, Rejection},
    http::HttpClient,
    identifier::Identifier,
    route::Route,
};
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::{info, instrument, warn};

/// Result of one verification attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VerificationOutcome {
    Success { redirect: Route },
    InvalidPin(Rejection),
    TransportError(HttpError),
}

/// Submits `{identifier, pin}` to the login endpoint.
pub struct SessionVerifier<'a, C> {
    client: &'a C,
    backend: &'a Backend,
}

impl<'a, C: HttpClient> SessionVerifier<'a, C> {
    #[must_use]
    pub fn new(client: &'a C, backend: &'a Backend) -> Self {
        Self { client, backend }
    }

    /// Sends exactly one login request; there is no retry. Any non-success
    /// status is a rejection, never a success.
    #[instrument(skip(self, identifier, code), fields(identifier = %identifier.masked()))]
    pub async fn verify(&self, identifier: &Identifier, code: &SecretString) -> VerificationOutcome {
        let url = self.backend.login_url();
        let body = json!({
            "identifier": identifier.as_str(),
            "pin": code.expose_secret(),
        });

        match self.client.post_json_with_credentials(&url, &body).await {
            Ok(response) if response.is_success() => {
                info!(status = response.status, "PIN accepted");
                VerificationOutcome::Success {
                    redirect: Route::Events(identifier.clone()),
                }
            }
            Ok(response) => {
                let rejection = Rejection::from_status(response.status);
                warn!(
                    status = response.status,
                    body = %response.sanitized_body(),
                    "Login failed"
                );
                VerificationOutcome::InvalidPin(rejection)
            }
            Err(err) => {
                warn!("Error verifying PIN: {}", err);
                VerificationOutcome::TransportError(err)
            }
        }
    }
}
