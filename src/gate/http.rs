//! HTTP capability injected into the gate services. The gate only needs two
//! calls: an uncached JSON read and a credential-bearing JSON post. Both
//! return the raw status and body so callers classify responses themselves.
//! Request bodies may carry the PIN and must never be logged.

use super::error::HttpError;
use reqwest::{
    header::{CACHE_CONTROL, PRAGMA},
    redirect::Policy,
    Client,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::{future::Future, time::Duration};
use tracing::{debug, instrument, trace, warn};
use url::Url;

pub static APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
/// Maximum number of body characters kept for diagnostics.
const MAX_BODY_CHARS: usize = 200;

/// Status and body of a completed request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// # Errors
    /// Returns an error if the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }

    /// Trimmed and truncated body for log lines.
    #[must_use]
    pub fn sanitized_body(&self) -> String {
        let trimmed = self.body.trim();
        if trimmed.is_empty() {
            "<empty>".to_string()
        } else {
            trimmed.chars().take(MAX_BODY_CHARS).collect()
        }
    }
}

/// Sends requests on behalf of the gate.
pub trait HttpClient {
    /// `GET` bypassing any cache between the gate and the backend.
    fn get_no_store(
        &self,
        url: &Url,
    ) -> impl Future<Output = Result<HttpResponse, HttpError>> + Send;

    /// `POST` a JSON body with session credentials (cookies) attached, so a
    /// successful response can establish a session.
    fn post_json_with_credentials(
        &self,
        url: &Url,
        body: &Value,
    ) -> impl Future<Output = Result<HttpResponse, HttpError>> + Send;
}

/// [`HttpClient`] backed by `reqwest` with a per-client cookie store.
#[derive(Clone, Debug)]
pub struct ReqwestClient {
    client: Client,
}

impl ReqwestClient {
    /// Redirects are not followed: the gate classifies the status of the
    /// endpoint it called, never the status of a redirect target.
    ///
    /// # Errors
    /// Returns an error if the TLS backend or client cannot be initialized.
    pub fn new(timeout: Duration) -> Result<Self, HttpError> {
        let client = Client::builder()
            .user_agent(APP_USER_AGENT)
            .cookie_store(true)
            .redirect(Policy::none())
            .timeout(timeout)
            .build()
            .map_err(|err| HttpError::Request(err.to_string()))?;

        Ok(Self { client })
    }
}

impl HttpClient for ReqwestClient {
    #[instrument(skip(self, url), fields(host = url.host_str().unwrap_or_default()))]
    async fn get_no_store(&self, url: &Url) -> Result<HttpResponse, HttpError> {
        trace!(%url, "GET");
        let response = self
            .client
            .get(url.clone())
            .header(CACHE_CONTROL, "no-store")
            .header(PRAGMA, "no-cache")
            .send()
            .await
            .map_err(map_request_error)?;

        read_response(response).await
    }

    #[instrument(skip(self, url, body), fields(host = url.host_str().unwrap_or_default()))]
    async fn post_json_with_credentials(
        &self,
        url: &Url,
        body: &Value,
    ) -> Result<HttpResponse, HttpError> {
        trace!(%url, "POST");
        let response = self
            .client
            .post(url.clone())
            .json(body)
            .send()
            .await
            .map_err(map_request_error)?;

        read_status(response).await
    }
}

async fn read_response(response: reqwest::Response) -> Result<HttpResponse, HttpError> {
    let status = response.status().as_u16();
    let body = response.text().await.map_err(map_request_error)?;

    debug!(status, "response received");

    Ok(HttpResponse { status, body })
}

/// Keeps the status when the body cannot be read. The status alone decides a
/// login, and by then the server may already have set the session cookie.
async fn read_status(response: reqwest::Response) -> Result<HttpResponse, HttpError> {
    let status = response.status().as_u16();
    let body = match response.text().await {
        Ok(body) => body,
        Err(err) => {
            warn!(status, "Ignoring unreadable response body: {}", err);
            String::new()
        }
    };

    debug!(status, "response received");

    Ok(HttpResponse { status, body })
}

/// Maps reqwest errors into transport variants with timeout detection.
fn map_request_error(err: reqwest::Error) -> HttpError {
    if err.is_timeout() {
        HttpError::Timeout
    } else if err.is_builder() {
        HttpError::Request(err.to_string())
    } else {
        HttpError::Network(err.to_string())
    }
}
