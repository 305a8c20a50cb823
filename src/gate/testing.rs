//! Scripted [`HttpClient`] for unit tests.

use super::error::HttpError;
use super::http::{HttpClient, HttpResponse};
use serde_json::Value;
use std::collections::VecDeque;
use std::future::{ready, Future};
use std::sync::Mutex;
use url::Url;

#[derive(Clone, Debug, PartialEq)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub url: Url,
    pub body: Option<Value>,
}

type Scripted = Mutex<VecDeque<Result<HttpResponse, HttpError>>>;

/// Answers status reads and login posts from two independent queues and
/// records every request. An exhausted queue answers with a network error.
#[derive(Debug, Default)]
pub struct FakeClient {
    status: Scripted,
    login: Scripted,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl FakeClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(self, status: u16, body: &str) -> Self {
        push(&self.status, Ok(HttpResponse::new(status, body)));
        self
    }

    pub fn with_status_error(self, err: HttpError) -> Self {
        push(&self.status, Err(err));
        self
    }

    pub fn with_login(self, status: u16, body: &str) -> Self {
        push(&self.login, Ok(HttpResponse::new(status, body)));
        self
    }

    pub fn with_login_error(self, err: HttpError) -> Self {
        push(&self.login, Err(err));
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    pub fn logins(&self) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|request| request.method == "POST")
            .collect()
    }

    fn answer(
        &self,
        queue: &Scripted,
        request: RecordedRequest,
    ) -> Result<HttpResponse, HttpError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }
        queue
            .lock()
            .ok()
            .and_then(|mut queue| queue.pop_front())
            .unwrap_or_else(|| Err(HttpError::Network("no response scripted".to_string())))
    }
}

fn push(queue: &Scripted, response: Result<HttpResponse, HttpError>) {
    if let Ok(mut queue) = queue.lock() {
        queue.push_back(response);
    }
}

impl HttpClient for FakeClient {
    fn get_no_store(
        &self,
        url: &Url,
    ) -> impl Future<Output = Result<HttpResponse, HttpError>> + Send {
        let request = RecordedRequest {
            method: "GET",
            url: url.clone(),
            body: None,
        };
        ready(self.answer(&self.status, request))
    }

    fn post_json_with_credentials(
        &self,
        url: &Url,
        body: &Value,
    ) -> impl Future<Output = Result<HttpResponse, HttpError>> + Send {
        let request = RecordedRequest {
            method: "POST",
            url: url.clone(),
            body: Some(body.clone()),
        };
        ready(self.answer(&self.login, request))
    }
}
