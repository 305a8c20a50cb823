use anyhow::{Context, Result};
use pingate::gate::{
    Backend, Gate, GateError, GateState, HttpClient, Identifier, Key,
    RecordingNavigator, Rejection, ReqwestClient, Route,
};
use serde_json::json;
use std::{net::TcpListener, time::Duration};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn can_bind_localhost() -> bool {
    TcpListener::bind("127.0.0.1:0").is_ok()
}

fn abc123() -> Result<Identifier> {
    Identifier::parse(Some("abc123")).context("identifier rejected")
}

async fn type_code(
    gate: &mut Gate<ReqwestClient, RecordingNavigator>,
    code: &str,
) -> Result<GateState> {
    let mut state = gate.state();
    for value in code.chars() {
        state = gate.press(Key::try_from(value)?).await;
    }
    Ok(state)
}

async fn mount_status(server: &MockServer, is_pin_set: bool) {
    Mock::given(method("GET"))
        .and(path("/api/v1/auth/check-pin-status/abc123"))
        .and(header("cache-control", "no-store"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "isPinSet": is_pin_set })))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn wrong_then_right_pin_establishes_session() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    mount_status(&server, true).await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .and(body_json(json!({ "identifier": "abc123", "pin": "1234" })))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "session=s3cr3t; Path=/; HttpOnly")
                .set_body_json(json!({ "ok": true })),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "error": "invalid pin" })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/events/abc123"))
        .and(header("cookie", "session=s3cr3t"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let backend = Backend::parse(&server.uri())?;
    let client = ReqwestClient::new(Duration::from_secs(5))?;
    let mut gate = Gate::new(client, backend.clone(), RecordingNavigator::new());

    assert_eq!(gate.enter(Some("abc123")).await, GateState::AwaitingCode);

    assert_eq!(type_code(&mut gate, "9999").await?, GateState::AwaitingCode);
    assert_eq!(
        gate.controller().last_rejection(),
        Some(Rejection::Credentials { status: 401 })
    );
    assert!(gate.controller().buffer().is_empty());

    assert_eq!(type_code(&mut gate, "1234").await?, GateState::Authenticated);
    assert_eq!(
        gate.navigator().routes(),
        vec![Route::EnterPin(abc123()?), Route::Events(abc123()?)]
    );

    let events = backend.base_url().join("api/v1/events/abc123")?;
    let response = gate.client().get_no_store(&events).await?;
    assert_eq!(response.status, 200);

    server.verify().await;
    Ok(())
}

#[tokio::test]
async fn unset_pin_routes_to_creation_without_login() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    mount_status(&server, false).await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let backend = Backend::parse(&server.uri())?;
    let mut gate = Gate::new(
        ReqwestClient::new(Duration::from_secs(5))?,
        backend,
        RecordingNavigator::new(),
    );

    assert_eq!(gate.enter(Some(" abc123 ")).await, GateState::CreatingPin);
    assert_eq!(gate.navigator().routes(), vec![Route::CreatePin(abc123()?)]);

    // Keys are ignored outside of PIN entry.
    assert_eq!(type_code(&mut gate, "1234").await?, GateState::CreatingPin);

    server.verify().await;
    Ok(())
}

#[tokio::test]
async fn status_server_error_routes_to_error() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/auth/check-pin-status/abc123"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let backend = Backend::parse(&server.uri())?;
    let mut gate = Gate::new(
        ReqwestClient::new(Duration::from_secs(5))?,
        backend,
        RecordingNavigator::new(),
    );

    assert_eq!(gate.enter(Some("abc123")).await, GateState::ErrorSurface);
    assert_eq!(gate.navigator().routes(), vec![Route::Error]);
    assert!(matches!(
        gate.controller().error(),
        Some(GateError::StatusResolution(_))
    ));
    Ok(())
}

#[tokio::test]
async fn unreachable_backend_routes_to_error() -> Result<()> {
    let port = {
        let Ok(listener) = TcpListener::bind("127.0.0.1:0") else {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        };
        listener.local_addr()?.port()
    };

    let backend = Backend::parse(&format!("http://127.0.0.1:{port}"))?;
    let mut gate = Gate::new(
        ReqwestClient::new(Duration::from_secs(2))?,
        backend,
        RecordingNavigator::new(),
    );

    assert_eq!(gate.enter(Some("abc123")).await, GateState::ErrorSurface);
    assert!(matches!(
        gate.controller().error(),
        Some(GateError::StatusResolution(_))
    ));
    Ok(())
}
