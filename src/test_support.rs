//! Helpers for driving the full router in-process.

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::{app::build_app, state::AppState};

pub fn test_app() -> Router {
    build_app(AppState::in_memory())
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    token: Option<&str>,
) -> (StatusCode, Vec<u8>) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let req = match body {
        Some(v) => req
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(v.to_string())),
        None => req.body(Body::empty()),
    }
    .expect("request");

    let res = app.clone().oneshot(req).await.expect("router response");
    let status = res.status();
    let bytes = to_bytes(res.into_body(), usize::MAX).await.expect("body");
    (status, bytes.to_vec())
}

pub async fn send_json(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    token: Option<&str>,
) -> (StatusCode, Value) {
    let (status, bytes) = send(app, method, uri, body, token).await;
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

/// Sends `body` verbatim, with an optional content type.
pub async fn send_raw(
    app: &Router,
    method: Method,
    uri: &str,
    body: &str,
    content_type: Option<&str>,
) -> (StatusCode, Vec<u8>) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(ct) = content_type {
        req = req.header(header::CONTENT_TYPE, ct);
    }
    let req = req.body(Body::from(body.to_owned())).expect("request");
    let res = app.clone().oneshot(req).await.expect("router response");
    let status = res.status();
    let bytes = to_bytes(res.into_body(), usize::MAX).await.expect("body");
    (status, bytes.to_vec())
}

/// Registers a user and returns a bearer token for it.
pub async fn register_and_login(app: &Router, mail: &str) -> String {
    let (status, _) = send_json(
        app,
        Method::POST,
        "/user",
        Some(json!({"name": "Tester", "mail": mail, "password": "p4ss"})),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send_json(
        app,
        Method::POST,
        "/login",
        Some(json!({"mail": mail, "password": "p4ss"})),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().expect("token").to_string()
}
