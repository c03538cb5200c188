//! In-process chat server for integration tests
//!
//! Mirrors the real server's answers closely enough to exercise the HTTP
//! client: JSON bodies, a `402` with an `ok: false` body, and a plain-text
//! `400` for undecodable payloads.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

/// What the server saw
#[derive(Debug, Default)]
pub struct Seen {
    pub csrf_tokens: Vec<String>,
    pub cookies: Vec<String>,
    pub chat_bodies: Vec<Value>,
    pub token_bodies: Vec<Value>,
    pub history_limits: Vec<String>,
    pub balance: i64,
}

pub type Shared = Arc<Mutex<Seen>>;

fn record_headers(seen: &mut Seen, headers: &HeaderMap) {
    if let Some(token) = headers.get("x-csrftoken") {
        seen.csrf_tokens
            .push(token.to_str().unwrap_or_default().to_string());
    }
    if let Some(cookie) = headers.get("cookie") {
        seen.cookies
            .push(cookie.to_str().unwrap_or_default().to_string());
    }
}

async fn messages(
    State(seen): State<Shared>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Json<Value> {
    let mut seen = seen.lock().unwrap();
    record_headers(&mut seen, &headers);
    seen.history_limits
        .push(query.get("limit").cloned().unwrap_or_default());

    Json(json!({
        "ok": true,
        "messages": [
            {"role": "user", "content": "hi", "created_at": "2024-05-01T10:00:00Z"},
            {"role": "bot", "content": "Echo: hi", "created_at": "2024-05-01T10:00:01Z"}
        ]
    }))
}

async fn chat(State(seen): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    let mut seen = seen.lock().unwrap();
    record_headers(&mut seen, &headers);
    seen.chat_bodies.push(body.clone());

    if seen.balance <= 0 {
        return (
            StatusCode::PAYMENT_REQUIRED,
            Json(json!({"ok": false, "error": "Insufficient tokens", "tokens": seen.balance})),
        )
            .into_response();
    }

    seen.balance -= 1;
    let message = body["message"].as_str().unwrap_or_default();
    Json(json!({
        "ok": true,
        "reply": format!("Echo: {message}"),
        "tokens": seen.balance
    }))
    .into_response()
}

async fn add_tokens(
    State(seen): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    let mut seen = seen.lock().unwrap();
    record_headers(&mut seen, &headers);
    seen.token_bodies.push(body.clone());

    let amount = body["amount"].as_i64().unwrap_or(0);
    if amount <= 0 {
        return Json(json!({"ok": false, "error": "Amount must be positive"}));
    }
    seen.balance += amount;
    Json(json!({"ok": true, "tokens": seen.balance}))
}

async fn bad_request() -> (StatusCode, &'static str) {
    (StatusCode::BAD_REQUEST, "Invalid payload")
}

/// Start the server; returns its base URL and the shared record
pub async fn spawn_server(balance: i64) -> (String, Shared) {
    let seen: Shared = Arc::new(Mutex::new(Seen {
        balance,
        ..Seen::default()
    }));

    let app = Router::new()
        .route("/api/messages/", get(messages))
        .route("/api/chat/", post(chat))
        .route("/api/tokens/add/", post(add_tokens))
        .route("/broken/api/messages/", get(bad_request))
        .route("/broken/api/chat/", post(bad_request))
        .route("/broken/api/tokens/add/", post(bad_request))
        .with_state(Arc::clone(&seen));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), seen)
}

/// A reqwest client that never goes through a proxy
pub fn direct_client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
