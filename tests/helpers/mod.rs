//! Test helper utilities: router construction and request shortcuts

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use logo_forge::app_state::AppState;
use logo_forge::config::CallbackPolicy;
use logo_forge::routes;
use logo_forge::services::store::{FileStore, MemoryStore, ResultChain};
use logo_forge::services::webhook::WebhookClient;

pub const BODY_LIMIT: usize = 10 * 1024 * 1024;

/// Memory and file tiers, webhook pointed at `webhook_url`.
pub fn build_test_app(webhook_url: &str, results_dir: &Path, policy: CallbackPolicy) -> Router {
    let chain = ResultChain::new()
        .with_store(Arc::new(MemoryStore::new()))
        .with_store(Arc::new(FileStore::new(results_dir)));
    build_app_with_chain(webhook_url, chain, policy)
}

pub fn build_app_with_chain(
    webhook_url: &str,
    chain: ResultChain,
    policy: CallbackPolicy,
) -> Router {
    let webhook = WebhookClient::new(webhook_url, Duration::from_secs(5))
        .expect("Failed to build webhook client");
    let state = AppState::new(chain, webhook, policy);
    routes::api_router(state, BODY_LIMIT)
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.expect("Router failed")
}

pub async fn post_json(app: &Router, uri: &str, body: &Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("Response body is not JSON")
}

/// Assert a response status and return its JSON body.
pub async fn expect_json(response: Response<Body>, status: StatusCode) -> Value {
    assert_eq!(response.status(), status);
    body_json(response).await
}
