//! End-to-end flow over real sockets
//!
//! Starts the service on an ephemeral port next to a stand-in automation
//! system that answers the webhook and calls back with results, then drives
//! the client session through submit, poll and gallery.

mod fixtures;
mod helpers;

use std::net::SocketAddr;
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use fixtures::*;
use logo_forge::client::{GenerationSession, LogoApiClient, PollConfig, PollError, ViewState};
use logo_forge::config::CallbackPolicy;
use logo_forge::models::job::JobRequest;

#[derive(Clone)]
struct Automation {
    service_url: String,
    /// `None` accepts the job but never calls back.
    outcome: Option<fn(&str) -> Value>,
}

async fn automation_hook(State(automation): State<Automation>, Json(job): Json<Value>) -> StatusCode {
    let job_id = job["job_id"].as_str().unwrap_or_default().to_string();

    if let Some(outcome) = automation.outcome {
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(30)).await;
            reqwest::Client::new()
                .post(format!("{}/api/results", automation.service_url))
                .json(&outcome(&job_id))
                .send()
                .await
                .expect("Callback failed");
        });
    }

    StatusCode::OK
}

async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Bind the service first so the automation stand-in knows where to call back.
async fn start_stack(outcome: Option<fn(&str) -> Value>) -> (String, tempfile::TempDir) {
    let service_listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let service_url = format!("http://{}", service_listener.local_addr().unwrap());

    let automation = Router::new()
        .route("/webhook/logo", post(automation_hook))
        .with_state(Automation {
            service_url: service_url.clone(),
            outcome,
        });
    let automation_addr = serve(automation).await;

    let dir = tempfile::tempdir().unwrap();
    let app = helpers::build_test_app(
        &format!("http://{automation_addr}/webhook/logo"),
        dir.path(),
        CallbackPolicy::Open,
    );
    tokio::spawn(async move {
        axum::serve(service_listener, app).await.unwrap();
    });

    (service_url, dir)
}

fn fast_polling(max_attempts: u32) -> PollConfig {
    PollConfig {
        interval: Duration::from_millis(20),
        max_attempts,
    }
}

fn gallery(job_id: &str) -> Value {
    gallery_callback(job_id)
}

fn failure(job_id: &str) -> Value {
    failed_callback(job_id, "Content policy violation")
}

#[tokio::test]
async fn test_e2e_generation_reaches_gallery() {
    let (service_url, _dir) = start_stack(Some(gallery as fn(&str) -> Value)).await;
    let client = LogoApiClient::new(&service_url).unwrap();
    let mut session = GenerationSession::new(fast_polling(50));

    session
        .run(
            &client,
            &JobRequest::new("a coffee shop logo, warm colors"),
            &CancellationToken::new(),
        )
        .await
        .expect("Generation should complete");

    let gallery = session.gallery().expect("Results view expected");
    assert_eq!(gallery.len(), 3);
    let scores: Vec<&str> = gallery.tiles().iter().map(|t| t.score_label.as_str()).collect();
    assert_eq!(scores, vec!["0.92", "0.89", "0.87"]);
}

#[tokio::test]
async fn test_e2e_failed_job_returns_to_form() {
    let (service_url, _dir) = start_stack(Some(failure as fn(&str) -> Value)).await;
    let client = LogoApiClient::new(&service_url).unwrap();
    let mut session = GenerationSession::new(fast_polling(50));

    let err = session
        .run(&client, &JobRequest::new("owl"), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, PollError::Failed(_)));
    assert_eq!(session.state(), &ViewState::Form);
    assert_eq!(
        session.notification().unwrap().description,
        "Content policy violation"
    );
}

#[tokio::test]
async fn test_e2e_silent_automation_times_out() {
    let (service_url, _dir) = start_stack(None).await;
    let client = LogoApiClient::new(&service_url).unwrap();
    let mut session = GenerationSession::new(fast_polling(4));

    let err = session
        .run(&client, &JobRequest::new("owl"), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, PollError::Timeout { attempts: 4 }));
    assert_eq!(session.state(), &ViewState::Form);
}
