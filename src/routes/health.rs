use std::time::Instant;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::app_state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub stores: Vec<ComponentHealth>,
}

#[derive(Serialize)]
pub struct ComponentHealth {
    pub name: String,
    pub status: String,
    pub latency_ms: Option<u64>,
}

/// GET /health — per-tier store health.
///
/// Answers 200 even when degraded: every tier below memory is optional and
/// the service keeps working without it.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let mut stores = Vec::with_capacity(state.results.tiers().len());

    for tier in state.results.tiers() {
        let start = Instant::now();
        let check = match tier.health().await {
            Ok(()) => ComponentHealth {
                name: tier.name().to_string(),
                status: "ok".to_string(),
                latency_ms: Some(start.elapsed().as_millis() as u64),
            },
            Err(e) => {
                tracing::warn!(store = tier.name(), error = %e, "Store health check failed");
                ComponentHealth {
                    name: tier.name().to_string(),
                    status: "error".to_string(),
                    latency_ms: None,
                }
            }
        };
        stores.push(check);
    }

    let all_healthy = stores.iter().all(|s| s.status == "ok");

    Json(HealthResponse {
        status: if all_healthy {
            "ok".to_string()
        } else {
            "degraded".to_string()
        },
        version: env!("CARGO_PKG_VERSION").to_string(),
        stores,
    })
}
