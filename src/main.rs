use axum::routing::get;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use logo_forge::{
    app_state::AppState,
    config::AppConfig,
    db,
    routes,
    services::{store::ResultChain, webhook::WebhookClient},
};

#[tokio::main]
async fn main() {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    // Refuse to start without a usable webhook URL
    let config = AppConfig::from_env().expect("Failed to load configuration from environment");

    tracing::info!("Initializing logo-forge server");

    let prometheus_handle = Arc::new(
        routes::metrics::install_recorder().expect("Failed to install Prometheus metrics recorder"),
    );

    // Optional relational tier
    let pool = match config.database_url.as_deref() {
        Some(url) => {
            // Schema is applied by the relational tier on first use
            tracing::info!("Configuring PostgreSQL result store");
            Some(db::init_pool(url).expect("Invalid DATABASE_URL"))
        }
        None => {
            tracing::info!("DATABASE_URL not set, relational result store disabled");
            None
        }
    };

    let results =
        ResultChain::from_config(&config, pool).expect("Failed to initialize result stores");
    tracing::info!(tiers = ?results.tier_names(), "Result store chain ready");

    let webhook = WebhookClient::new(
        config.webhook_url.clone(),
        Duration::from_secs(config.webhook_timeout_secs),
    )
    .expect("Failed to initialize webhook client");
    tracing::info!(webhook = %webhook.url(), "Forwarding generation requests");

    let state = AppState::new(results, webhook, config.callback_policy);

    let app = routes::api_router(state, config.body_limit_bytes).route(
        "/metrics",
        get(routes::metrics::prometheus_metrics).with_state(prometheus_handle),
    );

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
