//! attendance-hook server entry point.
//!
//! Starts the Axum HTTP server with the Slack webhook and health endpoints.

use std::sync::Arc;

use anyhow::Context;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use attendance_hook::api;
use attendance_hook::app_state::AppState;
use attendance_hook::config::HookConfig;
use attendance_hook::persistence::{
    MemoryPropertyStore, MemoryTabularStore, PostgresPropertyStore, PostgresTabularStore,
    PropertyStore, TabularStore, postgres,
};
use attendance_hook::service::AttendanceService;
use attendance_hook::slack::{MessageResolver, SlackClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json")) {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    // Load configuration
    let config = HookConfig::from_env()
        .map_err(|e| anyhow::anyhow!(e))
        .context("failed to load configuration")?;
    tracing::info!(addr = %config.listen_addr, ?config, "starting attendance-hook");

    // Build persistence layer
    let (sheets, properties): (Arc<dyn TabularStore>, Arc<dyn PropertyStore>) =
        if config.persistence_enabled {
            let pool = postgres::connect(&config)
                .await
                .context("failed to connect to database")?;
            (
                Arc::new(PostgresTabularStore::new(pool.clone(), &config.spreadsheet_id)),
                Arc::new(PostgresPropertyStore::new(pool)),
            )
        } else {
            tracing::warn!("persistence disabled; attendance rows are kept in memory only");
            (
                Arc::new(MemoryTabularStore::new()),
                Arc::new(MemoryPropertyStore::new()),
            )
        };

    // Build chat platform client
    let resolver: Arc<dyn MessageResolver> =
        Arc::new(SlackClient::new(&config.slack_api_base, &config.slack_token));

    // Build service layer
    let listen_addr = config.listen_addr;
    let attendance_service = Arc::new(AttendanceService::new(
        Arc::new(config),
        resolver,
        sheets,
        properties,
    ));

    // Build application state
    let app_state = AppState { attendance_service };

    // Build router
    let app = api::build_router()
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(listen_addr)
        .await
        .with_context(|| format!("failed to bind {listen_addr}"))?;
    tracing::info!(addr = %listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
