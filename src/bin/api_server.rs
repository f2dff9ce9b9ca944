// src/bin/api_server.rs

use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use verification_ledger::infra::config;
use verification_ledger::infra::mail::HttpMailRelay;
use verification_ledger::storage::records::PostgresRecordStore;
use verification_ledger::transport;
use verification_ledger::{Ledger, NotificationSweep, SolanaLedger};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    config::load_env();
    config::init_tracing();

    // --- Ledger ---
    println!("> Connecting to ledger...");
    let ledger = Arc::new(SolanaLedger::from_env()?);
    match ledger.verification_count().await {
        Ok(count) => info!(registry = %ledger.registry(), count, "ledger reachable"),
        Err(e) => warn!(error = %e, "ledger not reachable at startup (continuing)"),
    }

    // --- Record store + mail relay ---
    println!("> Connecting to record store...");
    let store = Arc::new(PostgresRecordStore::connect().await?);
    let mailer = Arc::new(HttpMailRelay::from_env()?);
    let sweep = NotificationSweep::from_env(store.clone(), mailer)?;

    let app_state = transport::http::AppState::new(ledger, store, sweep);

    // --- API Server Initialization ---
    println!("> Starting API server...");
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);
    let app = transport::http::create_router(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", transport::http::ApiDoc::openapi()))
        .layer(cors);
    let bind_addr = config::api_bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    println!("> API server listening on http://{}", bind_addr);
    println!("> Swagger UI available at http://{}/swagger-ui", bind_addr);

    tokio::select! {
        result = axum::serve(listener, app) => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            println!("\n> Shutdown signal received (Ctrl+C)...");
        }
    }

    Ok(())
}
