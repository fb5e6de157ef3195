//! TrueView Portal API server.
//!
//! Client-portal backend for an imaging-services business: ingests signed
//! booking webhooks from the CRM, provisions client accounts and projects,
//! authenticates portal sessions, and serves time-boxed deliverable URLs.

mod config;
mod logging;
mod openapi;
mod state;

use std::net::SocketAddr;
use std::time::Duration;

use config::Config;
use sqlx::postgres::PgPoolOptions;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::info;
use trueview_api::portal_router;
use trueview_db::schema::apply_schema;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Load configuration (fail-fast on missing required values).
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    logging::init_logging(&config.rust_log);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        host = %config.host,
        port = config.port,
        "Starting TrueView Portal API"
    );

    // Connection pool with bounded acquisition so a slow database cannot
    // stall requests indefinitely.
    let pool = match PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&config.database_url)
        .await
    {
        Ok(pool) => {
            info!("Database connection established");
            pool
        }
        Err(e) => {
            eprintln!("Failed to connect to database: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = apply_schema(&pool).await {
        eprintln!("Failed to apply schema: {e}");
        std::process::exit(1);
    }

    let state = match state::build_state(&config, pool) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("Failed to build services: {e}");
            std::process::exit(1);
        }
    };

    let app = portal_router(state)
        .merge(openapi::swagger_routes())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = match format!("{}:{}", config.host, config.port).parse() {
        Ok(addr) => addr,
        Err(e) => {
            eprintln!("Invalid listen address: {e}");
            std::process::exit(1);
        }
    };

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            eprintln!("Failed to bind {addr}: {e}");
            std::process::exit(1);
        }
    };

    info!(%addr, "Listening");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        eprintln!("Server error: {e}");
        std::process::exit(1);
    }

    info!("Shutdown complete");
}

/// Resolve on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => tracing::error!(error = %e, "Failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}
