mod app;
mod config;
mod crime_data;
mod db;
mod routes;
mod services;
mod state;

extern crate self as sqlx;
pub use crate::db::{SqlitePool, query, query_as};

use tokio::signal;
use tracing_subscriber::EnvFilter;

use crate::state::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let database_url = config::database_url();
    let db_max_connections = config::db_max_connections();
    tracing::info!(%database_url, db_max_connections, "Opening SQLite database...");
    let db = match db::connect(&database_url, db_max_connections).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!(error = %e, "failed to open SQLite database");
            return;
        }
    };
    if let Err(e) = db::migrate(&db).await {
        tracing::error!(error = %e, "failed to run migrations");
        return;
    }

    let state = AppState::new(Some(db));
    match services::zone_refresher::reload(&state).await {
        Ok(0) => tracing::warn!("crime_data is empty; /zones will serve an empty list"),
        Ok(count) => tracing::info!("loaded {count} zones"),
        Err(e) => tracing::warn!(error = %e, "initial zone load failed"),
    }

    tokio::spawn(services::zone_refresher::run(state.clone()));

    let app = app::build_app(state);

    let addr = format!("0.0.0.0:{}", config::server_port());
    tracing::info!("SafeZone server listening on {addr}");

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, %addr, "failed to bind TCP listener");
            return;
        }
    };
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "server failed");
    }

    tracing::info!("Server shut down gracefully");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        let mut sigterm = match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(sigterm) => sigterm,
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                return;
            }
        };
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
