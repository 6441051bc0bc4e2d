//! Settlement Engine Binary
//!
//! Starts the storefront settlement engine.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin settlement-engine
//! ```
//!
//! # Environment Variables
//!
//! ## Required
//! - `TOSS_SECRET_KEY`: Payment gateway secret key
//!
//! ## Optional
//! - `TOSS_BASE_URL`: Gateway endpoint (default: <https://api.tosspayments.com>)
//! - `TOSS_TIMEOUT_SECS`: Per-attempt gateway timeout (default: 30)
//! - `TOSS_MAX_ATTEMPTS`: Gateway attempt budget (default: 3)
//! - `TOSS_INITIAL_BACKOFF_MS` / `TOSS_MAX_BACKOFF_MS`: Retry backoff bounds
//! - `HTTP_PORT`: HTTP server port (default: 8080)
//! - `SETTLEMENT_DB_PATH`: SQLite database path (default: settlement.db)
//! - `RUST_LOG`: Log level (default: info)

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::signal;

use settlement_engine::application::use_cases::{
    CancelPaymentUseCase, ConfirmPaymentUseCase, CreatePendingOrderUseCase, LookupPaymentUseCase,
};
use settlement_engine::config::EngineConfig;
use settlement_engine::infrastructure::gateway::toss::{TossConfig, TossGatewayAdapter};
use settlement_engine::infrastructure::http::{AppState, create_router};
use settlement_engine::infrastructure::persistence::sqlite::{
    SqliteOrderRepository, SqliteStockAdjuster, connect,
};
use settlement_engine::telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _telemetry_guard = telemetry::init();

    let config = EngineConfig::from_env().context("loading configuration")?;
    tracing::info!(?config, "Starting settlement engine");

    let pool = connect(&config.db_path)
        .await
        .with_context(|| format!("opening database at {}", config.db_path))?;
    let orders = Arc::new(SqliteOrderRepository::new(pool.clone()));
    let stock = Arc::new(SqliteStockAdjuster::new(pool));

    let toss_config = TossConfig::new(config.secret_key.clone())
        .with_base_url(config.gateway_base_url.clone())
        .with_timeout(config.gateway_timeout)
        .with_retry(config.retry.clone());
    let gateway = Arc::new(TossGatewayAdapter::new(toss_config).context("building gateway client")?);

    let state = AppState {
        create_order: Arc::new(CreatePendingOrderUseCase::new(Arc::clone(&orders))),
        confirm_payment: Arc::new(ConfirmPaymentUseCase::new(
            Arc::clone(&gateway),
            Arc::clone(&orders),
            Arc::clone(&stock),
        )),
        cancel_payment: Arc::new(CancelPaymentUseCase::new(
            Arc::clone(&gateway),
            Arc::clone(&orders),
        )),
        lookup_payment: Arc::new(LookupPaymentUseCase::new(gateway)),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!(%addr, "Settlement engine listening");

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;

    tracing::info!("Settlement engine stopped");
    Ok(())
}

/// Resolve when the process receives ctrl-c or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install ctrl-c handler");
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
        () = ctrl_c => tracing::info!("Received ctrl-c, shutting down"),
        () = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
