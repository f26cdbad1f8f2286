//! Relay server
//!
//! Builds the hub, starts the idle auditor and serves the HTTP/WebSocket
//! router until Ctrl-C.

use std::sync::Arc;

use tokio::net::TcpListener;

use crate::api::create_router;
use crate::config::Config;
use crate::error::{RelayError, RelayResult};
use crate::relay::RelayHub;

/// Run the server (blocks until shutdown)
pub async fn run(config: Config) -> RelayResult<()> {
    let hub = Arc::new(RelayHub::new(config.missing_user));
    let auditor = hub.auditor(config.audit_interval()).spawn();

    let app = create_router(hub.clone(), config.public_dir.as_deref());

    let addr = config.listen_address();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| RelayError::Bind {
            addr: addr.clone(),
            source,
        })?;

    tracing::info!(
        address = %listener.local_addr()?,
        public_dir = ?config.public_dir,
        missing_user = ?config.missing_user,
        "Server running"
    );

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    auditor.abort();
    served?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
