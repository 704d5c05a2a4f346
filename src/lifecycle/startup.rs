//! Startup orchestration.
//!
//! Fail fast: any startup error is returned to `main` and ends the process.

use std::net::SocketAddr;

use tokio::net::TcpListener;

use crate::config::ProxyConfig;
use crate::http::HttpServer;
use crate::lifecycle::{signals, Shutdown};
use crate::observability::metrics;

pub async fn run(config: ProxyConfig) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        bind_address = %config.listener.bind_address,
        store = ?config.store.backend,
        store_key = %config.store.key,
        cache_ttl_secs = config.cache.ttl_secs,
        "Configuration loaded"
    );

    if config.admin.uses_default_password() {
        tracing::warn!("Admin password is the well-known default; set ADMIN_PASSWORD");
    }

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr);
    }

    let server = HttpServer::new(&config)?;
    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    signals::spawn_signal_listener(shutdown.clone());

    server.run(listener, shutdown.signalled()).await?;
    Ok(())
}
